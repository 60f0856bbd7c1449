//! Show booking repository.
//!
//! # Invariants
//! - A booking is accepted only when both its venue and its artist exist at
//!   commit time; the check and the insert share one transaction.
//! - The global listing is ordered by `(artist_id, start_time, id)`.

use crate::model::show::{to_epoch_ms, NewShow, Show, ShowId, ShowListing};
use crate::model::RecordKind;
use crate::repo::{
    begin_write, count_from_db, ensure_table_ready, record_exists, start_time_from_db,
    ConstraintViolation, RepoError, RepoResult,
};
use rusqlite::{params, Connection};

const SHOW_COLUMNS: &[&str] = &["id", "venue_id", "artist_id", "start_time"];

pub trait ShowRepository {
    /// Books one show; unknown venue or artist ids are a constraint error.
    fn create_show(&self, show: &NewShow) -> RepoResult<ShowId>;
    fn get_show(&self, id: ShowId) -> RepoResult<Option<Show>>;
    fn delete_show(&self, id: ShowId) -> RepoResult<()>;
    /// Every show joined with its venue and artist.
    fn list_shows(&self) -> RepoResult<Vec<ShowListing>>;
    fn count_shows(&self) -> RepoResult<usize>;
}

pub struct SqliteShowRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteShowRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "shows", SHOW_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl ShowRepository for SqliteShowRepository<'_> {
    fn create_show(&self, show: &NewShow) -> RepoResult<ShowId> {
        let tx = begin_write(self.conn)?;
        if !record_exists(&tx, "venues", show.venue_id)? {
            return Err(RepoError::Constraint(ConstraintViolation::UnknownVenue(
                show.venue_id,
            )));
        }
        if !record_exists(&tx, "artists", show.artist_id)? {
            return Err(RepoError::Constraint(ConstraintViolation::UnknownArtist(
                show.artist_id,
            )));
        }

        tx.execute(
            "INSERT INTO shows (venue_id, artist_id, start_time) VALUES (?1, ?2, ?3);",
            params![show.venue_id, show.artist_id, to_epoch_ms(show.start_time)],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(id)
    }

    fn get_show(&self, id: ShowId) -> RepoResult<Option<Show>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, venue_id, artist_id, start_time
             FROM shows
             WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(Show {
                id: row.get("id")?,
                venue_id: row.get("venue_id")?,
                artist_id: row.get("artist_id")?,
                start_time: start_time_from_db(row.get("start_time")?, "shows.start_time")?,
            }));
        }
        Ok(None)
    }

    fn delete_show(&self, id: ShowId) -> RepoResult<()> {
        let tx = begin_write(self.conn)?;
        let changed = tx.execute("DELETE FROM shows WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Show,
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }

    fn list_shows(&self) -> RepoResult<Vec<ShowListing>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                s.id AS show_id,
                v.id AS venue_id,
                v.name AS venue_name,
                a.id AS artist_id,
                a.name AS artist_name,
                a.image_link AS artist_image_link,
                s.start_time AS start_time
             FROM shows s
             INNER JOIN venues v ON v.id = s.venue_id
             INNER JOIN artists a ON a.id = s.artist_id
             ORDER BY s.artist_id ASC, s.start_time ASC, s.id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut listings = Vec::new();
        while let Some(row) = rows.next()? {
            listings.push(ShowListing {
                show_id: row.get("show_id")?,
                venue_id: row.get("venue_id")?,
                venue_name: row.get("venue_name")?,
                artist_id: row.get("artist_id")?,
                artist_name: row.get("artist_name")?,
                artist_image_link: row.get("artist_image_link")?,
                start_time: start_time_from_db(row.get("start_time")?, "shows.start_time")?,
            });
        }
        Ok(listings)
    }

    fn count_shows(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM shows;", [], |row| row.get(0))?;
        Ok(count_from_db(count, "shows")? as usize)
    }
}
