//! Artist repository contract and SQLite implementation.
//!
//! Mirrors the venue repository. Deleting an artist also removes the shows
//! that booked it, so no show is left pointing at a missing artist.

use crate::model::artist::{Artist, ArtistFields, ArtistId, ArtistSummary};
use crate::model::show::{to_epoch_ms, ArtistShowEntry};
use crate::model::RecordKind;
use crate::repo::{
    begin_write, bool_from_db, bool_to_db, count_from_db, ensure_table_ready, genres_from_db,
    genres_to_db, start_time_from_db, RepoError, RepoResult,
};
use crate::search::name_search::{register_fold_function, NameQuery, SearchHit};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

const ARTIST_SELECT_SQL: &str = "SELECT
    id,
    name,
    city,
    state,
    phone,
    image_link,
    facebook_link,
    website,
    genres,
    seeking_venue,
    seeking_description
FROM artists";

const ARTIST_COLUMNS: &[&str] = &[
    "id",
    "name",
    "city",
    "state",
    "phone",
    "image_link",
    "facebook_link",
    "website",
    "genres",
    "seeking_venue",
    "seeking_description",
];

pub trait ArtistRepository {
    fn create_artist(&self, fields: &ArtistFields) -> RepoResult<ArtistId>;
    fn update_artist(&self, id: ArtistId, fields: &ArtistFields) -> RepoResult<()>;
    /// Deletes the artist and returns how many shows went with it.
    fn delete_artist(&self, id: ArtistId) -> RepoResult<usize>;
    fn get_artist(&self, id: ArtistId) -> RepoResult<Option<Artist>>;
    /// Id + name of every artist, ordered by id.
    fn list_artists(&self) -> RepoResult<Vec<ArtistSummary>>;
    fn count_artists(&self) -> RepoResult<usize>;
    fn search_artists(&self, query: &NameQuery, now: DateTime<Utc>) -> RepoResult<Vec<SearchHit>>;
    /// Every show the artist is booked for, joined with its venue.
    fn list_artist_shows(&self, id: ArtistId) -> RepoResult<Vec<ArtistShowEntry>>;
}

pub struct SqliteArtistRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArtistRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "artists", ARTIST_COLUMNS)?;
        register_fold_function(conn)?;
        Ok(Self { conn })
    }
}

impl ArtistRepository for SqliteArtistRepository<'_> {
    fn create_artist(&self, fields: &ArtistFields) -> RepoResult<ArtistId> {
        fields.validate()?;
        let genres = genres_to_db(&fields.genres)?;

        let tx = begin_write(self.conn)?;
        tx.execute(
            "INSERT INTO artists (
                name,
                city,
                state,
                phone,
                image_link,
                facebook_link,
                website,
                genres,
                seeking_venue,
                seeking_description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                fields.name,
                fields.city,
                fields.state,
                fields.phone,
                fields.image_link,
                fields.facebook_link,
                fields.website,
                genres,
                bool_to_db(fields.seeking_venue),
                fields.seeking_description,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(id)
    }

    fn update_artist(&self, id: ArtistId, fields: &ArtistFields) -> RepoResult<()> {
        fields.validate()?;
        let genres = genres_to_db(&fields.genres)?;

        let tx = begin_write(self.conn)?;
        let changed = tx.execute(
            "UPDATE artists
             SET
                name = ?2,
                city = ?3,
                state = ?4,
                phone = ?5,
                image_link = ?6,
                facebook_link = ?7,
                website = ?8,
                genres = ?9,
                seeking_venue = ?10,
                seeking_description = ?11
             WHERE id = ?1;",
            params![
                id,
                fields.name,
                fields.city,
                fields.state,
                fields.phone,
                fields.image_link,
                fields.facebook_link,
                fields.website,
                genres,
                bool_to_db(fields.seeking_venue),
                fields.seeking_description,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Artist,
                id,
            });
        }
        tx.commit()?;

        Ok(())
    }

    fn delete_artist(&self, id: ArtistId) -> RepoResult<usize> {
        let tx = begin_write(self.conn)?;
        let shows: i64 = tx.query_row(
            "SELECT COUNT(*) FROM shows WHERE artist_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        let changed = tx.execute("DELETE FROM artists WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Artist,
                id,
            });
        }
        tx.commit()?;

        Ok(count_from_db(shows, "shows.artist_id")? as usize)
    }

    fn get_artist(&self, id: ArtistId) -> RepoResult<Option<Artist>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ARTIST_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_artist_row(row)?));
        }
        Ok(None)
    }

    fn list_artists(&self) -> RepoResult<Vec<ArtistSummary>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM artists ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut artists = Vec::new();
        while let Some(row) = rows.next()? {
            artists.push(ArtistSummary {
                id: row.get("id")?,
                name: row.get("name")?,
            });
        }
        Ok(artists)
    }

    fn count_artists(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM artists;", [], |row| row.get(0))?;
        Ok(count_from_db(count, "artists")? as usize)
    }

    fn search_artists(
        &self,
        query: &NameQuery,
        now: DateTime<Utc>,
    ) -> RepoResult<Vec<SearchHit>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                a.id AS id,
                a.name AS name,
                (
                    SELECT COUNT(*)
                    FROM shows s
                    WHERE s.artist_id = a.id
                      AND s.start_time >= ?2
                ) AS num_upcoming_shows
             FROM artists a
             WHERE ?1 = '' OR instr(listings_fold(a.name), ?1) > 0
             ORDER BY a.id ASC;",
        )?;
        let mut rows = stmt.query(params![query.folded(), to_epoch_ms(now)])?;
        let mut hits = Vec::new();
        while let Some(row) = rows.next()? {
            hits.push(SearchHit {
                id: row.get("id")?,
                name: row.get("name")?,
                num_upcoming_shows: count_from_db(
                    row.get("num_upcoming_shows")?,
                    "num_upcoming_shows",
                )?,
            });
        }
        Ok(hits)
    }

    fn list_artist_shows(&self, id: ArtistId) -> RepoResult<Vec<ArtistShowEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                s.id AS show_id,
                v.id AS venue_id,
                v.name AS venue_name,
                v.image_link AS venue_image_link,
                s.start_time AS start_time
             FROM shows s
             INNER JOIN venues v ON v.id = s.venue_id
             WHERE s.artist_id = ?1
             ORDER BY s.start_time ASC, s.id ASC;",
        )?;
        let mut rows = stmt.query([id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(ArtistShowEntry {
                show_id: row.get("show_id")?,
                venue_id: row.get("venue_id")?,
                venue_name: row.get("venue_name")?,
                venue_image_link: row.get("venue_image_link")?,
                start_time: start_time_from_db(row.get("start_time")?, "shows.start_time")?,
            });
        }
        Ok(entries)
    }
}

fn parse_artist_row(row: &Row<'_>) -> RepoResult<Artist> {
    let genres_text: String = row.get("genres")?;
    let fields = ArtistFields {
        name: row.get("name")?,
        city: row.get("city")?,
        state: row.get("state")?,
        phone: row.get("phone")?,
        image_link: row.get("image_link")?,
        facebook_link: row.get("facebook_link")?,
        website: row.get("website")?,
        genres: genres_from_db(&genres_text, "artists.genres")?,
        seeking_venue: bool_from_db(row.get("seeking_venue")?, "artists.seeking_venue")?,
        seeking_description: row.get("seeking_description")?,
    };
    Ok(Artist {
        id: row.get("id")?,
        fields,
    })
}
