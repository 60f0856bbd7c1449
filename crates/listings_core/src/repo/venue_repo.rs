//! Venue repository contract and SQLite implementation.
//!
//! # Invariants
//! - `update_venue` overwrites every editable column; there is no patch mode.
//! - `delete_venue` removes the venue's shows through `ON DELETE CASCADE`.
//! - Show lookups for a venue are one JOIN, never one query per show.

use crate::model::show::{to_epoch_ms, VenueShowEntry};
use crate::model::venue::{Venue, VenueFields, VenueId};
use crate::model::RecordKind;
use crate::repo::{
    begin_write, bool_from_db, bool_to_db, count_from_db, ensure_table_ready, genres_from_db,
    genres_to_db, start_time_from_db, RepoError, RepoResult,
};
use crate::search::name_search::{register_fold_function, NameQuery, SearchHit};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

const VENUE_SELECT_SQL: &str = "SELECT
    id,
    name,
    city,
    state,
    address,
    phone,
    image_link,
    facebook_link,
    website,
    genres,
    seeking_talent,
    seeking_description
FROM venues";

const VENUE_COLUMNS: &[&str] = &[
    "id",
    "name",
    "city",
    "state",
    "address",
    "phone",
    "image_link",
    "facebook_link",
    "website",
    "genres",
    "seeking_talent",
    "seeking_description",
];

pub trait VenueRepository {
    fn create_venue(&self, fields: &VenueFields) -> RepoResult<VenueId>;
    fn update_venue(&self, id: VenueId, fields: &VenueFields) -> RepoResult<()>;
    /// Deletes the venue and returns how many shows went with it.
    fn delete_venue(&self, id: VenueId) -> RepoResult<usize>;
    fn get_venue(&self, id: VenueId) -> RepoResult<Option<Venue>>;
    /// All venues, ordered by id.
    fn list_venues(&self) -> RepoResult<Vec<Venue>>;
    /// All venues, ordered by `(city, state, id)` for area grouping.
    fn list_venues_by_area(&self) -> RepoResult<Vec<Venue>>;
    fn count_venues(&self) -> RepoResult<usize>;
    /// Name matches with their upcoming-show count relative to `now`.
    fn search_venues(&self, query: &NameQuery, now: DateTime<Utc>) -> RepoResult<Vec<SearchHit>>;
    /// Every show at the venue joined with its artist, by start time.
    fn list_venue_shows(&self, id: VenueId) -> RepoResult<Vec<VenueShowEntry>>;
}

pub struct SqliteVenueRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteVenueRepository<'conn> {
    /// Wraps a migrated connection; rejects connections missing the venue schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "venues", VENUE_COLUMNS)?;
        register_fold_function(conn)?;
        Ok(Self { conn })
    }
}

impl VenueRepository for SqliteVenueRepository<'_> {
    fn create_venue(&self, fields: &VenueFields) -> RepoResult<VenueId> {
        fields.validate()?;
        let genres = genres_to_db(&fields.genres)?;

        let tx = begin_write(self.conn)?;
        tx.execute(
            "INSERT INTO venues (
                name,
                city,
                state,
                address,
                phone,
                image_link,
                facebook_link,
                website,
                genres,
                seeking_talent,
                seeking_description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                fields.name,
                fields.city,
                fields.state,
                fields.address,
                fields.phone,
                fields.image_link,
                fields.facebook_link,
                fields.website,
                genres,
                bool_to_db(fields.seeking_talent),
                fields.seeking_description,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(id)
    }

    fn update_venue(&self, id: VenueId, fields: &VenueFields) -> RepoResult<()> {
        fields.validate()?;
        let genres = genres_to_db(&fields.genres)?;

        let tx = begin_write(self.conn)?;
        let changed = tx.execute(
            "UPDATE venues
             SET
                name = ?2,
                city = ?3,
                state = ?4,
                address = ?5,
                phone = ?6,
                image_link = ?7,
                facebook_link = ?8,
                website = ?9,
                genres = ?10,
                seeking_talent = ?11,
                seeking_description = ?12
             WHERE id = ?1;",
            params![
                id,
                fields.name,
                fields.city,
                fields.state,
                fields.address,
                fields.phone,
                fields.image_link,
                fields.facebook_link,
                fields.website,
                genres,
                bool_to_db(fields.seeking_talent),
                fields.seeking_description,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Venue,
                id,
            });
        }
        tx.commit()?;

        Ok(())
    }

    fn delete_venue(&self, id: VenueId) -> RepoResult<usize> {
        let tx = begin_write(self.conn)?;
        let shows: i64 = tx.query_row(
            "SELECT COUNT(*) FROM shows WHERE venue_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        let changed = tx.execute("DELETE FROM venues WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Venue,
                id,
            });
        }
        tx.commit()?;

        Ok(count_from_db(shows, "shows.venue_id")? as usize)
    }

    fn get_venue(&self, id: VenueId) -> RepoResult<Option<Venue>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{VENUE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_venue_row(row)?));
        }
        Ok(None)
    }

    fn list_venues(&self) -> RepoResult<Vec<Venue>> {
        self.query_venues(&format!("{VENUE_SELECT_SQL} ORDER BY id ASC;"))
    }

    fn list_venues_by_area(&self) -> RepoResult<Vec<Venue>> {
        self.query_venues(&format!(
            "{VENUE_SELECT_SQL} ORDER BY city ASC, state ASC, id ASC;"
        ))
    }

    fn count_venues(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM venues;", [], |row| row.get(0))?;
        Ok(count_from_db(count, "venues")? as usize)
    }

    fn search_venues(
        &self,
        query: &NameQuery,
        now: DateTime<Utc>,
    ) -> RepoResult<Vec<SearchHit>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                v.id AS id,
                v.name AS name,
                (
                    SELECT COUNT(*)
                    FROM shows s
                    WHERE s.venue_id = v.id
                      AND s.start_time >= ?2
                ) AS num_upcoming_shows
             FROM venues v
             WHERE ?1 = '' OR instr(listings_fold(v.name), ?1) > 0
             ORDER BY v.id ASC;",
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

    fn list_venue_shows(&self, id: VenueId) -> RepoResult<Vec<VenueShowEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                s.id AS show_id,
                a.id AS artist_id,
                a.name AS artist_name,
                a.image_link AS artist_image_link,
                s.start_time AS start_time
             FROM shows s
             INNER JOIN artists a ON a.id = s.artist_id
             WHERE s.venue_id = ?1
             ORDER BY s.start_time ASC, s.id ASC;",
        )?;
        let mut rows = stmt.query([id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(VenueShowEntry {
                show_id: row.get("show_id")?,
                artist_id: row.get("artist_id")?,
                artist_name: row.get("artist_name")?,
                artist_image_link: row.get("artist_image_link")?,
                start_time: start_time_from_db(row.get("start_time")?, "shows.start_time")?,
            });
        }
        Ok(entries)
    }
}

impl SqliteVenueRepository<'_> {
    fn query_venues(&self, sql: &str) -> RepoResult<Vec<Venue>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut venues = Vec::new();
        while let Some(row) = rows.next()? {
            venues.push(parse_venue_row(row)?);
        }
        Ok(venues)
    }
}

fn parse_venue_row(row: &Row<'_>) -> RepoResult<Venue> {
    let genres_text: String = row.get("genres")?;
    let fields = VenueFields {
        name: row.get("name")?,
        city: row.get("city")?,
        state: row.get("state")?,
        address: row.get("address")?,
        phone: row.get("phone")?,
        image_link: row.get("image_link")?,
        facebook_link: row.get("facebook_link")?,
        website: row.get("website")?,
        genres: genres_from_db(&genres_text, "venues.genres")?,
        seeking_talent: bool_from_db(row.get("seeking_talent")?, "venues.seeking_talent")?,
        seeking_description: row.get("seeking_description")?,
    };
    Ok(Venue {
        id: row.get("id")?,
        fields,
    })
}
