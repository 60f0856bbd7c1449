//! Repository contracts and SQLite implementations for listing records.
//!
//! # Responsibility
//! - Keep SQL inside the persistence boundary.
//! - Run every write in its own IMMEDIATE transaction.
//! - Translate engine failures into semantic errors (`NotFound`, `Constraint`).
//!
//! # Invariants
//! - Write paths validate records before any SQL mutation.
//! - A dropped, uncommitted transaction rolls back, so early returns never
//!   leave partial writes behind.
//! - Read paths reject malformed persisted rows instead of masking them.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::artist::ArtistId;
use crate::model::show::from_epoch_ms;
use crate::model::validation::ValidationError;
use crate::model::venue::VenueId;
use crate::model::RecordKind;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod artist_repo;
pub mod show_repo;
pub mod venue_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage rejected a write because of a reference or table constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// Booking names a venue id that does not exist.
    UnknownVenue(VenueId),
    /// Booking names an artist id that does not exist.
    UnknownArtist(ArtistId),
    /// Engine-level rejection (CHECK, NOT NULL, FOREIGN KEY). Carries the
    /// engine message for logs.
    Rejected(String),
}

impl Display for ConstraintViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVenue(id) => write!(f, "venue {id} does not exist"),
            Self::UnknownArtist(id) => write!(f, "artist {id} does not exist"),
            Self::Rejected(message) => write!(f, "constraint rejected write: {message}"),
        }
    }
}

#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Constraint(ConstraintViolation),
    NotFound { kind: RecordKind, id: i64 },
    Db(DbError),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Constraint(violation) => write!(f, "{violation}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "listings repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "listings repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "listings repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted listing data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &value {
            if failure.code == ErrorCode::ConstraintViolation {
                return Self::Constraint(ConstraintViolation::Rejected(
                    message.clone().unwrap_or_else(|| failure.to_string()),
                ));
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Begins the write transaction used by every repository mutation.
///
/// Dropping the returned guard without `commit()` rolls back.
pub(crate) fn begin_write(conn: &Connection) -> RepoResult<Transaction<'_>> {
    Ok(Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?)
}

pub(crate) fn genres_to_db(genres: &[String]) -> RepoResult<String> {
    serde_json::to_string(genres)
        .map_err(|err| RepoError::InvalidData(format!("unencodable genres: {err}")))
}

pub(crate) fn genres_from_db(raw: &str, column: &'static str) -> RepoResult<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|_| RepoError::InvalidData(format!("invalid genres `{raw}` in {column}")))
}

pub(crate) fn bool_to_db(value: bool) -> i64 {
    i64::from(value)
}

pub(crate) fn bool_from_db(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean `{other}` in {column}"
        ))),
    }
}

pub(crate) fn start_time_from_db(value: i64, column: &'static str) -> RepoResult<DateTime<Utc>> {
    from_epoch_ms(value).ok_or_else(|| {
        RepoError::InvalidData(format!("out-of-range timestamp `{value}` in {column}"))
    })
}

pub(crate) fn count_from_db(value: i64, column: &'static str) -> RepoResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid count `{value}` in {column}")))
}

pub(crate) fn record_exists(conn: &Connection, table: &'static str, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Confirms the connection is migrated and `table` has `columns`.
pub(crate) fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable(table));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut present = Vec::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>(1)?);
    }
    for &column in columns {
        if !present.iter().any(|name| name.as_str() == column) {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}
