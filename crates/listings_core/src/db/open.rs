//! Connection opening and per-connection configuration.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a busy timeout set.
//! - Returned connections have migrations fully applied.
//! - Returned connections carry the `listings_fold` search function.

use super::migrations::apply_migrations;
use super::DbResult;
use crate::config::{ListingsConfig, DEFAULT_BUSY_TIMEOUT_MS};
use crate::search::name_search::register_fold_function;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens (or creates) a listings database file and migrates it.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with("file", DEFAULT_BUSY_TIMEOUT_MS, || Connection::open(path))
}

/// Opens a private in-memory listings database. Used by tests and the
/// smoke CLI when no database path is configured.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", DEFAULT_BUSY_TIMEOUT_MS, Connection::open_in_memory)
}

/// Opens the database described by `config`.
///
/// `database_path = None` selects an in-memory store.
pub fn open_db_with_config(config: &ListingsConfig) -> DbResult<Connection> {
    match config.database_path.as_deref() {
        Some(path) => open_with("file", config.busy_timeout_ms, || Connection::open(path)),
        None => open_with("memory", config.busy_timeout_ms, Connection::open_in_memory),
    }
}

fn open_with<F>(mode: &str, busy_timeout_ms: u64, connect: F) -> DbResult<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = connect().map_err(|err| {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={err}",
            started_at.elapsed().as_millis()
        );
        err
    })?;

    if let Err(err) = configure(&mut conn, busy_timeout_ms) {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={err}",
            started_at.elapsed().as_millis()
        );
        return Err(err);
    }

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn configure(conn: &mut Connection, busy_timeout_ms: u64) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
    register_fold_function(conn)?;
    apply_migrations(conn)?;
    Ok(())
}
