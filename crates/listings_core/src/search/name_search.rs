//! Case-insensitive substring matching on record names.
//!
//! # Invariants
//! - The empty term matches every record; any other term, whitespace
//!   included, is matched as a literal substring.
//! - Both sides are folded with Unicode lowercasing, so `"ÉMILE"` finds
//!   `"Café Émile"`.
//! - Matching uses `instr`, so no character in the term acts as a wildcard.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use serde::Serialize;

/// SQL function registered on every opened connection; lowercases text.
pub const FOLD_FUNCTION: &str = "listings_fold";

/// Registers [`FOLD_FUNCTION`] on `conn`.
pub fn register_fold_function(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        FOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|text| fold(&text)))
        },
    )
}

fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// Search input, held in folded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameQuery {
    folded: String,
}

impl NameQuery {
    pub fn new(term: impl AsRef<str>) -> Self {
        Self {
            folded: fold(term.as_ref()),
        }
    }

    /// Lowercased term bound against `listings_fold(name)`.
    pub fn folded(&self) -> &str {
        &self.folded
    }
}

/// One venue or artist matching a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: u32,
}

/// Search response envelope: `count` always equals `data.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchHit>,
}

impl From<Vec<SearchHit>> for SearchResults {
    fn from(data: Vec<SearchHit>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}
