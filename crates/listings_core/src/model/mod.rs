//! Listing records: venues, artists, and the shows booked between them.
//!
//! # Responsibility
//! - Define flat, id-keyed records; relationships are plain foreign ids.
//! - Normalize and validate user-supplied fields before persistence.
//!
//! # Invariants
//! - Ids are server-generated integers and never reused.
//! - A show's past/upcoming bucket is derived from the clock, never stored.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod artist;
pub mod show;
pub mod validation;
pub mod venue;

/// Which listing table a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Venue,
    Artist,
    Show,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Venue => "venue",
            Self::Artist => "artist",
            Self::Show => "show",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
