//! Show bookings and their time-relative views.
//!
//! # Invariants
//! - A show joins exactly one venue and one artist.
//! - `start_time` is UTC at millisecond precision; storage keeps epoch
//!   milliseconds and finer digits are truncated.
//! - `start_time < now` is past; everything else, including a show starting
//!   exactly at `now`, is upcoming.

use crate::model::artist::ArtistId;
use crate::model::venue::VenueId;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

pub type ShowId = i64;

/// Booking request. `start_time` is kept to the millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShow {
    pub venue_id: VenueId,
    pub artist_id: ArtistId,
    pub start_time: DateTime<Utc>,
}

/// Persisted booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: ShowId,
    pub venue_id: VenueId,
    pub artist_id: ArtistId,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowBucket {
    Past,
    Upcoming,
}

impl ShowBucket {
    /// Compares at storage precision, matching the SQL `start_time >= now`
    /// used for upcoming counts.
    pub fn classify(start_time: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if to_storage_precision(start_time) < to_storage_precision(now) {
            Self::Past
        } else {
            Self::Upcoming
        }
    }
}

/// A show seen from its venue: carries the artist side of the join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueShowEntry {
    pub show_id: ShowId,
    pub artist_id: ArtistId,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// A show seen from its artist: carries the venue side of the join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistShowEntry {
    pub show_id: ShowId,
    pub venue_id: VenueId,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// Row of the global show listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub show_id: ShowId,
    pub venue_id: VenueId,
    pub venue_name: String,
    pub artist_id: ArtistId,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// Anything with a start time can be split into past and upcoming.
pub trait Scheduled {
    fn start_time(&self) -> DateTime<Utc>;
}

impl Scheduled for VenueShowEntry {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl Scheduled for ArtistShowEntry {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl Scheduled for Show {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

/// Shows split by [`ShowBucket`] at one evaluation instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionedShows<T> {
    pub past: Vec<T>,
    pub upcoming: Vec<T>,
}

/// Splits `shows` around `now`, keeping input order within each side.
pub fn partition_shows<T: Scheduled>(shows: Vec<T>, now: DateTime<Utc>) -> PartitionedShows<T> {
    let (past, upcoming): (Vec<T>, Vec<T>) = shows
        .into_iter()
        .partition(|show| ShowBucket::classify(show.start_time(), now) == ShowBucket::Past);
    PartitionedShows { past, upcoming }
}

/// Drops sub-millisecond digits, the precision `shows.start_time` keeps.
pub fn to_storage_precision(value: DateTime<Utc>) -> DateTime<Utc> {
    value.trunc_subsecs(3)
}

pub fn to_epoch_ms(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

pub fn from_epoch_ms(value: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
}
