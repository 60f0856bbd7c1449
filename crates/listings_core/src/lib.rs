//! Core domain logic for venue, artist, and show listings.
//! This crate is the single source of truth for listing invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{ConfigError, ListingsConfig};
pub use db::{open_db, open_db_in_memory, open_db_with_config, DbError};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::artist::{Artist, ArtistFields, ArtistId, ArtistSummary};
pub use model::show::{
    ArtistShowEntry, NewShow, Show, ShowBucket, ShowId, ShowListing, VenueShowEntry,
};
pub use model::validation::ValidationError;
pub use model::venue::{Venue, VenueArea, VenueFields, VenueId};
pub use model::RecordKind;
pub use repo::{ConstraintViolation, RepoError, RepoResult};
pub use search::name_search::{NameQuery, SearchHit, SearchResults};
pub use service::{
    ArtistDetail, ArtistService, Listings, ListingsError, ListingsResult, ShowService,
    VenueDetail, VenueService,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
