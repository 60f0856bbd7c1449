//! Listing use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Collapse repository failures into the caller-facing [`ListingsError`].
//! - Keep storage details out of returned errors; they go to the log.

use crate::model::validation::ValidationError;
use crate::model::RecordKind;
use crate::repo::artist_repo::SqliteArtistRepository;
use crate::repo::show_repo::SqliteShowRepository;
use crate::repo::venue_repo::SqliteVenueRepository;
use crate::repo::{ConstraintViolation, RepoError};
use log::{error, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod artist_service;
pub mod show_service;
pub mod venue_service;

pub use artist_service::{ArtistDetail, ArtistService};
pub use show_service::ShowService;
pub use venue_service::{VenueDetail, VenueService};

pub type ListingsResult<T> = Result<T, ListingsError>;

/// Error returned by every listing use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingsError {
    /// Input was rejected before any write.
    Validation(ValidationError),
    /// Unknown reference or a storage constraint rejected the write.
    Constraint(ConstraintViolation),
    /// Target record does not exist.
    NotFound { kind: RecordKind, id: i64 },
    /// Storage failed; details were logged.
    Storage,
}

impl Display for ListingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "validation failed: {err}"),
            Self::Constraint(violation) => write!(f, "constraint violated: {violation}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Storage => write!(f, "storage failure"),
        }
    }
}

impl Error for ListingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ListingsError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl ListingsError {
    /// Maps a repository failure for `event`, logging it on the way.
    pub fn from_repo(event: &'static str, err: RepoError) -> Self {
        match err {
            RepoError::Validation(inner) => {
                warn!("event={event} module=service status=rejected reason=validation detail={inner}");
                Self::Validation(inner)
            }
            RepoError::Constraint(violation) => {
                warn!("event={event} module=service status=rejected reason=constraint detail={violation}");
                Self::Constraint(violation)
            }
            RepoError::NotFound { kind, id } => {
                warn!("event={event} module=service status=not_found kind={kind} id={id}");
                Self::NotFound { kind, id }
            }
            other => {
                error!("event={event} module=service status=error error={other}");
                Self::Storage
            }
        }
    }

    pub(crate) fn missing_after_write(event: &'static str, kind: RecordKind, id: i64) -> Self {
        error!("event={event} module=service status=error error=read_back_missing kind={kind} id={id}");
        Self::Storage
    }
}

/// All three services bound to one connection.
pub struct Listings<'conn> {
    pub venues: VenueService<SqliteVenueRepository<'conn>>,
    pub artists: ArtistService<SqliteArtistRepository<'conn>>,
    pub shows: ShowService<SqliteShowRepository<'conn>>,
}

impl<'conn> Listings<'conn> {
    /// Binds services to a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> ListingsResult<Self> {
        let open = |err| ListingsError::from_repo("listings_open", err);
        Ok(Self {
            venues: VenueService::new(SqliteVenueRepository::try_new(conn).map_err(open)?),
            artists: ArtistService::new(SqliteArtistRepository::try_new(conn).map_err(open)?),
            shows: ShowService::new(SqliteShowRepository::try_new(conn).map_err(open)?),
        })
    }
}
