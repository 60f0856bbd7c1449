//! Venue use-case service.
//!
//! # Responsibility
//! - Normalize venue input, persist it, and return the stored record.
//! - Build the area-grouped index, name search, and venue detail views.
//!
//! # Invariants
//! - `update_venue` replaces the full record.
//! - Past/upcoming views are computed against one instant per call.

use crate::model::show::{partition_shows, VenueShowEntry};
use crate::model::venue::{group_by_area, Venue, VenueArea, VenueFields, VenueId};
use crate::model::RecordKind;
use crate::repo::venue_repo::VenueRepository;
use crate::search::name_search::{NameQuery, SearchResults};
use crate::service::{ListingsError, ListingsResult};
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

/// Venue page: the record plus its shows split around `now`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    pub past_shows: Vec<VenueShowEntry>,
    pub upcoming_shows: Vec<VenueShowEntry>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub struct VenueService<R: VenueRepository> {
    repo: R,
}

impl<R: VenueRepository> VenueService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_venue(&self, mut fields: VenueFields) -> ListingsResult<Venue> {
        fields.normalize();
        let id = self
            .repo
            .create_venue(&fields)
            .map_err(|err| ListingsError::from_repo("venue_create", err))?;
        info!("event=venue_create module=service status=ok venue_id={id}");
        self.read_back("venue_create", id)
    }

    pub fn update_venue(&self, id: VenueId, mut fields: VenueFields) -> ListingsResult<Venue> {
        fields.normalize();
        self.repo
            .update_venue(id, &fields)
            .map_err(|err| ListingsError::from_repo("venue_update", err))?;
        info!("event=venue_update module=service status=ok venue_id={id}");
        self.read_back("venue_update", id)
    }

    /// Deletes the venue with all of its shows; returns the show count removed.
    pub fn delete_venue(&self, id: VenueId) -> ListingsResult<usize> {
        let shows = self
            .repo
            .delete_venue(id)
            .map_err(|err| ListingsError::from_repo("venue_delete", err))?;
        info!("event=venue_delete module=service status=ok venue_id={id} shows_removed={shows}");
        Ok(shows)
    }

    pub fn get_venue(&self, id: VenueId) -> ListingsResult<Venue> {
        self.repo
            .get_venue(id)
            .map_err(|err| ListingsError::from_repo("venue_get", err))?
            .ok_or(ListingsError::NotFound {
                kind: RecordKind::Venue,
                id,
            })
    }

    pub fn list_venues(&self) -> ListingsResult<Vec<Venue>> {
        self.repo
            .list_venues()
            .map_err(|err| ListingsError::from_repo("venue_list", err))
    }

    pub fn count_venues(&self) -> ListingsResult<usize> {
        self.repo
            .count_venues()
            .map_err(|err| ListingsError::from_repo("venue_count", err))
    }

    /// Venues grouped by exact `(city, state)`, ordered by city, state, id.
    pub fn venues_by_area(&self) -> ListingsResult<Vec<VenueArea>> {
        let venues = self
            .repo
            .list_venues_by_area()
            .map_err(|err| ListingsError::from_repo("venue_areas", err))?;
        Ok(group_by_area(venues))
    }

    pub fn search_venues(&self, term: &str) -> ListingsResult<SearchResults> {
        self.search_venues_at(term, Utc::now())
    }

    pub fn search_venues_at(
        &self,
        term: &str,
        now: DateTime<Utc>,
    ) -> ListingsResult<SearchResults> {
        let query = NameQuery::new(term);
        let hits = self
            .repo
            .search_venues(&query, now)
            .map_err(|err| ListingsError::from_repo("venue_search", err))?;
        Ok(SearchResults::from(hits))
    }

    pub fn venue_detail(&self, id: VenueId) -> ListingsResult<VenueDetail> {
        self.venue_detail_at(id, Utc::now())
    }

    pub fn venue_detail_at(
        &self,
        id: VenueId,
        now: DateTime<Utc>,
    ) -> ListingsResult<VenueDetail> {
        let venue = self.get_venue(id)?;
        let shows = self
            .repo
            .list_venue_shows(id)
            .map_err(|err| ListingsError::from_repo("venue_detail", err))?;
        let split = partition_shows(shows, now);
        Ok(VenueDetail {
            venue,
            past_shows_count: split.past.len(),
            upcoming_shows_count: split.upcoming.len(),
            past_shows: split.past,
            upcoming_shows: split.upcoming,
        })
    }

    fn read_back(&self, event: &'static str, id: VenueId) -> ListingsResult<Venue> {
        self.repo
            .get_venue(id)
            .map_err(|err| ListingsError::from_repo(event, err))?
            .ok_or_else(|| ListingsError::missing_after_write(event, RecordKind::Venue, id))
    }
}
