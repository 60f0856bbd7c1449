//! Artist use-case service.
//!
//! Same shape as the venue service: normalize, persist, read back. Artist
//! detail lists the venues the artist plays at.

use crate::model::artist::{Artist, ArtistFields, ArtistId, ArtistSummary};
use crate::model::show::{partition_shows, ArtistShowEntry};
use crate::model::RecordKind;
use crate::repo::artist_repo::ArtistRepository;
use crate::search::name_search::{NameQuery, SearchResults};
use crate::service::{ListingsError, ListingsResult};
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

/// Artist page: the record plus its shows split around `now`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    pub past_shows: Vec<ArtistShowEntry>,
    pub upcoming_shows: Vec<ArtistShowEntry>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub struct ArtistService<R: ArtistRepository> {
    repo: R,
}

impl<R: ArtistRepository> ArtistService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_artist(&self, mut fields: ArtistFields) -> ListingsResult<Artist> {
        fields.normalize();
        let id = self
            .repo
            .create_artist(&fields)
            .map_err(|err| ListingsError::from_repo("artist_create", err))?;
        info!("event=artist_create module=service status=ok artist_id={id}");
        self.read_back("artist_create", id)
    }

    pub fn update_artist(&self, id: ArtistId, mut fields: ArtistFields) -> ListingsResult<Artist> {
        fields.normalize();
        self.repo
            .update_artist(id, &fields)
            .map_err(|err| ListingsError::from_repo("artist_update", err))?;
        info!("event=artist_update module=service status=ok artist_id={id}");
        self.read_back("artist_update", id)
    }

    /// Deletes the artist with all of its shows; returns the show count removed.
    pub fn delete_artist(&self, id: ArtistId) -> ListingsResult<usize> {
        let shows = self
            .repo
            .delete_artist(id)
            .map_err(|err| ListingsError::from_repo("artist_delete", err))?;
        info!("event=artist_delete module=service status=ok artist_id={id} shows_removed={shows}");
        Ok(shows)
    }

    pub fn get_artist(&self, id: ArtistId) -> ListingsResult<Artist> {
        self.repo
            .get_artist(id)
            .map_err(|err| ListingsError::from_repo("artist_get", err))?
            .ok_or(ListingsError::NotFound {
                kind: RecordKind::Artist,
                id,
            })
    }

    pub fn list_artists(&self) -> ListingsResult<Vec<ArtistSummary>> {
        self.repo
            .list_artists()
            .map_err(|err| ListingsError::from_repo("artist_list", err))
    }

    pub fn count_artists(&self) -> ListingsResult<usize> {
        self.repo
            .count_artists()
            .map_err(|err| ListingsError::from_repo("artist_count", err))
    }

    pub fn search_artists(&self, term: &str) -> ListingsResult<SearchResults> {
        self.search_artists_at(term, Utc::now())
    }

    pub fn search_artists_at(
        &self,
        term: &str,
        now: DateTime<Utc>,
    ) -> ListingsResult<SearchResults> {
        let query = NameQuery::new(term);
        let hits = self
            .repo
            .search_artists(&query, now)
            .map_err(|err| ListingsError::from_repo("artist_search", err))?;
        Ok(SearchResults::from(hits))
    }

    pub fn artist_detail(&self, id: ArtistId) -> ListingsResult<ArtistDetail> {
        self.artist_detail_at(id, Utc::now())
    }

    pub fn artist_detail_at(
        &self,
        id: ArtistId,
        now: DateTime<Utc>,
    ) -> ListingsResult<ArtistDetail> {
        let artist = self.get_artist(id)?;
        let shows = self
            .repo
            .list_artist_shows(id)
            .map_err(|err| ListingsError::from_repo("artist_detail", err))?;
        let split = partition_shows(shows, now);
        Ok(ArtistDetail {
            artist,
            past_shows_count: split.past.len(),
            upcoming_shows_count: split.upcoming.len(),
            past_shows: split.past,
            upcoming_shows: split.upcoming,
        })
    }

    fn read_back(&self, event: &'static str, id: ArtistId) -> ListingsResult<Artist> {
        self.repo
            .get_artist(id)
            .map_err(|err| ListingsError::from_repo(event, err))?
            .ok_or_else(|| ListingsError::missing_after_write(event, RecordKind::Artist, id))
    }
}
