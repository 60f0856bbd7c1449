//! Show booking service.

use crate::model::show::{NewShow, Show, ShowId, ShowListing};
use crate::model::RecordKind;
use crate::repo::show_repo::ShowRepository;
use crate::service::{ListingsError, ListingsResult};
use log::info;

pub struct ShowService<R: ShowRepository> {
    repo: R,
}

impl<R: ShowRepository> ShowService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Books `show`; fails with `Constraint` when its venue or artist is gone.
    ///
    /// The returned show is the stored one, with `start_time` truncated to
    /// the millisecond.
    pub fn book_show(&self, show: NewShow) -> ListingsResult<Show> {
        let id = self
            .repo
            .create_show(&show)
            .map_err(|err| ListingsError::from_repo("show_create", err))?;
        info!(
            "event=show_create module=service status=ok show_id={id} venue_id={} artist_id={}",
            show.venue_id, show.artist_id
        );
        self.repo
            .get_show(id)
            .map_err(|err| ListingsError::from_repo("show_create", err))?
            .ok_or_else(|| ListingsError::missing_after_write("show_create", RecordKind::Show, id))
    }

    pub fn get_show(&self, id: ShowId) -> ListingsResult<Show> {
        self.repo
            .get_show(id)
            .map_err(|err| ListingsError::from_repo("show_get", err))?
            .ok_or(ListingsError::NotFound {
                kind: RecordKind::Show,
                id,
            })
    }

    pub fn delete_show(&self, id: ShowId) -> ListingsResult<()> {
        self.repo
            .delete_show(id)
            .map_err(|err| ListingsError::from_repo("show_delete", err))?;
        info!("event=show_delete module=service status=ok show_id={id}");
        Ok(())
    }

    /// All shows ordered by artist id, then start time.
    pub fn list_shows(&self) -> ListingsResult<Vec<ShowListing>> {
        self.repo
            .list_shows()
            .map_err(|err| ListingsError::from_repo("show_list", err))
    }

    pub fn count_shows(&self) -> ListingsResult<usize> {
        self.repo
            .count_shows()
            .map_err(|err| ListingsError::from_repo("show_count", err))
    }
}
