//! Name search over venues and artists.
//!
//! # Responsibility
//! - Turn a user search term into a safe SQL `LIKE` pattern.
//! - Shape hits into the `{count, data}` envelope consumed by result pages.
//!
//! # See also
//! - `repo::venue_repo::VenueRepository::search_venues`

pub mod name_search;
