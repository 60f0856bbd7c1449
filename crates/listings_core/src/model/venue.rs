//! Venue records.
//!
//! # Invariants
//! - `name`, `city`, `state` are non-blank after normalization.
//! - `(city, state)` is the grouping key; equality is exact and case-sensitive.
//! - A venue owns its shows: deleting it removes them.

use crate::model::validation::{
    check_link, check_phone, normalize_genres, normalize_optional, normalize_required, require,
    ValidationResult,
};
use serde::{Deserialize, Serialize};

pub type VenueId = i64;

/// Editable venue fields, used for both create and full-replace update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueFields {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    /// Free text shown while `seeking_talent` is set. Not required.
    pub seeking_description: Option<String>,
}

impl VenueFields {
    /// Starts a venue with the three required fields.
    pub fn new(
        name: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            city: city.into(),
            state: state.into(),
            ..Self::default()
        }
    }

    /// Trims text, blanks optional fields to `None`, and cleans up genres.
    pub fn normalize(&mut self) {
        normalize_required(&mut self.name);
        normalize_required(&mut self.city);
        normalize_required(&mut self.state);
        normalize_optional(&mut self.address);
        normalize_optional(&mut self.phone);
        normalize_optional(&mut self.image_link);
        normalize_optional(&mut self.facebook_link);
        normalize_optional(&mut self.website);
        normalize_optional(&mut self.seeking_description);
        normalize_genres(&mut self.genres);
    }

    pub fn validate(&self) -> ValidationResult {
        require("name", &self.name)?;
        require("city", &self.city)?;
        require("state", &self.state)?;
        check_phone(self.phone.as_deref())?;
        check_link("image_link", self.image_link.as_deref())?;
        check_link("facebook_link", self.facebook_link.as_deref())?;
        check_link("website", self.website.as_deref())?;
        Ok(())
    }
}

/// Persisted venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    #[serde(flatten)]
    pub fields: VenueFields,
}

/// All venues sharing one exact `(city, state)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<Venue>,
}

/// Buckets venues by exact `(city, state)`.
///
/// Input order is kept inside each bucket and buckets appear in order of
/// first occurrence; callers pass venues sorted by `(city, state, id)`.
pub fn group_by_area(venues: Vec<Venue>) -> Vec<VenueArea> {
    let mut areas: Vec<VenueArea> = Vec::new();
    for venue in venues {
        let existing = areas
            .iter_mut()
            .find(|area| area.city == venue.fields.city && area.state == venue.fields.state);
        match existing {
            Some(area) => area.venues.push(venue),
            None => areas.push(VenueArea {
                city: venue.fields.city.clone(),
                state: venue.fields.state.clone(),
                venues: vec![venue],
            }),
        }
    }
    areas
}

#[cfg(test)]
mod tests {
    use super::{group_by_area, Venue, VenueFields};
    use crate::model::validation::ValidationError;

    fn venue(id: i64, name: &str, city: &str, state: &str) -> Venue {
        Venue {
            id,
            fields: VenueFields::new(name, city, state),
        }
    }

    #[test]
    fn normalize_then_validate_rejects_blank_name() {
        let mut fields = VenueFields::new("   ", "San Francisco", "CA");
        fields.normalize();
        assert_eq!(
            fields.validate(),
            Err(ValidationError::MissingField("name"))
        );
    }

    #[test]
    fn seeking_talent_without_description_is_valid() {
        let mut fields = VenueFields::new("The Musical Hop", "San Francisco", "CA");
        fields.seeking_talent = true;
        fields.normalize();
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn grouping_is_exact_on_city_and_state() {
        let areas = group_by_area(vec![
            venue(1, "The Musical Hop", "San Francisco", "CA"),
            venue(3, "Park Square Live Music & Coffee", "San Francisco", "CA"),
            venue(2, "The Dueling Pianos Bar", "New York", "NY"),
            venue(4, "Portland Lounge", "Portland", "OR"),
            venue(5, "Portland Hall", "Portland", "ME"),
            venue(6, "lowercase city", "san francisco", "CA"),
        ]);

        assert_eq!(areas.len(), 5);
        assert_eq!(areas[0].city, "San Francisco");
        let ids: Vec<i64> = areas[0].venues.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(areas
            .iter()
            .filter(|area| area.city == "Portland")
            .all(|area| area.venues.len() == 1));
    }
}
