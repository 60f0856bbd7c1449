//! Artist records.
//!
//! Same shape as a venue without an address, and `seeking_venue` in place
//! of `seeking_talent`. Artists reference shows but do not own them the way
//! venues do.

use crate::model::validation::{
    check_link, check_phone, normalize_genres, normalize_optional, normalize_required, require,
    ValidationResult,
};
use serde::{Deserialize, Serialize};

pub type ArtistId = i64;

/// Editable artist fields, used for both create and full-replace update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistFields {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistFields {
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

    pub fn normalize(&mut self) {
        normalize_required(&mut self.name);
        normalize_required(&mut self.city);
        normalize_required(&mut self.state);
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

/// Persisted artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    #[serde(flatten)]
    pub fields: ArtistFields,
}

/// Id and name only, for the artist index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistSummary {
    pub id: ArtistId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::ArtistFields;
    use crate::model::validation::ValidationError;

    #[test]
    fn missing_state_is_reported_by_field() {
        let fields = ArtistFields::new("Guns N Petals", "San Francisco", "");
        assert_eq!(fields.validate(), Err(ValidationError::MissingField("state")));
    }

    #[test]
    fn invalid_image_link_is_rejected() {
        let mut fields = ArtistFields::new("Matt Quevedo", "New York", "NY");
        fields.image_link = Some("not a url".to_string());
        assert!(matches!(
            fields.validate(),
            Err(ValidationError::InvalidLink { field: "image_link", .. })
        ));
    }
}
