//! Field normalization and validation shared by venue and artist records.
//!
//! # Invariants
//! - Normalization is idempotent: normalizing twice changes nothing.
//! - Validation never touches storage.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+()\-. ]{7,20}$").expect("valid phone regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)https?://[^\s/$.?#][^\s]*$").expect("valid link regex"));

/// A field was missing or malformed before reaching storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is absent or blank.
    MissingField(&'static str),
    /// Phone contains characters other than digits and separators.
    InvalidPhone(String),
    /// Link field is not an `http(s)://` URL.
    InvalidLink { field: &'static str, value: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "`{field}` is required"),
            Self::InvalidPhone(value) => write!(f, "invalid phone number `{value}`"),
            Self::InvalidLink { field, value } => {
                write!(f, "`{field}` must be an http(s) link, got `{value}`")
            }
        }
    }
}

impl Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

/// Trims a required field in place.
pub fn normalize_required(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Trims an optional field; blank values become `None`.
pub fn normalize_optional(value: &mut Option<String>) {
    *value = value
        .take()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
}

/// Trims genres, drops blanks and duplicates. First occurrence wins, so the
/// submitted order is otherwise kept.
pub fn normalize_genres(genres: &mut Vec<String>) {
    let mut seen = Vec::with_capacity(genres.len());
    for genre in genres.drain(..) {
        let genre = genre.trim();
        if genre.is_empty() || seen.iter().any(|kept: &String| kept == genre) {
            continue;
        }
        seen.push(genre.to_string());
    }
    *genres = seen;
}

pub fn require(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

pub fn check_phone(value: Option<&str>) -> ValidationResult {
    match value {
        Some(phone) if !PHONE_RE.is_match(phone) => {
            Err(ValidationError::InvalidPhone(phone.to_string()))
        }
        _ => Ok(()),
    }
}

pub fn check_link(field: &'static str, value: Option<&str>) -> ValidationResult {
    match value {
        Some(link) if !LINK_RE.is_match(link) => Err(ValidationError::InvalidLink {
            field,
            value: link.to_string(),
        }),
        _ => Ok(()),
    }
}
