use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

/// Every map must point at this service.
pub const MAP_SERVICE_PREFIX: &str = "https://www.google.com/maps";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Map {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub captured_image: Option<String>,
    pub original_width: Option<i64>,
    pub original_height: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Map {
    pub fn is_captured(&self) -> bool {
        self.captured_image.is_some()
    }

    pub fn dimensions(&self) -> Option<(i64, i64)> {
        Some((self.original_width?, self.original_height?))
    }
}

/// Name and url of a map that passed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct MapDraft {
    pub name: String,
    pub url: String,
}

impl MapDraft {
    pub fn new(name: &str, url: &str) -> Result<Self, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid_input_error("map name must not be empty"));
        }

        let url = url.trim();
        if !url.starts_with(MAP_SERVICE_PREFIX) {
            return Err(invalid_input_error(format!(
                "map url must start with {}",
                MAP_SERVICE_PREFIX
            )));
        }

        Ok(Self {
            name: name.into(),
            url: url.into(),
        })
    }
}

#[test]
fn draft_trims_name() {
    let draft = MapDraft::new("  CentroA ", "https://www.google.com/maps/xyz").unwrap();

    assert_eq!(draft.name, "CentroA");
    assert_eq!(draft.url, "https://www.google.com/maps/xyz");
}

#[test]
fn draft_rejects_blank_name() {
    let err = MapDraft::new("   ", "https://www.google.com/maps/xyz").unwrap_err();
    assert!(err.is_validation_error());
}

#[test]
fn draft_rejects_foreign_url() {
    for url in ["", "https://maps.example.com/xyz", "http://www.google.com/maps/xyz"] {
        let err = MapDraft::new("CentroA", url).unwrap_err();
        assert!(err.is_validation_error(), "{} should be rejected", url);
    }
}
