use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Map, Zone};
use crate::error::{invalid_input_error, Error};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Route {
    pub id: i64,
    pub name: String,
    pub map_id: i64,
    pub direction: String,
    pub created_at: DateTime<Utc>,
}

/// A route listed together with the name of the map it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RouteSummary {
    pub id: i64,
    pub name: String,
    pub map_id: i64,
    pub map_name: String,
    pub direction: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteDetail {
    pub route: Route,
    pub map: Map,
    pub zones: Vec<Zone>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RouteDraft {
    pub map_id: i64,
    pub name: String,
    pub direction: String,
}

impl RouteDraft {
    pub fn new(map_id: i64, name: &str, direction: &str) -> Result<Self, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid_input_error("route name must not be empty"));
        }

        let direction = direction.trim();
        if direction.is_empty() {
            return Err(invalid_input_error("route direction must not be empty"));
        }

        Ok(Self {
            map_id,
            name: name.into(),
            direction: direction.into(),
        })
    }
}

#[test]
fn draft_requires_name_and_direction() {
    assert!(RouteDraft::new(1, "", "N").unwrap_err().is_validation_error());
    assert!(RouteDraft::new(1, "R1", "  ").unwrap_err().is_validation_error());

    let draft = RouteDraft::new(1, "R1", "N").unwrap();
    assert_eq!(draft.name, "R1");
    assert_eq!(draft.direction, "N");
}
