use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point of a route, in pixels of the map's captured image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Zone {
    pub id: i64,
    pub route_id: i64,
    pub name: String,
    pub x: i64,
    pub y: i64,
    #[sqlx(rename = "sort_order")]
    pub order: i64,
    pub created_at: DateTime<Utc>,
}

impl Zone {
    pub fn position(&self) -> (i64, i64) {
        (self.x, self.y)
    }
}
