use std::sync::Arc;

use async_trait::async_trait;

use crate::entities::{Map, Route, RouteDetail, RouteSummary, Zone};
use crate::error::Error;

#[async_trait]
pub trait MapAPI {
    async fn list_maps(&self) -> Result<Vec<Map>, Error>;
    async fn create_map(&self, name: &str, url: &str) -> Result<Map, Error>;
    async fn find_map(&self, id: i64) -> Result<Map, Error>;
    async fn update_map(&self, id: i64, name: &str, url: &str) -> Result<Map, Error>;
    /// Removes the map together with its routes and their zones.
    async fn delete_map(&self, id: i64) -> Result<(), Error>;
}

#[async_trait]
pub trait CaptureAPI {
    /// Captures `url`, stores the snapshot and creates or refreshes the map
    /// identified by `(name, url)`.
    async fn capture_and_store(&self, name: &str, url: &str) -> Result<Map, Error>;
}

#[async_trait]
pub trait RouteAPI {
    async fn list_routes(&self) -> Result<Vec<RouteSummary>, Error>;
    async fn create_route(&self, map_id: i64, name: &str, direction: &str)
        -> Result<Route, Error>;
    async fn find_route(&self, id: i64) -> Result<Route, Error>;
    async fn find_route_detail(&self, id: i64) -> Result<RouteDetail, Error>;
    async fn update_route(
        &self,
        id: i64,
        map_id: i64,
        name: &str,
        direction: &str,
    ) -> Result<Route, Error>;
    /// Removes the route and its zones.
    async fn delete_route(&self, id: i64) -> Result<(), Error>;
}

#[async_trait]
pub trait ZoneAPI {
    async fn add_zone(
        &self,
        route_id: i64,
        x: i64,
        y: i64,
        name: &str,
        order: i64,
    ) -> Result<Zone, Error>;
    async fn remove_zone(&self, id: i64) -> Result<(), Error>;
    /// Zones ascending by `order`, equal orders in insertion order.
    async fn list_zones(&self, route_id: i64) -> Result<Vec<Zone>, Error>;
}

pub trait API: MapAPI + CaptureAPI + RouteAPI + ZoneAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
