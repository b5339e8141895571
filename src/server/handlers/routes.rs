use axum::extract::{Extension, Json, Path, Query};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::DynAPI;
use crate::{
    entities::{Map, Route, RouteDetail, RouteSummary},
    error::Error,
};

#[derive(Serialize, Deserialize)]
pub struct RouteParams {
    #[serde(alias = "nombre")]
    name: String,
    #[serde(alias = "sentido")]
    direction: String,
    #[serde(alias = "mapa_id", alias = "mapId")]
    map_id: i64,
}

#[derive(Serialize, Deserialize)]
pub struct NewRouteQuery {
    #[serde(alias = "mapa_id", alias = "mapId")]
    map_id: i64,
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<RouteSummary>>, Error> {
    let routes = api.list_routes().await?;

    Ok(routes.into())
}

/// Map a new route will be drawn on.
pub async fn new_route_context(
    Extension(api): Extension<DynAPI>,
    Query(query): Query<NewRouteQuery>,
) -> Result<Json<Map>, Error> {
    let map = api.find_map(query.map_id).await?;

    Ok(map.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<RouteParams>,
) -> Result<Json<Route>, Error> {
    let route = api
        .create_route(params.map_id, &params.name, &params.direction)
        .await?;

    Ok(route.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<Route>, Error> {
    let route = api.find_route(id).await?;

    Ok(route.into())
}

pub async fn zones(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<RouteDetail>, Error> {
    let detail = api.find_route_detail(id).await?;

    Ok(detail.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
    Json(params): Json<RouteParams>,
) -> Result<Json<Route>, Error> {
    let route = api
        .update_route(id, params.map_id, &params.name, &params.direction)
        .await?;

    Ok(route.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, Error> {
    api.delete_route(id).await?;

    Ok(json!({ "success": true }).into())
}
