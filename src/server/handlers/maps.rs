use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::DynAPI;
use crate::{entities::Map, error::Error};

#[derive(Serialize, Deserialize)]
pub struct MapParams {
    #[serde(alias = "nombre")]
    name: String,
    url: String,
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Map>>, Error> {
    let maps = api.list_maps().await?;

    Ok(maps.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<MapParams>,
) -> Result<Json<Map>, Error> {
    let map = api.create_map(&params.name, &params.url).await?;

    Ok(map.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<Map>, Error> {
    let map = api.find_map(id).await?;

    Ok(map.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
    Json(params): Json<MapParams>,
) -> Result<Json<Map>, Error> {
    let map = api.update_map(id, &params.name, &params.url).await?;

    Ok(map.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, Error> {
    api.delete_map(id).await?;

    Ok(json!({ "success": true }).into())
}
