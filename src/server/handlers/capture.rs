use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::{entities::Map, error::Error};

#[derive(Serialize, Deserialize)]
pub struct CaptureParams {
    #[serde(alias = "nombre")]
    name: String,
    url: String,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CaptureParams>,
) -> Result<Json<Map>, Error> {
    let map = api.capture_and_store(&params.name, &params.url).await?;

    Ok(map.into())
}
