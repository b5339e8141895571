use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::DynAPI;
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    #[serde(alias = "ruta_id")]
    route_id: i64,
    x: i64,
    y: i64,
    #[serde(alias = "nombre")]
    name: String,
    #[serde(alias = "orden")]
    order: i64,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<Value>, Error> {
    let zone = api
        .add_zone(
            params.route_id,
            params.x,
            params.y,
            &params.name,
            params.order,
        )
        .await?;

    Ok(json!({ "success": true, "zone": zone }).into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, Error> {
    api.remove_zone(id).await?;

    Ok(json!({ "success": true }).into())
}

#[test]
fn create_params_accept_original_field_names() {
    let params: CreateParams = serde_json::from_value(json!({
        "ruta_id": 3,
        "x": 10,
        "y": 20,
        "nombre": "Plaza",
        "orden": 1,
    }))
    .unwrap();

    assert_eq!(params.route_id, 3);
    assert_eq!((params.x, params.y), (10, 20));
    assert_eq!(params.name, "Plaza");
    assert_eq!(params.order, 1);
}
