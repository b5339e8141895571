mod handlers;

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, get_service, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::api::{DynAPI, API};
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{capture, maps, routes, zones};

pub fn router(api: DynAPI, screenshots_dir: &Path) -> Router {
    Router::new()
        .route("/", get(maps::list))
        .route("/maps", get(maps::list).post(maps::create))
        .route("/maps/:id", put(maps::update).delete(maps::delete))
        .route("/maps/:id/edit", get(maps::find))
        .route("/routes", get(routes::list).post(routes::create))
        .route("/routes/create", get(routes::new_route_context))
        .route("/routes/:id", put(routes::update).delete(routes::delete))
        .route("/routes/:id/edit", get(routes::find))
        .route("/routes/:id/zones", get(routes::zones))
        .route("/zones", post(zones::create))
        .route("/zones/:id", delete(zones::delete))
        .route("/capture", post(capture::create))
        .nest(
            "/screenshots",
            get_service(ServeDir::new(screenshots_dir)).handle_error(static_file_error),
        )
        .layer(Extension(api))
}

pub async fn serve<T, S>(
    api: T,
    addr: SocketAddr,
    screenshots_dir: &Path,
    shutdown: S,
) -> Result<(), Error>
where
    T: API + Sync + Send + 'static,
    S: Future<Output = ()>,
{
    let api = Arc::new(api) as DynAPI;
    let app = router(api, screenshots_dir);

    tracing::info!("listening on {}", addr);

    axum::Server::try_bind(&addr)
        .map_err(unexpected_error)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(unexpected_error)
}

async fn static_file_error(err: io::Error) -> impl IntoResponse {
    tracing::error!(error = %err, "failed to serve screenshot");

    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}
