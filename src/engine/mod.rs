mod capture_api;
mod helpers;
mod map_api;
mod route_api;
mod zone_api;

use std::sync::Arc;

use sqlx::Pool;

use crate::{
    api::API,
    capture::CaptureDriver,
    db::{Database, Store},
    storage::ImageStore,
};

pub struct Engine {
    pool: Pool<Database>,
    capture: Arc<dyn CaptureDriver>,
    images: ImageStore,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(store: &Store, capture: Arc<dyn CaptureDriver>, images: ImageStore) -> Self {
        tracing::info!(public_dir = %images.public_dir().display(), "engine ready");

        Self {
            pool: store.pool().clone(),
            capture,
            images,
        }
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }
}

impl API for Engine {}
