use super::helpers::map_write_error;
use super::Engine;

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    api::CaptureAPI,
    capture::{probe, Dimensions},
    entities::{Map, MapDraft},
    error::Error,
};

#[async_trait]
impl CaptureAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn capture_and_store(&self, name: &str, url: &str) -> Result<Map, Error> {
        // rejected input never reaches the browser
        let draft = MapDraft::new(name, url)?;

        let snapshot = self.capture.capture(&draft.url).await?;
        let dimensions = probe(&snapshot.image)?;

        if (dimensions.width, dimensions.height) != (snapshot.width, snapshot.height) {
            tracing::debug!(
                viewport_width = snapshot.width,
                viewport_height = snapshot.height,
                width = dimensions.width,
                height = dimensions.height,
                "snapshot size differs from viewport"
            );
        }

        let image_path = self.images.store(&snapshot.image).await?;

        let map = match self.upsert_captured(&draft, &image_path, dimensions).await {
            Ok(map) => map,
            Err(err) => {
                // no row points at the new file
                if let Err(cleanup) = self.images.remove(&image_path).await {
                    tracing::warn!(image = %image_path, error = %cleanup, "snapshot left behind");
                }
                return Err(err);
            }
        };

        tracing::info!(
            map_id = map.id,
            image = %image_path,
            width = dimensions.width,
            height = dimensions.height,
            "map captured"
        );

        Ok(map)
    }
}

impl Engine {
    async fn upsert_captured(
        &self,
        draft: &MapDraft,
        image_path: &str,
        dimensions: Dimensions,
    ) -> Result<Map, Error> {
        let mut conn = self.pool.acquire().await?;

        // one statement under the (name, url) key, so racing captures cannot duplicate
        sqlx::query_as::<_, Map>(
            "INSERT INTO maps (name, url, captured_image, original_width, original_height, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (name, url) DO UPDATE SET
                captured_image = excluded.captured_image,
                original_width = excluded.original_width,
                original_height = excluded.original_height
            RETURNING *",
        )
        .bind(&draft.name)
        .bind(&draft.url)
        .bind(image_path)
        .bind(i64::from(dimensions.width))
        .bind(i64::from(dimensions.height))
        .bind(Utc::now())
        .fetch_one(&mut conn)
        .await
        .map_err(map_write_error)
    }
}
