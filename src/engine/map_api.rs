use super::helpers::{fetch_map, map_write_error};
use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Acquire, Executor};

use crate::{
    api::MapAPI,
    entities::{Map, MapDraft},
    error::{not_found_error, Error},
};

#[async_trait]
impl MapAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_maps(&self) -> Result<Vec<Map>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maps = sqlx::query_as::<_, Map>("SELECT * FROM maps ORDER BY created_at DESC, id DESC")
            .fetch_all(&mut conn)
            .await?;

        Ok(maps)
    }

    #[tracing::instrument(skip(self))]
    async fn create_map(&self, name: &str, url: &str) -> Result<Map, Error> {
        let draft = MapDraft::new(name, url)?;

        let mut conn = self.pool.acquire().await?;

        let map = sqlx::query_as::<_, Map>(
            "INSERT INTO maps (name, url, created_at) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(&draft.name)
        .bind(&draft.url)
        .bind(Utc::now())
        .fetch_one(&mut conn)
        .await
        .map_err(map_write_error)?;

        tracing::info!(map_id = map.id, "map created");

        Ok(map)
    }

    #[tracing::instrument(skip(self))]
    async fn find_map(&self, id: i64) -> Result<Map, Error> {
        let mut conn = self.pool.acquire().await?;

        fetch_map(&mut conn, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_map(&self, id: i64, name: &str, url: &str) -> Result<Map, Error> {
        let draft = MapDraft::new(name, url)?;

        let mut conn = self.pool.acquire().await?;

        // captured image and dimensions belong to the capture workflow
        sqlx::query_as::<_, Map>("UPDATE maps SET name = ?, url = ? WHERE id = ? RETURNING *")
            .bind(&draft.name)
            .bind(&draft.url)
            .bind(id)
            .fetch_optional(&mut conn)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| not_found_error("map", id))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_map(&self, id: i64) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        // children first; the opening statement is a write so the lock is taken up front
        let zones = tx
            .execute(
                sqlx::query(
                    "DELETE FROM zones WHERE route_id IN (SELECT id FROM routes WHERE map_id = ?)",
                )
                .bind(id),
            )
            .await?
            .rows_affected();

        let routes = tx
            .execute(sqlx::query("DELETE FROM routes WHERE map_id = ?").bind(id))
            .await?
            .rows_affected();

        let maps = tx
            .execute(sqlx::query("DELETE FROM maps WHERE id = ?").bind(id))
            .await?
            .rows_affected();

        if maps == 0 {
            return Err(not_found_error("map", id));
        }

        tx.commit().await?;

        tracing::info!(routes, zones, "map deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_test::block_on;

    use crate::api::{MapAPI, RouteAPI, ZoneAPI};
    use crate::capture::testing::StubCapture;
    use crate::engine::testing::{count, harness};

    const URL: &str = "https://www.google.com/maps/xyz";

    #[test]
    fn create_find_and_update_map() {
        block_on(async {
            let h = harness(Arc::new(StubCapture::new(1280, 800))).await;

            let map = h.engine.create_map(" CentroA ", URL).await.unwrap();
            assert_eq!(map.name, "CentroA");
            assert!(!map.is_captured());
            assert_eq!(map.dimensions(), None);

            let found = h.engine.find_map(map.id).await.unwrap();
            assert_eq!(found, map);

            let updated = h
                .engine
                .update_map(map.id, "CentroB", "https://www.google.com/maps/abc")
                .await
                .unwrap();
            assert_eq!(updated.id, map.id);
            assert_eq!(updated.name, "CentroB");
            assert_eq!(updated.url, "https://www.google.com/maps/abc");
            assert_eq!(updated.created_at, map.created_at);

            let maps = h.engine.list_maps().await.unwrap();
            assert_eq!(maps, vec![updated]);
        });
    }

    #[test]
    fn list_maps_newest_first() {
        block_on(async {
            let h = harness(Arc::new(StubCapture::new(1280, 800))).await;

            let first = h.engine.create_map("A", URL).await.unwrap();
            let second = h.engine.create_map("B", URL).await.unwrap();

            let ids: Vec<i64> = h
                .engine
                .list_maps()
                .await
                .unwrap()
                .iter()
                .map(|map| map.id)
                .collect();
            assert_eq!(ids, vec![second.id, first.id]);
        });
    }

    #[test]
    fn duplicate_pair_is_rejected() {
        block_on(async {
            let h = harness(Arc::new(StubCapture::new(1280, 800))).await;

            let first = h.engine.create_map("CentroA", URL).await.unwrap();
            let err = h.engine.create_map("CentroA", URL).await.unwrap_err();
            assert!(err.is_validation_error());

            let other = h.engine.create_map("CentroB", URL).await.unwrap();
            let err = h
                .engine
                .update_map(other.id, "CentroA", URL)
                .await
                .unwrap_err();
            assert!(err.is_validation_error());

            assert_eq!(h.engine.find_map(first.id).await.unwrap().name, "CentroA");
            assert_eq!(count(&h.store, "maps").await, 2);
        });
    }

    #[test]
    fn invalid_map_input_is_rejected() {
        block_on(async {
            let h = harness(Arc::new(StubCapture::new(1280, 800))).await;

            let err = h.engine.create_map("", URL).await.unwrap_err();
            assert!(err.is_validation_error());

            let err = h
                .engine
                .create_map("CentroA", "https://maps.example.com")
                .await
                .unwrap_err();
            assert!(err.is_validation_error());

            assert_eq!(count(&h.store, "maps").await, 0);
        });
    }

    #[test]
    fn missing_map_is_not_found() {
        block_on(async {
            let h = harness(Arc::new(StubCapture::new(1280, 800))).await;

            assert!(h.engine.find_map(42).await.unwrap_err().is_not_found_error());
            assert!(h
                .engine
                .update_map(42, "CentroA", URL)
                .await
                .unwrap_err()
                .is_not_found_error());
            assert!(h.engine.delete_map(42).await.unwrap_err().is_not_found_error());
        });
    }

    #[test]
    fn delete_map_removes_routes_and_zones() {
        block_on(async {
            let h = harness(Arc::new(StubCapture::new(1280, 800))).await;

            let map = h.engine.create_map("CentroA", URL).await.unwrap();
            let kept = h.engine.create_map("CentroB", URL).await.unwrap();

            for (name, zones) in [("R1", 2), ("R2", 3), ("R3", 0)] {
                let route = h.engine.create_route(map.id, name, "N").await.unwrap();
                for order in 0..zones {
                    h.engine
                        .add_zone(route.id, order * 10, order * 10, "z", order)
                        .await
                        .unwrap();
                }
            }

            let kept_route = h.engine.create_route(kept.id, "K1", "S").await.unwrap();
            h.engine
                .add_zone(kept_route.id, 1, 1, "k", 1)
                .await
                .unwrap();

            assert_eq!(count(&h.store, "routes").await, 4);
            assert_eq!(count(&h.store, "zones").await, 6);

            h.engine.delete_map(map.id).await.unwrap();

            assert!(h.engine.find_map(map.id).await.unwrap_err().is_not_found_error());
            assert_eq!(count(&h.store, "routes").await, 1);
            assert_eq!(count(&h.store, "zones").await, 1);
            assert_eq!(h.engine.list_zones(kept_route.id).await.unwrap().len(), 1);
        });
    }
}
