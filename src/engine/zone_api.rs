use super::helpers::{fetch_route, fetch_zones, parent_write_error};
use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Executor;

use crate::{
    api::ZoneAPI,
    entities::Zone,
    error::{not_found_error, Error},
};

#[async_trait]
impl ZoneAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn add_zone(
        &self,
        route_id: i64,
        x: i64,
        y: i64,
        name: &str,
        order: i64,
    ) -> Result<Zone, Error> {
        let mut conn = self.pool.acquire().await?;

        // orders are taken as given: no uniqueness, no renumbering
        let zone = sqlx::query_as::<_, Zone>(
            "INSERT INTO zones (route_id, name, x, y, sort_order, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *",
        )
        .bind(route_id)
        .bind(name)
        .bind(x)
        .bind(y)
        .bind(order)
        .bind(Utc::now())
        .fetch_one(&mut conn)
        .await
        .map_err(|err| parent_write_error(err, "route", route_id))?;

        Ok(zone)
    }

    #[tracing::instrument(skip(self))]
    async fn remove_zone(&self, id: i64) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        let removed = conn
            .execute(sqlx::query("DELETE FROM zones WHERE id = ?").bind(id))
            .await?
            .rows_affected();

        if removed == 0 {
            return Err(not_found_error("zone", id));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn list_zones(&self, route_id: i64) -> Result<Vec<Zone>, Error> {
        let mut conn = self.pool.acquire().await?;

        fetch_route(&mut conn, route_id).await?;
        fetch_zones(&mut conn, route_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_test::block_on;

    use crate::api::{MapAPI, RouteAPI, ZoneAPI};
    use crate::capture::testing::StubCapture;
    use crate::engine::testing::{count, file_harness, harness, multi_thread, Harness};
    use crate::entities::Route;

    async fn route(h: &Harness) -> Route {
        let map = h
            .engine
            .create_map("CentroA", "https://www.google.com/maps/xyz")
            .await
            .unwrap();

        h.engine.create_route(map.id, "R1", "N").await.unwrap()
    }

    #[test]
    fn add_zone_keeps_given_fields() {
        block_on(async {
            let h = harness(Arc::new(StubCapture::new(1280, 800))).await;
            let route = route(&h).await;

            let zone = h.engine.add_zone(route.id, 10, 20, "Plaza", 1).await.unwrap();

            assert_eq!(zone.route_id, route.id);
            assert_eq!(zone.name, "Plaza");
            assert_eq!(zone.position(), (10, 20));
            assert_eq!(zone.order, 1);
        });
    }

    #[test]
    fn coordinates_are_not_bounded_by_the_image() {
        block_on(async {
            let h = harness(Arc::new(StubCapture::new(1280, 800))).await;
            let route = route(&h).await;

            let zone = h.engine.add_zone(route.id, 5000, -3, "far", 1).await.unwrap();
            assert_eq!(zone.position(), (5000, -3));
        });
    }

    #[test]
    fn zones_are_listed_by_order_without_renumbering() {
        block_on(async {
            let h = harness(Arc::new(StubCapture::new(1280, 800))).await;
            let route = route(&h).await;

            for order in [3, 1, 2] {
                h.engine
                    .add_zone(route.id, order, order, "z", order)
                    .await
                    .unwrap();
            }
            h.engine.add_zone(route.id, 5, 5, "z", 5).await.unwrap();

            let orders: Vec<i64> = h
                .engine
                .list_zones(route.id)
                .await
                .unwrap()
                .iter()
                .map(|zone| zone.order)
                .collect();
            assert_eq!(orders, vec![1, 2, 3, 5]);
        });
    }

    #[test]
    fn equal_orders_keep_insertion_order() {
        block_on(async {
            let h = harness(Arc::new(StubCapture::new(1280, 800))).await;
            let route = route(&h).await;

            let first = h.engine.add_zone(route.id, 1, 1, "first", 2).await.unwrap();
            let second = h.engine.add_zone(route.id, 2, 2, "second", 2).await.unwrap();
            let head = h.engine.add_zone(route.id, 0, 0, "head", 1).await.unwrap();

            let ids: Vec<i64> = h
                .engine
                .list_zones(route.id)
                .await
                .unwrap()
                .iter()
                .map(|zone| zone.id)
                .collect();
            assert_eq!(ids, vec![head.id, first.id, second.id]);
        });
    }

    #[test]
    fn remove_zone_leaves_the_rest() {
        block_on(async {
            let h = harness(Arc::new(StubCapture::new(1280, 800))).await;
            let route = route(&h).await;

            let a = h.engine.add_zone(route.id, 1, 1, "a", 1).await.unwrap();
            let b = h.engine.add_zone(route.id, 2, 2, "b", 2).await.unwrap();
            let c = h.engine.add_zone(route.id, 3, 3, "c", 3).await.unwrap();

            h.engine.remove_zone(b.id).await.unwrap();

            let remaining = h.engine.list_zones(route.id).await.unwrap();
            assert_eq!(remaining, vec![a, c]);
            assert!(h.engine.find_route(route.id).await.is_ok());

            let err = h.engine.remove_zone(b.id).await.unwrap_err();
            assert!(err.is_not_found_error());
        });
    }

    #[test]
    fn zones_need_a_live_route() {
        block_on(async {
            let h = harness(Arc::new(StubCapture::new(1280, 800))).await;

            let err = h.engine.add_zone(7, 1, 1, "a", 1).await.unwrap_err();
            assert!(err.is_not_found_error());

            let err = h.engine.list_zones(7).await.unwrap_err();
            assert!(err.is_not_found_error());
        });
    }

    #[test]
    fn concurrent_zone_writes_all_land() {
        multi_thread().block_on(async {
            let h = file_harness(Arc::new(StubCapture::new(1280, 800)), 5).await;
            let route_id = route(&h).await.id;

            let tasks: Vec<_> = (0..40)
                .map(|i| {
                    let engine = h.engine.clone();
                    tokio::spawn(async move { engine.add_zone(route_id, i, i, "z", i).await })
                })
                .collect();

            for task in tasks {
                task.await.unwrap().unwrap();
            }

            assert_eq!(count(&h.store, "zones").await, 40);
            assert_eq!(h.engine.list_zones(route_id).await.unwrap().len(), 40);
        });
    }
}
