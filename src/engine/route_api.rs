use super::helpers::{fetch_map, fetch_route, fetch_zones, parent_write_error};
use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Acquire, Executor};

use crate::{
    api::RouteAPI,
    entities::{Route, RouteDetail, RouteDraft, RouteSummary},
    error::{not_found_error, Error},
};

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_routes(&self) -> Result<Vec<RouteSummary>, Error> {
        let mut conn = self.pool.acquire().await?;

        let routes = sqlx::query_as::<_, RouteSummary>(
            "SELECT r.id, r.name, r.map_id, m.name AS map_name, r.direction, r.created_at
            FROM routes r
            JOIN maps m ON m.id = r.map_id
            ORDER BY r.created_at DESC, r.id DESC",
        )
        .fetch_all(&mut conn)
        .await?;

        Ok(routes)
    }

    #[tracing::instrument(skip(self))]
    async fn create_route(
        &self,
        map_id: i64,
        name: &str,
        direction: &str,
    ) -> Result<Route, Error> {
        let draft = RouteDraft::new(map_id, name, direction)?;

        let mut conn = self.pool.acquire().await?;

        let route = sqlx::query_as::<_, Route>(
            "INSERT INTO routes (name, map_id, direction, created_at) VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(&draft.name)
        .bind(draft.map_id)
        .bind(&draft.direction)
        .bind(Utc::now())
        .fetch_one(&mut conn)
        .await
        .map_err(|err| parent_write_error(err, "map", draft.map_id))?;

        tracing::info!(route_id = route.id, "route created");

        Ok(route)
    }

    #[tracing::instrument(skip(self))]
    async fn find_route(&self, id: i64) -> Result<Route, Error> {
        let mut conn = self.pool.acquire().await?;

        fetch_route(&mut conn, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_route_detail(&self, id: i64) -> Result<RouteDetail, Error> {
        let mut conn = self.pool.acquire().await?;

        let route = fetch_route(&mut conn, id).await?;
        let map = fetch_map(&mut conn, route.map_id).await?;
        let zones = fetch_zones(&mut conn, route.id).await?;

        Ok(RouteDetail { route, map, zones })
    }

    #[tracing::instrument(skip(self))]
    async fn update_route(
        &self,
        id: i64,
        map_id: i64,
        name: &str,
        direction: &str,
    ) -> Result<Route, Error> {
        let draft = RouteDraft::new(map_id, name, direction)?;

        let mut conn = self.pool.acquire().await?;

        // a missing route matches no row, a missing map trips the foreign key
        sqlx::query_as::<_, Route>(
            "UPDATE routes SET name = ?, direction = ?, map_id = ? WHERE id = ? RETURNING *",
        )
        .bind(&draft.name)
        .bind(&draft.direction)
        .bind(draft.map_id)
        .bind(id)
        .fetch_optional(&mut conn)
        .await
        .map_err(|err| parent_write_error(err, "map", draft.map_id))?
        .ok_or_else(|| not_found_error("route", id))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_route(&self, id: i64) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let zones = tx
            .execute(sqlx::query("DELETE FROM zones WHERE route_id = ?").bind(id))
            .await?
            .rows_affected();

        let routes = tx
            .execute(sqlx::query("DELETE FROM routes WHERE id = ?").bind(id))
            .await?
            .rows_affected();

        if routes == 0 {
            return Err(not_found_error("route", id));
        }

        tx.commit().await?;

        tracing::info!(zones, "route deleted");

        Ok(())
    }
}
