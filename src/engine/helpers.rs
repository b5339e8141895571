use sqlx::SqliteConnection;

use crate::{
    entities::{Map, Route, Zone},
    error::{database_error, invalid_input_error, not_found_error, Error},
};

#[tracing::instrument(skip(conn))]
pub async fn fetch_map(conn: &mut SqliteConnection, id: i64) -> Result<Map, Error> {
    sqlx::query_as::<_, Map>("SELECT * FROM maps WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| not_found_error("map", id))
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_route(conn: &mut SqliteConnection, id: i64) -> Result<Route, Error> {
    sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| not_found_error("route", id))
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_zones(conn: &mut SqliteConnection, route_id: i64) -> Result<Vec<Zone>, Error> {
    let zones = sqlx::query_as::<_, Zone>(
        "SELECT * FROM zones WHERE route_id = ? ORDER BY sort_order ASC, id ASC",
    )
    .bind(route_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(zones)
}

/// Maps a unique-key violation on `(name, url)` to a validation failure.
pub fn map_write_error(err: sqlx::Error) -> Error {
    let duplicate = err
        .as_database_error()
        .map(|db_err| db_err.message().starts_with("UNIQUE constraint failed"))
        .unwrap_or(false);

    if duplicate {
        return invalid_input_error("a map with this name and url already exists");
    }

    database_error(err)
}

/// Maps a foreign-key violation to a missing parent `resource`.
///
/// Writes go first and let the schema check the parent, so a transaction never
/// holds a read lock it later has to upgrade.
pub fn parent_write_error(err: sqlx::Error, resource: &str, id: i64) -> Error {
    let missing_parent = err
        .as_database_error()
        .map(|db_err| db_err.message().starts_with("FOREIGN KEY constraint failed"))
        .unwrap_or(false);

    if missing_parent {
        return not_found_error(resource, id);
    }

    database_error(err)
}
