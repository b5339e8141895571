use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, Pool, Sqlite};

pub type Database = Sqlite;

/// Owns the connection pool. Created once at startup and handed to the engine.
#[derive(Clone, Debug)]
pub struct Store {
    pool: Pool<Database>,
}

impl Store {
    #[tracing::instrument(name = "Store::connect")]
    pub async fn connect(db_uri: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(db_uri)?
            .create_if_missing(true)
            .foreign_keys(true);

        // an in-memory database lives as long as its connection
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        pool.execute(
            "CREATE TABLE IF NOT EXISTS maps (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                url TEXT NOT NULL,
                captured_image TEXT,
                original_width INTEGER,
                original_height INTEGER,
                created_at TEXT NOT NULL,
                UNIQUE (name, url)
            )",
        )
        .await?;

        pool.execute(
            "CREATE TABLE IF NOT EXISTS routes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                map_id INTEGER NOT NULL,
                direction TEXT NOT NULL,
                created_at TEXT NOT NULL,
                CONSTRAINT fk_route_map FOREIGN KEY (map_id) REFERENCES maps (id) ON DELETE CASCADE
            )",
        )
        .await?;
        pool.execute("CREATE INDEX IF NOT EXISTS idx_routes_map ON routes (map_id)")
            .await?;

        pool.execute(
            "CREATE TABLE IF NOT EXISTS zones (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                route_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                x INTEGER NOT NULL,
                y INTEGER NOT NULL,
                sort_order INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                CONSTRAINT fk_zone_route FOREIGN KEY (route_id) REFERENCES routes (id) ON DELETE CASCADE
            )",
        )
        .await?;
        pool.execute(
            "CREATE INDEX IF NOT EXISTS idx_zones_route_order ON zones (route_id, sort_order, id)",
        )
        .await?;

        tracing::info!("store ready");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Database> {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("store closed");
    }
}

#[test]
fn connect_is_idempotent() {
    use tokio_test::block_on;

    let dir = tempfile::tempdir().unwrap();
    let uri = format!("sqlite://{}", dir.path().join("maps.sqlite").display());

    block_on(async {
        let store = Store::connect(&uri, 1).await.unwrap();
        store.close().await;

        // schema setup must tolerate existing tables
        let store = Store::connect(&uri, 1).await.unwrap();
        store.close().await;
    });
}
