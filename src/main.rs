use std::sync::Arc;

use mapzones::capture::CapturePool;
use mapzones::config::Config;
use mapzones::db::Store;
use mapzones::engine::Engine;
use mapzones::error::Error;
use mapzones::external::ChromeCapture;
use mapzones::server::serve;
use mapzones::storage::ImageStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let store = Store::connect(&config.database_url, config.database_max_connections).await?;

    let chrome = Arc::new(ChromeCapture::new(config.capture.clone()));
    let capture = Arc::new(CapturePool::new(chrome, config.capture.concurrency));
    let images = ImageStore::new(&config.public_dir);
    let screenshots_dir = images.screenshots_dir();

    let engine = Engine::new(&store, capture, images);

    let result = serve(engine, config.bind_addr, &screenshots_dir, shutdown_signal()).await;

    store.close().await;

    result
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }

    tracing::info!("shutting down");
}
