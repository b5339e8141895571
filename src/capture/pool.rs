use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::{CaptureDriver, Snapshot};
use crate::error::{capture_busy_error, Error};

/// Caps how many captures run at once. Extra requests are turned away
/// immediately instead of queueing behind slow pages.
pub struct CapturePool {
    driver: Arc<dyn CaptureDriver>,
    permits: Semaphore,
    limit: usize,
}

impl CapturePool {
    pub fn new(driver: Arc<dyn CaptureDriver>, limit: usize) -> Self {
        Self {
            driver,
            permits: Semaphore::new(limit),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

#[async_trait]
impl CaptureDriver for CapturePool {
    #[tracing::instrument(skip(self))]
    async fn capture(&self, url: &str) -> Result<Snapshot, Error> {
        let _permit = self.permits.try_acquire().map_err(|_| {
            tracing::warn!(limit = self.limit, "capture rejected, pool exhausted");
            capture_busy_error()
        })?;

        self.driver.capture(url).await
    }
}

#[cfg(test)]
struct GatedCapture {
    gate: Semaphore,
}

#[cfg(test)]
#[async_trait]
impl CaptureDriver for GatedCapture {
    async fn capture(&self, _url: &str) -> Result<Snapshot, Error> {
        let _open = self.gate.acquire().await.unwrap();

        Ok(Snapshot {
            image: vec![],
            width: 1,
            height: 1,
        })
    }
}

#[test]
fn rejects_capture_beyond_limit() {
    use crate::error::ErrorKind;
    use tokio_test::block_on;

    block_on(async {
        let gated = Arc::new(GatedCapture {
            gate: Semaphore::new(0),
        });
        let pool = Arc::new(CapturePool::new(gated.clone(), 1));

        let first = tokio::spawn({
            let pool = pool.clone();
            async move { pool.capture("https://www.google.com/maps/a").await }
        });

        while pool.available() > 0 {
            tokio::task::yield_now().await;
        }

        let err = pool
            .capture("https://www.google.com/maps/b")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::CaptureBusy);

        gated.gate.add_permits(1);
        first.await.unwrap().unwrap();

        assert_eq!(pool.available(), 1);
    });
}

#[test]
fn releases_permit_after_failure() {
    use crate::capture::testing::FailingCapture;
    use tokio_test::block_on;

    let pool = CapturePool::new(Arc::new(FailingCapture), 1);

    let err = block_on(pool.capture("https://www.google.com/maps/a")).unwrap_err();
    assert!(err.kind.is_capture_failure());
    assert_eq!(pool.available(), pool.limit());
}
