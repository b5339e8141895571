mod pool;
mod probe;

pub use pool::CapturePool;
pub use probe::{probe, Dimensions};

use async_trait::async_trait;

use crate::error::Error;

pub const VIEWPORT_WIDTH: u32 = 1280;
pub const VIEWPORT_HEIGHT: u32 = 800;

/// Raster produced by a capture, with the size the engine rendered it at.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub image: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Loads a remote page in a rendering engine and returns a still image of it.
///
/// Implementations must release whatever engine instance they acquired before
/// returning, whether the capture succeeded or not.
#[async_trait]
pub trait CaptureDriver: Send + Sync {
    async fn capture(&self, url: &str) -> Result<Snapshot, Error>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{CaptureDriver, Snapshot};
    use crate::error::Error;

    pub fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        image::RgbImage::new(width, height)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    /// Returns a blank PNG of the configured size and counts how often it was asked.
    pub struct StubCapture {
        size: Mutex<(u32, u32)>,
        calls: AtomicUsize,
    }

    impl StubCapture {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                size: Mutex::new((width, height)),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn resize(&self, width: u32, height: u32) {
            *self.size.lock().unwrap() = (width, height);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CaptureDriver for StubCapture {
        async fn capture(&self, _url: &str) -> Result<Snapshot, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (width, height) = *self.size.lock().unwrap();

            Ok(Snapshot {
                image: png(width, height),
                width,
                height,
            })
        }
    }

    /// Hands back bytes that are not an image.
    pub struct GarbageCapture;

    #[async_trait]
    impl CaptureDriver for GarbageCapture {
        async fn capture(&self, _url: &str) -> Result<Snapshot, Error> {
            Ok(Snapshot {
                image: b"<html>blocked</html>".to_vec(),
                width: super::VIEWPORT_WIDTH,
                height: super::VIEWPORT_HEIGHT,
            })
        }
    }

    /// Always fails the way an unreachable page does.
    pub struct FailingCapture;

    #[async_trait]
    impl CaptureDriver for FailingCapture {
        async fn capture(&self, url: &str) -> Result<Snapshot, Error> {
            Err(crate::error::navigation_error(format!(
                "net::ERR_NAME_NOT_RESOLVED at {}",
                url
            )))
        }
    }
}
