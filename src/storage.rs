use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::Error;

pub const SCREENSHOTS_DIR: &str = "screenshots";

/// Writes captured rasters below the publicly served directory.
#[derive(Clone, Debug)]
pub struct ImageStore {
    public_dir: PathBuf,
}

impl ImageStore {
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
        }
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.public_dir.join(SCREENSHOTS_DIR)
    }

    /// Stores a PNG and returns its path relative to the public directory.
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub async fn store(&self, bytes: &[u8]) -> Result<String, Error> {
        let dir = self.screenshots_dir();
        fs::create_dir_all(&dir).await?;

        let stem = format!("capture-{}", Utc::now().timestamp_millis());
        let file_name = write_unique(&dir, &stem, bytes).await?;

        tracing::info!(file = %file_name, "snapshot saved");

        Ok(format!("{}/{}", SCREENSHOTS_DIR, file_name))
    }

    /// Deletes a file previously returned by `store`.
    pub async fn remove(&self, relative_path: &str) -> Result<(), Error> {
        fs::remove_file(self.public_dir.join(relative_path)).await?;

        tracing::info!(file = %relative_path, "snapshot removed");

        Ok(())
    }
}

/// Never replaces an existing file: a taken name gets a `-N` suffix.
async fn write_unique(dir: &Path, stem: &str, bytes: &[u8]) -> Result<String, Error> {
    let mut attempt: u32 = 0;

    loop {
        let file_name = match attempt {
            0 => format!("{}.png", stem),
            n => format!("{}-{}.png", stem, n),
        };

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dir.join(&file_name))
            .await
        {
            Ok(mut file) => {
                file.write_all(bytes).await?;
                file.flush().await?;
                return Ok(file_name);
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(err) => return Err(err.into()),
        }
    }
}

#[test]
fn store_writes_under_screenshots() {
    use tokio_test::block_on;

    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::new(dir.path());

    let path = block_on(store.store(b"raster")).unwrap();

    assert!(path.starts_with("screenshots/capture-"));
    assert!(path.ends_with(".png"));
    assert_eq!(std::fs::read(dir.path().join(&path)).unwrap(), b"raster");

    block_on(store.remove(&path)).unwrap();
    assert!(!dir.path().join(&path).exists());
}

#[test]
fn colliding_names_do_not_overwrite() {
    use tokio_test::block_on;

    let dir = tempfile::tempdir().unwrap();

    let first = block_on(write_unique(dir.path(), "capture-1", b"first")).unwrap();
    let second = block_on(write_unique(dir.path(), "capture-1", b"second")).unwrap();
    let third = block_on(write_unique(dir.path(), "capture-1", b"third")).unwrap();

    assert_eq!(first, "capture-1.png");
    assert_eq!(second, "capture-1-1.png");
    assert_eq!(third, "capture-1-2.png");
    assert_eq!(std::fs::read(dir.path().join(&first)).unwrap(), b"first");
    assert_eq!(std::fs::read(dir.path().join(&second)).unwrap(), b"second");
}
