//! Local persistence of downloaded images.
//!
//! Files are written under a temporary sibling name and renamed into place, so
//! a reader never observes a partially written image under its final name.

use chrono::{DateTime, Local};
use doubao_mcp_common::error::Error;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Extension used for every saved image.
pub const IMAGE_EXTENSION: &str = "jpg";

/// An image persisted to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedImage {
    /// Absolute path of the saved file
    pub path: PathBuf,
    /// File name within the save directory
    pub filename: String,
    /// Number of bytes written
    pub size_bytes: u64,
}

/// Derive the file name for an image generated at `now`.
///
/// With a prefix: `{prefix}_{unix_seconds}.jpg`. Without one:
/// `image_{YYYYMMDD_HHMMSS}.jpg` in local time.
pub fn derive_filename(prefix: Option<&str>, now: DateTime<Local>) -> String {
    match prefix {
        Some(prefix) => format!("{}_{}.{}", prefix, now.timestamp(), IMAGE_EXTENSION),
        None => format!("image_{}.{}", now.format("%Y%m%d_%H%M%S"), IMAGE_EXTENSION),
    }
}

/// Writes images into one directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `dir`. Nothing is touched until the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory images are saved into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` to `filename` inside the store directory.
    ///
    /// An existing file with the same name is replaced.
    #[instrument(level = "info", name = "save_image", skip(self, bytes), fields(size = bytes.len()))]
    pub async fn save(&self, bytes: &[u8], filename: &str) -> Result<SavedImage, Error> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let dir = std::path::absolute(&self.dir)?;
        let final_path = dir.join(filename);
        let temp_path = dir.join(format!(".{}.{:08x}.part", filename, rand::random::<u32>()));

        debug!(temp = %temp_path.display(), "Writing image");

        // Removes the temporary file on every exit except a completed rename,
        // including when this future is dropped between write and rename
        let guard = PartFileGuard::new(temp_path);
        tokio::fs::write(guard.path(), bytes).await?;
        tokio::fs::rename(guard.path(), &final_path).await?;
        guard.disarm();

        info!(path = %final_path.display(), "Image saved");

        Ok(SavedImage {
            path: final_path,
            filename: filename.to_string(),
            size_bytes: bytes.len() as u64,
        })
    }
}

/// Deletes a temporary file when dropped unless disarmed.
#[derive(Debug)]
struct PartFileGuard {
    path: PathBuf,
    armed: bool,
}

impl PartFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PartFileGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(temp = %self.path.display(), error = %e, "Failed to remove temporary file");
            }
        }
    }
}
