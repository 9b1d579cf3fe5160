//! Scoped scratch storage for resized copies.
//!
//! Each run gets its own directory. Every resized copy lives in a
//! [`ScratchImage`] that deletes its file when dropped, so a copy never
//! outlives its (image, size) iteration, whether the API call worked or not.

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::ScratchConfig;
use crate::error::PipelineError;

/// Per-run scratch directory.
pub struct ScratchDir {
    path: PathBuf,
    // Dropping the guard removes the directory; `None` when scratch is kept.
    _guard: Option<TempDir>,
    keep: bool,
}

impl ScratchDir {
    /// Create the scratch directory under `parent` (system temp when `None`).
    pub fn create(config: &ScratchConfig, parent: Option<&Path>) -> Result<Self, PipelineError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("alttext-");
        let created = match parent {
            Some(parent) => {
                std::fs::create_dir_all(parent).and_then(|_| builder.tempdir_in(parent))
            }
            None => builder.tempdir(),
        };
        let dir = created.map_err(|e| PipelineError::Scratch {
            path: parent.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir),
            message: format!("Failed to create scratch directory: {e}"),
        })?;
        tracing::debug!("Scratch directory: {:?}", dir.path());

        let (path, guard) = if config.keep {
            (dir.keep(), None)
        } else {
            (dir.path().to_path_buf(), Some(dir))
        };
        Ok(Self {
            path,
            _guard: guard,
            keep: config.keep,
        })
    }

    /// Location of the scratch directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scratch file name for one resized copy: `<stem>_<width>px.png`.
    pub fn file_name(stem: &str, width: u32) -> String {
        format!("{stem}_{width}px.png")
    }

    /// Encode `image` as PNG and persist it under the derived name.
    pub fn persist(
        &self,
        image: &DynamicImage,
        stem: &str,
        width: u32,
    ) -> Result<ScratchImage, PipelineError> {
        let path = self.path.join(Self::file_name(stem, width));

        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| PipelineError::Scratch {
                path: path.clone(),
                message: format!("PNG encode failed: {e}"),
            })?;
        let bytes = buffer.into_inner();

        std::fs::write(&path, &bytes).map_err(|e| PipelineError::Scratch {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(ScratchImage {
            path,
            bytes,
            keep: self.keep,
        })
    }
}

/// A resized copy on disk, removed on drop unless scratch is kept.
pub struct ScratchImage {
    path: PathBuf,
    bytes: Vec<u8>,
    keep: bool,
}

impl ScratchImage {
    /// Path of the persisted PNG.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encoded PNG bytes, as written to disk.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for ScratchImage {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("Failed to remove scratch file {:?}: {e}", self.path);
        }
    }
}
