//! Local filesystem image store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use quill_core::error::{AppError, AppResult, ErrorKind};
use quill_core::traits::image_host::{ImageHost, ImageUpload, StoredImage};

/// Writes uploads into a single flat directory.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    /// Directory holding every stored image.
    root: PathBuf,
}

impl LocalImageStore {
    /// Create a store rooted at `root_path`, creating the directory if needed.
    pub async fn new(root_path: impl AsRef<Path>) -> AppResult<Self> {
        let root = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create image directory: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Accept `name` only if it is a plain file name inside the image directory.
pub fn sanitize_file_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Image name is required"));
    }
    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(AppError::validation(format!(
            "Invalid image name: {name}"
        )));
    }
    Ok(name)
}

#[async_trait]
impl ImageHost for LocalImageStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn store(&self, upload: ImageUpload) -> AppResult<StoredImage> {
        let name = sanitize_file_name(&upload.file_name)?;
        let full_path = self.root.join(name);

        fs::write(&full_path, &upload.data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write image: {name}"),
                e,
            )
        })?;

        debug!(file = name, bytes = upload.data.len(), "Stored image on disk");
        Ok(StoredImage {
            url: name.to_string(),
        })
    }
}
