//! Seam between the upload handlers and wherever images end up.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// An image received from a client, ready to be stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Name the client asked for, or the original file name.
    pub file_name: String,
    /// MIME type reported by the client, if any.
    pub content_type: Option<String>,
    /// File contents.
    pub data: Bytes,
}

impl ImageUpload {
    /// Size of the payload in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Where a stored image can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    /// Public URL, or a path relative to the static image route for local
    /// storage.
    pub url: String,
}

/// Backend that persists uploaded images.
///
/// Implemented for local disk and Cloudinary in `quill-storage`.
#[async_trait]
pub trait ImageHost: Send + Sync + std::fmt::Debug + 'static {
    /// Short provider name for logs ("local", "cloudinary").
    fn provider_type(&self) -> &str;

    /// Check whether the backend is usable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Persist the image and report where it lives.
    async fn store(&self, upload: ImageUpload) -> AppResult<StoredImage>;
}
