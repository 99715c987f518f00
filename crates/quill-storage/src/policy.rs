//! Acceptance rules for cloud uploads.

use quill_core::config::CloudConfig;
use quill_core::error::{AppError, AppResult};
use quill_core::traits::image_host::ImageUpload;

/// Size and type limits applied before an image leaves the server.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_bytes: u64,
    allowed_mime_types: Vec<String>,
}

impl UploadPolicy {
    pub fn new(max_bytes: u64, allowed_mime_types: Vec<String>) -> Self {
        Self {
            max_bytes,
            allowed_mime_types: allowed_mime_types
                .into_iter()
                .map(|m| m.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Check an upload. Presence is checked first, then size, then type.
    pub fn check(&self, upload: Option<ImageUpload>) -> AppResult<ImageUpload> {
        let upload = match upload {
            Some(u) if !u.data.is_empty() => u,
            _ => return Err(AppError::upload("Image is not presented!")),
        };

        if upload.size() > self.max_bytes {
            return Err(AppError::upload(format!(
                "File size cannot be larger than {}!",
                human_size(self.max_bytes)
            )));
        }

        let mime = upload
            .content_type
            .as_deref()
            .map(|m| m.trim().to_ascii_lowercase())
            .unwrap_or_default();
        if !self.allowed_mime_types.iter().any(|allowed| *allowed == mime) {
            return Err(AppError::upload("Not supported file type!"));
        }

        Ok(upload)
    }
}

impl From<&CloudConfig> for UploadPolicy {
    fn from(config: &CloudConfig) -> Self {
        Self::new(
            config.max_file_size_bytes,
            config.allowed_mime_types.clone(),
        )
    }
}

/// Decimal size label: 1_000_000 is "1MB".
fn human_size(bytes: u64) -> String {
    if bytes >= 1_000_000 && bytes % 1_000_000 == 0 {
        format!("{}MB", bytes / 1_000_000)
    } else if bytes >= 1_000 && bytes % 1_000 == 0 {
        format!("{}KB", bytes / 1_000)
    } else {
        format!("{bytes} bytes")
    }
}
