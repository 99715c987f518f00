//! Image storage configuration.

use serde::{Deserialize, Serialize};

/// Where uploaded images go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for disk uploads, also served under `/images`.
    pub images_dir: String,
    /// Cloudinary settings for `/api/cloud-upload`.
    pub cloud: CloudConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            images_dir: "./images".to_string(),
            cloud: CloudConfig::default(),
        }
    }
}

/// Third-party image host (Cloudinary) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Cloudinary cloud name.
    pub cloud_name: String,
    /// API key.
    pub api_key: String,
    /// API secret used to sign upload requests.
    pub api_secret: String,
    /// Folder prefix for generated public ids.
    pub folder: String,
    /// Base URL of the upload API.
    pub api_base_url: String,
    /// Largest accepted image in bytes.
    pub max_file_size_bytes: u64,
    /// Accepted MIME types.
    pub allowed_mime_types: Vec<String>,
    /// Upload request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            folder: "CloudinaryDemo".to_string(),
            api_base_url: "https://api.cloudinary.com/v1_1".to_string(),
            max_file_size_bytes: 1_000_000,
            allowed_mime_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/jpg".to_string(),
            ],
            timeout_seconds: 30,
        }
    }
}

impl CloudConfig {
    /// Whether enough credentials are present to talk to the host.
    pub fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}
