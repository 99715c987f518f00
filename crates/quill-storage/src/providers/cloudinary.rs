//! Cloudinary image host.
//!
//! Uploads go through the signed upload API: the image travels as a base64
//! data URI in a form field, and the request carries a SHA-256 signature
//! over the sorted upload parameters plus the API secret.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use quill_core::config::CloudConfig;
use quill_core::error::{AppError, AppResult, ErrorKind};
use quill_core::traits::image_host::{ImageHost, ImageUpload, StoredImage};

/// Signed-upload client for one Cloudinary account.
#[derive(Clone)]
pub struct CloudinaryImageHost {
    client: reqwest::Client,
    config: CloudConfig,
}

impl std::fmt::Debug for CloudinaryImageHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryImageHost")
            .field("cloud_name", &self.config.cloud_name)
            .field("folder", &self.config.folder)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryImageHost {
    pub fn new(config: &CloudConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build image host HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// `<folder>/<unix-millis>-<random>`
    fn public_id(&self) -> String {
        format!(
            "{}/{}-{}",
            self.config.folder,
            Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4().simple()
        )
    }
}

/// Hex SHA-256 of `k1=v1&k2=v2...` (keys sorted) followed by the secret.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl ImageHost for CloudinaryImageHost {
    fn provider_type(&self) -> &str {
        "cloudinary"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.config.is_configured())
    }

    async fn store(&self, upload: ImageUpload) -> AppResult<StoredImage> {
        if !self.config.is_configured() {
            return Err(AppError::external_service(
                "Cloud image host is not configured",
            ));
        }

        let mime = upload
            .content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data_uri = format!("data:{mime};base64,{}", STANDARD.encode(&upload.data));

        let public_id = self.public_id();
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("public_id", public_id.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let form = [
            ("file", data_uri.as_str()),
            ("public_id", public_id.as_str()),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self
            .client
            .post(self.upload_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Image host unreachable", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| format!("Image host returned {status}"));
            warn!(%status, %public_id, "Cloud upload rejected: {message}");
            return Err(AppError::external_service(message));
        }

        let body: UploadResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Image host sent an unreadable response",
                e,
            )
        })?;

        let url = body
            .secure_url
            .or(body.url)
            .ok_or_else(|| AppError::external_service("Image host response has no URL"))?;

        debug!(%public_id, bytes = upload.data.len(), "Stored image in the cloud");
        Ok(StoredImage { url })
    }
}
