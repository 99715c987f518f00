//! Response DTOs.

use serde::{Deserialize, Serialize};

/// A plain confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Where an uploaded image can be fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok" or "degraded".
    pub status: String,
    /// Server version.
    pub version: String,
    /// Account store backend.
    pub store: String,
    /// Whether the account store answered.
    pub store_healthy: bool,
    /// Whether the cloud image host has credentials.
    pub cloud_images: bool,
}
