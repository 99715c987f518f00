//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_healthy = state.store.health_check().await.unwrap_or_else(|e| {
        warn!(error = %e, store = %state.store.provider(), "Account store health check failed");
        false
    });
    let cloud_images = state.cloud_images.health_check().await.unwrap_or_else(|e| {
        warn!(error = %e, provider = state.cloud_images.provider_type(), "Image host health check failed");
        false
    });

    Json(HealthResponse {
        status: if store_healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store.provider().to_string(),
        store_healthy,
        cloud_images,
    })
}
