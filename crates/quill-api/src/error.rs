//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use quill_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Handler error. Wraps [`AppError`] so it can become a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Status code for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        // Refetch answers 404 when there is no usable session.
        ErrorKind::Unauthenticated | ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorKind::Upload => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
        ErrorKind::Database
        | ErrorKind::Storage
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log server faults and return the message a client may see.
fn client_message(err: &AppError) -> String {
    if err.kind.is_server_fault() {
        tracing::error!(
            kind = %err.kind,
            error = %err.message,
            source = ?err.source,
            "Request failed"
        );
        if err.kind != ErrorKind::ExternalService {
            return "Internal server error".to_string();
        }
    }
    err.message.clone()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind);
        let body = ApiErrorResponse {
            error: self.0.kind.code().to_string(),
            message: client_message(&self.0),
        };

        (status, Json(body)).into_response()
    }
}

/// Error for the cloud upload route: always 422 with `{ "message": ... }`.
#[derive(Debug)]
pub struct UploadError(pub AppError);

impl From<AppError> for UploadError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let message = client_message(&self.0);
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "message": message })),
        )
            .into_response()
    }
}
