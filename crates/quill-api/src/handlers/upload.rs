//! Image upload handlers.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use tracing::info;

use quill_core::error::{AppError, AppResult};
use quill_core::traits::ImageUpload;

use crate::dto::response::UploadResponse;
use crate::error::{ApiError, UploadError};
use crate::state::AppState;

/// Parts of an upload form this server looks at.
#[derive(Debug, Default)]
struct UploadForm {
    /// Text field `img`: requested file name.
    name: Option<String>,
    /// File field `file`.
    file: Option<ImageUpload>,
}

async fn read_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("img") => {
                form.name = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                form.file = Some(ImageUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large("Request body is too large")
    } else {
        AppError::validation(format!("Malformed multipart body: {}", err.body_text()))
    }
}

/// POST /api/upload
///
/// Stores `file` in the image directory under the name given in `img`,
/// falling back to the uploaded file's own name.
pub async fn upload_local(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let form = read_form(multipart).await?;

    let mut upload = form
        .file
        .ok_or_else(|| AppError::validation("File is required"))?;
    if let Some(name) = form.name {
        upload.file_name = name;
    }

    let stored = state.local_images.store(upload).await?;
    info!(file = %stored.url, "Image uploaded to disk");

    Ok(Json(UploadResponse { url: stored.url }))
}

/// POST /api/cloud-upload
///
/// Every failure on this route is a 422 with `{ "message": ... }`.
pub async fn upload_cloud(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, UploadError> {
    let form = read_form(multipart).await?;
    let upload = state.upload_policy.check(form.file)?;

    let stored = state.cloud_images.store(upload).await?;
    info!(
        provider = state.cloud_images.provider_type(),
        "Image uploaded to cloud host"
    );

    Ok(Json(UploadResponse { url: stored.url }))
}
