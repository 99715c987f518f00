//! JSON extractor that also runs `validator` rules.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use quill_core::error::AppError;

use crate::error::ApiError;

/// Deserializes a JSON body and validates it before the handler runs.
///
/// Both malformed JSON and failed validation become a 400 with the
/// standard error body.
#[must_use]
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        data.validate().map_err(validation_to_error)?;
        Ok(Self(data))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    tracing::debug!(reason = %rejection.body_text(), "Rejected JSON body");
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected a JSON body with Content-Type: application/json".to_string()
        }
        other => other.body_text(),
    };
    AppError::validation(message).into()
}

fn validation_to_error(errors: ValidationErrors) -> ApiError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("Field '{field}' is invalid"),
            })
        })
        .collect();
    messages.sort();

    tracing::debug!(errors = ?errors.field_errors(), "Request validation failed");

    let message = if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join(". ")
    };
    AppError::validation(message).into()
}
