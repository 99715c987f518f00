//! Custom Axum extractors.

pub mod session;
pub mod validated_json;

pub use session::SessionToken;
pub use validated_json::ValidateJson;
