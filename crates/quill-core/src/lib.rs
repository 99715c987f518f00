//! # quill-core
//!
//! Shared foundation for the Quill blogging backend: layered configuration,
//! typed identifiers, the [`ImageHost`](traits::ImageHost) seam, and the
//! [`AppError`] type every other crate reports through.
//!
//! Nothing in here depends on another Quill crate.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use error::{AppError, AppResult, ErrorKind};
