//! Traits defined in `quill-core` and implemented by other crates.

pub mod image_host;

pub use image_host::{ImageHost, ImageUpload, StoredImage};
