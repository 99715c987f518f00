//! [`ImageHost`](quill_core::traits::ImageHost) implementations.

pub mod cloudinary;
pub mod local;

pub use cloudinary::CloudinaryImageHost;
pub use local::LocalImageStore;
