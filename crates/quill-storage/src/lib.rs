//! # quill-storage
//!
//! Image storage backends for Quill. Uploads either land in a local
//! directory that the server also exposes under `/images`, or are pushed to
//! Cloudinary after passing the [`UploadPolicy`].

pub mod policy;
pub mod providers;

pub use policy::UploadPolicy;
pub use providers::{CloudinaryImageHost, LocalImageStore};
