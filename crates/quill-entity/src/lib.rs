//! # quill-entity
//!
//! Domain entities for Quill. Database-backed entities derive
//! `sqlx::FromRow`; anything that may leave the server derives `Serialize`
//! and never carries secrets.

pub mod account;

pub use account::{Account, AccountProfile, NewAccount};
