//! Route handlers organized by domain.

pub mod auth;
pub mod health;
pub mod upload;
