//! PostgreSQL repository implementations.

pub mod account;

pub use account::PgAccountStore;
