//! # quill-database
//!
//! The credential store behind Quill's auth flow. [`AccountStore`] is the
//! contract the flow controller depends on; [`PgAccountStore`] backs it with
//! PostgreSQL through one pool created at startup, and
//! [`MemoryAccountStore`] keeps accounts in process for tests and local runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryAccountStore;
pub use repositories::PgAccountStore;
pub use store::{AccountStore, connect_account_store};
