//! The credential store contract and backend selection.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use quill_core::config::{DatabaseConfig, StoreProvider};
use quill_core::error::AppResult;
use quill_entity::account::{Account, NewAccount};

use crate::connection::DatabasePool;
use crate::memory::MemoryAccountStore;
use crate::migration::run_migrations;
use crate::repositories::PgAccountStore;

/// Lookup/insert contract for account records.
///
/// Implementations enforce uniqueness of email and username themselves and
/// report a violation as `ErrorKind::Conflict`, including when two inserts
/// race for the same key.
#[async_trait]
pub trait AccountStore: Send + Sync + std::fmt::Debug + 'static {
    /// Backend name for logs and health output.
    fn provider(&self) -> StoreProvider;

    /// Find an account by its (already normalized) email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Persist a new account and return the stored record.
    async fn insert(&self, account: NewAccount) -> AppResult<Account>;

    /// Whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Release backend resources. Called once during shutdown.
    async fn close(&self) {}
}

/// Build the store selected by `config.provider`.
///
/// For PostgreSQL this opens the shared pool and, when configured, applies
/// pending migrations before returning.
pub async fn connect_account_store(config: &DatabaseConfig) -> AppResult<Arc<dyn AccountStore>> {
    match config.provider {
        StoreProvider::Postgres => {
            let pool = DatabasePool::connect(config).await?;
            if config.run_migrations {
                run_migrations(pool.pool()).await?;
            }
            Ok(Arc::new(PgAccountStore::new(pool)))
        }
        StoreProvider::Memory => {
            info!("Using in-memory account store; accounts will not survive a restart");
            Ok(Arc::new(MemoryAccountStore::new()))
        }
    }
}
