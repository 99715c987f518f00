//! PostgreSQL-backed [`AccountStore`].

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use quill_core::config::StoreProvider;
use quill_core::error::{AppError, AppResult, ErrorKind};
use quill_core::types::AccountId;
use quill_entity::account::{Account, NewAccount};

use crate::connection::DatabasePool;
use crate::store::AccountStore;

const EMAIL_KEY: &str = "accounts_email_key";
const USERNAME_KEY: &str = "accounts_username_key";

/// Account repository over the shared pool.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    db: DatabasePool,
}

impl PgAccountStore {
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    fn provider(&self) -> StoreProvider {
        StoreProvider::Postgres
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by email", e)
            })
    }

    async fn insert(&self, account: NewAccount) -> AppResult<Account> {
        let id = AccountId::new();
        let now = Utc::now();

        let saved = sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, username, email, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) \
             RETURNING *",
        )
        .bind(id.into_uuid())
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(now)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(EMAIL_KEY) => {
                AppError::conflict(format!("Email '{}' is already registered", account.email))
            }
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(USERNAME_KEY) => {
                AppError::conflict(format!("Username '{}' is already taken", account.username))
            }
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict("Account already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create account", e),
        })?;

        debug!(account_id = %saved.id, "Inserted account");
        Ok(saved)
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }

    async fn close(&self) {
        self.db.close().await;
    }
}
