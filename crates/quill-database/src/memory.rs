//! In-process [`AccountStore`] for tests and single-node development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use quill_core::config::StoreProvider;
use quill_core::error::{AppError, AppResult};
use quill_core::types::AccountId;
use quill_entity::account::{Account, NewAccount};

use crate::store::AccountStore;

/// Tables guarded together so uniqueness checks and inserts are atomic.
#[derive(Debug, Default)]
struct Tables {
    by_id: HashMap<AccountId, Account>,
    /// email -> id
    emails: HashMap<String, AccountId>,
    /// username -> id
    usernames: HashMap<String, AccountId>,
}

/// Mutex-guarded account tables. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.tables.lock().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    fn provider(&self) -> StoreProvider {
        StoreProvider::Memory
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .emails
            .get(email)
            .and_then(|id| tables.by_id.get(id))
            .cloned())
    }

    async fn insert(&self, account: NewAccount) -> AppResult<Account> {
        let mut tables = self.tables.lock().await;

        if tables.emails.contains_key(&account.email) {
            return Err(AppError::conflict(format!(
                "Email '{}' is already registered",
                account.email
            )));
        }
        if tables.usernames.contains_key(&account.username) {
            return Err(AppError::conflict(format!(
                "Username '{}' is already taken",
                account.username
            )));
        }

        let now = Utc::now();
        let saved = Account {
            id: AccountId::new(),
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            created_at: now,
            updated_at: now,
        };

        tables.emails.insert(saved.email.clone(), saved.id);
        tables.usernames.insert(saved.username.clone(), saved.id);
        tables.by_id.insert(saved.id, saved.clone());

        Ok(saved)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
