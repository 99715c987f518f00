//! Claims carried by a session token.

use serde::{Deserialize, Serialize};

use quill_core::types::AccountId;
use quill_entity::account::Account;

/// Who a token is issued to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: AccountId,
    pub username: String,
    pub email: String,
}

impl From<&Account> for Identity {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
        }
    }
}

/// Token payload. Returned verbatim by refetch.
///
/// These are a snapshot taken at login; they are not reconciled with the
/// account record afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub id: AccountId,
    /// Handle at issuance.
    pub username: String,
    /// Email at issuance.
    pub email: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}
