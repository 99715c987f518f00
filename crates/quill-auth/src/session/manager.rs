//! Session lifecycle manager: register, login, logout and refetch.

use std::sync::Arc;

use tracing::{debug, info, warn};

use quill_core::config::AuthConfig;
use quill_core::error::AppError;
use quill_database::AccountStore;
use quill_entity::account::{AccountProfile, NewAccount, normalize_email};

use crate::jwt::{Claims, Identity, IssuedToken, JwtDecoder, JwtEncoder, TokenError};
use crate::password::PasswordHasher;

/// Fields submitted at registration.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Signed session token for the cookie.
    pub token: IssuedToken,
    /// The authenticated account.
    pub profile: AccountProfile,
}

/// Drives the credential flows against an [`AccountStore`].
///
/// Holds no per-request state. Sessions are stateless tokens, so logout
/// cannot revoke anything server-side.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn AccountStore>,
    hasher: PasswordHasher,
    jwt_encoder: Arc<JwtEncoder>,
    jwt_decoder: Arc<JwtDecoder>,
    password_min_length: usize,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("store", &self.store.provider())
            .field("password_min_length", &self.password_min_length)
            .finish()
    }
}

impl SessionManager {
    pub fn new(store: Arc<dyn AccountStore>, config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            store,
            hasher: PasswordHasher::new(&config.argon2)?,
            jwt_encoder: Arc::new(JwtEncoder::new(config)?),
            jwt_decoder: Arc::new(JwtDecoder::new(config)),
            password_min_length: config.password_min_length.max(1),
        })
    }

    pub fn encoder(&self) -> &JwtEncoder {
        &self.jwt_encoder
    }

    /// Create an account.
    ///
    /// Username and email are trimmed and the email is lower-cased before
    /// anything is stored. Duplicate email or username is a `Conflict`.
    pub async fn register(&self, input: RegisterInput) -> Result<AccountProfile, AppError> {
        let username = input.username.trim().to_string();
        let email = normalize_email(&input.email);

        if username.is_empty() {
            return Err(AppError::validation("Username is required"));
        }
        if email.is_empty() {
            return Err(AppError::validation("Email is required"));
        }
        if !email.contains('@') {
            return Err(AppError::validation("Email is not valid"));
        }
        if input.password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }
        if input.password.chars().count() < self.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.password_min_length
            )));
        }

        let password_hash = self.hash_off_thread(input.password).await?;

        let account = self
            .store
            .insert(NewAccount {
                username,
                email,
                password_hash,
            })
            .await?;

        info!(account_id = %account.id, username = %account.username, "Account registered");
        Ok(account.into())
    }

    /// Check credentials and issue a session token.
    ///
    /// An unknown email is `NotFound`, a wrong password `Unauthorized`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("Email and password are required"));
        }

        let account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found!"))?;

        let valid = self
            .verify_off_thread(password.to_string(), account.password_hash.clone())
            .await?;
        if !valid {
            warn!(account_id = %account.id, "Login rejected: wrong password");
            return Err(AppError::unauthorized("Wrong credentials!"));
        }

        let token = self.jwt_encoder.issue(&Identity::from(&account))?;

        info!(account_id = %account.id, "Login successful");
        Ok(LoginOutcome {
            token,
            profile: account.into(),
        })
    }

    /// End a session. Always succeeds.
    ///
    /// The presented token, if any, is only inspected for the log line; it
    /// stays valid until it expires.
    pub fn logout(&self, token: Option<&str>) {
        match token.map(|t| self.jwt_decoder.verify(t)) {
            Some(Ok(claims)) => info!(account_id = %claims.id, "Logout"),
            Some(Err(e)) => debug!(reason = %e, "Logout with unusable session token"),
            None => debug!("Logout without session token"),
        }
    }

    /// Return the claims of a valid session token.
    ///
    /// A missing, empty, tampered or expired token is `Unauthenticated`.
    pub fn refetch(&self, token: Option<&str>) -> Result<Claims, AppError> {
        let token = token.unwrap_or_default();

        self.jwt_decoder.verify(token).map_err(|e| {
            debug!(reason = %e, "Refetch refused");
            match e {
                TokenError::Expired => AppError::unauthenticated("Session has expired"),
                TokenError::Invalid => AppError::unauthenticated("Not authenticated"),
            }
        })
    }

    async fn hash_off_thread(&self, password: String) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
    }

    async fn verify_off_thread(&self, password: String, digest: String) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &digest))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
    }
}
