//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Placeholder secret shipped in the defaults. The server warns when it is
/// still in use.
pub const DEFAULT_JWT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Password hashing, session token and session cookie settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256).
    pub jwt_secret: String,
    /// Session token lifetime in hours.
    pub token_ttl_hours: u64,
    /// Name of the cookie carrying the session token.
    pub cookie_name: String,
    /// Mark the session cookie `Secure; SameSite=None` on issue.
    /// The removal cookie on logout always carries both attributes.
    pub cookie_secure: bool,
    /// Minimum password length accepted at registration.
    pub password_min_length: usize,
    /// Argon2 cost parameters.
    pub argon2: Argon2Config,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_hours: 72,
            cookie_name: "token".to_string(),
            cookie_secure: false,
            password_min_length: 1,
            argon2: Argon2Config::default(),
        }
    }
}

impl AuthConfig {
    /// Whether the signing secret is still the shipped placeholder.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

/// Argon2id work factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Argon2Config {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for Argon2Config {
    // OWASP baseline for Argon2id.
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}
