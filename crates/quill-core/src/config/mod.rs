//! Application configuration schemas.
//!
//! Settings are layered with the `config` crate: `config/default.toml`,
//! then `config/{env}.toml`, then `QUILL__`-prefixed environment variables.
//! Every field carries a serde default, so an empty environment still
//! produces a runnable (development) configuration.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{Argon2Config, AuthConfig};
pub use self::database::{DatabaseConfig, StoreProvider};
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::storage::{CloudConfig, StorageConfig};

use crate::error::AppError;

/// Prefix for environment variable overrides (`QUILL__AUTH__JWT_SECRET`).
pub const ENV_PREFIX: &str = "QUILL";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Account store settings.
    pub database: DatabaseConfig,
    /// Password hashing and session token settings.
    pub auth: AuthConfig,
    /// Image storage settings.
    pub storage: StorageConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Missing files are not an error; only malformed files or values that
    /// fail to deserialize are.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Like [`AppConfig::load`] but reads the TOML files from `dir`.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
