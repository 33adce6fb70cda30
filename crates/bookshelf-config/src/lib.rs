//! # Bookshelf Config
//!
//! Configuration types for the Bookshelf API.
//!
//! Every setting is read once at startup into an immutable struct which is
//! then handed to the components that need it. Nothing reads the process
//! environment after [`AppConfig::from_env`] returns.
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`server`]: listen address and public base URL
//! - [`database`]: storage connection string and pool size
//! - [`cors`]: CORS allowed origins
//! - [`storage`]: avatar upload directory and size cap
//! - [`observability`]: log directory, metrics and OTLP export
//!
//! Each struct also has a `from_lookup` constructor that takes a key lookup
//! function instead of the environment, which is what tests use.
//!
//! # Example
//!
//! ```ignore
//! use bookshelf_config::AppConfig;
//!
//! dotenvy::dotenv().ok();
//! let config = AppConfig::from_env()?; // fails without JWT_SECRET
//! ```

pub mod cors;
pub mod database;
pub mod error;
pub mod jwt;
pub mod observability;
pub mod server;
pub mod storage;

use std::str::FromStr;

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use jwt::JwtConfig;
pub use observability::ObservabilityConfig;
pub use server::ServerConfig;
pub use storage::StorageConfig;

/// Reads one key; `None` when unset.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Reads `key`, treating blank values as unset.
pub(crate) fn read(lookup: Lookup<'_>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parses `key` when present, falling back to `default` when unset.
pub(crate) fn parse_or<T: FromStr>(
    lookup: Lookup<'_>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match read(lookup, key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

/// All configuration the server needs.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub jwt: JwtConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let server = ServerConfig::from_lookup(lookup)?;

        Ok(Self {
            jwt: JwtConfig::from_lookup(lookup)?,
            database: DatabaseConfig::from_lookup(lookup)?,
            cors: CorsConfig::from_lookup(lookup),
            storage: StorageConfig::from_lookup(lookup, &server)?,
            observability: ObservabilityConfig::from_lookup(lookup)?,
            server,
        })
    }
}
