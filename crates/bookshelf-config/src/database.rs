use crate::{ConfigError, Lookup, env_lookup, parse_or, read};

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/bookshelf";

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            url: read(lookup, "DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            max_connections: parse_or(lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
        })
    }
}
