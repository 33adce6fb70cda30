use crate::{ConfigError, Lookup, env_lookup, parse_or, read};

pub const DEFAULT_TOKEN_LIFETIME: i64 = 3600;
/// One year.
pub const MAX_TOKEN_LIFETIME: i64 = 365 * 24 * 3600;

/// Bearer token signing settings.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Seconds a token stays valid after it is issued.
    pub token_lifetime: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, token_lifetime: i64) -> Self {
        Self {
            secret: secret.into(),
            token_lifetime,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let secret = read(lookup, "JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_lifetime = parse_or(lookup, "TOKEN_LIFETIME", DEFAULT_TOKEN_LIFETIME)?;
        if !(1..=MAX_TOKEN_LIFETIME).contains(&token_lifetime) {
            return Err(ConfigError::Invalid {
                key: "TOKEN_LIFETIME",
                value: token_lifetime.to_string(),
            });
        }

        Ok(Self {
            secret,
            token_lifetime,
        })
    }
}

// The secret must never end up in logs.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_lifetime", &self.token_lifetime)
            .finish()
    }
}
