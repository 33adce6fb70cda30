use std::path::PathBuf;

use crate::{ConfigError, Lookup, ServerConfig, parse_or, read};

/// Route prefix the avatar directory is served under.
pub const AVATAR_ROUTE: &str = "/avatars";

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    /// Base URL stored avatars are reachable at.
    pub public_url: String,
    pub max_avatar_bytes: usize,
}

impl StorageConfig {
    pub fn from_lookup(lookup: Lookup<'_>, server: &ServerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            upload_dir: read(lookup, "UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("storage/avatars")),
            public_url: format!("{}{}", server.public_url, AVATAR_ROUTE),
            max_avatar_bytes: parse_or(lookup, "MAX_AVATAR_BYTES", 5 * 1024 * 1024)?,
        })
    }
}
