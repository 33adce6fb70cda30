use crate::{ConfigError, Lookup, env_lookup, parse_or, read};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Absolute base URL clients reach the API at, used for pagination links.
    pub public_url: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let host = read(lookup, "HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or(lookup, "PORT", 3000u16)?;
        let public_url = read(lookup, "PUBLIC_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://{}:{}", host, port));

        Ok(Self {
            host,
            port,
            public_url,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lookup_from;

    #[test]
    fn test_public_url_follows_host_and_port() {
        let lookup = lookup_from(&[("HOST", "0.0.0.0"), ("PORT", "8080")]);

        let config = ServerConfig::from_lookup(&lookup).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.public_url, "http://0.0.0.0:8080");
    }

    #[test]
    fn test_explicit_public_url_drops_trailing_slash() {
        let lookup = lookup_from(&[("PUBLIC_URL", "https://books.example.com/")]);

        let config = ServerConfig::from_lookup(&lookup).unwrap();

        assert_eq!(config.public_url, "https://books.example.com");
    }
}
