use crate::{ConfigError, Lookup, env_lookup, parse_or, read};

#[derive(Clone, Debug)]
pub struct ObservabilityConfig {
    /// Prometheus exporter and request metrics.
    pub enabled: bool,
    pub metrics_port: u16,
    pub log_dir: String,
    /// OTLP collector; traces are only exported when this is set.
    pub otlp_endpoint: Option<String>,
    pub environment: String,
}

impl ObservabilityConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let enabled = read(lookup, "OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        Ok(Self {
            enabled,
            metrics_port: parse_or(lookup, "METRICS_PORT", 9090u16)?,
            log_dir: read(lookup, "LOG_DIR").unwrap_or_else(|| "storage/logs".to_string()),
            otlp_endpoint: read(lookup, "OTEL_EXPORTER_OTLP_ENDPOINT"),
            environment: read(lookup, "ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lookup_from;

    #[test]
    fn test_disabled_flag() {
        let lookup = lookup_from(&[("OBSERVABILITY_ENABLED", "0")]);

        let config = ObservabilityConfig::from_lookup(&lookup).unwrap();

        assert!(!config.enabled);
        assert!(config.otlp_endpoint.is_none());
    }
}
