//! Observability configuration parsing from environment variables.
//!
//! This module handles the log filter and output format.

/// Observability environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ObservabilityEnvConfig {
    pub log_level: String,
    pub pretty: bool,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            pretty: false,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            log_level: lookup("LOG_LEVEL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "info".to_string()),
            pretty: lookup("LOG_PRETTY")
                .unwrap_or_else(|| "false".to_string())
                .parse::<bool>()
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observability_config_defaults() {
        let config = ObservabilityEnvConfig::from_lookup(|_| None);
        assert_eq!(config.log_level, "info");
        assert!(!config.pretty);
    }

    #[test]
    fn test_observability_config_invalid_bool_falls_back() {
        let config = ObservabilityEnvConfig::from_lookup(|key| match key {
            "LOG_LEVEL" => Some("debug".to_string()),
            "LOG_PRETTY" => Some("yes please".to_string()),
            _ => None,
        });
        assert_eq!(config.log_level, "debug");
        assert!(!config.pretty);
    }
}
