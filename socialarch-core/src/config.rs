//! Deployment configuration loaded from TOML.
//!
//! Credentials are never read from the file; only the name of the environment
//! variable holding the API key is configurable.

use crate::error::{ConfigError, CoreError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Variable the hosted deployment historically used for the key.
pub const LEGACY_API_KEY_ENV: &str = "API_KEY";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub storage: StorageConfig,
    pub monitor: MonitorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: 60,
        }
    }
}

impl GeminiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reads the key from `api_key_env`, then from [`LEGACY_API_KEY_ENV`].
    pub fn api_key(&self) -> Result<String, ConfigError> {
        [self.api_key_env.as_str(), LEGACY_API_KEY_ENV]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvironmentVariable {
                var_name: self.api_key_env.clone(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://social-arch.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub interval_minutes: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 5,
        }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }
}

impl AppConfig {
    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    }
                    .into());
                }
                info!("Loading configuration from {}", path.display());
                let raw = std::fs::read_to_string(path)?;
                Self::from_toml(&raw)?
            }
            None => {
                debug!("No configuration file given, using defaults");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gemini.model.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "gemini.model".to_string(),
            });
        }
        if self.gemini.api_key_env.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "gemini.api_key_env".to_string(),
            });
        }
        if url::Url::parse(&self.gemini.base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "gemini.base_url".to_string(),
                value: self.gemini.base_url.clone(),
            });
        }
        if self.gemini.timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "gemini.timeout_secs must be greater than zero".to_string(),
            });
        }
        if self.monitor.interval_minutes == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "monitor.interval_minutes must be greater than zero".to_string(),
            });
        }
        if self.storage.database_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "storage.database_url".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gemini.model, DEFAULT_MODEL);
        assert_eq!(config.monitor.interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_huge_monitor_interval_saturates() {
        let monitor = MonitorConfig {
            interval_minutes: u64::MAX,
        };
        assert_eq!(monitor.interval(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [gemini]
            model = "gemini-2.5-pro"
            timeout_secs = 15

            [monitor]
            interval_minutes = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.gemini.timeout(), Duration::from_secs(15));
        assert_eq!(config.gemini.base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.monitor.interval_minutes, 10);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = AppConfig::default();
        config.gemini.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed { .. })
        ));

        let mut config = AppConfig::default();
        config.gemini.base_url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = AppConfig::from_toml("[gemini\nmodel = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_reported() {
        let result = AppConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(
            result,
            Err(CoreError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_missing_api_key_names_variable() {
        let gemini = GeminiConfig {
            api_key_env: "SOCIAL_ARCH_TEST_UNSET_KEY".to_string(),
            ..GeminiConfig::default()
        };
        if std::env::var(LEGACY_API_KEY_ENV).is_err() {
            match gemini.api_key() {
                Err(ConfigError::MissingEnvironmentVariable { var_name }) => {
                    assert_eq!(var_name, "SOCIAL_ARCH_TEST_UNSET_KEY");
                }
                other => panic!("Expected missing variable error, got {:?}", other),
            }
        }
    }
}
