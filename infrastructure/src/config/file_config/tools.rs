//! Tool configuration from TOML (`[tools]` section)
//!
//! # Example
//!
//! ```toml
//! [tools.exchange_rate]
//! base_url = "https://v6.exchangerate-api.com/v6"
//! api_key_env = "EXCHANGE_RATE_API_KEY"
//! timeout_seconds = 5
//!
//! [tools.registry]
//! api_url = "https://registry.example.com"   # empty = offline simulated registry
//!
//! [tools.rag]
//! k_chunks = 5
//! ```

use super::ConfigValidationError;
use crate::tools::{ExchangeRateSettings, RagSettings, RegistrySettings, ToolSettings};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExchangeRateConfig {
    pub base_url: String,
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for FileExchangeRateConfig {
    fn default() -> Self {
        let d = ExchangeRateSettings::default();
        Self {
            base_url: d.base_url,
            api_key_env: d.api_key_env,
            api_key: d.api_key,
            timeout_seconds: d.timeout.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRegistryConfig {
    /// Registry API base URL; empty means offline.
    pub api_url: String,
    pub timeout_seconds: u64,
}

impl Default for FileRegistryConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            timeout_seconds: RegistrySettings::default().timeout.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRagConfig {
    pub k_chunks: usize,
}

impl Default for FileRagConfig {
    fn default() -> Self {
        Self {
            k_chunks: RagSettings::default().k_chunks,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    pub exchange_rate: FileExchangeRateConfig,
    pub registry: FileRegistryConfig,
    pub rag: FileRagConfig,
}

impl FileToolsConfig {
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        if self.exchange_rate.timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout {
                field: "tools.exchange_rate.timeout_seconds",
            });
        }
        if self.registry.timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout {
                field: "tools.registry.timeout_seconds",
            });
        }
        if self.rag.k_chunks == 0 {
            issues.push(ConfigValidationError::InvalidChunkCount);
        }
        issues
    }

    pub fn to_tool_settings(&self) -> ToolSettings {
        let api_url = self.registry.api_url.trim();
        ToolSettings {
            exchange_rate: ExchangeRateSettings {
                base_url: self.exchange_rate.base_url.clone(),
                api_key_env: self.exchange_rate.api_key_env.clone(),
                api_key: self.exchange_rate.api_key.clone(),
                timeout: Duration::from_secs(self.exchange_rate.timeout_seconds),
            },
            registry: RegistrySettings {
                api_url: (!api_url.is_empty()).then(|| api_url.to_string()),
                timeout: Duration::from_secs(self.registry.timeout_seconds),
            },
            rag: RagSettings {
                k_chunks: self.rag.k_chunks,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_url_is_offline() {
        let settings = FileToolsConfig::default().to_tool_settings();
        assert!(settings.registry.api_url.is_none());
        assert_eq!(settings.exchange_rate.timeout, Duration::from_secs(5));
        assert_eq!(settings.rag.k_chunks, 5);
    }

    #[test]
    fn test_registry_url_passed_through() {
        let mut config = FileToolsConfig::default();
        config.registry.api_url = " https://registry.example.com ".to_string();
        assert_eq!(
            config.to_tool_settings().registry.api_url.as_deref(),
            Some("https://registry.example.com")
        );
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut config = FileToolsConfig::default();
        config.exchange_rate.timeout_seconds = 0;
        config.rag.k_chunks = 0;
        assert_eq!(config.validate().len(), 2);
    }
}
