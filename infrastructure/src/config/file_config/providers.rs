//! Provider configuration from TOML (`[provider]` section)

use super::ConfigValidationError;
use finwise_domain::{GeminiProviderConfig, GroqProviderConfig, ProviderConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Groq settings (`[provider.groq]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGroqConfig {
    /// Environment variable name for the API key (default: "GROQ_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Tried when the model is decommissioned.
    pub fallback_models: Vec<String>,
    /// Tried, with backoff, when rate-limited.
    pub rate_limit_fallback_models: Vec<String>,
    pub temperature: f32,
}

impl Default for FileGroqConfig {
    fn default() -> Self {
        let d = GroqProviderConfig::default();
        Self {
            api_key_env: d.api_key_env,
            api_key: d.api_key,
            base_url: d.base_url,
            model: d.model,
            fallback_models: d.fallback_models,
            rate_limit_fallback_models: d.rate_limit_fallback_models,
            temperature: d.temperature,
        }
    }
}

/// Gemini settings (`[provider.gemini]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// Environment variable name for the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub fallback_models: Vec<String>,
    pub rate_limit_fallback_models: Vec<String>,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        let d = GeminiProviderConfig::default();
        Self {
            api_key_env: d.api_key_env,
            api_key: d.api_key,
            base_url: d.base_url,
            model: d.model,
            fallback_models: d.fallback_models,
            rate_limit_fallback_models: d.rate_limit_fallback_models,
        }
    }
}

/// Raw provider configuration from TOML
///
/// # Example
///
/// ```toml
/// [provider]
/// default = "gemini"
/// timeout_seconds = 30
/// backoff_millis = 500
///
/// [provider.gemini]
/// model = "gemini-2.5-pro"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Default provider: "groq" or "gemini".
    pub default: String,
    pub timeout_seconds: u64,
    /// Rate-limit backoff base, multiplied by the attempt index.
    pub backoff_millis: u64,
    pub groq: FileGroqConfig,
    pub gemini: FileGeminiConfig,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            default: ProviderKind::default().to_string(),
            timeout_seconds: ProviderConfig::DEFAULT_TIMEOUT.as_secs(),
            backoff_millis: ProviderConfig::DEFAULT_BACKOFF_BASE.as_millis() as u64,
            groq: FileGroqConfig::default(),
            gemini: FileGeminiConfig::default(),
        }
    }
}

impl FileProviderConfig {
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if let Err(e) = self.default.parse::<ProviderKind>() {
            issues.push(ConfigValidationError::UnknownProvider(e.to_string()));
        }
        if self.timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout {
                field: "provider.timeout_seconds",
            });
        }
        if self.groq.model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName {
                field: "provider.groq.model",
            });
        }
        if self.gemini.model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName {
                field: "provider.gemini.model",
            });
        }

        let fallback_lists = [
            ("provider.groq.fallback_models", &self.groq.fallback_models),
            (
                "provider.groq.rate_limit_fallback_models",
                &self.groq.rate_limit_fallback_models,
            ),
            ("provider.gemini.fallback_models", &self.gemini.fallback_models),
            (
                "provider.gemini.rate_limit_fallback_models",
                &self.gemini.rate_limit_fallback_models,
            ),
        ];
        for (field, models) in fallback_lists {
            if models.iter().any(|m| m.trim().is_empty()) {
                issues.push(ConfigValidationError::EmptyModelName { field });
            }
        }

        issues
    }

    /// Convert to the domain provider config. An unparseable `default`
    /// falls back to Groq; [`validate`](Self::validate) reports it.
    pub fn to_provider_config(&self) -> ProviderConfig {
        let kind = self.default.parse().unwrap_or_default();
        ProviderConfig {
            default: kind,
            timeout: Duration::from_secs(self.timeout_seconds),
            backoff_base: Duration::from_millis(self.backoff_millis),
            groq: GroqProviderConfig {
                api_key_env: self.groq.api_key_env.clone(),
                api_key: self.groq.api_key.clone(),
                base_url: self.groq.base_url.clone(),
                model: self.groq.model.clone(),
                fallback_models: self.groq.fallback_models.clone(),
                rate_limit_fallback_models: self.groq.rate_limit_fallback_models.clone(),
                temperature: self.groq.temperature,
            },
            gemini: GeminiProviderConfig {
                api_key_env: self.gemini.api_key_env.clone(),
                api_key: self.gemini.api_key.clone(),
                base_url: self.gemini.base_url.clone(),
                model: self.gemini.model.clone(),
                fallback_models: self.gemini.fallback_models.clone(),
                rate_limit_fallback_models: self.gemini.rate_limit_fallback_models.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_domain() {
        let config = FileProviderConfig::default().to_provider_config();
        assert_eq!(config.default, ProviderKind::Groq);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.backoff_base, Duration::from_millis(500));
        assert_eq!(config.groq.model, "llama-3.3-70b-versatile");
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(
            config.groq.rate_limit_fallback_models,
            vec!["llama-3.1-8b-instant", "llama-3.3-70b-versatile", "groq-1.0"]
        );
    }

    #[test]
    fn test_validate_reports_each_problem() {
        let mut config = FileProviderConfig {
            default: "openai".to_string(),
            timeout_seconds: 0,
            ..Default::default()
        };
        config.gemini.model = " ".to_string();
        config.groq.fallback_models = vec!["".to_string()];

        let issues = config.validate();
        assert_eq!(issues.len(), 4);
        assert!(matches!(issues[0], ConfigValidationError::UnknownProvider(_)));
    }

    #[test]
    fn test_google_alias() {
        let config = FileProviderConfig {
            default: "google".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_empty());
        assert_eq!(config.to_provider_config().default, ProviderKind::Gemini);
    }
}
