//! Provider configuration types (provider-neutral, serde-free).
//!
//! These types define the shape of provider settings without depending
//! on any serialization format (TOML, JSON, etc.).

use crate::core::error::DomainError;
use crate::core::model::Model;
use std::time::Duration;

/// LLM provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderKind {
    /// Groq (OpenAI-compatible chat completions)
    #[default]
    Groq,
    /// Google Gemini (generateContent)
    Gemini,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

/// Top-level provider configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider used for every LLM call.
    pub default: ProviderKind,
    /// Outbound request timeout.
    pub timeout: Duration,
    /// Base delay for rate-limit backoff (multiplied by the attempt index).
    pub backoff_base: Duration,
    /// Groq settings.
    pub groq: GroqProviderConfig,
    /// Gemini settings.
    pub gemini: GeminiProviderConfig,
}

impl ProviderConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(500);

    pub fn new(default: ProviderKind) -> Self {
        Self {
            default,
            timeout: Self::DEFAULT_TIMEOUT,
            backoff_base: Self::DEFAULT_BACKOFF_BASE,
            groq: GroqProviderConfig::default(),
            gemini: GeminiProviderConfig::default(),
        }
    }

    /// Model the default provider is configured to use.
    pub fn active_model(&self) -> &str {
        match self.default {
            ProviderKind::Groq => &self.groq.model,
            ProviderKind::Gemini => &self.gemini.model,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new(ProviderKind::default())
    }
}

/// Groq provider configuration.
#[derive(Debug, Clone)]
pub struct GroqProviderConfig {
    /// Environment variable name for the API key (default: "GROQ_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    pub model: String,
    /// Tried when the model is decommissioned or unknown.
    pub fallback_models: Vec<String>,
    /// Tried, with backoff, when the request is rate-limited.
    pub rate_limit_fallback_models: Vec<String>,
    pub temperature: f32,
}

impl Default for GroqProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GROQ_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: Model::default().to_string(),
            fallback_models: Vec::new(),
            rate_limit_fallback_models: Model::groq_rate_limit_fallbacks()
                .iter()
                .map(Model::to_string)
                .collect(),
            temperature: 0.7,
        }
    }
}

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiProviderConfig {
    /// Environment variable name for the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub fallback_models: Vec<String>,
    pub rate_limit_fallback_models: Vec<String>,
}

impl Default for GeminiProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: Model::Gemini25Flash.to_string(),
            fallback_models: Vec::new(),
            rate_limit_fallback_models: Vec::new(),
        }
    }
}
