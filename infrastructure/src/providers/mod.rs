//! LLM provider adapters.
//!
//! ```text
//! ProcessQueryUseCase ──▶ FallbackGateway (LlmGateway)
//!                              │  ModelFallbackPolicy
//!                              ▼
//!                       dyn ProviderClient ──▶ GroqClient | GeminiClient
//!                              │
//!                              ▼
//!                       RawProviderOutput ──normalize──▶ LlmResponse
//! ```
//!
//! Provider clients do one HTTP round trip per call and classify failures
//! into [`ProviderCallError`]. Retry and model substitution belong to the
//! [`fallback`] module.

pub mod fallback;
pub mod gemini;
pub mod groq;
pub mod normalize;

use async_trait::async_trait;
use finwise_application::ports::llm_gateway::GatewayError;
use finwise_domain::{ProviderConfig, ProviderKind, ToolDefinition};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

pub use fallback::{FallbackGateway, ModelFallbackPolicy};
pub use gemini::GeminiClient;
pub use groq::GroqClient;
pub use normalize::{RawProviderOutput, RawToolCall, extract_json_snippet, normalize};

/// Classified failure of a single provider request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderCallError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("no API key configured (set {0})")]
    MissingApiKey(String),

    #[error(
        "request failed{}: {message}",
        .status.map(|s| format!(" with HTTP {}", s)).unwrap_or_default()
    )]
    Failed {
        status: Option<u16>,
        message: String,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<ProviderCallError> for GatewayError {
    fn from(err: ProviderCallError) -> Self {
        match err {
            ProviderCallError::RateLimited(m) => GatewayError::RateLimited(m),
            ProviderCallError::ModelUnavailable(m) => GatewayError::ModelUnavailable(m),
            ProviderCallError::Timeout(m) => GatewayError::Timeout(m),
            ProviderCallError::MissingApiKey(env) => {
                GatewayError::Configuration(format!("no API key configured (set {})", env))
            }
            ProviderCallError::Failed {
                status: None,
                message,
            } => GatewayError::ConnectionError(message),
            ProviderCallError::Failed {
                status: Some(status),
                message,
            } => GatewayError::RequestFailed(format!("HTTP {}: {}", status, message)),
            ProviderCallError::InvalidResponse(m) => GatewayError::InvalidResponse(m),
        }
    }
}

/// One HTTP round trip to an LLM provider.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Send `prompt` to `model`. `tools` is passed through for providers
    /// with native function calling.
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        tools: Option<&[ToolDefinition]>,
    ) -> Result<RawProviderOutput, ProviderCallError>;
}

/// Classify a provider error from its HTTP status, error code and message.
pub fn classify_error(status: Option<u16>, code: Option<&str>, message: &str) -> ProviderCallError {
    let lowered = message.to_ascii_lowercase();
    let code = code.unwrap_or_default();

    if status == Some(429)
        || code.eq_ignore_ascii_case("RESOURCE_EXHAUSTED")
        || code == "rate_limit_exceeded"
        || lowered.contains("rate_limit")
        || lowered.contains("rate limit")
    {
        return ProviderCallError::RateLimited(message.to_string());
    }

    if code == "model_decommissioned"
        || code == "model_not_found"
        || lowered.contains("decommission")
    {
        return ProviderCallError::ModelUnavailable(message.to_string());
    }

    ProviderCallError::Failed {
        status,
        message: message.to_string(),
    }
}

/// Pull `(code, message)` out of an `{"error": ...}` body.
///
/// OpenAI-style bodies carry a string `code`; Gemini carries a numeric
/// `code` and a string `status`, which is preferred.
pub fn error_details(body: &Value) -> Option<(Option<String>, String)> {
    let error = body.get("error")?;
    match error {
        Value::String(s) => Some((None, s.clone())),
        Value::Object(obj) => {
            let code = obj
                .get("status")
                .and_then(Value::as_str)
                .or_else(|| obj.get("code").and_then(Value::as_str))
                .map(str::to_string);
            let message = obj
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            Some((code, message))
        }
        Value::Null => None,
        other => Some((None, other.to_string())),
    }
}

/// Classify a non-success HTTP response from its status and raw body.
pub fn classify_http_failure(status: u16, body: &str) -> ProviderCallError {
    match serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(error_details)
    {
        Some((code, message)) => classify_error(Some(status), code.as_deref(), &message),
        None => classify_error(Some(status), None, body.trim()),
    }
}

/// Classify a transport-level failure.
pub fn classify_transport(err: &reqwest::Error) -> ProviderCallError {
    if err.is_timeout() {
        ProviderCallError::Timeout(err.to_string())
    } else {
        ProviderCallError::Failed {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Resolve an API key: inline value first, then the named environment variable.
pub fn resolve_api_key(inline: Option<&str>, env_name: &str) -> Option<String> {
    inline
        .filter(|k| !k.trim().is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(env_name).ok().filter(|k| !k.trim().is_empty()))
}

/// Build the client for the configured default provider.
pub fn build_client(config: &ProviderConfig) -> Result<Arc<dyn ProviderClient>, GatewayError> {
    let client: Arc<dyn ProviderClient> = match config.default {
        ProviderKind::Groq => Arc::new(GroqClient::new(&config.groq, config.timeout)?),
        ProviderKind::Gemini => Arc::new(GeminiClient::new(&config.gemini, config.timeout)?),
    };
    Ok(client)
}

/// Build the gateway the agent uses: default provider behind its fallback policy.
///
/// `model_override` replaces the configured primary model.
pub fn build_gateway(
    config: &ProviderConfig,
    model_override: Option<&str>,
) -> Result<FallbackGateway, GatewayError> {
    let client = build_client(config)?;
    let policy = ModelFallbackPolicy::for_provider(config, model_override);
    Ok(FallbackGateway::new(client, policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_rate_limits() {
        assert!(matches!(
            classify_error(Some(429), None, "slow down"),
            ProviderCallError::RateLimited(_)
        ));
        assert!(matches!(
            classify_error(Some(400), Some("RESOURCE_EXHAUSTED"), "quota"),
            ProviderCallError::RateLimited(_)
        ));
        assert!(matches!(
            classify_error(None, None, "Rate_limit reached for model"),
            ProviderCallError::RateLimited(_)
        ));
    }

    #[test]
    fn test_classify_decommissioned() {
        assert!(matches!(
            classify_error(Some(400), Some("model_decommissioned"), "gone"),
            ProviderCallError::ModelUnavailable(_)
        ));
        assert!(matches!(
            classify_error(
                Some(400),
                None,
                "The model `llama3-70b-8192` has been decommissioned"
            ),
            ProviderCallError::ModelUnavailable(_)
        ));
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(
            classify_error(Some(500), None, "boom"),
            ProviderCallError::Failed {
                status: Some(500),
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_error_details_shapes() {
        let groq = json!({
            "error": {"message": "Rate limit reached", "code": "rate_limit_exceeded"}
        });
        assert_eq!(
            error_details(&groq),
            Some((
                Some("rate_limit_exceeded".to_string()),
                "Rate limit reached".to_string()
            ))
        );

        let gemini = json!({
            "error": {"code": 429, "message": "Quota", "status": "RESOURCE_EXHAUSTED"}
        });
        assert_eq!(
            error_details(&gemini),
            Some((Some("RESOURCE_EXHAUSTED".to_string()), "Quota".to_string()))
        );

        assert!(error_details(&json!({"choices": []})).is_none());
    }

    #[test]
    fn test_classify_http_failure() {
        let body = r#"{"error": {"message": "model gone", "code": "model_decommissioned"}}"#;
        assert!(matches!(
            classify_http_failure(400, body),
            ProviderCallError::ModelUnavailable(_)
        ));
        assert!(matches!(
            classify_http_failure(502, "<html>Bad Gateway</html>"),
            ProviderCallError::Failed { status: Some(502), .. }
        ));
    }

    #[test]
    fn test_gateway_error_mapping() {
        assert_eq!(
            GatewayError::from(ProviderCallError::MissingApiKey("GROQ_API_KEY".into())),
            GatewayError::Configuration("no API key configured (set GROQ_API_KEY)".into())
        );
        assert!(matches!(
            GatewayError::from(ProviderCallError::Failed {
                status: None,
                message: "dns".into()
            }),
            GatewayError::ConnectionError(_)
        ));
        assert_eq!(
            ProviderCallError::Failed {
                status: Some(503),
                message: "down".into()
            }
            .to_string(),
            "request failed with HTTP 503: down"
        );
    }

    #[test]
    fn test_resolve_api_key_prefers_inline() {
        assert_eq!(
            resolve_api_key(Some("inline-key"), "FINWISE_TEST_UNSET_KEY_VAR"),
            Some("inline-key".to_string())
        );
        assert_eq!(resolve_api_key(Some("  "), "FINWISE_TEST_UNSET_KEY_VAR"), None);
    }
}
