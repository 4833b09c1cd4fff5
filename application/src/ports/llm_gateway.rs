//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.
//!
//! The gateway hides every provider difference from the agent loop: the
//! prompt format for tool use, how tool-call intent comes back, and which
//! fallback models are tried when the configured one is unavailable or
//! rate-limited. Errors returned here have already exhausted that policy.

use async_trait::async_trait;
use finwise_domain::{LlmResponse, ToolDefinition};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Model not available: {0}")]
    ModelUnavailable(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl GatewayError {
    /// Rate limits and timeouts may succeed on a lighter model.
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::RateLimited(_) | GatewayError::Timeout(_))
    }

    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, GatewayError::ModelUnavailable(_))
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send a prompt and return the normalized response.
    ///
    /// When `tools` is `Some`, the provider is told which tools exist and how
    /// to request one, and the response is scanned for tool-call intent.
    /// When `None`, the response is treated as plain text.
    async fn generate(
        &self,
        prompt: &str,
        tools: Option<&[ToolDefinition]>,
    ) -> Result<LlmResponse, GatewayError>;
}
