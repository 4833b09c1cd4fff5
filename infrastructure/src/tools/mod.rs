//! Built-in tools for the agent
//!
//! | Tool | Purpose | Backend |
//! |------|---------|---------|
//! | `get_exchange_rate` | Live currency rate | exchangerate-api style HTTP API |
//! | `verify_company_registry` | Company status lookup | Registry HTTP API, simulated offline fallback |
//! | `generate_rag_answer` | Document-grounded answer | [`DocumentRetriever`] + [`LlmGateway`] |
//!
//! Every tool is a [`ToolHandler`](finwise_domain::tool::ToolHandler)
//! registered in a [`ToolRegistry`], which is what the agent loop sees.

pub mod company_registry;
pub mod currency;
pub mod finance_rag;
pub mod retriever;

mod registry;

pub use company_registry::{CompanyRegistryTool, VERIFY_COMPANY_REGISTRY};
pub use currency::{ExchangeRateTool, GET_EXCHANGE_RATE};
pub use finance_rag::{FinanceRagTool, GENERATE_RAG_ANSWER};
pub use registry::ToolRegistry;
pub use retriever::{Document, InMemoryRetriever};

use finwise_application::ports::document_retriever::DocumentRetriever;
use finwise_application::ports::llm_gateway::LlmGateway;
use finwise_domain::tool::ToolExecutionError;
use std::sync::Arc;
use std::time::Duration;

/// Settings for `get_exchange_rate`.
#[derive(Debug, Clone)]
pub struct ExchangeRateSettings {
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Inline key, used before the environment variable
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for ExchangeRateSettings {
    fn default() -> Self {
        Self {
            base_url: "https://v6.exchangerate-api.com/v6".to_string(),
            api_key_env: "EXCHANGE_RATE_API_KEY".to_string(),
            api_key: None,
            timeout: Duration::from_secs(5),
        }
    }
}

/// Settings for `verify_company_registry`. No `api_url` means offline.
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    pub api_url: Option<String>,
    pub timeout: Duration,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RagSettings {
    pub k_chunks: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            k_chunks: finance_rag::DEFAULT_K_CHUNKS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ToolSettings {
    pub exchange_rate: ExchangeRateSettings,
    pub registry: RegistrySettings,
    pub rag: RagSettings,
}

/// Registry with every built-in tool.
pub fn default_registry(
    settings: &ToolSettings,
    gateway: Arc<dyn LlmGateway>,
    retriever: Arc<dyn DocumentRetriever>,
) -> Result<ToolRegistry, ToolExecutionError> {
    Ok(ToolRegistry::new()
        .register(ExchangeRateTool::new(&settings.exchange_rate)?)
        .register(CompanyRegistryTool::new(&settings.registry)?)
        .register(FinanceRagTool::new(retriever, gateway).with_k(settings.rag.k_chunks)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use finwise_application::ports::llm_gateway::GatewayError;
    use finwise_application::ports::tool_executor::ToolExecutorPort;
    use finwise_domain::{ArgumentValidator, LlmResponse, ToolDefinition};
    use std::collections::HashMap;

    struct NullGateway;

    #[async_trait]
    impl LlmGateway for NullGateway {
        async fn generate(
            &self,
            _prompt: &str,
            _tools: Option<&[ToolDefinition]>,
        ) -> Result<LlmResponse, GatewayError> {
            Ok(LlmResponse::default())
        }
    }

    fn registry() -> ToolRegistry {
        default_registry(
            &ToolSettings::default(),
            Arc::new(NullGateway),
            Arc::new(InMemoryRetriever::seeded()),
        )
        .unwrap()
    }

    #[test]
    fn test_default_registry_tools() {
        assert_eq!(
            registry().tool_names(),
            vec![GENERATE_RAG_ANSWER, GET_EXCHANGE_RATE, VERIFY_COMPANY_REGISTRY]
        );
    }

    #[test]
    fn test_default_schemas_normalize_arguments() {
        let validator = ArgumentValidator::from_spec(registry().tool_spec());

        let args = HashMap::from([
            ("source_currency".to_string(), serde_json::json!("usd")),
            ("target_currency".to_string(), serde_json::json!(" ngn ")),
        ]);
        let normalized = validator.validate(GET_EXCHANGE_RATE, &args).unwrap();
        assert_eq!(normalized.get_str("source_currency"), Some("USD"));
        assert_eq!(normalized.get_str("target_currency"), Some("NGN"));

        let args = HashMap::from([("company_name".to_string(), serde_json::json!("  Tesla  "))]);
        let normalized = validator.validate(VERIFY_COMPANY_REGISTRY, &args).unwrap();
        assert_eq!(normalized.get_str("company_name"), Some("Tesla"));
    }
}
