//! Model fallback policy and the gateway that applies it.
//!
//! | Failure | Candidates | Delay before attempt `i` |
//! |---------|------------|--------------------------|
//! | `ModelUnavailable` | `unavailable_fallbacks` | none |
//! | `RateLimited`, `Timeout` | `rate_limit_fallbacks` | `backoff_base × (i + 1)` |
//! | anything else | none, error propagates | - |
//!
//! The model that just failed is never retried. When every candidate fails
//! the original error is returned.

use super::normalize::normalize;
use super::{ProviderCallError, ProviderClient};
use async_trait::async_trait;
use finwise_application::ports::llm_gateway::{GatewayError, LlmGateway};
use finwise_domain::{
    AgentPromptTemplate, LlmResponse, ProviderConfig, ProviderKind, ToolDefinition,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ModelFallbackPolicy {
    primary: String,
    unavailable_fallbacks: Vec<String>,
    rate_limit_fallbacks: Vec<String>,
    backoff_base: Duration,
}

impl ModelFallbackPolicy {
    /// The primary model is prepended to `unavailable_fallbacks` when missing;
    /// both lists are de-duplicated keeping first occurrence.
    pub fn new(
        primary: impl Into<String>,
        unavailable_fallbacks: Vec<String>,
        rate_limit_fallbacks: Vec<String>,
        backoff_base: Duration,
    ) -> Self {
        let primary = primary.into();
        let mut unavailable = Vec::with_capacity(unavailable_fallbacks.len() + 1);
        if !unavailable_fallbacks.contains(&primary) {
            unavailable.push(primary.clone());
        }
        unavailable.extend(unavailable_fallbacks);

        Self {
            primary,
            unavailable_fallbacks: dedup(unavailable),
            rate_limit_fallbacks: dedup(rate_limit_fallbacks),
            backoff_base,
        }
    }

    /// Policy for the configured default provider.
    pub fn for_provider(config: &ProviderConfig, model_override: Option<&str>) -> Self {
        let (model, unavailable, rate_limited) = match config.default {
            ProviderKind::Groq => (
                &config.groq.model,
                &config.groq.fallback_models,
                &config.groq.rate_limit_fallback_models,
            ),
            ProviderKind::Gemini => (
                &config.gemini.model,
                &config.gemini.fallback_models,
                &config.gemini.rate_limit_fallback_models,
            ),
        };
        let primary = model_override
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(model.as_str());

        Self::new(
            primary,
            unavailable.clone(),
            rate_limited.clone(),
            config.backoff_base,
        )
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn unavailable_fallbacks(&self) -> &[String] {
        &self.unavailable_fallbacks
    }

    pub fn rate_limit_fallbacks(&self) -> &[String] {
        &self.rate_limit_fallbacks
    }

    pub fn delay_for(&self, index: usize) -> Duration {
        self.backoff_base.saturating_mul(u32::try_from(index + 1).unwrap_or(u32::MAX))
    }

    /// Models to try, with the delay before each, after `failed_model` failed with `err`.
    pub fn candidates_for(
        &self,
        err: &ProviderCallError,
        failed_model: &str,
    ) -> Vec<(String, Duration)> {
        match err {
            ProviderCallError::ModelUnavailable(_) => self
                .unavailable_fallbacks
                .iter()
                .filter(|m| m.as_str() != failed_model)
                .map(|m| (m.clone(), Duration::ZERO))
                .collect(),
            ProviderCallError::RateLimited(_) | ProviderCallError::Timeout(_) => self
                .rate_limit_fallbacks
                .iter()
                .filter(|m| m.as_str() != failed_model)
                .enumerate()
                .map(|(i, m)| (m.clone(), self.delay_for(i)))
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn dedup(models: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(models.len());
    for model in models {
        if !model.trim().is_empty() && !seen.contains(&model) {
            seen.push(model);
        }
    }
    seen
}

/// [`LlmGateway`] over one provider client, applying a [`ModelFallbackPolicy`].
pub struct FallbackGateway {
    client: Arc<dyn ProviderClient>,
    policy: ModelFallbackPolicy,
}

impl FallbackGateway {
    pub fn new(client: Arc<dyn ProviderClient>, policy: ModelFallbackPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> &ModelFallbackPolicy {
        &self.policy
    }

    pub fn provider(&self) -> ProviderKind {
        self.client.kind()
    }
}

#[async_trait]
impl LlmGateway for FallbackGateway {
    async fn generate(
        &self,
        prompt: &str,
        tools: Option<&[ToolDefinition]>,
    ) -> Result<LlmResponse, GatewayError> {
        let tools = tools.filter(|t| !t.is_empty());
        let prompt = match tools {
            Some(defs) => AgentPromptTemplate::decision(prompt, defs),
            None => prompt.to_string(),
        };

        let primary = self.policy.primary();
        debug!(provider = %self.client.kind(), model = %primary, "Calling LLM");

        let original = match self.client.complete(primary, &prompt, tools).await {
            Ok(raw) => return Ok(normalize(raw, tools.is_some()).with_model(primary)),
            Err(e) => e,
        };

        let candidates = self.policy.candidates_for(&original, primary);
        if candidates.is_empty() {
            warn!(model = %primary, error = %original, "LLM call failed, no fallback applies");
            return Err(original.into());
        }

        warn!(
            model = %primary,
            error = %original,
            candidates = candidates.len(),
            "LLM call failed, trying fallback models"
        );

        for (model, delay) in candidates {
            if !delay.is_zero() {
                debug!(model = %model, delay_ms = delay.as_millis() as u64, "Backing off");
                tokio::time::sleep(delay).await;
            }
            match self.client.complete(&model, &prompt, tools).await {
                Ok(raw) => {
                    info!(model = %model, "Fallback model succeeded");
                    return Ok(normalize(raw, tools.is_some()).with_model(model));
                }
                Err(e) => warn!(model = %model, error = %e, "Fallback model failed"),
            }
        }

        Err(original.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::normalize::RawProviderOutput;
    use finwise_domain::ToolParameter;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted results and records `(model, prompt, tools_passed)`.
    struct ScriptedClient {
        script: Mutex<VecDeque<Result<RawProviderOutput, ProviderCallError>>>,
        calls: Mutex<Vec<(String, String, bool)>>,
    }

    impl ScriptedClient {
        fn new(script: Vec<Result<RawProviderOutput, ProviderCallError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn models(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|c| c.0.clone()).collect()
        }
    }

    #[async_trait]
    impl ProviderClient for ScriptedClient {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Groq
        }

        async fn complete(
            &self,
            model: &str,
            prompt: &str,
            tools: Option<&[ToolDefinition]>,
        ) -> Result<RawProviderOutput, ProviderCallError> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.to_string(), tools.is_some()));
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(ProviderCallError::InvalidResponse("script exhausted".into()))
                })
        }
    }

    fn policy() -> ModelFallbackPolicy {
        ModelFallbackPolicy::new(
            "primary",
            vec!["backup".to_string()],
            vec!["light-a".to_string(), "primary".to_string(), "light-b".to_string()],
            Duration::ZERO,
        )
    }

    fn rate_limited() -> Result<RawProviderOutput, ProviderCallError> {
        Err(ProviderCallError::RateLimited("429".into()))
    }

    fn tool_defs() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new("verify_company_registry", "Look up a company")
                .with_parameter(ToolParameter::new("company_name", "Company", true)),
        ]
    }

    #[test]
    fn test_policy_prepends_primary_and_dedups() {
        let p = ModelFallbackPolicy::new(
            "m1",
            vec!["m2".into(), "m2".into(), "".into()],
            vec!["r1".into(), "r1".into()],
            Duration::from_millis(500),
        );
        assert_eq!(p.unavailable_fallbacks(), ["m1", "m2"]);
        assert_eq!(p.rate_limit_fallbacks(), ["r1"]);

        let p = ModelFallbackPolicy::new(
            "m2",
            vec!["m1".into(), "m2".into()],
            vec![],
            Duration::ZERO,
        );
        assert_eq!(p.unavailable_fallbacks(), ["m1", "m2"]);
    }

    #[test]
    fn test_backoff_grows_with_index() {
        let p = ModelFallbackPolicy::new("m", vec![], vec![], Duration::from_millis(500));
        assert_eq!(p.delay_for(0), Duration::from_millis(500));
        assert_eq!(p.delay_for(2), Duration::from_millis(1500));
    }

    #[test]
    fn test_candidates_by_error_kind() {
        let p = ModelFallbackPolicy::new(
            "primary",
            vec!["backup".into()],
            vec!["light-a".into(), "primary".into(), "light-b".into()],
            Duration::from_millis(100),
        );

        assert_eq!(
            p.candidates_for(&ProviderCallError::ModelUnavailable("x".into()), "primary"),
            vec![("backup".to_string(), Duration::ZERO)]
        );
        assert_eq!(
            p.candidates_for(&ProviderCallError::Timeout("x".into()), "primary"),
            vec![
                ("light-a".to_string(), Duration::from_millis(100)),
                ("light-b".to_string(), Duration::from_millis(200)),
            ]
        );
        assert!(
            p.candidates_for(&ProviderCallError::MissingApiKey("K".into()), "primary")
                .is_empty()
        );
    }

    #[test]
    fn test_for_provider_uses_override() {
        let config = ProviderConfig::default();
        let p = ModelFallbackPolicy::for_provider(&config, Some("llama-3.1-8b-instant"));
        assert_eq!(p.primary(), "llama-3.1-8b-instant");

        let p = ModelFallbackPolicy::for_provider(&config, Some("  "));
        assert_eq!(p.primary(), config.groq.model);
    }

    #[tokio::test]
    async fn test_primary_success_records_model() {
        let client = ScriptedClient::new(vec![Ok(RawProviderOutput::text("hello"))]);
        let gateway = FallbackGateway::new(client.clone(), policy());

        let response = gateway.generate("hi", None).await.unwrap();
        assert_eq!(response.text, "hello");
        assert_eq!(response.model.as_deref(), Some("primary"));
        assert_eq!(client.models(), vec!["primary"]);
    }

    #[tokio::test]
    async fn test_decommissioned_model_falls_back_once() {
        let client = ScriptedClient::new(vec![
            Err(ProviderCallError::ModelUnavailable("decommissioned".into())),
            Ok(RawProviderOutput::text("from backup")),
        ]);
        let gateway = FallbackGateway::new(client.clone(), policy());

        let response = gateway.generate("hi", None).await.unwrap();
        assert_eq!(response.model.as_deref(), Some("backup"));
        assert_eq!(client.models(), vec!["primary", "backup"]);

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls[0].1, calls[1].1, "fallback keeps the original prompt");
    }

    #[tokio::test]
    async fn test_rate_limit_walks_list_skipping_failed_model() {
        let client = ScriptedClient::new(vec![
            rate_limited(),
            rate_limited(),
            Ok(RawProviderOutput::text("ok")),
        ]);
        let gateway = FallbackGateway::new(client.clone(), policy());

        let response = gateway.generate("hi", None).await.unwrap();
        assert_eq!(response.model.as_deref(), Some("light-b"));
        assert_eq!(client.models(), vec!["primary", "light-a", "light-b"]);
    }

    #[tokio::test]
    async fn test_exhausted_fallbacks_return_original_error() {
        let client = ScriptedClient::new(vec![
            rate_limited(),
            Err(ProviderCallError::Failed {
                status: Some(500),
                message: "boom".into(),
            }),
            rate_limited(),
        ]);
        let gateway = FallbackGateway::new(client.clone(), policy());

        let err = gateway.generate("hi", None).await.unwrap_err();
        assert_eq!(err, GatewayError::RateLimited("429".into()));
        assert_eq!(client.models().len(), 3);
    }

    #[tokio::test]
    async fn test_non_transient_error_propagates_immediately() {
        let client = ScriptedClient::new(vec![Err(ProviderCallError::MissingApiKey(
            "GROQ_API_KEY".into(),
        ))]);
        let gateway = FallbackGateway::new(client.clone(), policy());

        let err = gateway.generate("hi", None).await.unwrap_err();
        assert!(matches!(err, GatewayError::Configuration(_)));
        assert_eq!(client.models(), vec!["primary"]);
    }

    #[tokio::test]
    async fn test_tools_augment_prompt_and_enable_embedded_detection() {
        let reply = r#"{"tool": "verify_company_registry", "args": {"company_name": "Tesla"}}"#;
        let client = ScriptedClient::new(vec![Ok(RawProviderOutput::text(reply))]);
        let gateway = FallbackGateway::new(client.clone(), policy());
        let defs = tool_defs();

        let response = gateway.generate("Is Tesla registered?", Some(&defs)).await.unwrap();
        assert_eq!(response.tool_names(), vec!["verify_company_registry"]);

        let calls = client.calls.lock().unwrap();
        assert!(calls[0].1.contains("verify_company_registry(company_name)"));
        assert!(calls[0].1.ends_with("Is Tesla registered?"));
        assert!(calls[0].2);
    }

    #[tokio::test]
    async fn test_plain_call_leaves_prompt_and_json_alone() {
        let reply = r#"{"tool": "verify_company_registry", "args": {}}"#;
        let client = ScriptedClient::new(vec![Ok(RawProviderOutput::text(reply))]);
        let gateway = FallbackGateway::new(client.clone(), policy());

        let response = gateway.generate("summarize", None).await.unwrap();
        assert!(!response.has_tool_calls());
        assert_eq!(client.calls.lock().unwrap()[0].1, "summarize");
        assert!(!client.calls.lock().unwrap()[0].2);
    }
}
