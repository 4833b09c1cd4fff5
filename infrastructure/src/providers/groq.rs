//! Groq client (OpenAI-compatible chat completions).
//!
//! Tool intent is expected either as native `tool_calls` or as a JSON object
//! embedded in the reply text; the prompt carries the tool listing, so no
//! `tools` field is sent.

use super::normalize::{RawProviderOutput, RawToolCall};
use super::{
    ProviderCallError, ProviderClient, classify_error, classify_http_failure, classify_transport,
    error_details, resolve_api_key,
};
use async_trait::async_trait;
use finwise_domain::{GroqProviderConfig, Model, ProviderKind, ToolDefinition};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

pub struct GroqClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_key_env: String,
    base_url: String,
    default_model: String,
    temperature: f32,
}

impl GroqClient {
    pub fn new(config: &GroqProviderConfig, timeout: Duration) -> Result<Self, ProviderCallError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderCallError::Failed {
                status: None,
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            api_key: resolve_api_key(config.api_key.as_deref(), &config.api_key_env),
            api_key_env: config.api_key_env.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Gemini model ids are meaningless to Groq; swap in the configured model.
    fn effective_model<'a>(&'a self, requested: &'a str) -> &'a str {
        if Model::from(requested).is_gemini() {
            warn!(
                requested = %requested,
                model = %self.default_model,
                "Gemini model requested from Groq, using configured Groq model"
            );
            &self.default_model
        } else {
            requested
        }
    }
}

pub(crate) fn build_request_body(model: &str, prompt: &str, temperature: f32) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": prompt}],
        "temperature": temperature,
    })
}

/// Parse a chat-completions body.
///
/// Text lookup order: `choices[0].message.content`, `choices[0].text`,
/// `output_text`, `output[0].content|text`.
pub(crate) fn parse_response(body: &Value) -> Result<RawProviderOutput, ProviderCallError> {
    if let Some((code, message)) = error_details(body) {
        return Err(classify_error(None, code.as_deref(), &message));
    }

    let choice = body.get("choices").and_then(|c| c.get(0));
    let message = choice.and_then(|c| c.get("message"));

    let text = message
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .or_else(|| choice.and_then(|c| c.get("text")).and_then(Value::as_str))
        .or_else(|| body.get("output_text").and_then(Value::as_str))
        .or_else(|| {
            body.get("output")
                .and_then(|o| o.get(0))
                .and_then(|o| o.get("content").or_else(|| o.get("text")))
                .and_then(Value::as_str)
        });

    let tool_calls: Vec<RawToolCall> = message
        .and_then(|m| m.get("tool_calls"))
        .and_then(Value::as_array)
        .map(|calls| {
            calls
                .iter()
                .filter_map(|call| {
                    let function = call.get("function")?;
                    Some(RawToolCall::Structured {
                        name: function.get("name")?.as_str()?.to_string(),
                        arguments: function.get("arguments").cloned().unwrap_or(Value::Null),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if text.is_none() && tool_calls.is_empty() {
        return Err(ProviderCallError::InvalidResponse(
            "no text or tool calls in chat completion".to_string(),
        ));
    }

    Ok(RawProviderOutput {
        text: text.unwrap_or_default().to_string(),
        tool_calls,
    })
}

#[async_trait]
impl ProviderClient for GroqClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Groq
    }

    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        _tools: Option<&[ToolDefinition]>,
    ) -> Result<RawProviderOutput, ProviderCallError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderCallError::MissingApiKey(self.api_key_env.clone()))?;
        let model = self.effective_model(model);

        debug!(model = %model, prompt_len = prompt.len(), "Sending Groq chat completion");

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&build_request_body(model, prompt, self.temperature))
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| classify_transport(&e))?;

        if !status.is_success() {
            return Err(classify_http_failure(status.as_u16(), &body));
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderCallError::InvalidResponse(format!("malformed JSON: {}", e)))?;
        parse_response(&json)
    }
}
