//! Google Gemini client (`generateContent`).
//!
//! Gemini supports native function calling, so supplied tool definitions are
//! sent as `functionDeclarations` and `functionCall` parts come back as
//! structured tool calls.

use super::normalize::{RawProviderOutput, RawToolCall};
use super::{
    ProviderCallError, ProviderClient, classify_error, classify_http_failure, classify_transport,
    error_details, resolve_api_key,
};
use async_trait::async_trait;
use finwise_domain::{GeminiProviderConfig, ParamType, ProviderKind, ToolDefinition};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::debug;

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_key_env: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        config: &GeminiProviderConfig,
        timeout: Duration,
    ) -> Result<Self, ProviderCallError> {
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
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

fn gemini_type(param_type: ParamType) -> &'static str {
    match param_type {
        ParamType::String => "STRING",
        ParamType::Number => "NUMBER",
        ParamType::Integer => "INTEGER",
        ParamType::Boolean => "BOOLEAN",
        ParamType::Object => "OBJECT",
        ParamType::Array => "ARRAY",
    }
}

pub(crate) fn function_declaration(def: &ToolDefinition) -> Value {
    let mut properties = Map::new();
    for param in &def.parameters {
        properties.insert(
            param.name.clone(),
            json!({
                "type": gemini_type(param.param_type),
                "description": param.description,
            }),
        );
    }
    let required: Vec<&str> = def
        .parameters
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name.as_str())
        .collect();

    json!({
        "name": def.name,
        "description": def.description,
        "parameters": {
            "type": "OBJECT",
            "properties": properties,
            "required": required,
        },
    })
}

pub(crate) fn build_request_body(prompt: &str, tools: Option<&[ToolDefinition]>) -> Value {
    let mut body = json!({
        "contents": [{"role": "user", "parts": [{"text": prompt}]}],
    });
    if let Some(tools) = tools.filter(|t| !t.is_empty()) {
        let declarations: Vec<Value> = tools.iter().map(function_declaration).collect();
        body["tools"] = json!([{ "functionDeclarations": declarations }]);
    }
    body
}

/// Parse a `generateContent` body: text parts are concatenated and
/// `functionCall` parts become structured tool calls.
pub(crate) fn parse_response(body: &Value) -> Result<RawProviderOutput, ProviderCallError> {
    if let Some((code, message)) = error_details(body) {
        return Err(classify_error(None, code.as_deref(), &message));
    }

    let Some(parts) = body
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
    else {
        let reason = body
            .get("promptFeedback")
            .and_then(|f| f.get("blockReason"))
            .and_then(Value::as_str)
            .map(|r| format!("prompt blocked: {}", r))
            .unwrap_or_else(|| "no candidates in response".to_string());
        return Err(ProviderCallError::InvalidResponse(reason));
    };

    let mut output = RawProviderOutput::default();
    for part in parts {
        if let Some(text) = part.get("text").and_then(Value::as_str) {
            output.text.push_str(text);
        }
        if let Some(call) = part.get("functionCall")
            && let Some(name) = call.get("name").and_then(Value::as_str)
        {
            output.tool_calls.push(RawToolCall::Structured {
                name: name.to_string(),
                arguments: call.get("args").cloned().unwrap_or(Value::Null),
            });
        }
    }
    Ok(output)
}

#[async_trait]
impl ProviderClient for GeminiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        tools: Option<&[ToolDefinition]>,
    ) -> Result<RawProviderOutput, ProviderCallError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderCallError::MissingApiKey(self.api_key_env.clone()))?;

        debug!(
            model = %model,
            prompt_len = prompt.len(),
            tools = tools.map_or(0, <[ToolDefinition]>::len),
            "Sending Gemini generateContent"
        );

        let response = self
            .http
            .post(self.endpoint(model))
            .query(&[("key", api_key)])
            .json(&build_request_body(prompt, tools))
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
