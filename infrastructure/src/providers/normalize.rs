//! Response normalization.
//!
//! Providers express tool-call intent in three shapes:
//!
//! | Shape | Example | Variant |
//! |-------|---------|---------|
//! | Native function call | Gemini `functionCall{name, args}`, OpenAI `tool_calls[].function` | [`RawToolCall::Structured`] |
//! | Keyed object | `{"tool": "...", "args": {...}}` or `{"name": ..., "arguments": ...}` | [`RawToolCall::Keyed`] |
//! | JSON embedded in text | `Sure! {"tool": "get_exchange_rate", "args": {...}}` | found by [`extract_json_snippet`] |
//!
//! Provider adapters produce a [`RawProviderOutput`]; [`normalize`] folds it
//! into an [`LlmResponse`] so nothing downstream branches on provider.

use finwise_domain::{LlmResponse, ToolCall};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// A tool call exactly as the provider returned it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawToolCall {
    /// Native function call. `arguments` may be an object or a JSON string.
    Structured { name: String, arguments: Value },
    /// A plain object naming the tool under `tool` or `name` and its
    /// arguments under `args` or `arguments`.
    Keyed(Map<String, Value>),
}

/// Provider output before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawProviderOutput {
    pub text: String,
    pub tool_calls: Vec<RawToolCall>,
}

impl RawProviderOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn with_call(mut self, call: RawToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }
}

/// Fold a raw provider output into the normalized response.
///
/// Embedded-JSON detection only runs when tools were offered and the
/// provider returned no structured calls.
pub fn normalize(raw: RawProviderOutput, tools_offered: bool) -> LlmResponse {
    let mut tool_calls: Vec<ToolCall> = raw
        .tool_calls
        .into_iter()
        .filter_map(to_tool_call)
        .collect();

    if tool_calls.is_empty() && tools_offered {
        tool_calls = embedded_tool_calls(&raw.text);
    }

    LlmResponse {
        text: raw.text,
        tool_calls,
        model: None,
    }
}

fn to_tool_call(raw: RawToolCall) -> Option<ToolCall> {
    match raw {
        RawToolCall::Structured { name, arguments } => {
            if name.trim().is_empty() {
                warn!("Dropping structured tool call without a name");
                return None;
            }
            Some(ToolCall::from_json_args(name, decode_arguments(arguments)))
        }
        RawToolCall::Keyed(mut map) => {
            let name = ["tool", "name"]
                .iter()
                .find_map(|k| map.get(*k).and_then(Value::as_str).map(str::to_string));
            let Some(name) = name.filter(|n| !n.trim().is_empty()) else {
                debug!("Object has no tool name, not a tool call");
                return None;
            };
            let args = ["args", "arguments"]
                .iter()
                .find_map(|k| map.remove(*k))
                .unwrap_or(Value::Null);
            Some(ToolCall::from_json_args(name, decode_arguments(args)))
        }
    }
}

/// Arguments may arrive as an object or as a JSON-encoded string.
fn decode_arguments(arguments: Value) -> Value {
    match arguments {
        Value::String(s) if s.trim().is_empty() => Value::Object(Map::new()),
        Value::String(s) => match serde_json::from_str::<Value>(&s) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Tool arguments are not valid JSON, using none");
                Value::Object(Map::new())
            }
        },
        other => other,
    }
}

fn embedded_tool_calls(text: &str) -> Vec<ToolCall> {
    let Some(snippet) = extract_json_snippet(text) else {
        return Vec::new();
    };
    let parsed: Value = match serde_json::from_str(snippet) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "JSON-looking snippet failed to parse, treating as text");
            return Vec::new();
        }
    };
    match parsed {
        Value::Object(map) => to_tool_call(RawToolCall::Keyed(map)).into_iter().collect(),
        _ => Vec::new(),
    }
}

/// Return the first balanced `{...}` span in `text`.
///
/// Scans from the first `{` and tracks depth, ignoring braces inside string
/// literals. Returns `None` when no span closes.
pub fn extract_json_snippet(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_call_with_object_arguments() {
        let raw = RawProviderOutput::text("").with_call(RawToolCall::Structured {
            name: "get_exchange_rate".to_string(),
            arguments: json!({"source_currency": "USD", "target_currency": "NGN"}),
        });
        let response = normalize(raw, true);

        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].tool_name, "get_exchange_rate");
        assert_eq!(
            response.tool_calls[0].arguments.get("target_currency"),
            Some(&json!("NGN"))
        );
    }

    #[test]
    fn test_structured_call_with_string_arguments() {
        let raw = RawProviderOutput::text("").with_call(RawToolCall::Structured {
            name: "verify_company_registry".to_string(),
            arguments: json!("{\"company_name\": \"Tesla\"}"),
        });
        let response = normalize(raw, true);

        assert_eq!(
            response.tool_calls[0].arguments.get("company_name"),
            Some(&json!("Tesla"))
        );
    }

    #[test]
    fn test_keyed_variants() {
        let tool_args = json!({"tool": "get_exchange_rate", "args": {"source_currency": "USD"}});
        let name_arguments = json!({
            "name": "verify_company_registry",
            "arguments": {"company_name": "Tesla"}
        });
        let raw = RawProviderOutput::text("")
            .with_call(RawToolCall::Keyed(tool_args.as_object().unwrap().clone()))
            .with_call(RawToolCall::Keyed(name_arguments.as_object().unwrap().clone()));

        let response = normalize(raw, true);
        assert_eq!(
            response.tool_names(),
            vec!["get_exchange_rate", "verify_company_registry"]
        );
    }

    #[test]
    fn test_embedded_json_in_text() {
        let text = concat!(
            r#"I'll look that up. {"tool": "get_exchange_rate", "#,
            r#""args": {"source_currency": "USD", "target_currency": "NGN"}} Done."#
        );
        let response = normalize(RawProviderOutput::text(text), true);

        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(
            response.tool_calls[0].arguments.get("source_currency"),
            Some(&json!("USD"))
        );
        assert_eq!(response.text, text);
    }

    #[test]
    fn test_embedded_json_ignored_without_tools() {
        let text = r#"{"tool": "get_exchange_rate", "args": {}}"#;
        let response = normalize(RawProviderOutput::text(text), false);
        assert!(!response.has_tool_calls());
    }

    #[test]
    fn test_invalid_snippet_is_plain_text() {
        let text = "Use {braces like this} carefully.";
        let response = normalize(RawProviderOutput::text(text), true);
        assert!(!response.has_tool_calls());
        assert_eq!(response.text, text);
    }

    #[test]
    fn test_json_without_tool_name_is_plain_text() {
        let text = r#"The answer is {"rate": 800}."#;
        let response = normalize(RawProviderOutput::text(text), true);
        assert!(!response.has_tool_calls());
    }

    #[test]
    fn test_only_first_embedded_object_is_used() {
        let text = concat!(
            r#"{"tool": "get_exchange_rate", "args": {}} "#,
            r#"{"tool": "verify_company_registry", "args": {}}"#
        );
        let response = normalize(RawProviderOutput::text(text), true);
        assert_eq!(response.tool_names(), vec!["get_exchange_rate"]);
    }

    #[test]
    fn test_extract_snippet_balanced() {
        assert_eq!(
            extract_json_snippet(r#"x {"a": {"b": 1}} y {"c": 2}"#),
            Some(r#"{"a": {"b": 1}}"#)
        );
        assert_eq!(extract_json_snippet("no json here"), None);
        assert_eq!(extract_json_snippet(r#"{"unclosed": 1"#), None);
    }

    #[test]
    fn test_extract_snippet_ignores_braces_in_strings() {
        let text = r#"{"tool": "x", "args": {"note": "a } inside"}} trailing"#;
        assert_eq!(
            extract_json_snippet(text),
            Some(r#"{"tool": "x", "args": {"note": "a } inside"}}"#)
        );

        let escaped = r#"{"q": "say \"}\" now"}"#;
        assert_eq!(extract_json_snippet(escaped), Some(escaped));
    }
}
