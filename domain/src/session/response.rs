//! Normalized LLM response.
//!
//! Providers signal tool-call intent in different ways (native function-call
//! objects, keyed dictionaries, JSON embedded in prose). The gateway folds all
//! of them into this one shape so the agent loop never branches on provider.
//!
//! ```
//! use finwise_domain::session::response::LlmResponse;
//! use finwise_domain::tool::ToolCall;
//!
//! let plain = LlmResponse::from_text("Paris is the capital of France.");
//! assert!(!plain.has_tool_calls());
//!
//! let call = LlmResponse::from_text("")
//!     .with_tool_call(ToolCall::new("get_exchange_rate").with_arg("source_currency", "USD"));
//! assert_eq!(call.tool_calls.len(), 1);
//! ```

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Generated text (may be empty when the model only requested tools)
    pub text: String,
    /// Requested tool calls, in provider order
    pub tool_calls: Vec<ToolCall>,
    /// Model that actually produced the response, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl LlmResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
            model: None,
        }
    }

    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Names of the requested tools, in order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tool_calls.iter().map(|c| c.tool_name.as_str()).collect()
    }
}
