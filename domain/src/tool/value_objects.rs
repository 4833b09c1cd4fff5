//! Tool domain value objects: call outcomes and execution errors
//!
//! Every requested tool call in a turn produces exactly one
//! [`ToolCallResult`]. Failures carry a [`ToolFailureKind`] that decides how
//! the agent loop accounts for them:
//!
//! | Kind | Counts against circuit breaker? |
//! |------|---------------------------------|
//! | `NotFound` | No |
//! | `CircuitOpen` | No |
//! | `Validation` | No |
//! | `Execution` | Yes |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a tool call did not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolFailureKind {
    /// The tool name is not registered
    NotFound,
    /// The tool is temporarily disabled after repeated failures
    CircuitOpen,
    /// The arguments did not match the tool's schema
    Validation,
    /// The tool itself failed while running
    Execution,
}

impl ToolFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolFailureKind::NotFound => "not_found",
            ToolFailureKind::CircuitOpen => "circuit_open",
            ToolFailureKind::Validation => "validation",
            ToolFailureKind::Execution => "execution",
        }
    }

    /// Whether this failure should be recorded on the tool's circuit breaker.
    pub fn counts_as_tool_failure(&self) -> bool {
        matches!(self, ToolFailureKind::Execution)
    }
}

impl std::fmt::Display for ToolFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one requested tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolCallResult {
    Success { value: serde_json::Value },
    Failure { reason: String, kind: ToolFailureKind },
}

impl ToolCallResult {
    pub fn success(value: impl Into<serde_json::Value>) -> Self {
        ToolCallResult::Success {
            value: value.into(),
        }
    }

    pub fn failure(kind: ToolFailureKind, reason: impl Into<String>) -> Self {
        ToolCallResult::Failure {
            reason: reason.into(),
            kind,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolCallResult::Success { .. })
    }

    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            ToolCallResult::Success { value } => Some(value),
            ToolCallResult::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            ToolCallResult::Success { .. } => None,
            ToolCallResult::Failure { reason, .. } => Some(reason),
        }
    }

    pub fn failure_kind(&self) -> Option<ToolFailureKind> {
        match self {
            ToolCallResult::Success { .. } => None,
            ToolCallResult::Failure { kind, .. } => Some(*kind),
        }
    }

    /// The value this result contributes to the synthesis prompt.
    ///
    /// Failures are rendered inline as `{"error": <reason>}`.
    pub fn as_value(&self) -> serde_json::Value {
        match self {
            ToolCallResult::Success { value } => value.clone(),
            ToolCallResult::Failure { reason, .. } => serde_json::json!({ "error": reason }),
        }
    }

    /// Plain-text rendering used in prompts: strings and numbers appear raw,
    /// everything else as compact JSON.
    pub fn render(&self) -> String {
        render_value(&self.as_value())
    }
}

/// Render a JSON value for a plain-text prompt line.
pub fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Error raised by a tool implementation while it runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolExecutionError {
    #[error("{0}")]
    Failed(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("upstream returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("timeout: {0}")]
    Timeout(String),
}

impl ToolExecutionError {
    pub fn failed(message: impl Into<String>) -> Self {
        ToolExecutionError::Failed(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ToolExecutionError::InvalidArgument(message.into())
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        ToolExecutionError::Timeout(operation.into())
    }

    /// How the agent loop accounts for this error. A tool that rejects its
    /// own arguments failed validation, not execution.
    pub fn failure_kind(&self) -> ToolFailureKind {
        match self {
            ToolExecutionError::InvalidArgument(_) => ToolFailureKind::Validation,
            _ => ToolFailureKind::Execution,
        }
    }
}
