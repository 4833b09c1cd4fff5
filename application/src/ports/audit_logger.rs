//! Port for the audit trail.
//!
//! Defines the [`AuditLogger`] trait for recording what the agent did for
//! each query (the query itself, tool calls, tool failures, errors and the
//! final answer) to a durable, machine-readable log.
//!
//! This is separate from `tracing`-based diagnostics: tracing carries
//! human-oriented operation logs, this port carries the audit record.
//! Callers treat a failed `log` as non-fatal.

use serde_json::Value;
use thiserror::Error;

/// Kinds of audit events emitted by the agent loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventType {
    UserQuery,
    /// A tool ran and returned a value
    ToolCall,
    /// A tool ran and failed
    ToolError,
    /// The LLM gateway failed
    Error,
    FinalAnswer,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::UserQuery => "USER_QUERY",
            AuditEventType::ToolCall => "TOOL_CALL",
            AuditEventType::ToolError => "TOOL_ERROR",
            AuditEventType::Error => "ERROR",
            AuditEventType::FinalAnswer => "FINAL_ANSWER",
        }
    }
}

impl std::fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single audit record.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub event_type: AuditEventType,
    /// The query being processed
    pub query: String,
    /// Event-specific fields
    pub details: Value,
}

impl AuditEvent {
    pub fn new(event_type: AuditEventType, query: impl Into<String>, details: Value) -> Self {
        Self {
            event_type,
            query: query.into(),
            details,
        }
    }
}

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audit serialization error: {0}")]
    Serialization(String),
}

/// Port for recording audit events.
pub trait AuditLogger: Send + Sync {
    fn log(&self, event: AuditEvent) -> Result<(), AuditError>;
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLogger;

impl AuditLogger for NoAuditLogger {
    fn log(&self, _event: AuditEvent) -> Result<(), AuditError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        assert_eq!(AuditEventType::UserQuery.as_str(), "USER_QUERY");
        assert_eq!(AuditEventType::ToolError.to_string(), "TOOL_ERROR");
        assert_eq!(AuditEventType::FinalAnswer.as_str(), "FINAL_ANSWER");
    }

    #[test]
    fn test_no_audit_logger_accepts_everything() {
        let logger = NoAuditLogger;
        let event = AuditEvent::new(AuditEventType::Error, "q", serde_json::json!({}));
        assert!(logger.log(event).is_ok());
    }
}
