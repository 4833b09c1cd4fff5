//! Application layer for finwise
//!
//! This crate contains the agent loop use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::AgentParams;
pub use ports::{
    audit_logger::{AuditError, AuditEvent, AuditEventType, AuditLogger, NoAuditLogger},
    document_retriever::{DocumentRetriever, RetrievalError, RetrievedChunk},
    llm_gateway::{GatewayError, LlmGateway},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::process_query::{
    EMPTY_QUERY_ANSWER, ProcessQueryUseCase, SYSTEM_ERROR_ANSWER,
};
