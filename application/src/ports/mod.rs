//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod audit_logger;
pub mod document_retriever;
pub mod llm_gateway;
pub mod tool_executor;
