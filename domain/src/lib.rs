//! Domain layer for finwise
//!
//! This crate contains the core types and pure logic of the financial
//! assistant agent. It has no dependencies on infrastructure or presentation
//! concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! The agent answers questions it cannot answer from model knowledge alone by
//! calling tools (currency rates, company registry lookups, document-grounded
//! answers). Each tool has a definition, from which an argument schema is
//! derived and enforced before the tool runs.
//!
//! ## Agent turn
//!
//! One query is one turn: a decision call, zero or more tool attempts, and a
//! synthesis call. The turn records every attempt and error so the reply
//! carries full provenance.
//!
//! ## Circuit breaker
//!
//! Tools that keep failing are disabled for a cool-down window.

pub mod agent;
pub mod config;
pub mod core;
pub mod prompt;
pub mod providers;
pub mod resilience;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use agent::{AgentReply, AgentTurn, ToolAttempt};
pub use config::OutputFormat;
pub use core::{error::DomainError, model::Model, query::Query};
pub use prompt::AgentPromptTemplate;
pub use providers::{GeminiProviderConfig, GroqProviderConfig, ProviderConfig, ProviderKind};
pub use resilience::{CircuitBreaker, Clock, SystemClock};
pub use session::LlmResponse;
pub use tool::{
    ArgumentValidator, Coercion, ParamType, ToolArguments, ToolCall, ToolCallResult,
    ToolDefinition, ToolExecutionError, ToolFailureKind, ToolHandler, ToolParameter, ToolSchema,
    ToolSpec, ValidationError,
};
