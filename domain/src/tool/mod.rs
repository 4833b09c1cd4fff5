//! Tool domain module
//!
//! Defines how the agent describes, validates and reasons about the tools it
//! may call (currency lookup, company registry check, document-grounded
//! answers).
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌────────────────┐    ┌────────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolArguments  │───▶│ ToolCallResult │
//! │ (offered)    │    │ (raw, LLM)   │    │ (validated)    │    │ (outcome)      │
//! └──────────────┘    └──────────────┘    └────────────────┘    └────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolDefinition`]: name, description and typed parameters of one tool
//! - [`ToolSpec`]: the set of definitions offered to the LLM
//! - [`ToolCall`]: a normalized call request produced by the LLM gateway
//! - [`ToolSchema`] / [`ArgumentValidator`]: required keys, types, coercions
//! - [`ToolHandler`]: the callable capability behind a definition
//! - [`ToolCallResult`]: exactly one per requested call
//!
//! The domain layer performs no I/O. Execution lives behind the application
//! layer's `ToolExecutorPort`.

pub mod entities;
pub mod handler;
pub mod schema;
pub mod value_objects;

pub use entities::{Coercion, ParamType, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use handler::ToolHandler;
pub use schema::{ArgumentValidator, ToolArguments, ToolSchema, ValidationError};
pub use value_objects::{ToolCallResult, ToolExecutionError, ToolFailureKind, render_value};
