//! Agent turn domain.
//!
//! - [`turn::AgentTurn`]: working state for one query
//! - [`turn::ToolAttempt`]: one requested call and its outcome
//! - [`turn::AgentReply`]: the answer plus provenance returned to the caller

pub mod turn;

pub use turn::{AgentReply, AgentTurn, ToolAttempt};
