//! Application-level configuration.
//!
//! - [`AgentParams`]: circuit-breaker settings for the agent loop

pub mod agent_params;

pub use agent_params::AgentParams;
