//! Prompt domain
//!
//! Templates for the decision call, the synthesis call and document-grounded
//! answers.

pub mod agent;

pub use agent::AgentPromptTemplate;
