//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: LLM model identifiers (Groq-hosted Llama, Gemini, custom)
//! - [`query::Query`]: a validated, non-blank user query
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod query;
