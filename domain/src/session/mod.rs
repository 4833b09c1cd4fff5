//! LLM exchange domain.
//!
//! - [`response::LlmResponse`]: normalized text plus requested tool calls

pub mod response;

pub use response::LlmResponse;
