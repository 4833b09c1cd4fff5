//! Document Retriever port
//!
//! Retrieval backend for document-grounded answers. Embedding and vector
//! search live behind this interface; the agent only sees ranked chunks.

use async_trait::async_trait;
use thiserror::Error;

/// A retrieved passage and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub text: String,
    /// Citation shown to the user (e.g. "Annual Report 2023, p. 15")
    pub source: String,
    /// Backend-specific relevance, higher is better
    pub score: f32,
}

impl RetrievedChunk {
    pub fn new(text: impl Into<String>, source: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            score,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetrievalError {
    #[error("Retrieval backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    /// Return up to `k` chunks, most relevant first.
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>, RetrievalError>;
}
