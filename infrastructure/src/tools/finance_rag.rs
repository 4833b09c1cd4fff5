//! generate_rag_answer tool: document-grounded financial answers
//!
//! ```text
//! user_query ──▶ DocumentRetriever (top k) ──▶ analyst prompt ──▶ LlmGateway (no tools)
//!                                                                     │
//!                                    {"answer", "sources", "audit_success"} ◀─┘
//! ```

use async_trait::async_trait;
use finwise_application::ports::document_retriever::DocumentRetriever;
use finwise_application::ports::llm_gateway::LlmGateway;
use finwise_domain::AgentPromptTemplate;
use finwise_domain::tool::{
    Coercion, ToolArguments, ToolDefinition, ToolExecutionError, ToolHandler, ToolParameter,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Tool name constant
pub const GENERATE_RAG_ANSWER: &str = "generate_rag_answer";

/// Default number of chunks placed in the prompt
pub const DEFAULT_K_CHUNKS: usize = 5;

pub struct FinanceRagTool {
    retriever: Arc<dyn DocumentRetriever>,
    gateway: Arc<dyn LlmGateway>,
    k: usize,
}

impl FinanceRagTool {
    pub fn new(retriever: Arc<dyn DocumentRetriever>, gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            retriever,
            gateway,
            k: DEFAULT_K_CHUNKS,
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k.max(1);
        self
    }
}

pub fn finance_rag_definition() -> ToolDefinition {
    ToolDefinition::new(
        GENERATE_RAG_ANSWER,
        "Answer a financial question using only retrieved company documents, with source citations.",
    )
    .with_parameter(
        ToolParameter::new("user_query", "The financial question to answer", true)
            .with_coercion(Coercion::Trim),
    )
}

#[async_trait]
impl ToolHandler for FinanceRagTool {
    fn definition(&self) -> ToolDefinition {
        finance_rag_definition()
    }

    async fn call(&self, args: &ToolArguments) -> Result<Value, ToolExecutionError> {
        let query = args.require_str("user_query")?;

        let chunks = self
            .retriever
            .retrieve(query, self.k)
            .await
            .map_err(|e| ToolExecutionError::failed(e.to_string()))?;

        tracing::info!(chunks = chunks.len(), k = self.k, "Retrieved context for RAG answer");

        let (texts, sources): (Vec<String>, Vec<String>) =
            chunks.into_iter().map(|c| (c.text, c.source)).unzip();

        let prompt = AgentPromptTemplate::financial_analyst(&texts, query);
        let response = self
            .gateway
            .generate(&prompt, None)
            .await
            .map_err(|e| ToolExecutionError::failed(format!("RAG generation failed: {}", e)))?;

        Ok(json!({
            "answer": response.text,
            "sources": sources,
            "audit_success": true,
        }))
    }
}
