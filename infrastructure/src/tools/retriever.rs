//! In-memory keyword retriever.
//!
//! Scores each document by how many distinct query terms it contains.
//! Vector search would sit behind the same [`DocumentRetriever`] port.

use async_trait::async_trait;
use finwise_application::ports::document_retriever::{
    DocumentRetriever, RetrievalError, RetrievedChunk,
};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub text: String,
    pub source: String,
}

impl Document {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRetriever {
    documents: Vec<Document>,
}

impl InMemoryRetriever {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Retriever preloaded with a small corpus of financial report excerpts.
    pub fn seeded() -> Self {
        Self::new(vec![
            Document::new(
                "The Q3 2024 report indicates a net revenue of $500 Million, up 12% year over year.",
                "Source: Q3 2024 Investor Presentation, Slide 10",
            ),
            Document::new(
                "The company's primary focus for next year is renewable energy and grid storage.",
                "Source: CEO Letter, Oct 2024",
            ),
            Document::new(
                "Operating margin for fiscal 2023 was 18%, with free cash flow of $120 Million.",
                "Source: Annual Report 2023, p. 15",
            ),
            Document::new(
                "Management guided Q4 2024 revenue between $520 Million and $540 Million.",
                "Source: Q4 2024 Earnings Call Transcript",
            ),
            Document::new(
                "Total assets stood at $1.2 Billion and net income at $50 Million at year end.",
                "Source: Annual Report 2023, p. 42",
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 2)
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl DocumentRetriever for InMemoryRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        let query_terms = terms(query);
        if query_terms.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, &Document)> = self
            .documents
            .iter()
            .map(|doc| (terms(&doc.text).intersection(&query_terms).count(), doc))
            .filter(|(score, _)| *score > 0)
            .collect();

        // Stable sort keeps corpus order among equal scores.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        tracing::debug!(hits = scored.len(), k, "Keyword retrieval");

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(score, doc)| RetrievedChunk::new(&doc.text, &doc.source, score as f32))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ranks_by_term_overlap() {
        let retriever = InMemoryRetriever::new(vec![
            Document::new("revenue grew", "a"),
            Document::new("net revenue grew in Q3", "b"),
            Document::new("unrelated text", "c"),
        ]);

        let chunks = retriever.retrieve("What was net revenue?", 5).await.unwrap();
        let sources: Vec<&str> = chunks.iter().map(|c| c.source.as_str()).collect();
        assert_eq!(sources, vec!["b", "a"]);
        assert_eq!(chunks[0].score, 2.0);
    }

    #[tokio::test]
    async fn test_ties_keep_corpus_order_and_k_limits() {
        let retriever = InMemoryRetriever::new(vec![
            Document::new("margin one", "first"),
            Document::new("margin two", "second"),
            Document::new("margin three", "third"),
        ]);

        let chunks = retriever.retrieve("margin", 2).await.unwrap();
        let sources: Vec<&str> = chunks.iter().map(|c| c.source.as_str()).collect();
        assert_eq!(sources, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_no_match_returns_empty() {
        let retriever = InMemoryRetriever::seeded();
        assert!(!retriever.is_empty());
        assert!(retriever.retrieve("zzzz qqqq", 3).await.unwrap().is_empty());
        assert!(retriever.retrieve("revenue", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seeded_corpus_answers_revenue_question() {
        let chunks = InMemoryRetriever::seeded()
            .retrieve("Q3 2024 net revenue", 1)
            .await
            .unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].source.contains("Q3 2024"));
    }
}
