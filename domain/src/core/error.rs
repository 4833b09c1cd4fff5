//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::InvalidQuery("query is empty".to_string()).to_string(),
            "Invalid query: query is empty"
        );
        assert_eq!(
            DomainError::UnknownProvider("openai".to_string()).to_string(),
            "Unknown provider: openai"
        );
    }
}
