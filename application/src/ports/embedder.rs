//! Text embedder port

use crate::retry::Retryable;
use async_trait::async_trait;
use insight_domain::Embedding;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while embedding questions
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Embedding request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Embedding backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Retryable for EmbeddingError {
    fn is_retryable(&self) -> bool {
        match self {
            EmbeddingError::Connection(_) | EmbeddingError::Timeout(_) => true,
            EmbeddingError::Status { status, .. } => {
                matches!(status, 408 | 429 | 500..=599)
            }
            EmbeddingError::Protocol(_) | EmbeddingError::Configuration(_) => false,
        }
    }
}

/// Maps question texts to fixed-dimension vectors.
///
/// For a given configuration the same text always yields the same vector, and
/// every vector of one call has the same dimensionality.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Short description for logs, e.g. the model name.
    fn name(&self) -> &str;

    /// One vector per input text, in input order.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_embedding_errors() {
        assert!(EmbeddingError::Connection("refused".to_string()).is_retryable());
        assert!(EmbeddingError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(
            EmbeddingError::Status {
                status: 503,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !EmbeddingError::Status {
                status: 404,
                body: "model not found".to_string()
            }
            .is_retryable()
        );
        assert!(!EmbeddingError::Protocol("short".to_string()).is_retryable());
    }
}
