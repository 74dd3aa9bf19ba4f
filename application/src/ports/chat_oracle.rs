//! Chat oracle port
//!
//! Defines the interface for the text-generation backend that describes
//! question groups.

use crate::retry::Retryable;
use async_trait::async_trait;
use insight_domain::ParseOutcome;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to a chat oracle
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Retryable for OracleError {
    /// Connection failures, timeouts, 408, 429 and 5xx are transient.
    fn is_retryable(&self) -> bool {
        match self {
            OracleError::Connection(_) | OracleError::Timeout(_) => true,
            OracleError::Status { status, .. } => {
                matches!(status, 408 | 429 | 500..=599)
            }
            OracleError::Protocol(_) | OracleError::Configuration(_) => false,
        }
    }
}

/// Text-generation backend
///
/// One prompt in, raw reply text out. Implementations (adapters) live in the
/// infrastructure layer and must be shareable across concurrent group
/// analyses.
#[async_trait]
pub trait ChatOracle: Send + Sync {
    /// Perform one request/response exchange.
    async fn send(&self, prompt: &str) -> Result<String, OracleError>;

    /// Recover a structured value from a reply. Never fails; unrecoverable
    /// text comes back as [`ParseOutcome::Unparsed`].
    fn extract_structured(&self, text: &str) -> ParseOutcome {
        insight_domain::extract_structured(text)
    }
}
