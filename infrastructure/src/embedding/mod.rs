//! Text embedder adapters.
//!
//! [`HttpEmbedder`] asks a sentence-embedding model over HTTP and is the
//! default. [`HashingEmbedder`] works offline but only relates questions
//! that share words.

mod hashing;
mod http;
mod stop_words;

pub use hashing::HashingEmbedder;
pub use http::{EmbeddingSettings, HttpEmbedder};

use insight_application::{EmbeddingError, TextEmbedder};
use std::fmt;
use std::sync::Arc;

/// Embedder selected by `[embedding] backend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingBackend {
    /// OpenAI-compatible `/v1/embeddings` endpoint
    #[default]
    Http,
    /// Local feature hashing, no model required
    Hashing,
}

impl EmbeddingBackend {
    pub const VALID_NAMES: [&'static str; 4] = ["http", "openai-compatible", "ollama", "hashing"];
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingBackend::Http => write!(f, "http"),
            EmbeddingBackend::Hashing => write!(f, "hashing"),
        }
    }
}

impl std::str::FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" | "openai-compatible" | "ollama" => Ok(EmbeddingBackend::Http),
            "hashing" => Ok(EmbeddingBackend::Hashing),
            _ => Err(format!("Invalid EmbeddingBackend: {}", s)),
        }
    }
}

/// Embedder resolved from `[embedding]`, ready to build.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbedderSettings {
    Http(EmbeddingSettings),
    Hashing(HashingEmbedder),
}

impl EmbedderSettings {
    pub fn backend(&self) -> EmbeddingBackend {
        match self {
            EmbedderSettings::Http(_) => EmbeddingBackend::Http,
            EmbedderSettings::Hashing(_) => EmbeddingBackend::Hashing,
        }
    }

    pub fn build(self) -> Result<Arc<dyn TextEmbedder>, EmbeddingError> {
        Ok(match self {
            EmbedderSettings::Http(settings) => Arc::new(HttpEmbedder::new(settings)?),
            EmbedderSettings::Hashing(embedder) => Arc::new(embedder),
        })
    }
}
