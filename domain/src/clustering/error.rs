//! Clustering errors

use thiserror::Error;

/// Degenerate input to the similarity grouper. Never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusteringError {
    #[error("cannot group an empty question set")]
    EmptyInput,

    #[error("got {embeddings} embeddings for {questions} questions")]
    CountMismatch { questions: usize, embeddings: usize },

    #[error("embedding {index} has {found} dimensions, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid distance threshold {0}: must be finite and >= 0")]
    InvalidThreshold(f32),
}
