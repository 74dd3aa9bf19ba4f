//! Unsupervised grouping of questions by embedding similarity.
//!
//! Pure domain logic: given one [`Embedding`] per [`Question`] and a distance
//! threshold, produce a [`Partition`] using average-linkage agglomerative
//! clustering over cosine distance.
//!
//! # Threshold polarity
//!
//! The threshold is a *distance*: two clusters merge while their average
//! cosine distance is `<= threshold`, and clustering stops as soon as the
//! cheapest remaining merge is above it. A threshold of `0.0` only merges
//! identical vectors; `2.0` merges everything.

mod embedding;
mod error;
mod group;
mod linkage;

pub use embedding::Embedding;
pub use error::ClusteringError;
pub use group::{Group, Partition};
pub use linkage::{Dendrogram, MergeStep, average_linkage};

use crate::core::question::Question;

/// Partition `questions` into groups of semantically similar questions.
///
/// `embeddings[i]` must be the embedding of `questions[i]`.
///
/// # Errors
///
/// - [`ClusteringError::EmptyInput`] when there are no questions
/// - [`ClusteringError::CountMismatch`] when the slices differ in length
/// - [`ClusteringError::DimensionMismatch`] when vectors differ in length
/// - [`ClusteringError::InvalidThreshold`] for a negative or non-finite threshold
pub fn group_by_similarity(
    questions: &[Question],
    embeddings: &[Embedding],
    threshold: f32,
) -> Result<Partition, ClusteringError> {
    if questions.is_empty() {
        return Err(ClusteringError::EmptyInput);
    }
    if questions.len() != embeddings.len() {
        return Err(ClusteringError::CountMismatch {
            questions: questions.len(),
            embeddings: embeddings.len(),
        });
    }

    let dendrogram = average_linkage(embeddings, threshold)?;
    Ok(Partition::from_clusters(questions, dendrogram.clusters()))
}
