//! Group questions use case
//!
//! Embeds questions and partitions them with average-linkage clustering.

use crate::ports::embedder::{EmbeddingError, TextEmbedder};
use crate::ports::progress::{AnalysisProgress, NoProgress, PipelineStage};
use crate::retry::RetryPolicy;
use insight_domain::{ClusteringError, Partition, Question, group_by_similarity};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while grouping questions
#[derive(Error, Debug)]
pub enum GroupingError {
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Clustering failed: {0}")]
    Clustering(#[from] ClusteringError),
}

/// Groups semantically similar questions.
pub struct SimilarityGrouper<E: TextEmbedder + ?Sized> {
    embedder: Arc<E>,
    retry: RetryPolicy,
}

impl<E: TextEmbedder + ?Sized> SimilarityGrouper<E> {
    pub fn new(embedder: Arc<E>) -> Self {
        Self {
            embedder,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Partition `questions` so that clusters merge while their mean
    /// cosine distance is at most `threshold`.
    pub async fn group(
        &self,
        questions: &[Question],
        threshold: f32,
    ) -> Result<Partition, GroupingError> {
        self.group_with_progress(questions, threshold, &NoProgress)
            .await
    }

    pub async fn group_with_progress(
        &self,
        questions: &[Question],
        threshold: f32,
        progress: &dyn AnalysisProgress,
    ) -> Result<Partition, GroupingError> {
        if questions.is_empty() {
            return Err(ClusteringError::EmptyInput.into());
        }

        progress.on_stage_start(PipelineStage::Embedding, questions.len());
        let texts: Vec<&str> = questions.iter().map(Question::text).collect();
        let notify = |attempt: u32, delay: Duration, err: &EmbeddingError| {
            progress.on_retry(None, attempt, delay, &err.to_string());
        };
        let embeddings = self
            .retry
            .execute_observed(|_| self.embedder.embed(&texts), notify)
            .await?;
        debug!(
            "Embedded {} questions with {} ({} dimensions)",
            embeddings.len(),
            self.embedder.name(),
            embeddings.first().map_or(0, |e| e.dimensions())
        );
        progress.on_stage_complete(PipelineStage::Embedding);

        progress.on_stage_start(PipelineStage::Clustering, questions.len());
        let partition = group_by_similarity(questions, &embeddings, threshold)?;
        info!(
            "Formed {} groups from {} questions (threshold {})",
            partition.len(),
            questions.len(),
            threshold
        );
        progress.on_stage_complete(PipelineStage::Clustering);

        Ok(partition)
    }
}
