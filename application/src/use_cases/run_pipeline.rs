//! Run pipeline use case
//!
//! Orchestrates the full flow: embed → cluster → analyse every group
//! concurrently → aggregate → (optionally) recommend resources.

use crate::config::PipelineParams;
use crate::ports::chat_oracle::ChatOracle;
use crate::ports::embedder::{EmbeddingError, TextEmbedder};
use crate::ports::progress::{AnalysisProgress, NoProgress, PipelineStage};
use crate::use_cases::aggregate_results::ResultAggregator;
use crate::use_cases::analyze_group::{AnalysisError, GroupAnalyzer};
use crate::use_cases::group_questions::{GroupingError, SimilarityGrouper};
use crate::use_cases::shared::cancelled;
use futures::FutureExt;
use insight_domain::{
    ClusteringError, GroupAnalysis, GroupFailure, Partition, PipelineResult, Question,
};
use std::collections::{BTreeMap, BTreeSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Why a single group produced no analysis
#[derive(Error, Debug)]
pub enum GroupError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Analysis timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Analysis task panicked")]
    Panicked,
}

impl GroupError {
    /// The complete oracle reply when the group failed on unparseable output.
    pub fn raw_reply(&self) -> Option<&str> {
        match self {
            GroupError::Analysis(AnalysisError::Malformed { raw }) => Some(raw),
            _ => None,
        }
    }

    fn to_failure(&self, label: usize) -> GroupFailure {
        let failure = GroupFailure::new(label, self.to_string());
        match self.raw_reply() {
            Some(raw) => failure.with_raw_reply(raw),
            None => failure,
        }
    }
}

/// Errors that can occur during a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Clustering failed: {0}")]
    Clustering(#[from] ClusteringError),

    #[error("Group {label} failed: {source}")]
    GroupFailed {
        label: usize,
        #[source]
        source: GroupError,
    },

    #[error("All {} groups failed", .failures.len())]
    AllGroupsFailed { failures: Vec<GroupFailure> },

    #[error("Resource recommendation failed: {0}")]
    Recommendation(#[source] AnalysisError),

    #[error("Cancelled")]
    Cancelled,
}

impl From<GroupingError> for PipelineError {
    fn from(err: GroupingError) -> Self {
        match err {
            GroupingError::Embedding(e) => PipelineError::Embedding(e),
            GroupingError::Clustering(e) => PipelineError::Clustering(e),
        }
    }
}

/// Input for the RunPipeline use case
#[derive(Debug, Clone)]
pub struct RunPipelineInput {
    /// Questions in input order
    pub questions: Vec<Question>,
    pub params: PipelineParams,
}

impl RunPipelineInput {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            params: PipelineParams::default(),
        }
    }

    /// Build input from raw texts, numbered in input order.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Question::from_texts(texts))
    }

    pub fn with_params(mut self, params: PipelineParams) -> Self {
        self.params = params;
        self
    }
}

/// Retry event forwarded from a group task to the progress notifier.
struct RetryNotice {
    label: usize,
    attempt: u32,
    delay: Duration,
    error: String,
}

/// Use case for running the whole question analysis pipeline
pub struct RunPipelineUseCase<O: ChatOracle + 'static, E: TextEmbedder + ?Sized + 'static> {
    oracle: Arc<O>,
    embedder: Arc<E>,
    cancellation_token: Option<CancellationToken>,
}

impl<O: ChatOracle + 'static, E: TextEmbedder + ?Sized + 'static> RunPipelineUseCase<O, E> {
    pub fn new(oracle: Arc<O>, embedder: Arc<E>) -> Self {
        Self {
            oracle,
            embedder,
            cancellation_token: None,
        }
    }

    /// Abort the run with [`PipelineError::Cancelled`] once `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunPipelineInput) -> Result<PipelineResult, PipelineError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunPipelineInput,
        progress: &dyn AnalysisProgress,
    ) -> Result<PipelineResult, PipelineError> {
        let RunPipelineInput { questions, params } = input;
        self.check_cancelled()?;

        info!("Starting pipeline with {} questions", questions.len());

        // Stage 1-2: Embedding + clustering
        let grouper = SimilarityGrouper::new(Arc::clone(&self.embedder)).with_retry(params.retry);
        let partition = tokio::select! {
            _ = cancelled(&self.cancellation_token) => return Err(PipelineError::Cancelled),
            grouped = grouper.group_with_progress(&questions, params.threshold, progress) => grouped?,
        };
        progress.on_groups_formed(&partition);

        // Stage 3: Per-group analysis
        let (analyses, failures) = self.analyze_groups(&partition, &params, progress).await?;
        if analyses.is_empty() {
            warn!("No group could be analysed");
            return Err(PipelineError::AllGroupsFailed { failures });
        }

        let aggregator = ResultAggregator::new(Arc::clone(&self.oracle)).with_retry(params.retry);
        let mut result = aggregator
            .aggregate(analyses)
            .with_partition(partition)
            .with_failures(failures);

        // Stage 4: Resource recommendation (optional)
        if params.recommend_resources && result.dominant_category().is_some() {
            self.check_cancelled()?;
            let outcome = tokio::select! {
                _ = cancelled(&self.cancellation_token) => return Err(PipelineError::Cancelled),
                outcome = aggregator.recommend_resources_with_progress(&result, progress) => outcome,
            };

            match outcome {
                Ok(resources) => result = result.with_resources(resources),
                Err(e) if params.failure_policy.is_abort_on_first() => {
                    return Err(PipelineError::Recommendation(e));
                }
                Err(e) => warn!("Resource recommendation failed: {}", e),
            }
        }

        info!(
            "Pipeline complete: {} analysed, {} failed",
            result.analyses().len(),
            result.failures().len()
        );
        Ok(result)
    }

    /// Stage 3: Analyse every group concurrently, bounded by
    /// `max_concurrency`. Results are keyed by label, independent of
    /// completion order.
    async fn analyze_groups(
        &self,
        partition: &Partition,
        params: &PipelineParams,
        progress: &dyn AnalysisProgress,
    ) -> Result<(BTreeMap<usize, GroupAnalysis>, Vec<GroupFailure>), PipelineError> {
        info!(
            "Analysing {} groups (max concurrency {})",
            partition.len(),
            params.effective_concurrency()
        );
        progress.on_stage_start(PipelineStage::Analysis, partition.len());

        let analyzer =
            Arc::new(GroupAnalyzer::new(Arc::clone(&self.oracle)).with_retry(params.retry));
        let semaphore = Arc::new(Semaphore::new(params.effective_concurrency()));
        let (retry_tx, mut retry_rx) = mpsc::unbounded_channel::<RetryNotice>();

        let mut join_set = JoinSet::new();
        let mut pending = BTreeSet::new();

        for group in partition.groups() {
            let label = group.label();
            let texts: Vec<String> = group.texts().into_iter().map(str::to_string).collect();
            let analyzer = Arc::clone(&analyzer);
            let semaphore = Arc::clone(&semaphore);
            let retry_tx = retry_tx.clone();
            let timeout = params.group_timeout;
            pending.insert(label);

            join_set.spawn(async move {
                // The semaphore is never closed, so a permit is always granted.
                let _permit = semaphore.acquire_owned().await.ok();

                let notify = move |attempt: u32, delay: Duration, err: &AnalysisError| {
                    let _ = retry_tx.send(RetryNotice {
                        label,
                        attempt,
                        delay,
                        error: err.to_string(),
                    });
                };
                let analysis = async {
                    let analysed = analyzer.analyze_observed(&texts, &notify);
                    match timeout {
                        Some(limit) => match tokio::time::timeout(limit, analysed).await {
                            Ok(result) => result.map_err(GroupError::from),
                            Err(_) => Err(GroupError::TimedOut(limit)),
                        },
                        None => analysed.await.map_err(GroupError::from),
                    }
                };

                // A panic stays attributed to its group.
                let result = AssertUnwindSafe(analysis)
                    .catch_unwind()
                    .await
                    .unwrap_or(Err(GroupError::Panicked));
                (label, result)
            });
        }
        drop(retry_tx);

        let mut analyses = BTreeMap::new();
        let mut failures = Vec::new();

        loop {
            tokio::select! {
                biased;

                _ = cancelled(&self.cancellation_token) => {
                    join_set.abort_all();
                    warn!("Cancelled with {} groups outstanding", pending.len());
                    return Err(PipelineError::Cancelled);
                }
                Some(notice) = retry_rx.recv() => {
                    progress.on_retry(
                        Some(notice.label),
                        notice.attempt,
                        notice.delay,
                        &notice.error,
                    );
                }
                joined = join_set.join_next() => {
                    let Some(joined) = joined else { break };
                    match joined {
                        Ok((label, Ok(analysis))) => {
                            pending.remove(&label);
                            info!("Group {} analysed as '{}'", label, analysis.category());
                            progress.on_group_complete(label, true);
                            analyses.insert(label, analysis);
                        }
                        Ok((label, Err(e))) => {
                            pending.remove(&label);
                            warn!("Group {} failed: {}", label, e);
                            progress.on_group_complete(label, false);
                            if params.failure_policy.is_abort_on_first() {
                                join_set.abort_all();
                                return Err(PipelineError::GroupFailed { label, source: e });
                            }
                            failures.push(e.to_failure(label));
                        }
                        Err(e) => {
                            // Panics are caught inside the task; only aborts land here.
                            warn!("Task join error: {}", e);
                        }
                    }
                }
            }
        }

        // Tasks that ended without reporting back.
        for label in pending {
            progress.on_group_complete(label, false);
            failures.push(GroupFailure::new(label, "analysis task terminated unexpectedly"));
        }

        progress.on_stage_complete(PipelineStage::Analysis);
        Ok((analyses, failures))
    }

    fn check_cancelled(&self) -> Result<(), PipelineError> {
        if let Some(token) = &self.cancellation_token
            && token.is_cancelled()
        {
            return Err(PipelineError::Cancelled);
        }
        Ok(())
    }
}
