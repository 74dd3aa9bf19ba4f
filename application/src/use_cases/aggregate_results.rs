//! Aggregate results use case
//!
//! Combines per-group analyses into a [`PipelineResult`] and optionally asks
//! the oracle for run-level learning resources.

use crate::ports::chat_oracle::ChatOracle;
use crate::ports::progress::{AnalysisProgress, PipelineStage};
use crate::retry::RetryPolicy;
use crate::use_cases::analyze_group::AnalysisError;
use crate::use_cases::shared::{RetryObserver, request_structured};
use insight_domain::{
    GroupAnalysis, PipelineResult, PromptTemplate, ResourceRecommendation, validate_resources,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Builds the run-level result from validated group analyses.
pub struct ResultAggregator<O: ChatOracle + ?Sized> {
    oracle: Arc<O>,
    retry: RetryPolicy,
}

impl<O: ChatOracle + ?Sized> ResultAggregator<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self {
            oracle,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Derive the dominant category, expertise summary and gap union.
    ///
    /// Pure; makes no oracle call.
    pub fn aggregate(&self, analyses: BTreeMap<usize, GroupAnalysis>) -> PipelineResult {
        let result = PipelineResult::from_analyses(analyses);
        info!(
            "Aggregated {} analyses, dominant category: {}",
            result.analyses().len(),
            result.dominant_category().unwrap_or("(none)")
        );
        result
    }

    /// Ask for learning resources keyed on the dominant category, the overall
    /// expertise and the union of knowledge gaps.
    ///
    /// Returns an empty list without calling the oracle when there is no
    /// dominant category.
    pub async fn recommend_resources(
        &self,
        result: &PipelineResult,
    ) -> Result<Vec<ResourceRecommendation>, AnalysisError> {
        self.recommend_resources_observed(result, &|_, _, _| {}).await
    }

    /// [`recommend_resources`](Self::recommend_resources) reported as the
    /// `Recommendation` stage, with retries forwarded to `progress`.
    pub async fn recommend_resources_with_progress(
        &self,
        result: &PipelineResult,
        progress: &dyn AnalysisProgress,
    ) -> Result<Vec<ResourceRecommendation>, AnalysisError> {
        progress.on_stage_start(PipelineStage::Recommendation, 1);
        let notify = |attempt: u32, delay: Duration, err: &AnalysisError| {
            progress.on_retry(None, attempt, delay, &err.to_string());
        };
        let resources = self.recommend_resources_observed(result, &notify).await;
        progress.on_stage_complete(PipelineStage::Recommendation);
        resources
    }

    async fn recommend_resources_observed(
        &self,
        result: &PipelineResult,
        on_retry: &RetryObserver<'_>,
    ) -> Result<Vec<ResourceRecommendation>, AnalysisError> {
        let Some(category) = result.dominant_category() else {
            debug!("No dominant category, skipping resource recommendation");
            return Ok(Vec::new());
        };

        let prompt = PromptTemplate::resource_recommendations(
            category,
            result.expertise_summary(),
            result.knowledge_gaps(),
        );
        let value = request_structured(self.oracle.as_ref(), &self.retry, &prompt, on_retry).await?;
        let resources = validate_resources(&value)?;

        info!("Received {} resource recommendations", resources.len());
        Ok(resources)
    }
}
