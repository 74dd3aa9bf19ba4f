//! Pipeline parameters for use case control.
//!
//! [`PipelineParams`] groups the static parameters that control
//! [`RunPipelineUseCase`](crate::use_cases::run_pipeline::RunPipelineUseCase).
//! These are application-layer concerns, not domain policy.

use crate::retry::RetryPolicy;
use insight_domain::FailurePolicy;
use std::time::Duration;

/// Run control parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineParams {
    /// Cosine distance at or below which clusters merge.
    pub threshold: f32,
    /// Maximum number of groups analysed at the same time.
    pub max_concurrency: usize,
    /// Deadline for one group's whole retry sequence.
    pub group_timeout: Option<Duration>,
    /// What to do when a group cannot be analysed.
    pub failure_policy: FailurePolicy,
    /// Ask the oracle for run-level learning resources.
    pub recommend_resources: bool,
    /// Backoff applied to every oracle call.
    pub retry: RetryPolicy,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            max_concurrency: 4,
            group_timeout: Some(Duration::from_secs(300)),
            failure_policy: FailurePolicy::default(),
            recommend_resources: true,
            retry: RetryPolicy::default(),
        }
    }
}

impl PipelineParams {
    // ==================== Builder Methods ====================

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max;
        self
    }

    pub fn with_group_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.group_timeout = timeout;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_recommend_resources(mut self, enabled: bool) -> Self {
        self.recommend_resources = enabled;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Concurrency actually used; zero is treated as one.
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }
}
