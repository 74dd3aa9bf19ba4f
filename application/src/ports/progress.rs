//! Progress notification port
//!
//! Defines the interface for reporting progress during a pipeline run.

use insight_domain::Partition;
use std::fmt;
use std::time::Duration;

/// Stages of a pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Embedding,
    Clustering,
    Analysis,
    Recommendation,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Embedding => "Embedding",
            PipelineStage::Clustering => "Clustering",
            PipelineStage::Analysis => "Analysis",
            PipelineStage::Recommendation => "Recommendation",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback for progress updates during a pipeline run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain log lines, etc.)
pub trait AnalysisProgress: Send + Sync {
    /// Called when a stage starts. `total` is the number of units of work.
    fn on_stage_start(&self, stage: PipelineStage, total: usize);

    /// Called when one group's analysis finishes.
    fn on_group_complete(&self, label: usize, success: bool);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: PipelineStage);

    /// Called once clustering has produced the groups.
    fn on_groups_formed(&self, _partition: &Partition) {}

    /// Called before an oracle call is retried. `label` is `None` for the
    /// run-level resource recommendation.
    fn on_retry(&self, _label: Option<usize>, _attempt: u32, _delay: Duration, _error: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl AnalysisProgress for NoProgress {
    fn on_stage_start(&self, _stage: PipelineStage, _total: usize) {}
    fn on_group_complete(&self, _label: usize, _success: bool) {}
    fn on_stage_complete(&self, _stage: PipelineStage) {}
}
