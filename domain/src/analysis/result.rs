//! Run-level pipeline result

use super::aggregate::{ExpertiseSummary, dominant_category, union_knowledge_gaps};
use super::entities::{GroupAnalysis, ResourceRecommendation};
use crate::clustering::{Group, Partition};
use serde::Serialize;
use std::collections::BTreeMap;

/// A group whose analysis did not produce a validated result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupFailure {
    pub label: usize,
    pub error: String,
    /// Full oracle reply when the failure was an unparseable reply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_reply: Option<String>,
}

impl GroupFailure {
    pub fn new(label: usize, error: impl Into<String>) -> Self {
        Self {
            label,
            error: error.into(),
            raw_reply: None,
        }
    }

    pub fn with_raw_reply(mut self, raw: impl Into<String>) -> Self {
        self.raw_reply = Some(raw.into());
        self
    }
}

/// Outcome of one run of the pipeline.
///
/// Analyses are keyed and iterated by group label, independent of the order
/// in which groups finished.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    groups: Partition,
    analyses: BTreeMap<usize, GroupAnalysis>,
    dominant_category: Option<String>,
    expertise_summary: Option<ExpertiseSummary>,
    knowledge_gaps: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    resources: Vec<ResourceRecommendation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<GroupFailure>,
}

impl PipelineResult {
    /// Build a result from validated analyses, deriving the run-level fields.
    pub fn from_analyses(analyses: BTreeMap<usize, GroupAnalysis>) -> Self {
        Self {
            groups: Partition::default(),
            dominant_category: dominant_category(&analyses),
            expertise_summary: ExpertiseSummary::from_analyses(&analyses),
            knowledge_gaps: union_knowledge_gaps(&analyses),
            analyses,
            resources: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn with_partition(mut self, groups: Partition) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_failures(mut self, mut failures: Vec<GroupFailure>) -> Self {
        failures.sort_by_key(|f| f.label);
        self.failures = failures;
        self
    }

    pub fn with_resources(mut self, resources: Vec<ResourceRecommendation>) -> Self {
        self.resources = resources;
        self
    }

    pub fn groups(&self) -> &Partition {
        &self.groups
    }

    pub fn group(&self, label: usize) -> Option<&Group> {
        self.groups.group(label)
    }

    pub fn analyses(&self) -> &BTreeMap<usize, GroupAnalysis> {
        &self.analyses
    }

    pub fn analysis(&self, label: usize) -> Option<&GroupAnalysis> {
        self.analyses.get(&label)
    }

    pub fn dominant_category(&self) -> Option<&str> {
        self.dominant_category.as_deref()
    }

    pub fn expertise_summary(&self) -> Option<&ExpertiseSummary> {
        self.expertise_summary.as_ref()
    }

    pub fn knowledge_gaps(&self) -> &[String] {
        &self.knowledge_gaps
    }

    pub fn resources(&self) -> &[ResourceRecommendation] {
        &self.resources
    }

    pub fn failures(&self) -> &[GroupFailure] {
        &self.failures
    }

    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}
