//! Domain layer for question-insight
//!
//! This crate contains the core logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Clustering
//!
//! Questions are embedded into vectors and grouped by average-linkage
//! agglomerative clustering over cosine distance. Two clusters merge while
//! their mean cross-pair distance is at most the configured threshold.
//!
//! ## Analysis
//!
//! Each group is described by a chat oracle as a [`GroupAnalysis`]. Oracle
//! replies are untrusted: they are recovered with [`extract_structured`] and
//! checked with [`validate_group_analysis`] before anything else sees them.

pub mod analysis;
pub mod clustering;
pub mod config;
pub mod core;
pub mod prompt;

// Re-export commonly used types
pub use analysis::{
    AnalysisRecord, ExpertiseBand, ExpertiseLevel, ExpertiseSummary, GroupAnalysis, GroupFailure,
    ParseOutcome, PipelineResult, ResourceRecommendation, ValidationError, extract_structured,
    validate_group_analysis, validate_resources,
};
pub use clustering::{ClusteringError, Embedding, Group, Partition, group_by_similarity};
pub use config::{ConfigIssue, ConfigIssueCode, FailurePolicy, OutputFormat, Severity};
pub use core::{
    model::Model,
    question::{Question, QuestionId},
    string::truncate,
};
pub use prompt::{ANALYSIS_EXAMPLE_JSON, PromptTemplate, RESOURCES_EXAMPLE_JSON};
