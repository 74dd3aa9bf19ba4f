//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod clustering;
mod embedding;
mod oracle;
mod output;
mod pipeline;
mod retry;

pub use clustering::FileClusteringConfig;
pub use embedding::FileEmbeddingConfig;
pub use oracle::FileOracleConfig;
pub use output::FileOutputConfig;
pub use pipeline::FilePipelineConfig;
pub use retry::FileRetryConfig;

use crate::embedding::EmbedderSettings;
use insight_application::PipelineParams;
use insight_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat oracle connection
    pub oracle: FileOracleConfig,
    /// Backoff for oracle calls
    pub retry: FileRetryConfig,
    /// Similarity grouping
    pub clustering: FileClusteringConfig,
    /// Question embedding
    pub embedding: FileEmbeddingConfig,
    /// Run control
    pub pipeline: FilePipelineConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.oracle.parse_backend().1);
        issues.extend(self.oracle.to_settings().1);
        issues.extend(self.to_embedder_settings().1);
        issues.extend(self.to_pipeline_params().1);

        issues
    }

    /// Resolve `[embedding]` against the oracle connection it falls back on.
    pub fn to_embedder_settings(&self) -> (EmbedderSettings, Vec<ConfigIssue>) {
        let (oracle, _) = self.oracle.to_settings();
        self.embedding.to_settings(&oracle)
    }

    /// Assemble the use-case parameters from `[clustering]`, `[retry]` and
    /// `[pipeline]`.
    pub fn to_pipeline_params(&self) -> (PipelineParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let (threshold, threshold_issues) = self.clustering.parse_threshold();
        issues.extend(threshold_issues);
        let (retry, retry_issues) = self.retry.to_policy();
        issues.extend(retry_issues);
        let (max_concurrency, concurrency_issues) = self.pipeline.parse_max_concurrency();
        issues.extend(concurrency_issues);
        let (failure_policy, policy_issues) = self.pipeline.parse_failure_policy();
        issues.extend(policy_issues);

        let params = PipelineParams::default()
            .with_threshold(threshold)
            .with_max_concurrency(max_concurrency)
            .with_group_timeout(self.pipeline.group_timeout())
            .with_failure_policy(failure_policy)
            .with_recommend_resources(self.pipeline.recommend_resources)
            .with_retry(retry);

        (params, issues)
    }
}
