//! Clustering configuration from TOML (`[clustering]` section)

use insight_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Largest possible cosine distance.
const MAX_COSINE_DISTANCE: f32 = 2.0;

/// Raw clustering configuration from TOML
///
/// ```toml
/// [clustering]
/// threshold = 0.7   # cosine distance at or below which groups merge
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileClusteringConfig {
    pub threshold: f32,
}

impl Default for FileClusteringConfig {
    fn default() -> Self {
        Self { threshold: 0.7 }
    }
}

impl FileClusteringConfig {
    /// Validate the threshold. Invalid values fall back to the default.
    pub fn parse_threshold(&self) -> (f32, Vec<ConfigIssue>) {
        check_threshold(self.threshold, "clustering.threshold")
    }
}

fn check_threshold(threshold: f32, field: &str) -> (f32, Vec<ConfigIssue>) {
    if !threshold.is_finite() || threshold < 0.0 {
        let issue = ConfigIssue::error(
            ConfigIssueCode::InvalidThreshold,
            format!(
                "{}: {} is not a finite, non-negative distance",
                field, threshold
            ),
        );
        return (FileClusteringConfig::default().threshold, vec![issue]);
    }

    if threshold >= MAX_COSINE_DISTANCE {
        let issue = ConfigIssue::warning(
            ConfigIssueCode::ThresholdMergesEverything,
            format!(
                "{}: {} puts every question into a single group",
                field, threshold
            ),
        );
        return (threshold, vec![issue]);
    }

    (threshold, vec![])
}
