//! Pipeline configuration from TOML (`[pipeline]` section)

use insight_domain::{ConfigIssue, ConfigIssueCode, FailurePolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw pipeline configuration from TOML
///
/// # Example
///
/// ```toml
/// [pipeline]
/// max_concurrency = 4
/// group_timeout_seconds = 300     # 0 disables the per-group deadline
/// failure_policy = "collect-partial"   # or "abort-on-first"
/// recommend_resources = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    pub max_concurrency: usize,
    pub group_timeout_seconds: u64,
    pub failure_policy: String,
    pub recommend_resources: bool,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            group_timeout_seconds: 300,
            failure_policy: FailurePolicy::default().to_string(),
            recommend_resources: true,
        }
    }
}

impl FilePipelineConfig {
    /// Parse failure_policy string into FailurePolicy enum
    ///
    /// Accepts: "collect-partial", "collect", "partial", "abort-on-first",
    /// "abort", "fail-fast"
    pub fn parse_failure_policy(&self) -> (FailurePolicy, Vec<ConfigIssue>) {
        match self.failure_policy.parse::<FailurePolicy>() {
            Ok(policy) => (policy, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::UnknownFailurePolicy,
                    format!(
                        "pipeline.failure_policy: unknown value '{}', falling back to '{}'",
                        self.failure_policy,
                        FailurePolicy::default()
                    ),
                );
                (FailurePolicy::default(), vec![issue])
            }
        }
    }

    pub fn parse_max_concurrency(&self) -> (usize, Vec<ConfigIssue>) {
        if self.max_concurrency == 0 {
            let issue = ConfigIssue::warning(
                ConfigIssueCode::ZeroConcurrency,
                "pipeline.max_concurrency is 0, analysing one group at a time",
            );
            return (1, vec![issue]);
        }
        (self.max_concurrency, vec![])
    }

    /// Per-group deadline; `None` when disabled.
    pub fn group_timeout(&self) -> Option<Duration> {
        (self.group_timeout_seconds > 0).then(|| Duration::from_secs(self.group_timeout_seconds))
    }
}
