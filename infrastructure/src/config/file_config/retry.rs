//! Retry configuration from TOML (`[retry]` section)

use insight_application::RetryPolicy;
use insight_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw retry configuration from TOML
///
/// ```toml
/// [retry]
/// max_attempts = 3
/// base_delay_ms = 1000
/// max_delay_ms = 10000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// Total attempts per oracle call, including the first
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            base_delay_ms: policy.base_delay.as_millis() as u64,
            max_delay_ms: policy.max_delay.as_millis() as u64,
        }
    }
}

impl FileRetryConfig {
    /// Convert to a [`RetryPolicy`], returning warnings for values that get
    /// adjusted.
    pub fn to_policy(&self) -> (RetryPolicy, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        if self.max_attempts == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroAttempts,
                "retry.max_attempts is 0, making a single attempt",
            ));
        }

        let base_delay = Duration::from_millis(self.base_delay_ms);
        let mut max_delay = Duration::from_millis(self.max_delay_ms);
        if base_delay > max_delay {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::DelayBoundsInverted,
                format!(
                    "retry.base_delay_ms ({}) exceeds retry.max_delay_ms ({}), capping at {} ms",
                    self.base_delay_ms, self.max_delay_ms, self.base_delay_ms
                ),
            ));
            max_delay = base_delay;
        }

        let policy = RetryPolicy::new(self.max_attempts.max(1), base_delay, max_delay);
        (policy, issues)
    }
}
