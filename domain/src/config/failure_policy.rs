//! What a run does when one group cannot be analysed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure handling across independent group analyses.
///
/// - **CollectPartial** (default): keep going, report failed groups next to
///   the successful ones. The run only fails when no group succeeds.
/// - **AbortOnFirst**: cancel outstanding groups on the first failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    AbortOnFirst,
    #[default]
    CollectPartial,
}

impl FailurePolicy {
    pub fn is_abort_on_first(&self) -> bool {
        matches!(self, FailurePolicy::AbortOnFirst)
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::AbortOnFirst => write!(f, "abort-on-first"),
            FailurePolicy::CollectPartial => write!(f, "collect-partial"),
        }
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "abort-on-first" | "abort" | "fail-fast" => Ok(FailurePolicy::AbortOnFirst),
            "collect-partial" | "collect" | "partial" => Ok(FailurePolicy::CollectPartial),
            _ => Err(format!("Invalid FailurePolicy: {}", s)),
        }
    }
}
