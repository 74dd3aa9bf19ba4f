//! Structured configuration issues.
//!
//! Loaders report every problem they find at once instead of stopping at the
//! first; callers decide what to do based on [`Severity`].

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `oracle.backend` names no known backend.
    UnknownBackend,
    /// `oracle.model` is empty.
    EmptyModel,
    /// `oracle.base_url` is not an http(s) URL.
    InvalidBaseUrl,
    /// `oracle.timeout_seconds` is zero.
    ZeroTimeout,
    /// `retry.max_attempts` is zero and will be treated as one.
    ZeroAttempts,
    /// `retry.base_delay_ms` exceeds `retry.max_delay_ms`.
    DelayBoundsInverted,
    /// `clustering.threshold` is negative or not finite.
    InvalidThreshold,
    /// `clustering.threshold` is above 2, the largest cosine distance.
    ThresholdMergesEverything,
    /// `embedding.backend` names no known embedder.
    UnknownEmbeddingBackend,
    /// `embedding.dimensions` is zero.
    ZeroDimensions,
    /// `pipeline.max_concurrency` is zero.
    ZeroConcurrency,
    /// `pipeline.failure_policy` is not a known policy.
    UnknownFailurePolicy,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Whether any issue in `issues` is fatal.
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}
