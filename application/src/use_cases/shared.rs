//! Shared utilities for use cases.
//!
//! Contains the retrying structured oracle request used by both the group
//! analyzer and the result aggregator, plus cancellation helpers.

use crate::ports::chat_oracle::ChatOracle;
use crate::retry::RetryPolicy;
use crate::use_cases::analyze_group::AnalysisError;
use insight_domain::ParseOutcome;
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Callback invoked before each retry of an oracle request.
pub(crate) type RetryObserver<'a> = dyn Fn(u32, Duration, &AnalysisError) + Send + Sync + 'a;

/// Send `prompt` through `retry` and recover a structured value from the
/// reply.
///
/// Transport failures and unparseable replies share one attempt budget.
pub(crate) async fn request_structured<O: ChatOracle + ?Sized>(
    oracle: &O,
    retry: &RetryPolicy,
    prompt: &str,
    on_retry: &RetryObserver<'_>,
) -> Result<Value, AnalysisError> {
    retry
        .execute_observed(
            |attempt| async move {
                debug!(
                    "Oracle request (attempt {}, {} chars)",
                    attempt,
                    prompt.len()
                );
                let reply = oracle.send(prompt).await?;
                debug!("Oracle reply: {} chars", reply.len());

                match oracle.extract_structured(&reply) {
                    ParseOutcome::Parsed(value) => Ok(value),
                    ParseOutcome::Unparsed(raw) => Err(AnalysisError::Malformed { raw }),
                }
            },
            on_retry,
        )
        .await
}

/// Resolves when the token is cancelled, never when there is no token.
pub(crate) async fn cancelled(token: &Option<CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}
