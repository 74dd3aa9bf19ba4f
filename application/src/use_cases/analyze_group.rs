//! Analyze group use case
//!
//! Turns one group of questions into a validated [`GroupAnalysis`]:
//! prompt → oracle (through the retry policy) → JSON recovery → validation.

use crate::ports::chat_oracle::{ChatOracle, OracleError};
use crate::ports::progress::AnalysisProgress;
use crate::retry::{RetryPolicy, Retryable};
use crate::use_cases::shared::{RetryObserver, request_structured};
use insight_domain::{
    GroupAnalysis, PromptTemplate, ValidationError, truncate, validate_group_analysis,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while analysing a group
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Malformed oracle reply: {}", truncate(.raw, 200))]
    Malformed { raw: String },

    #[error("Invalid analysis: {0}")]
    Validation(#[from] ValidationError),
}

impl Retryable for AnalysisError {
    fn is_retryable(&self) -> bool {
        match self {
            AnalysisError::Oracle(e) => e.is_retryable(),
            AnalysisError::Malformed { .. } => true,
            AnalysisError::Validation(_) => false,
        }
    }
}

/// Use case for analysing one group of questions
pub struct GroupAnalyzer<O: ChatOracle + ?Sized> {
    oracle: Arc<O>,
    retry: RetryPolicy,
}

impl<O: ChatOracle + ?Sized> GroupAnalyzer<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self {
            oracle,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Analyse the questions of one group, given in first-seen order.
    pub async fn analyze<S: AsRef<str>>(
        &self,
        questions: &[S],
    ) -> Result<GroupAnalysis, AnalysisError> {
        self.analyze_observed(questions, &|_, _, _| {}).await
    }

    /// Analyse with retry notifications for the group `label`.
    pub async fn analyze_with_progress<S: AsRef<str>>(
        &self,
        label: usize,
        questions: &[S],
        progress: &dyn AnalysisProgress,
    ) -> Result<GroupAnalysis, AnalysisError> {
        let notify = |attempt: u32, delay: Duration, err: &AnalysisError| {
            progress.on_retry(Some(label), attempt, delay, &err.to_string());
        };
        self.analyze_observed(questions, &notify).await
    }

    pub(crate) async fn analyze_observed<S: AsRef<str>>(
        &self,
        questions: &[S],
        on_retry: &RetryObserver<'_>,
    ) -> Result<GroupAnalysis, AnalysisError> {
        debug!("Analysing group of {} questions", questions.len());
        let prompt = PromptTemplate::group_analysis(questions);

        let value = request_structured(self.oracle.as_ref(), &self.retry, &prompt, on_retry).await?;

        // Content problems are final: validation runs outside the retry loop.
        let analysis = validate_group_analysis(&value)?;
        debug!(
            "Group analysed as '{}' (level {})",
            analysis.category(),
            analysis.expertise_level().value()
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::shared::testing::{RecordingProgress, ScriptedOracle};
    use insight_domain::ANALYSIS_EXAMPLE_JSON;
    use serde_json::json;

    fn analyzer(oracle: &Arc<ScriptedOracle>) -> GroupAnalyzer<ScriptedOracle> {
        GroupAnalyzer::new(Arc::clone(oracle)).with_retry(RetryPolicy::new(
            3,
            Duration::ZERO,
            Duration::ZERO,
        ))
    }

    fn reply(value: serde_json::Value) -> Result<String, OracleError> {
        Ok(value.to_string())
    }

    fn valid_reply() -> Result<String, OracleError> {
        reply(json!({
            "category": "Billing",
            "expertise_level": 1,
            "knowledge_gaps": ["Refund terms"],
            "recommendations": ["Read the refund policy"]
        }))
    }

    #[tokio::test]
    async fn test_analyzes_noisy_reply() {
        let oracle = Arc::new(ScriptedOracle::new(vec![Ok(format!(
            "Sure! Here is the analysis:\n```json\n{}\n```",
            ANALYSIS_EXAMPLE_JSON
        ))]));

        let analysis = analyzer(&oracle)
            .analyze(&["How do I install Python?"])
            .await
            .unwrap();

        assert_eq!(analysis.category(), "Python Development");
        assert_eq!(analysis.expertise_level().value(), 2);
        assert_eq!(oracle.calls(), 1);
    }

    #[tokio::test]
    async fn test_prompt_contains_questions_in_order() {
        let oracle = Arc::new(ScriptedOracle::new(vec![valid_reply()]));
        analyzer(&oracle)
            .analyze(&["What's your refund policy?", "How much does it cost?"])
            .await
            .unwrap();

        let prompt = &oracle.prompts()[0];
        let first = prompt.find("What's your refund policy?").unwrap();
        let second = prompt.find("How much does it cost?").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_out_of_range_level_is_not_retried() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            reply(json!({"category": "Billing", "expertise_level": 7})),
            valid_reply(),
        ]));

        let err = analyzer(&oracle).analyze(&["q"]).await.unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Validation(ValidationError::ExpertiseOutOfRange(_))
        ));
        assert_eq!(oracle.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_integer_level_is_not_retried() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            reply(json!({"category": "Billing", "expertise_level": "high"})),
            valid_reply(),
        ]));

        let err = analyzer(&oracle).analyze(&["q"]).await.unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Validation(ValidationError::WrongType { .. })
        ));
        assert!(!err.is_retryable());
        assert_eq!(oracle.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_reply_is_retried() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            Ok("I'm not sure what you mean.".to_string()),
            valid_reply(),
        ]));

        let analysis = analyzer(&oracle).analyze(&["q"]).await.unwrap();

        assert_eq!(analysis.category(), "Billing");
        assert_eq!(oracle.calls(), 2);
    }

    #[tokio::test]
    async fn test_malformed_replies_exhaust_budget() {
        let oracle = Arc::new(ScriptedOracle::answering(|_| {
            Ok("no structure here".to_string())
        }));

        let err = analyzer(&oracle).analyze(&["q"]).await.unwrap_err();

        match err {
            AnalysisError::Malformed { raw } => assert_eq!(raw, "no structure here"),
            other => panic!("expected Malformed, got {:?}", other),
        }
        assert_eq!(oracle.calls(), 3);
    }

    #[tokio::test]
    async fn test_transport_failures_then_success() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            Err(OracleError::Connection("refused".to_string())),
            Err(OracleError::Timeout(Duration::from_secs(60))),
            valid_reply(),
        ]));

        let analysis = analyzer(&oracle).analyze(&["q"]).await.unwrap();

        assert_eq!(analysis.category(), "Billing");
        assert_eq!(oracle.calls(), 3);
    }

    #[tokio::test]
    async fn test_transport_failures_exhaust_budget() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            Err(OracleError::Connection("refused".to_string())),
            Err(OracleError::Connection("refused".to_string())),
            valid_reply(),
        ]));

        let err = GroupAnalyzer::new(Arc::clone(&oracle))
            .with_retry(RetryPolicy::new(2, Duration::ZERO, Duration::ZERO))
            .analyze(&["q"])
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Oracle(OracleError::Connection(_))));
        assert_eq!(oracle.calls(), 2);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            Err(OracleError::Status {
                status: 404,
                body: "model not found".to_string(),
            }),
            valid_reply(),
        ]));

        let err = analyzer(&oracle).analyze(&["q"]).await.unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Oracle(OracleError::Status { status: 404, .. })
        ));
        assert_eq!(oracle.calls(), 1);
    }

    #[tokio::test]
    async fn test_retries_are_reported_with_label() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            Err(OracleError::Status {
                status: 503,
                body: String::new(),
            }),
            valid_reply(),
        ]));
        let progress = RecordingProgress::default();

        analyzer(&oracle)
            .analyze_with_progress(4, &["q"], &progress)
            .await
            .unwrap();

        assert_eq!(progress.events(), vec!["retry Some(4) 1"]);
    }

    #[test]
    fn test_malformed_display_is_truncated() {
        let err = AnalysisError::Malformed {
            raw: "x".repeat(1000),
        };
        assert!(err.to_string().len() < 300);
    }
}
