//! Application layer for question-insight
//!
//! This crate contains use cases, port definitions, the retry policy and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod retry;
pub mod use_cases;

// Re-export commonly used types
pub use config::PipelineParams;
pub use ports::{
    chat_oracle::{ChatOracle, OracleError},
    embedder::{EmbeddingError, TextEmbedder},
    progress::{AnalysisProgress, NoProgress, PipelineStage},
};
pub use retry::{RetryPolicy, Retryable};
pub use use_cases::aggregate_results::ResultAggregator;
pub use use_cases::analyze_group::{AnalysisError, GroupAnalyzer};
pub use use_cases::group_questions::{GroupingError, SimilarityGrouper};
pub use use_cases::run_pipeline::{
    GroupError, PipelineError, RunPipelineInput, RunPipelineUseCase,
};
