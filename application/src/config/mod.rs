//! Application-level configuration.
//!
//! - [`PipelineParams`]: clustering threshold, concurrency, deadlines,
//!   failure handling and retry settings for one pipeline run

pub mod pipeline_params;

pub use pipeline_params::PipelineParams;
