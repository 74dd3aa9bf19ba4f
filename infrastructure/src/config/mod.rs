//! Configuration file loading for question-insight
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `QUESTION_INSIGHT_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./question-insight.toml` or `./.question-insight.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/question-insight/config.toml`
//! 5. Fallback: `~/.config/question-insight/config.toml`
//! 6. Default values
//!
//! Command-line flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    FileClusteringConfig, FileConfig, FileEmbeddingConfig, FileOracleConfig, FileOutputConfig,
    FilePipelineConfig, FileRetryConfig,
};
pub use loader::ConfigLoader;
