//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for pipeline results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every group with its questions and analysis
    Full,
    /// Overall category, expertise, knowledge gaps and resources
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for insight_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => insight_domain::OutputFormat::Full,
            OutputFormat::Summary => insight_domain::OutputFormat::Summary,
            OutputFormat::Json => insight_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for question-insight
#[derive(Parser, Debug)]
#[command(name = "question-insight")]
#[command(
    author,
    version,
    about = "Group similar questions and ask an LLM what they reveal about the asker"
)]
#[command(long_about = r#"
question-insight groups a batch of user questions by similarity and asks a
chat model to describe each group.

The run has four stages:
1. Embedding: every question becomes a vector
2. Clustering: similar questions are grouped (cosine distance threshold)
3. Analysis: the model names each group's category, expertise level,
   knowledge gaps and recommendations
4. Recommendation: learning resources for the dominant category

Configuration files are loaded from (in priority order):
1. QUESTION_INSIGHT_* environment variables
2. --config <path>                 Explicit config file
3. ./question-insight.toml         Project-level config
4. ~/.config/question-insight/config.toml   Global config

Example:
  question-insight "How do I reverse a list?" "How do I sort a list?" "Where is my refund?"
  question-insight --questions-file backlog.txt --output full
  question-insight --export conversations.json --records analyses.jsonl
"#)]
pub struct Cli {
    /// Questions to analyse
    #[arg(value_name = "QUESTION")]
    pub questions: Vec<String>,

    /// Read questions from a file, one per line
    #[arg(long, value_name = "PATH")]
    pub questions_file: Option<PathBuf>,

    /// Read user questions from a chat conversation export (JSON)
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Cosine distance at or below which questions are grouped
    #[arg(short, long, value_name = "DISTANCE")]
    pub threshold: Option<f32>,

    /// Chat model to ask
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Base URL of the OpenAI-compatible server
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Embedding backend (http, hashing)
    #[arg(long, value_name = "BACKEND")]
    pub embedder: Option<String>,

    /// Embedding model served by the embedding backend
    #[arg(long, value_name = "MODEL")]
    pub embedding_model: Option<String>,

    /// Maximum number of groups analysed concurrently
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Append one analysis record per question to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub records: Option<PathBuf>,

    /// Stop at the first group that cannot be analysed
    #[arg(long)]
    pub fail_fast: bool,

    /// Skip the learning resource recommendation
    #[arg(long)]
    pub no_resources: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Whether any question source was given.
    pub fn has_input(&self) -> bool {
        !self.questions.is_empty() || self.questions_file.is_some() || self.export.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_positional_questions() {
        let cli = Cli::parse_from(["question-insight", "What is pip?", "What is venv?"]);
        assert_eq!(cli.questions, vec!["What is pip?", "What is venv?"]);
        assert!(cli.has_input());
        assert!(cli.output.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "question-insight",
            "--questions-file",
            "backlog.txt",
            "-t",
            "0.4",
            "-m",
            "llama3.1",
            "-o",
            "json",
            "--embedder",
            "hashing",
            "--embedding-model",
            "mxbai-embed-large",
            "--fail-fast",
            "--no-resources",
            "-vv",
        ]);
        assert_eq!(cli.questions_file, Some(PathBuf::from("backlog.txt")));
        assert_eq!(cli.threshold, Some(0.4));
        assert_eq!(cli.model.as_deref(), Some("llama3.1"));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.embedder.as_deref(), Some("hashing"));
        assert_eq!(cli.embedding_model.as_deref(), Some("mxbai-embed-large"));
        assert!(cli.fail_fast);
        assert!(cli.no_resources);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_no_input() {
        let cli = Cli::parse_from(["question-insight", "--show-config"]);
        assert!(!cli.has_input());
        assert!(cli.show_config);
    }

    #[test]
    fn test_output_format_into_domain() {
        let format: insight_domain::OutputFormat = OutputFormat::Full.into();
        assert_eq!(format, insight_domain::OutputFormat::Full);
    }
}
