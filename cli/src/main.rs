//! CLI entrypoint for question-insight
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use insight_application::{
    AnalysisProgress, NoProgress, RunPipelineInput, RunPipelineUseCase,
};
use insight_domain::{AnalysisRecord, ConfigIssue, OutputFormat, Severity};
use insight_infrastructure::{
    ConfigLoader, FileConfig, HttpChatOracle, JsonlRecordWriter, OracleBackend,
    read_conversation_export, read_questions_file,
};
use insight_presentation::{Cli, ConsoleFormatter, OutputFormatter, ProgressReporter};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    info!("Starting question-insight");

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&mut config, &cli);
    report_config_issues(&config.validate())?;

    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    ConsoleFormatter::set_color(config.output.color && !cli.no_color);

    // === Input ===
    let questions = collect_questions(&cli)?;
    if questions.is_empty() {
        bail!("No questions given. Pass questions as arguments, or use --questions-file or --export.");
    }

    // === Dependency Injection ===
    let (backend, _) = config.oracle.parse_backend();
    let (settings, _) = config.oracle.to_settings();
    let oracle = match backend {
        OracleBackend::OpenAiCompatible => Arc::new(
            HttpChatOracle::new(settings).context("Failed to create chat oracle client")?,
        ),
    };
    let (embedder_settings, _) = config.to_embedder_settings();
    let embedder_backend = embedder_settings.backend();
    let embedder = embedder_settings
        .build()
        .context("Failed to create embedder")?;
    let (params, _) = config.to_pipeline_params();

    info!(
        "Oracle {} at {}, embedder {} ({}), {} questions, threshold {}",
        oracle.model(),
        oracle.endpoint(),
        embedder.name(),
        embedder_backend,
        questions.len(),
        params.threshold
    );

    let cancellation = CancellationToken::new();
    spawn_ctrl_c_handler(cancellation.clone());

    let use_case =
        RunPipelineUseCase::new(oracle, embedder).with_cancellation(cancellation);
    let input = RunPipelineInput::from_texts(questions).with_params(params);

    // Execute with or without progress reporting
    let reporter;
    let progress: &dyn AnalysisProgress = if cli.quiet || format == OutputFormat::Json {
        &NoProgress
    } else {
        reporter = ProgressReporter::new();
        &reporter
    };
    let result = use_case
        .execute_with_progress(input, progress)
        .await
        .context("Pipeline run failed")?;

    if result.is_partial() {
        warn!(
            "{} of {} groups could not be analysed",
            result.failures().len(),
            result.groups().len()
        );
    }

    // === Records ===
    if let Some(path) = &cli.records {
        let records = AnalysisRecord::from_result(&result, chrono::Utc::now());
        let writer = JsonlRecordWriter::open(path)
            .with_context(|| format!("Failed to open record file {}", path.display()))?;
        let written = writer.write_all(&records)?;
        info!("Appended {} records to {}", written, writer.path().display());
    }

    println!("{}", ConsoleFormatter.render(&result, format));

    Ok(())
}

/// Install the tracing subscriber. Keep the returned guard alive until exit
/// so buffered file logs are flushed.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    // RUST_LOG wins over the verbosity flag
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    match &cli.log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path {}", path.display()))?;
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            std::fs::create_dir_all(directory).with_context(|| {
                format!("Failed to create log directory {}", directory.display())
            })?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// Command-line flags take precedence over every configuration source.
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(threshold) = cli.threshold {
        config.clustering.threshold = threshold;
    }
    if let Some(model) = &cli.model {
        config.oracle.model = model.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.oracle.base_url = base_url.clone();
    }
    if let Some(backend) = &cli.embedder {
        config.embedding.backend = backend.clone();
    }
    if let Some(model) = &cli.embedding_model {
        config.embedding.model = model.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.pipeline.max_concurrency = concurrency;
    }
    if cli.fail_fast {
        config.pipeline.failure_policy = "abort-on-first".to_string();
    }
    if cli.no_resources {
        config.pipeline.recommend_resources = false;
    }
}

fn report_config_issues(issues: &[ConfigIssue]) -> Result<()> {
    for issue in issues {
        match issue.severity {
            Severity::Warning => warn!("{}", issue.message),
            Severity::Error => eprintln!("error: {}", issue.message),
        }
    }
    if ConfigIssue::has_errors(issues) {
        bail!("Invalid configuration (run with --show-config to see which files were loaded)");
    }
    Ok(())
}

/// Positional questions first, then the questions file, then the export.
fn collect_questions(cli: &Cli) -> Result<Vec<String>> {
    let mut questions: Vec<String> = cli
        .questions
        .iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();

    if let Some(path) = &cli.questions_file {
        questions.extend(read_questions_file(path)?);
    }
    if let Some(path) = &cli.export {
        let exported = read_conversation_export(path)?;
        info!("Read {} questions from {}", exported.len(), path.display());
        questions.extend(exported);
    }

    Ok(questions)
}

fn spawn_ctrl_c_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling run");
            token.cancel();
        }
    });
}
