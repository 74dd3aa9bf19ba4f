//! Progress reporting for pipeline execution

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use insight_application::{AnalysisProgress, PipelineStage};
use insight_domain::Partition;
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress during a pipeline run with fancy progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn stage_display_name(stage: PipelineStage) -> &'static str {
        match stage {
            PipelineStage::Embedding => "Stage 1: Embedding",
            PipelineStage::Clustering => "Stage 2: Clustering",
            PipelineStage::Analysis => "Stage 3: Group Analysis",
            PipelineStage::Recommendation => "Stage 4: Resources",
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.stage_bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisProgress for ProgressReporter {
    fn on_stage_start(&self, stage: PipelineStage, total: usize) {
        let bar = self.multi.add(ProgressBar::new(total as u64));
        bar.set_style(Self::stage_style());
        bar.set_prefix(Self::stage_display_name(stage).to_string());
        bar.set_message("Starting...");
        bar.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut guard) = self.stage_bar.lock()
            && let Some(previous) = guard.replace(bar)
        {
            previous.abandon();
        }
    }

    fn on_group_complete(&self, label: usize, success: bool) {
        self.with_bar(|bar| {
            let status = if success {
                format!("{} group {}", "v".green(), label)
            } else {
                format!("{} group {}", "x".red(), label)
            };
            bar.set_message(status);
            bar.inc(1);
        });
    }

    fn on_stage_complete(&self, stage: PipelineStage) {
        let taken = self.stage_bar.lock().ok().and_then(|mut guard| guard.take());
        if let Some(bar) = taken {
            if stage != PipelineStage::Analysis {
                bar.set_position(bar.length().unwrap_or(0));
            }
            bar.finish_with_message(format!("{} complete!", stage.as_str().green()));
        }
    }

    fn on_groups_formed(&self, partition: &Partition) {
        let _ = self.multi.println(format!(
            "  {} {} questions -> {} groups",
            "->".cyan(),
            partition.question_count(),
            partition.len()
        ));
    }

    fn on_retry(&self, label: Option<usize>, attempt: u32, delay: Duration, _error: &str) {
        let target = match label {
            Some(label) => format!("group {}", label),
            None => "resources".to_string(),
        };
        self.with_bar(|bar| {
            bar.set_message(format!(
                "{} retrying {} (attempt {}) in {:.1}s",
                "!".yellow(),
                target,
                attempt + 1,
                delay.as_secs_f64()
            ));
        });
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl AnalysisProgress for SimpleProgress {
    fn on_stage_start(&self, stage: PipelineStage, total: usize) {
        let stage_name = ProgressReporter::stage_display_name(stage);
        eprintln!("{} {} ({} items)", "->".cyan(), stage_name.bold(), total);
    }

    fn on_group_complete(&self, label: usize, success: bool) {
        if success {
            eprintln!("  {} group {}", "v".green(), label);
        } else {
            eprintln!("  {} group {} (failed)", "x".red(), label);
        }
    }

    fn on_stage_complete(&self, _stage: PipelineStage) {}

    fn on_groups_formed(&self, partition: &Partition) {
        eprintln!(
            "  {} questions -> {} groups",
            partition.question_count(),
            partition.len()
        );
    }

    fn on_retry(&self, label: Option<usize>, attempt: u32, delay: Duration, error: &str) {
        let target = label
            .map(|l| format!("group {}", l))
            .unwrap_or_else(|| "resources".to_string());
        eprintln!(
            "  {} {} attempt {} failed ({}), retrying in {:.1}s",
            "!".yellow(),
            target,
            attempt,
            error,
            delay.as_secs_f64()
        );
    }
}
