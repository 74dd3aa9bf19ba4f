//! Output formatter trait

use insight_domain::{OutputFormat, PipelineResult};

/// Trait for formatting pipeline results
pub trait OutputFormatter {
    /// Every group with its questions and full analysis
    fn format_full(&self, result: &PipelineResult) -> String;

    /// Run-level summary only
    fn format_summary(&self, result: &PipelineResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &PipelineResult) -> String;

    fn render(&self, result: &PipelineResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format_full(result),
            OutputFormat::Summary => self.format_summary(result),
            OutputFormat::Json => self.format_json(result),
        }
    }
}
