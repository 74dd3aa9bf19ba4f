//! Console output formatter for pipeline results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use insight_domain::{GroupAnalysis, PipelineResult};

/// Formats pipeline results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Enable or disable ANSI colors for everything this crate prints.
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Format every group followed by the run-level summary
    pub fn format_full(result: &PipelineResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Question Insight Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {} questions in {} groups\n",
            "Input:".cyan().bold(),
            result.groups().question_count(),
            result.groups().len()
        ));

        output.push_str(&Self::section_header("Groups"));
        for group in result.groups().groups() {
            let label = group.label();
            match result.analysis(label) {
                Some(analysis) => {
                    output.push_str(&format!(
                        "\n{}\n",
                        format!("── Group {}: {} ──", label, analysis.category())
                            .yellow()
                            .bold()
                    ));
                    output.push_str(&Self::questions(group.texts()));
                    output.push_str(&Self::analysis_details(analysis));
                }
                None => {
                    output.push_str(&format!(
                        "\n{}\n",
                        format!("── Group {}: not analysed ──", label).red().bold()
                    ));
                    output.push_str(&Self::questions(group.texts()));
                }
            }
        }

        if !result.failures().is_empty() {
            output.push_str(&Self::section_header("Failures"));
            for failure in result.failures() {
                output.push_str(&format!(
                    "  {} Group {}: {}\n",
                    "x".red(),
                    failure.label,
                    failure.error
                ));
            }
        }

        output.push_str(&Self::section_header("Overall"));
        output.push_str(&Self::overview(result));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &PipelineResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the run-level summary only (concise output)
    pub fn format_summary(result: &PipelineResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Question Insight Summary ===".cyan().bold()
        ));

        output.push_str(&Self::overview(result));

        output.push_str(&format!("\n{}\n", "Groups:".dimmed()));
        for (label, analysis) in result.analyses() {
            let size = result.group(*label).map(|g| g.len()).unwrap_or(0);
            output.push_str(&format!(
                "  {:>3}  {} ({}, {} question{})\n",
                label,
                analysis.category(),
                analysis.expertise_level(),
                size,
                if size == 1 { "" } else { "s" }
            ));
        }

        if result.is_partial() {
            output.push_str(&format!(
                "\n{} {} of {} groups could not be analysed (use --output full for details)\n",
                "Warning:".yellow().bold(),
                result.failures().len(),
                result.groups().len()
            ));
        }

        output
    }

    fn overview(result: &PipelineResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            "Dominant category:".bold(),
            result.dominant_category().unwrap_or("none")
        ));

        let expertise = result
            .expertise_summary()
            .map(|summary| summary.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        output.push_str(&format!("{} {}\n", "Expertise:".bold(), expertise));

        if !result.knowledge_gaps().is_empty() {
            output.push_str(&format!("\n{}\n", "Knowledge Gaps:".yellow().bold()));
            for gap in result.knowledge_gaps() {
                output.push_str(&format!("  * {}\n", gap));
            }
        }

        if !result.resources().is_empty() {
            output.push_str(&format!("\n{}\n", "Recommended Resources:".green().bold()));
            for resource in result.resources() {
                match &resource.url {
                    Some(url) => output.push_str(&format!(
                        "  * {} <{}>\n",
                        resource.title,
                        url.underline()
                    )),
                    None => output.push_str(&format!("  * {}\n", resource.title)),
                }
            }
        }

        output
    }

    fn questions(texts: Vec<&str>) -> String {
        texts
            .into_iter()
            .map(|text| format!("  {} {}\n", "?".dimmed(), text))
            .collect()
    }

    fn analysis_details(analysis: &GroupAnalysis) -> String {
        let mut output = format!(
            "{} {}\n",
            "Expertise level:".cyan(),
            analysis.expertise_level()
        );

        if !analysis.knowledge_gaps().is_empty() {
            output.push_str(&format!("{}\n", "Knowledge gaps:".cyan()));
            output.push_str(&Self::indent(&analysis.knowledge_gaps().join("\n"), "  - "));
            output.push('\n');
        }

        if !analysis.recommendations().is_empty() {
            output.push_str(&format!("{}\n", "Recommendations:".cyan()));
            output.push_str(&Self::indent(&analysis.recommendations().join("\n"), "  - "));
            output.push('\n');
        }

        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_full(&self, result: &PipelineResult) -> String {
        Self::format_full(result)
    }

    fn format_summary(&self, result: &PipelineResult) -> String {
        Self::format_summary(result)
    }

    fn format_json(&self, result: &PipelineResult) -> String {
        Self::format_json(result)
    }
}
