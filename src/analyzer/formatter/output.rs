//! Output formatting for explain reports.
//!
//! Supports multiple output formats: table, JSON, YAML, and plain text.

use crate::analyzer::types::{ExplainReport, Explanation, MatchResult, ReportStatus};
use colored::Colorize;
use serde::{Deserialize, Serialize};

const BOX_WIDTH: usize = 80;
const WRAP_WIDTH: usize = BOX_WIDTH - 6;

// ============================================================================
// Output Format
// ============================================================================

/// Output format for explain reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Boxed, colored report (default)
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text summary
    Summary,
}

impl OutputFormat {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(Self::Table),
            "json" => Some(Self::Json),
            "yaml" => Some(Self::Yaml),
            "summary" => Some(Self::Summary),
            _ => None,
        }
    }
}

// ============================================================================
// Formatting Functions
// ============================================================================

/// Format an explain report to string.
pub fn format_report_to_string(report: &ExplainReport<'_>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => format_table(report),
        OutputFormat::Json => format_json(report),
        OutputFormat::Yaml => format_yaml(report),
        OutputFormat::Summary => format_summary(report),
    }
}

/// Format and print an explain report.
pub fn format_report(report: &ExplainReport<'_>, format: OutputFormat) {
    println!("{}", format_report_to_string(report, format));
}

// ============================================================================
// Table Format
// ============================================================================

fn format_table(report: &ExplainReport<'_>) -> String {
    let mut output = String::new();
    let rule = "═".repeat(BOX_WIDTH);

    // Header
    output.push_str(&format!("\n{}\n", rule.bright_blue()));
    output.push_str(&format!(
        "{}\n",
        "🔎 KUBERNETES FAILURE EXPLANATION".bright_white().bold()
    ));
    output.push_str(&format!("{}\n\n", rule.bright_blue()));

    output.push_str(&format_resource_section(report));

    if report.matches.is_empty() {
        output.push_str(&format!(
            "\n{}\n",
            "✅ No known failure mode matched. The resource looks healthy, or its failure is not catalogued yet."
                .green()
        ));
    } else {
        output.push_str(&format_matches_section(&report.matches));
    }

    if let Some(explanation) = &report.explanation {
        output.push_str(&format_explanation_section(explanation));
    }

    // Footer
    output.push_str(&format!("\n{}\n", rule.bright_blue()));

    output
}

fn section_top(title: &str) -> String {
    let header = format!("┌─ {} ", title);
    let fill = BOX_WIDTH.saturating_sub(header.chars().count() + 1);
    format!("{}{}┐", header, "─".repeat(fill))
}

fn section_bottom() -> String {
    format!("└{}┘", "─".repeat(BOX_WIDTH - 2))
}

fn format_resource_section(report: &ExplainReport<'_>) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", section_top("Resource").bright_blue()));

    let status = match report.status {
        ReportStatus::FailureDetected => "FAILURE DETECTED".bright_red().bold(),
        ReportStatus::Healthy => "HEALTHY".green().bold(),
    };

    output.push_str(&format!(
        "│ {} {}     {} {}\n",
        "Resource:".dimmed(),
        report.resource.bright_white(),
        "Status:".dimmed(),
        status
    ));
    output.push_str(&format!(
        "│ {} {}\n",
        "Matched modes:".dimmed(),
        report.matches.len().to_string().bright_white()
    ));

    output.push_str(&format!("{}\n", section_bottom().bright_blue()));

    output
}

fn format_matches_section(matches: &[MatchResult<'_>]) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{}\n", section_top("Matches").bright_blue()));

    for (i, result) in matches.iter().enumerate() {
        let marker = if i == 0 { "🔴" } else { "🟡" };
        output.push_str(&format!(
            "│ {} {} {} {}\n",
            marker,
            format!("[{}]", result.mode.id).bright_cyan(),
            result.mode.name.bright_white().bold(),
            format!("confidence {:.2}", result.confidence).dimmed()
        ));

        for signal in &result.matched_signals {
            output.push_str(&format!("│     {} {}\n", "✓".green(), signal));
        }
    }

    output.push_str(&format!("{}\n", section_bottom().bright_blue()));

    output
}

fn format_explanation_section(explanation: &Explanation) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{}\n", section_top("Explanation").bright_blue()));

    push_wrapped(&mut output, &explanation.summary, |line| {
        line.bright_white().bold().to_string()
    });

    output.push_str(&format!("│\n│ {}\n", "What this means:".dimmed()));
    push_wrapped(&mut output, &explanation.meaning, |line| line.to_string());

    output.push_str(&format!("│\n│ {}\n", "Likely cause:".dimmed()));
    push_wrapped(&mut output, &explanation.likely_cause, |line| {
        line.yellow().to_string()
    });

    if !explanation.evidence.is_empty() {
        output.push_str(&format!("│\n│ {}\n", "Evidence:".dimmed()));
        for item in &explanation.evidence {
            for (i, line) in textwrap::wrap(item, WRAP_WIDTH - 2).iter().enumerate() {
                let bullet = if i == 0 { "•" } else { " " };
                output.push_str(&format!("│   {} {}\n", bullet.cyan(), line));
            }
        }
    }

    output.push_str(&format!("│\n│ {}\n", "Impact:".dimmed()));
    push_wrapped(&mut output, &explanation.impact, |line| line.to_string());

    if !explanation.next_checks.is_empty() {
        output.push_str(&format!("│\n│ {}\n", "Next checks:".dimmed()));
        for (n, check) in explanation.next_checks.iter().enumerate() {
            output.push_str(&format!(
                "│   {} {}\n",
                format!("{}.", n + 1).bright_cyan(),
                check
            ));
        }
    }

    output.push_str(&format!("{}\n", section_bottom().bright_blue()));

    output
}

fn push_wrapped(output: &mut String, text: &str, style: impl Fn(&str) -> String) {
    for line in textwrap::wrap(text, WRAP_WIDTH) {
        let line: &str = &line;
        output.push_str(&format!("│   {}\n", style(line)));
    }
}

// ============================================================================
// JSON Format
// ============================================================================

fn format_json(report: &ExplainReport<'_>) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

// ============================================================================
// YAML Format
// ============================================================================

fn format_yaml(report: &ExplainReport<'_>) -> String {
    serde_yaml::to_string(report).unwrap_or_else(|_| "".to_string())
}

// ============================================================================
// Summary Format
// ============================================================================

fn format_summary(report: &ExplainReport<'_>) -> String {
    let mut output = String::new();

    output.push_str(&format!("▶ KUBE-WHY: {}\n", report.resource));
    output.push_str("──────────────────────────────────────────────────\n");
    output.push_str(&format!("│ Status: {}\n", report.status.as_str()));

    match (report.top_match(), &report.explanation) {
        (Some(top), Some(explanation)) => {
            output.push_str(&format!("│ Mode: {} ({})\n", top.mode.id, top.mode.name));
            output.push_str(&format!("│ Summary: {}\n", explanation.summary));
            output.push_str(&format!("│ Likely cause: {}\n", explanation.likely_cause));
            if let Some(first) = explanation.next_checks.first() {
                output.push_str(&format!("│ Next check: {}\n", first));
            }
        }
        (Some(top), None) => {
            output.push_str(&format!("│ Mode: {} ({})\n", top.mode.id, top.mode.name));
        }
        (None, _) => output.push_str("│ No known failure mode matched\n"),
    }

    if report.matches.len() > 1 {
        let others: Vec<&str> = report.matches[1..]
            .iter()
            .map(|m| m.mode.id.as_str())
            .collect();
        output.push_str(&format!("│ Also matched: {}\n", others.join(", ")));
    }

    output.push_str("──────────────────────────────────────────────────\n");

    output
}

// ============================================================================
// Tests
// ============================================================================
