//! Report generation for reconciliation runs.
//!
//! Supports two output formats:
//! - Text: per-page outcome listing for humans
//! - JSON: the full result sets, for build tooling

use crate::reconcile::{Outcome, ResultSet};
use serde::Serialize;
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Outcomes of one processed page.
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub path: PathBuf,
    pub result: ResultSet,
}

/// A page that could not be read, parsed back out or written.
#[derive(Debug, Clone, Serialize)]
pub struct PageFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub pages: Vec<PageReport>,
    pub failures: Vec<PageFailure>,
}

impl RunReport {
    pub fn added(&self) -> usize {
        self.pages.iter().map(|p| p.result.ok.len()).sum()
    }

    pub fn warnings(&self) -> usize {
        self.pages.iter().map(|p| p.result.warn.len()).sum()
    }

    pub fn rule_failures(&self) -> usize {
        self.pages.iter().map(|p| p.result.fail.len()).sum()
    }

    /// True if any page failed outright or had a failing rule.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty() || self.rule_failures() > 0
    }
}

/// Generate a report for a run
pub fn generate_report(report: &RunReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => generate_text_report(report),
        OutputFormat::Json => generate_json_report(report),
    }
}

fn generate_text_report(report: &RunReport) -> String {
    let mut output = String::new();

    output.push_str("=== readify report ===\n\n");

    for page in &report.pages {
        let result = &page.result;
        output.push_str(&format!(
            "{}: {} added, {} warning(s), {} failure(s)\n",
            page.path.display(),
            result.ok.len(),
            result.warn.len(),
            result.fail.len()
        ));
        for outcome in &result.fail {
            output.push_str(&format_outcome("FAIL", outcome));
        }
        for outcome in &result.warn {
            output.push_str(&format_outcome("WARN", outcome));
        }
        for outcome in &result.ok {
            output.push_str(&format_outcome("OK", outcome));
        }
        output.push('\n');
    }

    for failure in &report.failures {
        output.push_str(&format!(
            "{}: ERROR {}\n",
            failure.path.display(),
            failure.error
        ));
    }
    if !report.failures.is_empty() {
        output.push('\n');
    }

    output.push_str(&format!(
        "Totals: {} page(s), {} added, {} warning(s), {} failure(s), {} page error(s)\n",
        report.pages.len(),
        report.added(),
        report.warnings(),
        report.rule_failures(),
        report.failures.len()
    ));
    output
}

fn format_outcome(label: &str, outcome: &Outcome) -> String {
    let mut line = format!("  {:<5} {}", label, outcome.selector);
    if let Some(attribute) = &outcome.attribute {
        line.push_str(&format!("  {}", attribute));
        if let Some(value) = &outcome.value {
            line.push_str(&format!("={}", value));
        }
    }
    line.push_str(&format!("  {}", outcome.message));
    if let Some(details) = &outcome.details {
        line.push_str(&format!(" ({})", details));
    }
    line.push('\n');
    line
}

fn generate_json_report(report: &RunReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}
