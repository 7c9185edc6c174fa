//! Report generation with multiple output formats
//!
//! Architecture: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - ValidationReport (domain) is converted to human or JSON representations
//! - Query helpers never reorder diagnostics; grouping keeps emission order within a group
//! - Domain logic remains pure while supporting multiple presentation needs

use crate::config::ReportSettings;
use crate::domain::diagnostics::{
    Diagnostic, DiagnosticCounts, GuardianError, GuardianResult, Severity, ValidationReport,
    ValidationSummary,
};
use serde::Serialize;
use std::io::Write;

/// Supported output formats for validation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format grouped by severity
    Human,
    /// JSON format for programmatic consumption
    Json,
}

impl OutputFormat {
    /// Parse format from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json"]
    }
}

/// Options for customizing report output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Whether to show suggestions under each diagnostic
    pub show_suggestions: bool,
    /// Maximum number of diagnostics to include
    pub max_diagnostics: Option<usize>,
    /// Minimum severity level to include
    pub min_severity: Option<Severity>,
}

impl ReportOptions {
    /// Plain text without colors or suggestions
    pub fn plain() -> Self {
        Self {
            use_colors: false,
            show_suggestions: false,
            ..Default::default()
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            use_colors: true,
            show_suggestions: true,
            max_diagnostics: None,
            min_severity: None,
        }
    }
}

impl From<&ReportSettings> for ReportOptions {
    fn from(settings: &ReportSettings) -> Self {
        Self {
            use_colors: settings.use_colors,
            show_suggestions: settings.show_suggestions,
            max_diagnostics: settings.max_diagnostics,
            min_severity: settings.min_severity,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    diagnostics: &'a [&'a Diagnostic],
    /// Counts describe the diagnostics listed above
    summary: ValidationSummary,
    /// Diagnostics left out by severity or limit
    hidden: usize,
}

/// Main report formatter that dispatches to specific formatters
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Format a validation report in the specified format
    pub fn format_report(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
    ) -> GuardianResult<String> {
        match format {
            OutputFormat::Human => Ok(self.format_human(&report.diagnostics)),
            OutputFormat::Json => self.format_json(report),
        }
    }

    /// Format a bare diagnostics list in the specified format
    pub fn format_diagnostics(
        &self,
        diagnostics: &[Diagnostic],
        format: OutputFormat,
    ) -> GuardianResult<String> {
        match format {
            OutputFormat::Human => Ok(self.format_human(diagnostics)),
            OutputFormat::Json => {
                self.format_json(&ValidationReport::from_diagnostics(diagnostics.to_vec()))
            }
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
        mut writer: W,
    ) -> GuardianResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    /// Diagnostics at or above the minimum severity, in emission order
    fn visible<'a>(&self, diagnostics: &'a [Diagnostic]) -> Vec<&'a Diagnostic> {
        diagnostics
            .iter()
            .filter(|d| self.options.min_severity.map_or(true, |min| d.severity >= min))
            .collect()
    }

    /// Format diagnostics in human-readable form
    fn format_human(&self, diagnostics: &[Diagnostic]) -> String {
        let visible = self.visible(diagnostics);
        let colors = self.options.use_colors;
        let mut output = String::new();

        if diagnostics.is_empty() {
            output.push_str(&format!(
                "✅ {}\n",
                paint("Model is valid, no issues found", Style::Success, colors)
            ));
            return output;
        }

        // Errors are never below a severity threshold, so a fully hidden
        // list still means a valid model
        if visible.is_empty() {
            let hidden = diagnostics.len();
            let message = format!(
                "Model is valid, {hidden} lower-severity finding{} hidden",
                if hidden == 1 { "" } else { "s" }
            );
            output.push_str(&format!("✅ {}\n", paint(&message, Style::Success, colors)));
            return output;
        }

        let mut counts = DiagnosticCounts::default();
        for diagnostic in &visible {
            counts.add(diagnostic.severity);
        }
        let icon = if counts.has_blocking() { "❌" } else { "⚠️" };
        output.push_str(&format!(
            "{icon} {} {}\n",
            paint("Validation Results:", Style::Bold, colors),
            count_parts(&counts, colors)
        ));

        let limit = self.options.max_diagnostics.unwrap_or(usize::MAX);
        let mut shown = 0;

        for severity in Severity::DESCENDING {
            let group: Vec<&Diagnostic> =
                visible.iter().copied().filter(|d| d.severity == severity).collect();
            if group.is_empty() || shown >= limit {
                continue;
            }

            output.push('\n');
            output.push_str(&format!(
                "{} ({}):\n",
                paint(group_title(severity), severity_style(severity), colors),
                group.len()
            ));

            for diagnostic in group {
                if shown >= limit {
                    break;
                }
                shown += 1;

                output.push_str(&format!(
                    "  {} [{}] {}\n",
                    paint(&diagnostic.location(), Style::Dim, colors),
                    paint(diagnostic.severity.as_str(), severity_style(severity), colors),
                    diagnostic.message
                ));

                if self.options.show_suggestions {
                    if let Some(suggestion) = &diagnostic.suggestion {
                        output.push_str(&format!(
                            "    💡 {}\n",
                            paint(suggestion, Style::Success, colors)
                        ));
                    }
                }
            }
        }

        if shown < visible.len() {
            output.push_str(&format!("\n... and {} more\n", visible.len() - shown));
        }

        output
    }

    /// Format report in JSON format
    fn format_json(&self, report: &ValidationReport) -> GuardianResult<String> {
        let mut visible = self.visible(&report.diagnostics);
        if let Some(max) = self.options.max_diagnostics {
            visible.truncate(max);
        }

        let mut summary = report.summary.clone();
        summary.diagnostics_by_severity = DiagnosticCounts::default();
        for diagnostic in &visible {
            summary.diagnostics_by_severity.add(diagnostic.severity);
        }

        let json_report = JsonReport {
            diagnostics: &visible,
            summary,
            hidden: report.diagnostics.len() - visible.len(),
        };

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| GuardianError::report(format!("JSON serialization failed: {e}")))
    }
}

/// Stable-order subset of `diagnostics` with exactly `severity`
pub fn filter_by_severity(diagnostics: &[Diagnostic], severity: Severity) -> Vec<&Diagnostic> {
    diagnostics.iter().filter(|d| d.severity == severity).collect()
}

/// Plain human-readable rendering, without colors or suggestions
pub fn format_results(diagnostics: &[Diagnostic]) -> String {
    ReportFormatter::new(ReportOptions::plain()).format_human(diagnostics)
}

fn group_title(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "Errors",
        Severity::Warning => "Warnings",
        Severity::Info => "Info",
    }
}

fn count_parts(counts: &DiagnosticCounts, colors: bool) -> String {
    let plural = |n: usize| if n == 1 { "" } else { "s" };
    [
        paint(&format!("{} error{}", counts.error, plural(counts.error)), Style::Error, colors),
        paint(
            &format!("{} warning{}", counts.warning, plural(counts.warning)),
            Style::Warning,
            colors,
        ),
        paint(&format!("{} info", counts.info), Style::Info, colors),
    ]
    .join(", ")
}

#[derive(Debug, Clone, Copy)]
enum Style {
    Error,
    Warning,
    Info,
    Success,
    Dim,
    Bold,
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Error => Style::Error,
        Severity::Warning => Style::Warning,
        Severity::Info => Style::Info,
    }
}

#[cfg(feature = "colors")]
fn paint(text: &str, style: Style, enabled: bool) -> String {
    use colored::Colorize;

    if !enabled {
        return text.to_string();
    }
    match style {
        Style::Error => text.red().to_string(),
        Style::Warning => text.yellow().to_string(),
        Style::Info => text.cyan().to_string(),
        Style::Success => text.green().to_string(),
        Style::Dim => text.dimmed().to_string(),
        Style::Bold => text.bold().to_string(),
    }
}

#[cfg(not(feature = "colors"))]
fn paint(text: &str, _style: Style, _enabled: bool) -> String {
    text.to_string()
}
