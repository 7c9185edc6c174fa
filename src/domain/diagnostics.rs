//! Core domain models for validation findings and validation results
//!
//! Architecture: Rich Domain Models - Diagnostics are values with behavior, not just data
//! - Diagnostics classify themselves through the rule that produced them
//! - ValidationReport acts as an aggregate root managing the ordered list of diagnostics
//! - Findings are data: nothing in a domain model turns into a GuardianError

use crate::domain::rules::Rule;
use crate::model::ElementKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity tiers for validation findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Style and convention suggestions
    Info,
    /// Structural smells a generator might misinterpret
    Warning,
    /// Structurally or referentially broken, blocks downstream consumption
    Error,
}

impl Severity {
    /// Severities from most to least severe, the order reports group by
    pub const DESCENDING: [Severity; 3] = [Severity::Error, Severity::Warning, Severity::Info];

    /// Whether this severity level should cause validation to fail
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Convert to string for display
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Parse a severity name as written in configuration files
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "info" | "informational" => Some(Self::Info),
            "warning" | "advisory" => Some(Self::Warning),
            "error" | "fatal" => Some(Self::Error),
            _ => None,
        }
    }
}

/// A single finding produced while walking a domain model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule that produced this finding
    pub rule: Rule,
    /// Severity level, always the rule's severity
    pub severity: Severity,
    /// Human-readable description of the finding
    pub message: String,
    /// Dot-joined qualified path of the element, absent for model-level findings
    pub path: Option<String>,
    /// Kind of the element the finding is about
    pub element_kind: Option<ElementKind>,
    /// Name of the element the finding is about
    pub element_name: Option<String>,
    /// Suggested fix, when one is obvious
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic for a rule
    pub fn new(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: rule.severity(),
            message: message.into(),
            path: None,
            element_kind: None,
            element_name: None,
            suggestion: None,
        }
    }

    /// Attach the qualified path of the offending element
    pub fn at(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        if !path.is_empty() {
            self.path = Some(path);
        }
        self
    }

    /// Identify the offending element
    pub fn on(mut self, kind: ElementKind, name: impl Into<String>) -> Self {
        self.element_kind = Some(kind);
        self.element_name = Some(name.into());
        self
    }

    /// Identify the kind of offending element without naming it
    pub fn for_kind(mut self, kind: ElementKind) -> Self {
        self.element_kind = Some(kind);
        self
    }

    /// Add a suggested fix
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Whether this diagnostic is blocking
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }

    /// Path when present, otherwise the element kind label
    pub fn location(&self) -> String {
        match (&self.path, self.element_kind) {
            (Some(path), _) => path.clone(),
            (None, Some(kind)) => kind.label().to_string(),
            (None, None) => ElementKind::Model.label().to_string(),
        }
    }

    /// Format diagnostic for display
    pub fn format_display(&self) -> String {
        format!(
            "{} [{}] {}",
            self.location(),
            self.severity.as_str(),
            self.message
        )
    }
}

/// Count of diagnostics by severity level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl DiagnosticCounts {
    /// Tally a slice of diagnostics
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let mut counts = Self::default();
        for diagnostic in diagnostics {
            counts.add(diagnostic.severity);
        }
        counts
    }

    /// Total number of diagnostics across all severities
    pub fn total(&self) -> usize {
        self.error + self.warning + self.info
    }

    /// Whether there are any blocking diagnostics
    pub fn has_blocking(&self) -> bool {
        self.error > 0
    }

    /// Count for one severity
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
        }
    }

    /// Add a diagnostic to the counts
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
    }
}

/// Summary statistics for a validation report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Name of the validated model, when its configuration carries one
    pub model_name: Option<String>,
    /// Number of diagnostics by severity level
    pub diagnostics_by_severity: DiagnosticCounts,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
    /// Timestamp when validation was performed
    pub validated_at: DateTime<Utc>,
}

/// Complete validation report containing all diagnostics and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All diagnostics in emission order
    pub diagnostics: Vec<Diagnostic>,
    /// Summary statistics
    pub summary: ValidationSummary,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            summary: ValidationSummary {
                validated_at: Utc::now(),
                ..Default::default()
            },
        }
    }

    /// Build a report from an already ordered list of diagnostics
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        let mut report = Self::new();
        for diagnostic in diagnostics {
            report.add_diagnostic(diagnostic);
        }
        report
    }

    /// Add a diagnostic to the report
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.summary.diagnostics_by_severity.add(diagnostic.severity);
        self.diagnostics.push(diagnostic);
    }

    /// Whether the report contains any diagnostics
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Whether the report contains blocking diagnostics
    pub fn has_errors(&self) -> bool {
        self.summary.diagnostics_by_severity.has_blocking()
    }

    /// Whether the validated model may be consumed downstream
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Get diagnostics of a specific severity, in emission order
    pub fn diagnostics_by_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.severity == severity)
    }

    /// Record the name of the validated model
    pub fn set_model_name(&mut self, name: impl Into<String>) {
        self.summary.model_name = Some(name.into());
    }

    /// Set the execution time
    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.summary.execution_time_ms = duration_ms;
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types that can occur around validation
#[derive(Debug, thiserror::Error)]
pub enum GuardianError {
    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A model document could not be read or parsed
    #[error("Model load error in {origin}: {message}")]
    ModelLoad { origin: String, message: String },

    /// Report rendering failed
    #[error("Report error: {message}")]
    Report { message: String },

    /// The model has blocking diagnostics and may not be consumed
    #[error(
        "Model is invalid: {errors} error{} and {warnings} warning{}",
        plural(.errors),
        plural(.warnings)
    )]
    InvalidModel { errors: usize, warnings: usize },
}

fn plural(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}

impl GuardianError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a model load error
    pub fn model_load(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// Create a report error
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
        }
    }

    /// Create an invalid model error from diagnostic counts
    pub fn invalid_model(counts: &DiagnosticCounts) -> Self {
        Self::InvalidModel {
            errors: counts.error,
            warnings: counts.warning,
        }
    }
}

/// Result type for Guardian operations
pub type GuardianResult<T> = Result<T, GuardianError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_creation() {
        let diagnostic = Diagnostic::new(Rule::InvalidRange, "min greater than max")
            .at("Sales.Pedido.quantidade")
            .on(ElementKind::Attribute, "quantidade");

        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.path.as_deref(), Some("Sales.Pedido.quantidade"));
        assert_eq!(diagnostic.element_name.as_deref(), Some("quantidade"));
        assert!(diagnostic.is_blocking());
    }

    #[test]
    fn test_empty_path_is_absent() {
        let diagnostic =
            Diagnostic::new(Rule::MissingConfiguration, "missing configuration").at("");
        assert_eq!(diagnostic.path, None);
        assert_eq!(diagnostic.location(), "Model");
    }

    #[test]
    fn test_location_falls_back_to_kind() {
        let diagnostic = Diagnostic::new(Rule::EmptyName, "Module name is required")
            .on(ElementKind::Module, "");
        assert_eq!(diagnostic.location(), "Module");
        assert_eq!(diagnostic.format_display(), "Module [error] Module name is required");
    }

    #[test]
    fn test_validation_report() {
        let report = ValidationReport::from_diagnostics(vec![
            Diagnostic::new(Rule::EmptyEnum, "enum has no literals"),
            Diagnostic::new(Rule::NamingConvention, "use PascalCase"),
            Diagnostic::new(Rule::DuplicateElementName, "duplicate"),
        ]);

        assert!(report.has_diagnostics());
        assert!(report.has_errors());
        assert!(!report.is_valid());
        assert_eq!(report.summary.diagnostics_by_severity.total(), 3);
        assert_eq!(report.summary.diagnostics_by_severity.get(Severity::Warning), 1);
        assert_eq!(report.diagnostics_by_severity(Severity::Info).count(), 1);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(Severity::Error.is_blocking());
        assert!(!Severity::Warning.is_blocking());
        assert_eq!(Severity::parse("Advisory"), Some(Severity::Warning));
        assert_eq!(Severity::parse("loud"), None);
    }

    #[test]
    fn test_invalid_model_error_message() {
        let counts = DiagnosticCounts {
            error: 1,
            warning: 2,
            info: 0,
        };
        let error = GuardianError::invalid_model(&counts);
        assert_eq!(error.to_string(), "Model is invalid: 1 error and 2 warnings");
    }
}
