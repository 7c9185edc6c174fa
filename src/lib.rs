//! Model Guardian - Structural validation for hierarchical domain models
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Pure domain logic separated from loading and rendering concerns
//! - The validator facade ties configuration, the validation walk and reporting together
//! - Gate helpers let code generators refuse models with blocking findings

pub mod config;
pub mod domain;
pub mod model;
pub mod report;
pub mod validation;

// Re-export main types for convenient access
pub use domain::{
    Diagnostic, DiagnosticCounts, GuardianError, GuardianResult, Rule, Severity, ValidationReport,
    ValidationSummary,
};

pub use config::{ConfigBuilder, ReportSettings, RuleSettings, ValidatorConfig};

pub use model::{
    AbstractElement, Attribute, AttributeEnum, AttributeType, Configuration, DataType, DomainModel,
    ElementKind, EnumX, FunctionEntity, LocalEntity, ModelDecl, Module, Node, NodeId, Parameter,
    Reference, Relation, RelationKind, ValueType,
};

pub use report::{filter_by_severity, format_results, OutputFormat, ReportFormatter, ReportOptions};

use std::path::Path;
use std::time::Instant;

/// Main validator providing high-level validation operations
#[derive(Debug, Clone)]
pub struct ModelValidator {
    config: ValidatorConfig,
    report_formatter: ReportFormatter,
}

impl ModelValidator {
    /// Create a new validator with the given configuration
    pub fn new(config: ValidatorConfig) -> GuardianResult<Self> {
        config.validate()?;
        let report_formatter = ReportFormatter::new(ReportOptions::from(&config.report));
        Ok(Self { config, report_formatter })
    }

    /// Create a validator loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> GuardianResult<Self> {
        Self::new(ValidatorConfig::load_from_file(path)?)
    }

    /// Set custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.report_formatter = formatter;
        self
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Ordered diagnostics for a model
    pub fn validate(&self, model: &DomainModel) -> Vec<Diagnostic> {
        validation::validate_model_with(model, &self.config.rules)
    }

    /// Diagnostics wrapped with counts, model name and timing
    pub fn report(&self, model: &DomainModel) -> ValidationReport {
        let start_time = Instant::now();
        let mut report = ValidationReport::from_diagnostics(self.validate(model));

        if let Some(name) = model.name() {
            report.set_model_name(name);
        }
        report.set_execution_time(start_time.elapsed().as_millis() as u64);

        tracing::debug!(
            errors = report.summary.diagnostics_by_severity.error,
            warnings = report.summary.diagnostics_by_severity.warning,
            info = report.summary.diagnostics_by_severity.info,
            "validation report ready"
        );
        report
    }

    /// Whether the model has no blocking diagnostics; validates on every call
    pub fn is_valid(&self, model: &DomainModel) -> bool {
        !self.validate(model).iter().any(Diagnostic::is_blocking)
    }

    /// Format diagnostics using the configured report options
    pub fn format(
        &self,
        diagnostics: &[Diagnostic],
        format: OutputFormat,
    ) -> GuardianResult<String> {
        self.report_formatter.format_diagnostics(diagnostics, format)
    }

    /// Format a report using the configured report options
    pub fn format_report(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
    ) -> GuardianResult<String> {
        self.report_formatter.format_report(report, format)
    }
}

impl Default for ModelValidator {
    fn default() -> Self {
        let config = ValidatorConfig::default();
        let report_formatter = ReportFormatter::new(ReportOptions::from(&config.report));
        Self { config, report_formatter }
    }
}

/// Validate a model with the default configuration
pub fn validate_model(model: &DomainModel) -> Vec<Diagnostic> {
    validation::validate_model_with(model, &RuleSettings::default())
}

/// Whether a model has no blocking diagnostics under the default configuration
pub fn is_valid(model: &DomainModel) -> bool {
    !validate_model(model).iter().any(Diagnostic::is_blocking)
}

/// Guards for code generators and other downstream consumers
pub mod gate {
    use super::*;

    /// Fail when the model has blocking diagnostics
    ///
    /// Returns the report so callers can still show advisories and suggestions.
    pub fn ensure_valid(model: &DomainModel) -> GuardianResult<ValidationReport> {
        ensure_valid_with(&ModelValidator::default(), model)
    }

    /// [`ensure_valid`] with a specific validator
    pub fn ensure_valid_with(
        validator: &ModelValidator,
        model: &DomainModel,
    ) -> GuardianResult<ValidationReport> {
        let report = validator.report(model);

        if report.has_errors() {
            tracing::warn!(
                errors = report.summary.diagnostics_by_severity.error,
                "model rejected: blocking diagnostics found"
            );
            return Err(GuardianError::invalid_model(&report.summary.diagnostics_by_severity));
        }

        Ok(report)
    }

    /// Fail on blocking or advisory diagnostics
    ///
    /// Informational findings never fail this check.
    pub fn ensure_clean(model: &DomainModel) -> GuardianResult<ValidationReport> {
        let report = ModelValidator::default().report(model);
        let counts = &report.summary.diagnostics_by_severity;

        if counts.error > 0 || counts.warning > 0 {
            tracing::warn!(
                errors = counts.error,
                warnings = counts.warning,
                "model rejected: errors or warnings found"
            );
            return Err(GuardianError::invalid_model(counts));
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttributeDecl, EntityDecl, EnumDecl, ModuleDecl};
    use std::fs;
    use tempfile::TempDir;

    fn loja() -> ModelDecl {
        ModelDecl::new()
            .configuration(Configuration::new("Loja").with_version("1.0.0"))
            .module(
                ModuleDecl::new("Sales")
                    .enumeration(EnumDecl::new("Status").literal("ABERTO").literal("FECHADO"))
                    .entity(
                        EntityDecl::new("Pedido")
                            .attribute(AttributeDecl::enumerated("status", "Status"))
                            .attribute(AttributeDecl::new("quantidade", "integer").range(1, 99)),
                    ),
            )
    }

    #[test]
    fn test_validator_creation() {
        let validator = ModelValidator::default();
        assert_eq!(validator.config(), &ValidatorConfig::default());
        assert!(ModelValidator::new(ValidatorConfig::default()).is_ok());

        let bad = ValidatorConfig {
            version: "0.9".to_string(),
            ..Default::default()
        };
        assert!(ModelValidator::new(bad).is_err());
    }

    #[test]
    fn test_valid_model_has_no_diagnostics() {
        let model = loja().build();
        assert!(validate_model(&model).is_empty());
        assert!(is_valid(&model));
    }

    #[test]
    fn test_is_valid_revalidates_each_call() {
        let mut model = loja().build();
        assert!(is_valid(&model));

        model.configuration = None;
        assert!(!is_valid(&model));
    }

    #[test]
    fn test_report_carries_counts_and_name() {
        let model = loja()
            .entity(EntityDecl::new("solta"))
            .module(ModuleDecl::new("vazio"))
            .build();
        let report = ModelValidator::default().report(&model);

        assert_eq!(report.summary.model_name.as_deref(), Some("Loja"));
        assert_eq!(report.summary.diagnostics_by_severity.info, 1);
        assert!(report.is_valid());
    }

    #[test]
    fn test_config_file_drives_rules_and_formatting() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("guardian.yaml");
        fs::write(
            &config_path,
            "version: \"1.0\"\nrules:\n  naming_conventions: false\nreport:\n  use_colors: false\n",
        )
        .unwrap();

        let validator = ModelValidator::from_config_file(&config_path).unwrap();
        let model = loja().module(ModuleDecl::new("vazio")).build();

        assert!(validator.validate(&model).is_empty());
        let human = validator.format(&[], OutputFormat::Human).unwrap();
        assert!(human.contains("no issues"));
    }

    #[test]
    fn test_model_document_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let model_path = temp_dir.path().join("loja.yaml");
        fs::write(
            &model_path,
            r#"
configuration:
  name: Loja
elements:
  - kind: module
    name: Sales
    elements:
      - kind: entity
        name: Pedido
        attributes:
          - name: quantidade
            type: integer
            min: 10
            max: 1
"#,
        )
        .unwrap();

        let model = ModelDecl::load_from_file(&model_path).unwrap().build();
        let diagnostics = validate_model(&model);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, Rule::InvalidRange);
        assert!(!is_valid(&model));
    }

    #[test]
    fn test_report_formatting() {
        let model = loja().module(ModuleDecl::new("vazio")).build();
        let validator = ModelValidator::default();
        let report = validator.report(&model);

        let json = validator.format_report(&report, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["diagnostics"].is_array());
        assert_eq!(parsed["diagnostics"][0]["rule"], "naming_convention");

        let plain = format_results(&report.diagnostics);
        assert!(plain.contains("vazio [info]"));
        assert_eq!(filter_by_severity(&report.diagnostics, Severity::Info).len(), 1);
    }

    #[test]
    fn test_gate_checks() {
        let clean = loja().build();
        assert!(gate::ensure_valid(&clean).is_ok());
        assert!(gate::ensure_clean(&clean).is_ok());

        let advisory = loja()
            .module(ModuleDecl::new("Stock").enumeration(EnumDecl::new("Nivel")))
            .build();
        assert!(gate::ensure_valid(&advisory).is_ok());
        let err = gate::ensure_clean(&advisory).unwrap_err();
        assert!(matches!(err, GuardianError::InvalidModel { errors: 0, warnings: 1 }));

        let broken = ModelDecl::new().build();
        let err = gate::ensure_valid(&broken).unwrap_err();
        assert_eq!(err.to_string(), "Model is invalid: 1 error and 0 warnings");
    }
}
