//! Configuration loading and management for Model Guardian
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to clean domain objects
//! - Rule ids are checked against the rule catalog on load
//! - Blocking rules cannot be switched off, so validity keeps one meaning under any config

use crate::domain::diagnostics::{GuardianError, GuardianResult, Severity};
use crate::domain::rules::Rule;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration format version understood by this crate
pub const CONFIG_VERSION: &str = "1.0";

/// Main configuration structure for Model Guardian
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Configuration format version
    pub version: String,
    /// Which findings are kept
    #[serde(default)]
    pub rules: RuleSettings,
    /// How reports are rendered
    #[serde(default)]
    pub report: ReportSettings,
}

/// Rule selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSettings {
    /// Emit informational casing findings
    #[serde(default = "default_true")]
    pub naming_conventions: bool,
    /// Rule ids whose findings are dropped
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// Report rendering preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_true")]
    pub use_colors: bool,
    #[serde(default = "default_true")]
    pub show_suggestions: bool,
    /// Hide findings below this severity
    #[serde(default)]
    pub min_severity: Option<Severity>,
    /// Maximum number of findings to render
    #[serde(default)]
    pub max_diagnostics: Option<usize>,
}

impl RuleSettings {
    /// Whether findings of `rule` are kept
    ///
    /// Blocking rules are always kept, whatever the settings say.
    pub fn is_enabled(&self, rule: Rule) -> bool {
        if rule.is_blocking() {
            return true;
        }
        if rule == Rule::NamingConvention && !self.naming_conventions {
            return false;
        }
        !self.disabled.iter().any(|id| id == rule.id())
    }

    /// Disabled rules that exist in the catalog
    pub fn disabled_rules(&self) -> impl Iterator<Item = Rule> + '_ {
        self.disabled.iter().filter_map(|id| Rule::from_id(id))
    }
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            naming_conventions: true,
            disabled: Vec::new(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            use_colors: true,
            show_suggestions: true,
            min_severity: None,
            max_diagnostics: None,
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GuardianResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            GuardianError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            GuardianError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> GuardianResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| GuardianError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> GuardianResult<()> {
        if self.version != CONFIG_VERSION {
            return Err(GuardianError::config(format!(
                "Unsupported configuration version: {}",
                self.version
            )));
        }

        for id in &self.rules.disabled {
            let rule = Rule::from_id(id).ok_or_else(|| {
                GuardianError::config(format!("Unknown rule id '{id}' in disabled list"))
            })?;

            if rule.is_blocking() {
                return Err(GuardianError::config(format!(
                    "Rule '{id}' reports errors and cannot be disabled"
                )));
            }
        }

        if self.report.max_diagnostics == Some(0) {
            return Err(GuardianError::config("max_diagnostics must be greater than zero"));
        }

        if !self.rules.disabled.is_empty() {
            tracing::warn!(
                disabled = ?self.rules.disabled,
                "validation rules disabled by configuration"
            );
        }
        if !self.rules.naming_conventions {
            tracing::warn!("naming convention findings disabled by configuration");
        }

        Ok(())
    }

    /// Convert to YAML
    pub fn to_yaml(&self) -> GuardianResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| GuardianError::config(format!("Failed to serialize config: {e}")))
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> GuardianResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GuardianError::config(format!("Failed to serialize config: {e}")))
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            rules: RuleSettings::default(),
            report: ReportSettings::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: ValidatorConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self { config: ValidatorConfig::default() }
    }

    /// Turn informational casing findings on or off
    pub fn naming_conventions(mut self, enabled: bool) -> Self {
        self.config.rules.naming_conventions = enabled;
        self
    }

    /// Drop findings of a rule
    pub fn disable_rule(mut self, rule: Rule) -> Self {
        let id = rule.id().to_string();
        if !self.config.rules.disabled.contains(&id) {
            self.config.rules.disabled.push(id);
        }
        self
    }

    pub fn use_colors(mut self, enabled: bool) -> Self {
        self.config.report.use_colors = enabled;
        self
    }

    pub fn show_suggestions(mut self, enabled: bool) -> Self {
        self.config.report.show_suggestions = enabled;
        self
    }

    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.config.report.min_severity = Some(severity);
        self
    }

    pub fn max_diagnostics(mut self, max: usize) -> Self {
        self.config.report.max_diagnostics = Some(max);
        self
    }

    /// Build the final configuration
    pub fn build(self) -> GuardianResult<ValidatorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
