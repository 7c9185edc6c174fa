//! Catalog of validation rules
//!
//! Architecture: Value Objects - Each rule is a closed, named classification of a finding
//! - The rule owns its severity so a finding can never be reported at the wrong tier
//! - Stable string ids let configuration and reports refer to rules by name

use crate::domain::diagnostics::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every check the validation engine can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    MissingConfiguration,
    MissingModelName,
    InvalidVersionFormat,
    EmptyName,
    InvalidIdentifier,
    NamingConvention,
    DuplicateModulePath,
    DuplicateElementName,
    DuplicateAttributeName,
    DuplicateFunctionName,
    DuplicateEnumLiteral,
    UnknownPrimitiveType,
    InvalidRange,
    RequiredUniqueAttribute,
    UnresolvedRelationTarget,
    SelfRelation,
    UnresolvedAttributeType,
    UnresolvedSuperType,
    CircularInheritance,
    NonAbstractSupertype,
    EmptyEnum,
}

impl Rule {
    /// All rules in catalog order
    pub const ALL: [Rule; 21] = [
        Rule::MissingConfiguration,
        Rule::MissingModelName,
        Rule::InvalidVersionFormat,
        Rule::EmptyName,
        Rule::InvalidIdentifier,
        Rule::NamingConvention,
        Rule::DuplicateModulePath,
        Rule::DuplicateElementName,
        Rule::DuplicateAttributeName,
        Rule::DuplicateFunctionName,
        Rule::DuplicateEnumLiteral,
        Rule::UnknownPrimitiveType,
        Rule::InvalidRange,
        Rule::RequiredUniqueAttribute,
        Rule::UnresolvedRelationTarget,
        Rule::SelfRelation,
        Rule::UnresolvedAttributeType,
        Rule::UnresolvedSuperType,
        Rule::CircularInheritance,
        Rule::NonAbstractSupertype,
        Rule::EmptyEnum,
    ];

    /// Stable identifier used in configuration files and reports
    pub fn id(self) -> &'static str {
        match self {
            Self::MissingConfiguration => "missing_configuration",
            Self::MissingModelName => "missing_model_name",
            Self::InvalidVersionFormat => "invalid_version_format",
            Self::EmptyName => "empty_name",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::NamingConvention => "naming_convention",
            Self::DuplicateModulePath => "duplicate_module_path",
            Self::DuplicateElementName => "duplicate_element_name",
            Self::DuplicateAttributeName => "duplicate_attribute_name",
            Self::DuplicateFunctionName => "duplicate_function_name",
            Self::DuplicateEnumLiteral => "duplicate_enum_literal",
            Self::UnknownPrimitiveType => "unknown_primitive_type",
            Self::InvalidRange => "invalid_range",
            Self::RequiredUniqueAttribute => "required_unique_attribute",
            Self::UnresolvedRelationTarget => "unresolved_relation_target",
            Self::SelfRelation => "self_relation",
            Self::UnresolvedAttributeType => "unresolved_attribute_type",
            Self::UnresolvedSuperType => "unresolved_super_type",
            Self::CircularInheritance => "circular_inheritance",
            Self::NonAbstractSupertype => "non_abstract_supertype",
            Self::EmptyEnum => "empty_enum",
        }
    }

    /// Look up a rule by its stable identifier
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|rule| rule.id() == id)
    }

    /// Severity every finding of this rule is reported with
    pub fn severity(self) -> Severity {
        match self {
            Self::MissingConfiguration
            | Self::MissingModelName
            | Self::EmptyName
            | Self::DuplicateModulePath
            | Self::DuplicateElementName
            | Self::DuplicateAttributeName
            | Self::DuplicateEnumLiteral
            | Self::UnknownPrimitiveType
            | Self::InvalidRange
            | Self::UnresolvedRelationTarget
            | Self::UnresolvedAttributeType
            | Self::UnresolvedSuperType
            | Self::CircularInheritance => Severity::Error,

            Self::InvalidVersionFormat
            | Self::InvalidIdentifier
            | Self::DuplicateFunctionName
            | Self::SelfRelation
            | Self::NonAbstractSupertype
            | Self::EmptyEnum => Severity::Warning,

            Self::NamingConvention | Self::RequiredUniqueAttribute => Severity::Info,
        }
    }

    /// Human-readable explanation of what the rule checks
    pub fn description(self) -> &'static str {
        match self {
            Self::MissingConfiguration => "The model must declare a configuration block",
            Self::MissingModelName => "The configuration must carry a non-empty name",
            Self::InvalidVersionFormat => "The configuration version should start with x.y.z",
            Self::EmptyName => "Every named element needs a non-empty name",
            Self::InvalidIdentifier => "Names should match [A-Za-z_][A-Za-z0-9_]*",
            Self::NamingConvention => {
                "Types use PascalCase, members use camelCase, enum literals use UPPER_SNAKE_CASE"
            }
            Self::DuplicateModulePath => "Module qualified paths must be unique across the model",
            Self::DuplicateElementName => "Names must be unique among a module's own elements",
            Self::DuplicateAttributeName => "Attribute names must be unique within an entity",
            Self::DuplicateFunctionName => "Function names should be unique within an entity",
            Self::DuplicateEnumLiteral => "Literal names must be unique within an enum",
            Self::UnknownPrimitiveType => "Literal attribute types must be known primitive types",
            Self::InvalidRange => "An attribute's min must not exceed its max",
            Self::RequiredUniqueAttribute => {
                "Required unique attributes usually need a value generation strategy"
            }
            Self::UnresolvedRelationTarget => "Relations must reference a resolvable entity",
            Self::SelfRelation => "Relations targeting their own entity are often mistakes",
            Self::UnresolvedAttributeType => {
                "Enum-typed attributes must reference a resolvable enum"
            }
            Self::UnresolvedSuperType => "Declared supertypes must resolve to an entity",
            Self::CircularInheritance => {
                "An entity must not inherit from an entity that inherits from it"
            }
            Self::NonAbstractSupertype => "Supertypes are expected to be abstract",
            Self::EmptyEnum => "Enums should declare at least one literal",
        }
    }

    /// Whether findings of this rule block downstream consumption
    pub fn is_blocking(self) -> bool {
        self.severity().is_blocking()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_lookup() {
        for rule in Rule::ALL {
            assert_eq!(Rule::from_id(rule.id()), Some(rule));
        }
        assert_eq!(Rule::from_id("no_such_rule"), None);
    }

    #[test]
    fn test_severity_tiers() {
        assert_eq!(Rule::DuplicateFunctionName.severity(), Severity::Warning);
        assert_eq!(Rule::SelfRelation.severity(), Severity::Warning);
        assert_eq!(Rule::NamingConvention.severity(), Severity::Info);
        assert!(Rule::CircularInheritance.is_blocking());
        assert!(!Rule::EmptyEnum.is_blocking());
    }

    #[test]
    fn test_serde_uses_stable_ids() {
        let json = serde_json::to_string(&Rule::InvalidRange).unwrap();
        assert_eq!(json, "\"invalid_range\"");
    }
}
