//! Structural validation of domain models
//!
//! Architecture: Domain Service - A depth-first, pre-order walk over the model tree
//! - Each element kind has one rule function that appends to the shared context
//! - Diagnostics come out in declaration order; nothing is sorted afterwards
//! - Malformed content is always reported as data, never raised as an error

pub mod context;
pub mod entity;
pub mod enumeration;
pub mod naming;

pub use context::{ScopeNames, ValidationContext};

use crate::config::RuleSettings;
use crate::domain::diagnostics::Diagnostic;
use crate::domain::rules::Rule;
use crate::model::{AbstractElement, DomainModel, ElementKind, Module, Node};
use crate::validation::naming::validate_name;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SEMVER_PREFIX: Regex = Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+").unwrap();
}

/// Validate a model under the given rule settings
///
/// Only modules directly under the root are walked. Entities and enums
/// declared at the root are reachable as reference targets but are not
/// validated themselves.
pub fn validate_model_with(model: &DomainModel, settings: &RuleSettings) -> Vec<Diagnostic> {
    let mut ctx = ValidationContext::new(model, settings);
    tracing::debug!(
        model = model.name().unwrap_or("<unnamed>"),
        elements = model.elements.len(),
        "validating model"
    );

    validate_configuration(&mut ctx, model);

    for module in model.modules() {
        validate_module(&mut ctx, module);
    }

    let skipped = model.elements.iter().filter(|element| !element.is_module()).count();
    if skipped > 0 {
        tracing::trace!(skipped, "root-level entities and enums are not walked");
    }

    let diagnostics = ctx.into_diagnostics();
    tracing::debug!(diagnostics = diagnostics.len(), "model validation finished");
    diagnostics
}

/// Existence, name and version of the model configuration
pub fn validate_configuration(ctx: &mut ValidationContext<'_>, model: &DomainModel) {
    let Some(configuration) = &model.configuration else {
        ctx.report(
            Diagnostic::new(Rule::MissingConfiguration, "missing configuration")
                .for_kind(ElementKind::Model)
                .with_suggestion("Add a configuration block with at least a name"),
        );
        return;
    };

    if configuration.name.trim().is_empty() {
        ctx.report(
            Diagnostic::new(Rule::MissingModelName, "Model configuration has no name")
                .for_kind(ElementKind::Model),
        );
    }

    if let Some(version) = &configuration.version {
        if !SEMVER_PREFIX.is_match(version) {
            ctx.report(
                Diagnostic::new(
                    Rule::InvalidVersionFormat,
                    format!("Model version '{version}' does not follow x.y.z"),
                )
                .on(ElementKind::Model, configuration.name.as_str())
                .with_suggestion("Use a semantic version such as 1.0.0"),
            );
        }
    }
}

pub fn validate_module(ctx: &mut ValidationContext<'_>, module: &Module) {
    ctx.scoped(&module.name, |ctx| {
        let path = ctx.path();
        tracing::trace!(path = %path, elements = module.elements.len(), "validating module");

        validate_name(ctx, &module.name, ElementKind::Module, &path);

        if !ctx.register_module_path(path.clone()) {
            ctx.report(
                Diagnostic::new(
                    Rule::DuplicateModulePath,
                    format!("Duplicate module path '{path}'"),
                )
                .at(path.as_str())
                .on(ElementKind::Module, module.name.as_str()),
            );
        }

        let mut seen = ScopeNames::new();
        for element in &module.elements {
            let name = element.element_name();
            if !seen.insert(name) {
                ctx.report(
                    Diagnostic::new(
                        Rule::DuplicateElementName,
                        format!("Duplicate name '{name}' in module '{}'", module.name),
                    )
                    .at(path.as_str())
                    .on(element.kind(), name),
                );
            }

            match element {
                AbstractElement::Module(child) => validate_module(ctx, child),
                AbstractElement::Entity(entity) => entity::validate_entity(ctx, entity),
                AbstractElement::Enum(enumeration) => enumeration::validate_enum(ctx, enumeration),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diagnostics::Severity;
    use crate::model::{Configuration, EntityDecl, EnumDecl, ModelDecl, ModuleDecl};
    use rstest::rstest;

    fn run(model: &DomainModel) -> Vec<Diagnostic> {
        validate_model_with(model, &RuleSettings::default())
    }

    #[test]
    fn test_missing_configuration_is_the_only_finding() {
        let model = ModelDecl::new().module(ModuleDecl::new("Sales")).build();
        let diagnostics = run(&model);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, Rule::MissingConfiguration);
        assert_eq!(diagnostics[0].message, "missing configuration");
        assert_eq!(diagnostics[0].path, None);
        assert_eq!(diagnostics[0].location(), "Model");
    }

    #[rstest]
    #[case("1.0.0", true)]
    #[case("2.10.3-beta", true)]
    #[case("1.0", false)]
    #[case("v1.0.0", false)]
    #[case("١.٢.٣", false)]
    fn test_version_format(#[case] version: &str, #[case] ok: bool) {
        let model = ModelDecl::new()
            .configuration(Configuration::new("Loja").with_version(version))
            .build();
        let diagnostics = run(&model);

        if ok {
            assert!(diagnostics.is_empty());
        } else {
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].rule, Rule::InvalidVersionFormat);
            assert_eq!(diagnostics[0].severity, Severity::Warning);
        }
    }

    #[test]
    fn test_blank_model_name_is_fatal() {
        let model = ModelDecl::named("  ").build();
        let diagnostics = run(&model);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, Rule::MissingModelName);
        assert!(diagnostics[0].is_blocking());
    }

    #[test]
    fn test_duplicate_in_module_references_module() {
        let model = ModelDecl::named("Loja")
            .module(
                ModuleDecl::new("Sales")
                    .entity(EntityDecl::new("Produto"))
                    .entity(EntityDecl::new("Produto")),
            )
            .build();
        let diagnostics = run(&model);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, Rule::DuplicateElementName);
        assert_eq!(diagnostics[0].path.as_deref(), Some("Sales"));
        assert_eq!(diagnostics[0].element_name.as_deref(), Some("Produto"));
    }

    #[test]
    fn test_entity_and_enum_share_module_scope() {
        let model = ModelDecl::named("Loja")
            .module(
                ModuleDecl::new("Sales")
                    .enumeration(EnumDecl::new("Status").literal("ABERTO"))
                    .entity(EntityDecl::new("Status")),
            )
            .build();
        let diagnostics = run(&model);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].element_kind, Some(ElementKind::LocalEntity));
    }

    #[test]
    fn test_same_name_in_different_modules_is_fine() {
        let model = ModelDecl::named("Loja")
            .module(ModuleDecl::new("Sales").entity(EntityDecl::new("Produto")))
            .module(ModuleDecl::new("Stock").entity(EntityDecl::new("Produto")))
            .build();

        assert!(run(&model).is_empty());
    }

    #[test]
    fn test_qualified_module_path_collision() {
        let model = ModelDecl::named("Loja")
            .module(ModuleDecl::new("Core").module(ModuleDecl::new("Sales")))
            .module(ModuleDecl::new("Core.Sales"))
            .build();
        let diagnostics = run(&model);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, Rule::DuplicateModulePath);
        assert_eq!(diagnostics[0].path.as_deref(), Some("Core.Sales"));
    }

    #[test]
    fn test_root_level_entities_are_not_walked() {
        let model = ModelDecl::named("Loja").entity(EntityDecl::new("produto")).build();
        assert!(run(&model).is_empty());
    }

    #[test]
    fn test_diagnostics_follow_declaration_order() {
        let model = ModelDecl::named("Loja")
            .module(
                ModuleDecl::new("sales")
                    .entity(EntityDecl::new("produto"))
                    .enumeration(EnumDecl::new("Status")),
            )
            .build();
        let paths: Vec<String> = run(&model).iter().map(Diagnostic::location).collect();

        assert_eq!(paths, vec!["sales", "sales.produto", "sales.Status"]);
    }
}
