//! Enum and literal rules

use crate::domain::diagnostics::Diagnostic;
use crate::domain::rules::Rule;
use crate::model::{ElementKind, EnumX};
use crate::validation::context::{ScopeNames, ValidationContext};
use crate::validation::naming::validate_name;

pub fn validate_enum(ctx: &mut ValidationContext<'_>, enumeration: &EnumX) {
    ctx.scoped(&enumeration.name, |ctx| {
        let path = ctx.path();
        tracing::trace!(path = %path, literals = enumeration.literals.len(), "validating enum");

        validate_name(ctx, &enumeration.name, ElementKind::EnumX, &path);

        if enumeration.literals.is_empty() {
            ctx.report(
                Diagnostic::new(Rule::EmptyEnum, "enum has no literals")
                    .at(path.as_str())
                    .on(ElementKind::EnumX, enumeration.name.as_str())
                    .with_suggestion("Declare at least one literal or remove the enum"),
            );
        }

        let mut seen = ScopeNames::new();
        for literal in &enumeration.literals {
            let literal_path = ctx.child_path(&literal.name);
            if !seen.insert(&literal.name) {
                ctx.report(
                    Diagnostic::new(
                        Rule::DuplicateEnumLiteral,
                        format!(
                            "Duplicate literal '{}' in enum '{}'",
                            literal.name, enumeration.name
                        ),
                    )
                    .at(path.as_str())
                    .on(ElementKind::AttributeEnum, literal.name.as_str()),
                );
            }
            validate_name(ctx, &literal.name, ElementKind::AttributeEnum, &literal_path);
        }
    });
}
