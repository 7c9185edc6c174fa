//! Name rule shared by every named element

use crate::domain::diagnostics::Diagnostic;
use crate::domain::rules::Rule;
use crate::model::ElementKind;
use crate::validation::context::ValidationContext;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref UPPER_SNAKE: Regex = Regex::new(r"^[A-Z0-9_]+$").unwrap();
}

/// Whether a name is a plain identifier
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Whether a possibly dot-qualified name is made of identifiers
pub fn is_qualified_identifier(name: &str) -> bool {
    name.split('.').all(is_identifier)
}

/// Casing a kind of element is expected to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    PascalCase,
    CamelCase,
    UpperSnakeCase,
}

impl Convention {
    pub fn for_kind(kind: ElementKind) -> Option<Self> {
        match kind {
            ElementKind::Module | ElementKind::LocalEntity | ElementKind::EnumX => {
                Some(Self::PascalCase)
            }
            ElementKind::Attribute | ElementKind::FunctionEntity => Some(Self::CamelCase),
            ElementKind::AttributeEnum => Some(Self::UpperSnakeCase),
            ElementKind::Model | ElementKind::Parameter | ElementKind::Relation => None,
        }
    }

    /// Whether `name` follows the convention
    pub fn accepts(self, name: &str) -> bool {
        let Some(first) = name.chars().next() else {
            return true;
        };
        match self {
            Self::PascalCase => !first.is_lowercase(),
            Self::CamelCase => !first.is_uppercase(),
            Self::UpperSnakeCase => UPPER_SNAKE.is_match(name),
        }
    }

    /// The name rewritten to follow the convention
    pub fn apply(self, name: &str) -> String {
        let mut chars = name.chars();
        match self {
            Self::PascalCase => match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            },
            Self::CamelCase => match chars.next() {
                Some(first) => first.to_lowercase().chain(chars).collect(),
                None => String::new(),
            },
            Self::UpperSnakeCase => {
                let mut out = String::with_capacity(name.len() + 4);
                let mut previous_lower = false;
                for c in name.chars() {
                    if c.is_uppercase() && previous_lower {
                        out.push('_');
                    }
                    previous_lower = c.is_lowercase() || c.is_ascii_digit();
                    out.extend(c.to_uppercase());
                }
                out
            }
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::PascalCase => "should start with an uppercase letter (PascalCase)",
            Self::CamelCase => "should start with a lowercase letter (camelCase)",
            Self::UpperSnakeCase => "should be written in UPPER_SNAKE_CASE",
        }
    }
}

/// Validate the name of an element of `kind` located at `path`
///
/// Returns false when the name is empty, in which case no further name
/// checks are made.
pub fn validate_name(
    ctx: &mut ValidationContext<'_>,
    name: &str,
    kind: ElementKind,
    path: &str,
) -> bool {
    let label = kind.label();

    if name.trim().is_empty() {
        ctx.report(
            Diagnostic::new(Rule::EmptyName, format!("{label} name must not be empty"))
                .at(path)
                .on(kind, name),
        );
        return false;
    }

    let well_formed = match kind {
        ElementKind::Module => is_qualified_identifier(name),
        _ => is_identifier(name),
    };
    if !well_formed {
        ctx.report(
            Diagnostic::new(
                Rule::InvalidIdentifier,
                format!("{label} name '{name}' is not a valid identifier"),
            )
            .at(path)
            .on(kind, name)
            .with_suggestion("Use letters, digits and underscores, not starting with a digit"),
        );
    }

    if let Some(convention) = Convention::for_kind(kind) {
        if ctx.is_enabled(Rule::NamingConvention) && !convention.accepts(name) {
            ctx.report(
                Diagnostic::new(
                    Rule::NamingConvention,
                    format!("{label} name '{name}' {}", convention.describe()),
                )
                .at(path)
                .on(kind, name)
                .with_suggestion(format!("Rename to '{}'", convention.apply(name))),
            );
        }
    }

    true
}
