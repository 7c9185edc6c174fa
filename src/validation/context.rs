//! Mutable traversal state threaded through every validation rule

use crate::config::RuleSettings;
use crate::domain::diagnostics::Diagnostic;
use crate::domain::rules::Rule;
use crate::model::{DomainModel, ModelIndex};
use indexmap::IndexSet;
use std::collections::HashSet;

/// State of a single validation pass
///
/// Owns the diagnostics list and the path stack. The model is only borrowed
/// through its index, and the context is dropped when the pass returns.
pub struct ValidationContext<'m> {
    index: ModelIndex<'m>,
    settings: &'m RuleSettings,
    diagnostics: Vec<Diagnostic>,
    path: Vec<String>,
    /// Qualified module paths seen anywhere in the tree
    module_paths: HashSet<String>,
}

impl<'m> ValidationContext<'m> {
    pub fn new(model: &'m DomainModel, settings: &'m RuleSettings) -> Self {
        Self {
            index: ModelIndex::new(model),
            settings,
            diagnostics: Vec::new(),
            path: Vec::new(),
            module_paths: HashSet::new(),
        }
    }

    pub fn index(&self) -> &ModelIndex<'m> {
        &self.index
    }

    /// Append a diagnostic unless its rule is disabled
    pub fn report(&mut self, diagnostic: Diagnostic) {
        if self.settings.is_enabled(diagnostic.rule) {
            self.diagnostics.push(diagnostic);
        }
    }

    /// Whether findings of a rule would be kept
    pub fn is_enabled(&self, rule: Rule) -> bool {
        self.settings.is_enabled(rule)
    }

    /// Run `f` with `segment` pushed onto the path; the segment is popped on every exit
    pub fn scoped<R>(&mut self, segment: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(segment.to_string());
        let depth = self.path.len();
        let result = f(self);
        debug_assert_eq!(self.path.len(), depth, "unbalanced path stack");
        self.path.pop();
        result
    }

    /// Current path, segments joined with `.`
    pub fn path(&self) -> String {
        self.path.join(".")
    }

    /// Path of a non-container child of the current scope
    pub fn child_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path(), name)
        }
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Record a module's qualified path; false when it was already seen
    pub fn register_module_path(&mut self, path: String) -> bool {
        self.module_paths.insert(path)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Names already declared in one lexical scope
///
/// A fresh set is created for each module, entity or enum being visited and
/// dropped with it. Insertion order is kept so iteration is deterministic.
#[derive(Debug, Default)]
pub struct ScopeNames {
    names: IndexSet<String>,
}

impl ScopeNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a name; false when it is a duplicate in this scope
    pub fn insert(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diagnostics::Severity;

    #[test]
    fn test_scoped_path_is_balanced() {
        let model = DomainModel::new();
        let settings = RuleSettings::default();
        let mut ctx = ValidationContext::new(&model, &settings);

        let inner = ctx.scoped("Sales", |ctx| {
            ctx.scoped("Pedido", |ctx| {
                assert_eq!(ctx.child_path("quantidade"), "Sales.Pedido.quantidade");
                ctx.path()
            })
        });

        assert_eq!(inner, "Sales.Pedido");
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.path(), "");
        assert_eq!(ctx.child_path("Sales"), "Sales");
    }

    #[test]
    fn test_early_return_inside_scope_still_pops() {
        let model = DomainModel::new();
        let settings = RuleSettings::default();
        let mut ctx = ValidationContext::new(&model, &settings);

        let outcome: Option<()> = ctx.scoped("Sales", |ctx| {
            ctx.report(Diagnostic::new(Rule::EmptyEnum, "enum has no literals"));
            None?;
            Some(())
        });

        assert!(outcome.is_none());
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.diagnostics()[0].severity, Severity::Warning);
    }

    #[test]
    fn test_disabled_rules_are_dropped() {
        let model = DomainModel::new();
        let settings = RuleSettings {
            disabled: vec!["naming_convention".to_string()],
            ..Default::default()
        };
        let mut ctx = ValidationContext::new(&model, &settings);

        ctx.report(Diagnostic::new(Rule::NamingConvention, "use PascalCase"));
        ctx.report(Diagnostic::new(Rule::EmptyEnum, "enum has no literals"));

        assert_eq!(ctx.into_diagnostics().len(), 1);
    }

    #[test]
    fn test_scope_names_detect_duplicates_in_order() {
        let mut names = ScopeNames::new();
        assert!(names.insert("nome"));
        assert!(names.insert("preco"));
        assert!(!names.insert("nome"));
        assert_eq!(names.iter().collect::<Vec<_>>(), vec!["nome", "preco"]);
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_module_paths_span_the_whole_pass() {
        let model = DomainModel::new();
        let settings = RuleSettings::default();
        let mut ctx = ValidationContext::new(&model, &settings);

        assert!(ctx.register_module_path("A.Sales".to_string()));
        assert!(!ctx.register_module_path("A.Sales".to_string()));
    }
}
