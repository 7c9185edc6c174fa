//! Name-based resolution of cross-references
//!
//! Architecture: Anti-Corruption Layer - Turns textual references into node ids
//! - A first pass collects symbols, a second pass resolves every reference in place
//! - Failures are recorded on the reference itself, never raised

use crate::model::{
    AbstractElement, AttributeType, DomainModel, ElementKind, NodeId, Reference, ValueType,
};
use std::collections::HashMap;

/// Outcome counts of a linking pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSummary {
    pub resolved: usize,
    pub failed: usize,
    /// References that already pointed at a target and were left alone
    pub preserved: usize,
}

#[derive(Debug, Default)]
struct Symbols {
    qualified: HashMap<String, NodeId>,
    simple: HashMap<String, Vec<NodeId>>,
}

impl Symbols {
    fn insert(&mut self, qualified: String, simple: &str, id: NodeId) {
        self.qualified.entry(qualified).or_insert(id);
        self.simple.entry(simple.to_string()).or_default().push(id);
    }

    fn lookup(&self, text: &str, kind: ElementKind) -> Result<NodeId, String> {
        if let Some(id) = self.qualified.get(text) {
            return Ok(*id);
        }

        match self.simple.get(text).map(Vec::as_slice) {
            Some([id]) => Ok(*id),
            Some(candidates) if candidates.len() > 1 => Err(format!(
                "Ambiguous reference to {kind:?} named '{text}': {} candidates.",
                candidates.len()
            )),
            _ => Err(format!("Could not resolve reference to {kind:?} named '{text}'.")),
        }
    }
}

/// Resolves every [`Reference`] in a model by name
#[derive(Debug, Default)]
pub struct Linker {
    entities: Symbols,
    enums: Symbols,
    relations_by_entity: HashMap<NodeId, HashMap<String, NodeId>>,
    summary: LinkSummary,
}

impl Linker {
    /// Link all references of a model in place
    pub fn link(model: &mut DomainModel) -> LinkSummary {
        let mut linker = Self::default();
        linker.collect(&model.elements, "");
        linker.resolve_elements(&mut model.elements);

        tracing::debug!(
            resolved = linker.summary.resolved,
            failed = linker.summary.failed,
            preserved = linker.summary.preserved,
            "linked model references"
        );
        linker.summary
    }

    fn collect(&mut self, elements: &[AbstractElement], prefix: &str) {
        for element in elements {
            let name = element.element_name();
            let qualified = qualify(prefix, name);
            match element {
                AbstractElement::Module(module) => self.collect(&module.elements, &qualified),
                AbstractElement::Entity(entity) => {
                    self.entities.insert(qualified, name, entity.id);
                    let relations = self.relations_by_entity.entry(entity.id).or_default();
                    for relation in &entity.relations {
                        relations.entry(relation.name.clone()).or_insert(relation.id);
                    }
                }
                AbstractElement::Enum(enumeration) => {
                    self.enums.insert(qualified, name, enumeration.id);
                }
            }
        }
    }

    fn resolve_elements(&mut self, elements: &mut [AbstractElement]) {
        for element in elements {
            match element {
                AbstractElement::Module(module) => self.resolve_elements(&mut module.elements),
                AbstractElement::Entity(entity) => {
                    if let Some(super_type) = &mut entity.super_type {
                        self.resolve(super_type, ElementKind::LocalEntity);
                    }

                    for attribute in &mut entity.attributes {
                        if let AttributeType::Enum(reference) = &mut attribute.ty {
                            self.resolve(reference, ElementKind::EnumX);
                        }
                    }

                    for relation in &mut entity.relations {
                        let target = relation.entity.as_mut().and_then(|reference| {
                            self.resolve(reference, ElementKind::LocalEntity);
                            reference.target()
                        });

                        if let Some(opposite) = &mut relation.opposite {
                            self.resolve_opposite(opposite, target);
                        }
                    }

                    for function in &mut entity.functions {
                        for parameter in &mut function.parameters {
                            self.resolve_value_type(&mut parameter.ty);
                        }
                        if let Some(response) = &mut function.response {
                            self.resolve_value_type(response);
                        }
                    }
                }
                AbstractElement::Enum(_) => {}
            }
        }
    }

    fn resolve_value_type(&mut self, ty: &mut ValueType) {
        match ty {
            ValueType::Primitive(_) => {}
            ValueType::Enum(reference) => self.resolve(reference, ElementKind::EnumX),
            ValueType::Entity(reference) => self.resolve(reference, ElementKind::LocalEntity),
        }
    }

    fn resolve<T>(&mut self, reference: &mut Reference<T>, kind: ElementKind) {
        if reference.is_resolved() {
            self.summary.preserved += 1;
            return;
        }

        let symbols = match kind {
            ElementKind::EnumX => &self.enums,
            _ => &self.entities,
        };

        match symbols.lookup(reference.ref_text(), kind) {
            Ok(id) => {
                reference.resolve(id);
                self.summary.resolved += 1;
            }
            Err(error) => {
                reference.fail(error);
                self.summary.failed += 1;
            }
        }
    }

    fn resolve_opposite<T>(&mut self, opposite: &mut Reference<T>, target: Option<NodeId>) {
        if opposite.is_resolved() {
            self.summary.preserved += 1;
            return;
        }

        let found = target
            .and_then(|entity| self.relations_by_entity.get(&entity))
            .and_then(|relations| relations.get(opposite.ref_text()).copied());

        match (target, found) {
            (_, Some(id)) => {
                opposite.resolve(id);
                self.summary.resolved += 1;
            }
            (None, None) => {
                let message = format!(
                    "Cannot resolve opposite '{}' of a relation without a resolved target.",
                    opposite.ref_text()
                );
                opposite.fail(message);
                self.summary.failed += 1;
            }
            (Some(_), None) => {
                let message = format!(
                    "Could not resolve reference to Relation named '{}'.",
                    opposite.ref_text()
                );
                opposite.fail(message);
                self.summary.failed += 1;
            }
        }
    }
}

/// Join a container path and a name with `.`
pub(crate) fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
