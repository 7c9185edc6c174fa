//! Read-only lookup from node ids to the nodes that carry them

use crate::model::{AbstractElement, DomainModel, EnumX, LocalEntity, NodeId};
use std::collections::HashMap;

/// Id lookup over every entity and enum of a model
///
/// Covers the whole tree, including elements declared directly under the
/// root, so any resolved reference can be dereferenced.
#[derive(Debug, Default)]
pub struct ModelIndex<'m> {
    entities: HashMap<NodeId, &'m LocalEntity>,
    enums: HashMap<NodeId, &'m EnumX>,
}

impl<'m> ModelIndex<'m> {
    pub fn new(model: &'m DomainModel) -> Self {
        let mut index = Self::default();
        index.collect(&model.elements);
        index
    }

    fn collect(&mut self, elements: &'m [AbstractElement]) {
        for element in elements {
            match element {
                AbstractElement::Module(module) => self.collect(&module.elements),
                AbstractElement::Entity(entity) => {
                    self.entities.entry(entity.id).or_insert(entity);
                }
                AbstractElement::Enum(enumeration) => {
                    self.enums.entry(enumeration.id).or_insert(enumeration);
                }
            }
        }
    }

    pub fn entity(&self, id: NodeId) -> Option<&'m LocalEntity> {
        self.entities.get(&id).copied()
    }

    pub fn enumeration(&self, id: NodeId) -> Option<&'m EnumX> {
        self.enums.get(&id).copied()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }
}
