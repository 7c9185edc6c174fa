//! Declarative model documents
//!
//! Architecture: Anti-Corruption Layer - External model descriptions become typed trees
//! - Declarations mirror the tree by name only; ids and back-links are assigned on build
//! - The same declarations deserialize from YAML/JSON and serve as a construction API
//! - Building always ends with a linking pass so references carry targets or errors

use crate::domain::diagnostics::{GuardianError, GuardianResult};
use crate::model::linker::Linker;
use crate::model::{
    AbstractElement, Attribute, AttributeEnum, AttributeType, Configuration, DomainModel, EnumX,
    FunctionEntity, LocalEntity, Module, NodeId, Parameter, Reference, Relation, RelationKind,
    ValueType,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A whole model described by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDecl {
    #[serde(default)]
    pub configuration: Option<Configuration>,
    #[serde(default)]
    pub metadata: IndexMap<String, String>,
    #[serde(default)]
    pub elements: Vec<ElementDecl>,
}

/// A module, entity or enum declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementDecl {
    Module(ModuleDecl),
    Entity(EntityDecl),
    Enum(EnumDecl),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleDecl {
    pub name: String,
    #[serde(default)]
    pub elements: Vec<ElementDecl>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDecl {
    pub name: String,
    #[serde(rename = "abstract", default)]
    pub is_abstract: bool,
    #[serde(rename = "extends", default)]
    pub super_type: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeDecl>,
    #[serde(default)]
    pub relations: Vec<RelationDecl>,
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
}

/// An attribute typed either by a primitive tag (`type`) or an enum name (`enum`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeDecl {
    pub name: String,
    #[serde(rename = "type", default)]
    pub primitive: Option<String>,
    #[serde(rename = "enum", default)]
    pub enumeration: Option<String>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub blank: bool,
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKindDecl {
    #[default]
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

/// A relation; flags that do not apply to the cardinality are ignored on build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationDecl {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: RelationKindDecl,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub opposite: Option<String>,
    #[serde(default)]
    pub cascade: bool,
    #[serde(default)]
    pub eager: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub join_table: Option<String>,
}

/// A type written as `type: <tag>`, `enum: <Enum>` or `entity: <Entity>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub primitive: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    #[serde(default)]
    pub response: Option<TypeDecl>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    #[serde(flatten)]
    pub ty: TypeDecl,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    #[serde(default)]
    pub literals: Vec<LiteralDecl>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiteralDecl {
    pub name: String,
    #[serde(default)]
    pub value: Option<i64>,
}

impl ModelDecl {
    /// A model with no configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// A model whose configuration carries only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self::new().configuration(Configuration::new(name))
    }

    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn module(mut self, module: ModuleDecl) -> Self {
        self.elements.push(ElementDecl::Module(module));
        self
    }

    /// Declare an entity directly under the root
    pub fn entity(mut self, entity: EntityDecl) -> Self {
        self.elements.push(ElementDecl::Entity(entity));
        self
    }

    /// Declare an enum directly under the root
    pub fn enumeration(mut self, enumeration: EnumDecl) -> Self {
        self.elements.push(ElementDecl::Enum(enumeration));
        self
    }

    /// Parse a YAML model document
    pub fn from_yaml_str(content: &str) -> GuardianResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| GuardianError::model_load("<yaml>", format!("Failed to parse model: {e}")))
    }

    /// Parse a JSON model document
    pub fn from_json_str(content: &str) -> GuardianResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| GuardianError::model_load("<json>", format!("Failed to parse model: {e}")))
    }

    /// Load a model document; `.json` files are JSON, everything else YAML
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GuardianResult<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|e| {
            GuardianError::model_load(&origin, format!("Failed to read model file: {e}"))
        })?;

        let is_json = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&contents).map_err(|e| {
                GuardianError::model_load(&origin, format!("Failed to parse model: {e}"))
            })
        } else {
            serde_yaml::from_str(&contents).map_err(|e| {
                GuardianError::model_load(&origin, format!("Failed to parse model: {e}"))
            })
        }
    }

    /// Build the tree and link its references
    pub fn build(&self) -> DomainModel {
        let mut model = self.build_unlinked();
        Linker::link(&mut model);
        model
    }

    /// Build the tree leaving every reference unresolved
    pub fn build_unlinked(&self) -> DomainModel {
        let mut ids = IdAllocator::default();
        DomainModel {
            id: NodeId::ROOT,
            configuration: self.configuration.clone(),
            metadata: self.metadata.clone(),
            elements: lower_elements(&self.elements, NodeId::ROOT, &mut ids),
        }
    }
}

impl ModuleDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    pub fn module(mut self, module: ModuleDecl) -> Self {
        self.elements.push(ElementDecl::Module(module));
        self
    }

    pub fn entity(mut self, entity: EntityDecl) -> Self {
        self.elements.push(ElementDecl::Entity(entity));
        self
    }

    pub fn enumeration(mut self, enumeration: EnumDecl) -> Self {
        self.elements.push(ElementDecl::Enum(enumeration));
        self
    }
}

impl EntityDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn set_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn extends(mut self, super_type: impl Into<String>) -> Self {
        self.super_type = Some(super_type.into());
        self
    }

    pub fn attribute(mut self, attribute: AttributeDecl) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn relation(mut self, relation: RelationDecl) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn function(mut self, function: FunctionDecl) -> Self {
        self.functions.push(function);
        self
    }
}

impl AttributeDecl {
    /// An attribute typed by a primitive tag, kept verbatim
    pub fn new(name: impl Into<String>, primitive: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primitive: Some(primitive.into()),
            ..Default::default()
        }
    }

    /// An attribute typed by an enum reference
    pub fn enumerated(name: impl Into<String>, enumeration: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enumeration: Some(enumeration.into()),
            ..Default::default()
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Allow the attribute to be left blank
    pub fn optional(mut self) -> Self {
        self.blank = true;
        self
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn range(self, min: i64, max: i64) -> Self {
        self.min(min).max(max)
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }
}

impl RelationDecl {
    /// A relation with no target entity
    pub fn new(name: impl Into<String>, kind: RelationKindDecl) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn one_to_one(name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::new(name, RelationKindDecl::OneToOne).to(entity)
    }

    pub fn one_to_many(name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::new(name, RelationKindDecl::OneToMany).to(entity)
    }

    pub fn many_to_one(name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::new(name, RelationKindDecl::ManyToOne).to(entity)
    }

    pub fn many_to_many(name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::new(name, RelationKindDecl::ManyToMany).to(entity)
    }

    /// Set the target entity
    pub fn to(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn opposite(mut self, opposite: impl Into<String>) -> Self {
        self.opposite = Some(opposite.into());
        self
    }

    pub fn cascade(mut self) -> Self {
        self.cascade = true;
        self
    }

    pub fn eager(mut self) -> Self {
        self.eager = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn join_table(mut self, table: impl Into<String>) -> Self {
        self.join_table = Some(table.into());
        self
    }

    fn lower_kind(&self) -> RelationKind {
        match self.kind {
            RelationKindDecl::OneToOne => RelationKind::OneToOne {
                cascade: self.cascade,
            },
            RelationKindDecl::OneToMany => RelationKind::OneToMany {
                cascade: self.cascade,
                eager: self.eager,
            },
            RelationKindDecl::ManyToOne => RelationKind::ManyToOne {
                required: self.required,
                eager: self.eager,
            },
            RelationKindDecl::ManyToMany => RelationKind::ManyToMany {
                join_table: self.join_table.clone(),
            },
        }
    }
}

impl TypeDecl {
    pub fn primitive(tag: impl Into<String>) -> Self {
        Self {
            primitive: Some(tag.into()),
            ..Default::default()
        }
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self {
            enumeration: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn entity(name: impl Into<String>) -> Self {
        Self {
            entity: Some(name.into()),
            ..Default::default()
        }
    }

    fn lower(&self) -> ValueType {
        match (&self.entity, &self.enumeration, &self.primitive) {
            (Some(entity), _, _) => ValueType::Entity(Reference::unresolved(entity)),
            (None, Some(enumeration), _) => ValueType::Enum(Reference::unresolved(enumeration)),
            (None, None, primitive) => ValueType::Primitive(primitive.clone().unwrap_or_default()),
        }
    }
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn parameter(mut self, name: impl Into<String>, ty: TypeDecl) -> Self {
        self.parameters.push(ParameterDecl {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn returns(mut self, ty: TypeDecl) -> Self {
        self.response = Some(ty);
        self
    }
}

impl EnumDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            literals: Vec::new(),
        }
    }

    pub fn literal(mut self, name: impl Into<String>) -> Self {
        self.literals.push(LiteralDecl {
            name: name.into(),
            value: None,
        });
        self
    }

    pub fn literal_value(mut self, name: impl Into<String>, value: i64) -> Self {
        self.literals.push(LiteralDecl {
            name: name.into(),
            value: Some(value),
        });
        self
    }
}

/// Hands out node ids in declaration order; the root keeps id 0
#[derive(Debug)]
struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: NodeId::ROOT.raw() + 1 }
    }
}

impl IdAllocator {
    fn next(&mut self) -> NodeId {
        let id = NodeId::new(self.next);
        self.next += 1;
        id
    }
}

fn lower_elements(
    elements: &[ElementDecl],
    container: NodeId,
    ids: &mut IdAllocator,
) -> Vec<AbstractElement> {
    elements
        .iter()
        .map(|element| match element {
            ElementDecl::Module(module) => {
                let id = ids.next();
                AbstractElement::Module(Module {
                    id,
                    container,
                    name: module.name.clone(),
                    elements: lower_elements(&module.elements, id, ids),
                })
            }
            ElementDecl::Entity(entity) => {
                AbstractElement::Entity(lower_entity(entity, container, ids))
            }
            ElementDecl::Enum(enumeration) => {
                let id = ids.next();
                AbstractElement::Enum(EnumX {
                    id,
                    container,
                    name: enumeration.name.clone(),
                    literals: enumeration
                        .literals
                        .iter()
                        .map(|literal| AttributeEnum {
                            id: ids.next(),
                            container: id,
                            name: literal.name.clone(),
                            value: literal.value,
                        })
                        .collect(),
                })
            }
        })
        .collect()
}

fn lower_entity(entity: &EntityDecl, container: NodeId, ids: &mut IdAllocator) -> LocalEntity {
    let id = ids.next();

    let attributes = entity
        .attributes
        .iter()
        .map(|attribute| Attribute {
            id: ids.next(),
            container: id,
            name: attribute.name.clone(),
            ty: match &attribute.enumeration {
                Some(enumeration) => AttributeType::Enum(Reference::unresolved(enumeration)),
                None => AttributeType::Primitive(attribute.primitive.clone().unwrap_or_default()),
            },
            unique: attribute.unique,
            blank: attribute.blank,
            min: attribute.min,
            max: attribute.max,
            default: attribute.default.clone(),
        })
        .collect();

    let relations = entity
        .relations
        .iter()
        .map(|relation| Relation {
            id: ids.next(),
            container: id,
            name: relation.name.clone(),
            kind: relation.lower_kind(),
            entity: relation.entity.as_ref().map(Reference::unresolved),
            opposite: relation.opposite.as_ref().map(Reference::unresolved),
        })
        .collect();

    let functions = entity
        .functions
        .iter()
        .map(|function| {
            let function_id = ids.next();
            FunctionEntity {
                id: function_id,
                container: id,
                name: function.name.clone(),
                parameters: function
                    .parameters
                    .iter()
                    .map(|parameter| Parameter {
                        id: ids.next(),
                        container: function_id,
                        name: parameter.name.clone(),
                        ty: parameter.ty.lower(),
                    })
                    .collect(),
                response: function.response.as_ref().map(TypeDecl::lower),
            }
        })
        .collect();

    LocalEntity {
        id,
        container,
        name: entity.name.clone(),
        is_abstract: entity.is_abstract,
        super_type: entity.super_type.as_ref().map(Reference::unresolved),
        attributes,
        relations,
        functions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;
    use std::collections::HashSet;
    use tempfile::TempDir;

    const SAMPLE_YAML: &str = r#"
configuration:
  name: Loja
  version: "1.2.0"
  database:
    engine: postgres
metadata:
  owner: vendas
elements:
  - kind: module
    name: Sales
    elements:
      - kind: enum
        name: Status
        literals:
          - name: ABERTO
          - name: FECHADO
            value: 2
      - kind: entity
        name: Pedido
        attributes:
          - name: quantidade
            type: integer
            min: 1
            max: 10
          - name: status
            enum: Status
        relations:
          - name: itens
            type: one_to_many
            entity: Item
        functions:
          - name: total
            parameters:
              - name: desconto
                type: decimal
            response:
              type: decimal
      - kind: entity
        name: Item
"#;

    #[test]
    fn test_yaml_document_builds_linked_tree() {
        let decl = ModelDecl::from_yaml_str(SAMPLE_YAML).unwrap();
        let model = decl.build();

        assert_eq!(model.name(), Some("Loja"));
        assert_eq!(model.metadata.get("owner").map(String::as_str), Some("vendas"));

        let sales = model.elements[0].as_module().unwrap();
        let status = sales.elements[0].as_enum().unwrap();
        assert_eq!(status.literals[1].value, Some(2));
        assert_eq!(status.literals[0].container, status.id);

        let pedido = sales.elements[1].as_entity().unwrap();
        assert_eq!(pedido.container, sales.id);
        assert_eq!(pedido.attributes[0].min, Some(1));
        match &pedido.attributes[1].ty {
            AttributeType::Enum(reference) => assert_eq!(reference.target(), Some(status.id)),
            other => panic!("unexpected type {other:?}"),
        }
        assert!(matches!(
            pedido.relations[0].kind,
            RelationKind::OneToMany { cascade: false, eager: false }
        ));
        assert!(pedido.relations[0].entity.as_ref().unwrap().is_resolved());
        assert_eq!(pedido.functions[0].parameters[0].ty, ValueType::Primitive("decimal".into()));
    }

    #[test]
    fn test_ids_are_unique_and_root_is_zero() {
        let model = ModelDecl::from_yaml_str(SAMPLE_YAML).unwrap().build();
        let mut seen = HashSet::new();
        seen.insert(model.id());

        fn walk(elements: &[AbstractElement], seen: &mut HashSet<NodeId>) {
            for element in elements {
                assert!(seen.insert(element.id()), "duplicate id {}", element.id());
                match element {
                    AbstractElement::Module(module) => walk(&module.elements, seen),
                    AbstractElement::Entity(entity) => {
                        for attribute in &entity.attributes {
                            assert!(seen.insert(attribute.id));
                        }
                        for function in &entity.functions {
                            assert!(seen.insert(function.id));
                        }
                    }
                    AbstractElement::Enum(enumeration) => {
                        for literal in &enumeration.literals {
                            assert!(seen.insert(literal.id));
                        }
                    }
                }
            }
        }

        walk(&model.elements, &mut seen);
        assert_eq!(model.id(), NodeId::ROOT);
    }

    #[test]
    fn test_unlinked_build_leaves_references_open() {
        let model = ModelDecl::named("Loja")
            .module(ModuleDecl::new("Sales").entity(EntityDecl::new("Pedido").extends("Base")))
            .build_unlinked();

        let pedido = model.elements[0].as_module().unwrap().elements[0].as_entity().unwrap();
        let super_type = pedido.super_type.as_ref().unwrap();
        assert!(!super_type.is_resolved());
        assert_eq!(super_type.error(), None);
    }

    #[test]
    fn test_load_from_json_and_yaml_files() {
        let temp_dir = TempDir::new().unwrap();
        let decl = ModelDecl::named("Loja")
            .module(ModuleDecl::new("Sales").entity(EntityDecl::new("Pedido")));

        let json_path = temp_dir.path().join("model.json");
        std::fs::write(&json_path, serde_json::to_string(&decl).unwrap()).unwrap();
        assert_eq!(ModelDecl::load_from_file(&json_path).unwrap(), decl);

        let yaml_path = temp_dir.path().join("model.yaml");
        std::fs::write(&yaml_path, serde_yaml::to_string(&decl).unwrap()).unwrap();
        assert_eq!(ModelDecl::load_from_file(&yaml_path).unwrap(), decl);
    }

    #[test]
    fn test_malformed_document_is_a_load_error() {
        let error =
            ModelDecl::from_yaml_str("elements: [ { kind: widget, name: X } ]").unwrap_err();
        assert!(matches!(error, GuardianError::ModelLoad { .. }));

        let missing = ModelDecl::load_from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(missing.to_string().contains("/definitely/not/here.yaml"));
    }
}
