//! Typed domain-modeling tree
//!
//! Architecture: Domain Model - The tree is pure data consumed by validation and generators
//! - Parents own their children; children point back at their container by id
//! - Cross-references are lazy: a name plus an optional resolved id
//! - Element kinds form closed enums so rule dispatch is an exhaustive match

pub mod decl;
pub mod index;
pub mod linker;
pub mod reference;
pub mod types;

pub use decl::{
    AttributeDecl, EntityDecl, EnumDecl, FunctionDecl, LiteralDecl, ModelDecl, ModuleDecl,
    ParameterDecl, RelationDecl,
};
pub use index::ModelIndex;
pub use linker::Linker;
pub use reference::Reference;
pub use types::{AttributeType, DataType, ValueType};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a node within one built tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The model root always carries this id
    pub const ROOT: NodeId = NodeId(0);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discriminator shared by every tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Model,
    Module,
    LocalEntity,
    Attribute,
    EnumX,
    AttributeEnum,
    FunctionEntity,
    Parameter,
    Relation,
}

impl ElementKind {
    /// Label used in diagnostic messages and reports
    pub fn label(self) -> &'static str {
        match self {
            Self::Model => "Model",
            Self::Module => "Module",
            Self::LocalEntity => "Entity",
            Self::Attribute => "Attribute",
            Self::EnumX => "Enum",
            Self::AttributeEnum => "Enum literal",
            Self::FunctionEntity => "Function",
            Self::Parameter => "Parameter",
            Self::Relation => "Relation",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Behavior common to every tree node
pub trait Node {
    fn id(&self) -> NodeId;

    /// The owning node, absent only at the root
    fn container(&self) -> Option<NodeId>;

    fn kind(&self) -> ElementKind;

    /// Name of the node, absent for the root
    fn name(&self) -> Option<&str>;

    fn is_module(&self) -> bool {
        self.kind() == ElementKind::Module
    }

    fn is_entity(&self) -> bool {
        self.kind() == ElementKind::LocalEntity
    }

    fn is_enum(&self) -> bool {
        self.kind() == ElementKind::EnumX
    }

    fn is_attribute(&self) -> bool {
        self.kind() == ElementKind::Attribute
    }

    fn is_relation(&self) -> bool {
        self.kind() == ElementKind::Relation
    }

    fn is_function(&self) -> bool {
        self.kind() == ElementKind::FunctionEntity
    }
}

macro_rules! named_node {
    ($ty:ty, $kind:expr) => {
        impl Node for $ty {
            fn id(&self) -> NodeId {
                self.id
            }

            fn container(&self) -> Option<NodeId> {
                Some(self.container)
            }

            fn kind(&self) -> ElementKind {
                $kind
            }

            fn name(&self) -> Option<&str> {
                Some(&self.name)
            }
        }
    };
}

/// Project-level settings of a model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stack: Option<TargetStack>,
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

impl Configuration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_stack(mut self, stack: TargetStack) -> Self {
        self.stack = Some(stack);
        self
    }

    pub fn with_database(mut self, database: DatabaseConfig) -> Self {
        self.database = Some(database);
        self
    }
}

/// Technology stack generated code targets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetStack {
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub frontend: Option<String>,
}

/// Database settings for generated persistence code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub engine: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

/// Root of a domain model
#[derive(Debug, Clone, PartialEq)]
pub struct DomainModel {
    pub id: NodeId,
    pub configuration: Option<Configuration>,
    /// Free-form metadata in declaration order
    pub metadata: IndexMap<String, String>,
    pub elements: Vec<AbstractElement>,
}

impl DomainModel {
    /// An empty model with no configuration
    pub fn new() -> Self {
        Self {
            id: NodeId::ROOT,
            configuration: None,
            metadata: IndexMap::new(),
            elements: Vec::new(),
        }
    }

    /// Top-level modules in declaration order
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.elements.iter().filter_map(AbstractElement::as_module)
    }

    /// Name from the configuration, if any
    pub fn name(&self) -> Option<&str> {
        self.configuration.as_ref().map(|configuration| configuration.name.as_str())
    }
}

impl Default for DomainModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for DomainModel {
    fn id(&self) -> NodeId {
        self.id
    }

    fn container(&self) -> Option<NodeId> {
        None
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Model
    }

    fn name(&self) -> Option<&str> {
        None
    }
}

/// Anything a model or module may contain directly
#[derive(Debug, Clone, PartialEq)]
pub enum AbstractElement {
    Module(Module),
    Entity(LocalEntity),
    Enum(EnumX),
}

impl AbstractElement {
    pub fn as_module(&self) -> Option<&Module> {
        match self {
            Self::Module(module) => Some(module),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&LocalEntity> {
        match self {
            Self::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumX> {
        match self {
            Self::Enum(enumeration) => Some(enumeration),
            _ => None,
        }
    }

    fn node(&self) -> &dyn Node {
        match self {
            Self::Module(module) => module,
            Self::Entity(entity) => entity,
            Self::Enum(enumeration) => enumeration,
        }
    }

    /// Declared name of the element
    pub fn element_name(&self) -> &str {
        match self {
            Self::Module(module) => &module.name,
            Self::Entity(entity) => &entity.name,
            Self::Enum(enumeration) => &enumeration.name,
        }
    }
}

impl Node for AbstractElement {
    fn id(&self) -> NodeId {
        self.node().id()
    }

    fn container(&self) -> Option<NodeId> {
        self.node().container()
    }

    fn kind(&self) -> ElementKind {
        self.node().kind()
    }

    fn name(&self) -> Option<&str> {
        Some(self.element_name())
    }
}

/// Namespace grouping elements; the name may be dot-qualified
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub id: NodeId,
    pub container: NodeId,
    pub name: String,
    pub elements: Vec<AbstractElement>,
}

named_node!(Module, ElementKind::Module);

/// A domain entity
#[derive(Debug, Clone, PartialEq)]
pub struct LocalEntity {
    pub id: NodeId,
    pub container: NodeId,
    pub name: String,
    pub is_abstract: bool,
    pub super_type: Option<Reference<LocalEntity>>,
    pub attributes: Vec<Attribute>,
    pub relations: Vec<Relation>,
    pub functions: Vec<FunctionEntity>,
}

named_node!(LocalEntity, ElementKind::LocalEntity);

/// A scalar or enum-typed property of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub id: NodeId,
    pub container: NodeId,
    pub name: String,
    pub ty: AttributeType,
    pub unique: bool,
    /// Whether the attribute may be left empty
    pub blank: bool,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub default: Option<String>,
}

named_node!(Attribute, ElementKind::Attribute);

impl Attribute {
    /// Required means the attribute may not be left blank
    pub fn is_required(&self) -> bool {
        !self.blank
    }
}

/// Closed set of named values
#[derive(Debug, Clone, PartialEq)]
pub struct EnumX {
    pub id: NodeId,
    pub container: NodeId,
    pub name: String,
    pub literals: Vec<AttributeEnum>,
}

named_node!(EnumX, ElementKind::EnumX);

/// One enum literal
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeEnum {
    pub id: NodeId,
    pub container: NodeId,
    pub name: String,
    pub value: Option<i64>,
}

named_node!(AttributeEnum, ElementKind::AttributeEnum);

/// A behavior signature declared on an entity
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionEntity {
    pub id: NodeId,
    pub container: NodeId,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub response: Option<ValueType>,
}

named_node!(FunctionEntity, ElementKind::FunctionEntity);

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub id: NodeId,
    pub container: NodeId,
    pub name: String,
    pub ty: ValueType,
}

named_node!(Parameter, ElementKind::Parameter);

/// Association cardinality and the options each cardinality supports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationKind {
    OneToOne { cascade: bool },
    OneToMany { cascade: bool, eager: bool },
    ManyToOne { required: bool, eager: bool },
    ManyToMany { join_table: Option<String> },
}

impl RelationKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::OneToOne { .. } => "OneToOne",
            Self::OneToMany { .. } => "OneToMany",
            Self::ManyToOne { .. } => "ManyToOne",
            Self::ManyToMany { .. } => "ManyToMany",
        }
    }
}

/// Association from an entity to another entity
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub id: NodeId,
    pub container: NodeId,
    /// Role name
    pub name: String,
    pub kind: RelationKind,
    pub entity: Option<Reference<LocalEntity>>,
    /// The inverse relation on the target entity
    pub opposite: Option<Reference<Relation>>,
}

named_node!(Relation, ElementKind::Relation);
