//! Entity rules
//!
//! Architecture: Domain Service - One function per member kind, all appending to the context
//! - Attribute and function names are unique in separate per-entity scopes
//! - Inheritance is dereferenced one hop only, so cyclic hierarchies always terminate

use crate::domain::diagnostics::Diagnostic;
use crate::domain::rules::Rule;
use crate::model::{
    Attribute, AttributeType, DataType, ElementKind, LocalEntity, Reference, Relation,
};
use crate::validation::context::{ScopeNames, ValidationContext};
use crate::validation::naming::validate_name;

pub fn validate_entity(ctx: &mut ValidationContext<'_>, entity: &LocalEntity) {
    ctx.scoped(&entity.name, |ctx| {
        let path = ctx.path();
        tracing::trace!(
            path = %path,
            attributes = entity.attributes.len(),
            relations = entity.relations.len(),
            functions = entity.functions.len(),
            "validating entity"
        );

        validate_name(ctx, &entity.name, ElementKind::LocalEntity, &path);

        let mut attribute_names = ScopeNames::new();
        for attribute in &entity.attributes {
            if !attribute_names.insert(&attribute.name) {
                ctx.report(
                    Diagnostic::new(
                        Rule::DuplicateAttributeName,
                        format!(
                            "Duplicate attribute '{}' in entity '{}'",
                            attribute.name, entity.name
                        ),
                    )
                    .at(path.as_str())
                    .on(ElementKind::Attribute, attribute.name.as_str()),
                );
            }
            validate_attribute(ctx, attribute);
        }

        for relation in &entity.relations {
            validate_relation(ctx, entity, relation);
        }

        let mut function_names = ScopeNames::new();
        for function in &entity.functions {
            if !function_names.insert(&function.name) {
                ctx.report(
                    Diagnostic::new(
                        Rule::DuplicateFunctionName,
                        format!(
                            "Duplicate function '{}' in entity '{}'",
                            function.name, entity.name
                        ),
                    )
                    .at(path.as_str())
                    .on(ElementKind::FunctionEntity, function.name.as_str())
                    .with_suggestion(
                        "Overloads are not supported by every generator; use distinct names",
                    ),
                );
            }
            let function_path = ctx.child_path(&function.name);
            validate_name(ctx, &function.name, ElementKind::FunctionEntity, &function_path);
        }

        if entity.super_type.is_some() {
            validate_inheritance(ctx, entity);
        }
    });
}

/// Type, range and uniqueness rules for one attribute of the current entity
pub fn validate_attribute(ctx: &mut ValidationContext<'_>, attribute: &Attribute) {
    let path = ctx.child_path(&attribute.name);
    let name = attribute.name.as_str();

    validate_name(ctx, name, ElementKind::Attribute, &path);

    match &attribute.ty {
        AttributeType::Primitive(tag) => {
            if DataType::from_tag(tag).is_none() {
                ctx.report(
                    Diagnostic::new(
                        Rule::UnknownPrimitiveType,
                        format!("Attribute '{name}' has unknown type '{tag}'"),
                    )
                    .at(path.as_str())
                    .on(ElementKind::Attribute, name)
                    .with_suggestion(format!("Use one of: {}", DataType::known_tags())),
                );
            }
        }
        AttributeType::Enum(reference) => {
            let found = reference.target().and_then(|id| ctx.index().enumeration(id));
            if found.is_none() {
                ctx.report(
                    Diagnostic::new(
                        Rule::UnresolvedAttributeType,
                        format!(
                            "Attribute '{name}' references unknown enum '{}'{}",
                            reference.ref_text(),
                            resolution_detail(reference)
                        ),
                    )
                    .at(path.as_str())
                    .on(ElementKind::Attribute, name),
                );
            }
        }
    }

    if let (Some(min), Some(max)) = (attribute.min, attribute.max) {
        if min > max {
            ctx.report(
                Diagnostic::new(
                    Rule::InvalidRange,
                    format!("Attribute '{name}' has min ({min}) greater than max ({max})"),
                )
                .at(path.as_str())
                .on(ElementKind::Attribute, name),
            );
        }
    }

    if attribute.is_required() && attribute.unique {
        ctx.report(
            Diagnostic::new(
                Rule::RequiredUniqueAttribute,
                format!("Attribute '{name}' is required and unique"),
            )
            .at(path.as_str())
            .on(ElementKind::Attribute, name)
            .with_suggestion("Consider how unique values will be generated"),
        );
    }
}

/// Target rules for one relation of `entity`
pub fn validate_relation(
    ctx: &mut ValidationContext<'_>,
    entity: &LocalEntity,
    relation: &Relation,
) {
    let path = ctx.child_path(&relation.name);
    let name = relation.name.as_str();
    let kind = relation.kind.label();

    let Some(reference) = &relation.entity else {
        ctx.report(
            Diagnostic::new(
                Rule::UnresolvedRelationTarget,
                format!("{kind} relation '{name}' has no target entity"),
            )
            .at(path.as_str())
            .on(ElementKind::Relation, name),
        );
        return;
    };

    match reference.target().and_then(|id| ctx.index().entity(id)) {
        None => ctx.report(
            Diagnostic::new(
                Rule::UnresolvedRelationTarget,
                format!(
                    "{kind} relation '{name}' references unknown entity '{}'{}",
                    reference.ref_text(),
                    resolution_detail(reference)
                ),
            )
            .at(path.as_str())
            .on(ElementKind::Relation, name),
        ),
        Some(target) if target.id == entity.id => ctx.report(
            Diagnostic::new(
                Rule::SelfRelation,
                format!("{kind} relation '{name}' of '{}' targets its own entity", entity.name),
            )
            .at(path.as_str())
            .on(ElementKind::Relation, name),
        ),
        Some(_) => {}
    }

    if let Some(opposite) = &relation.opposite {
        tracing::trace!(
            path = %path,
            opposite = opposite.ref_text(),
            resolved = opposite.is_resolved(),
            "opposite side not checked"
        );
    }
}

/// Single-hop cycle and abstractness check on the supertype of `entity`
pub fn validate_inheritance(ctx: &mut ValidationContext<'_>, entity: &LocalEntity) {
    let Some(reference) = &entity.super_type else {
        return;
    };
    let path = ctx.path();

    let Some(parent) = reference.target().and_then(|id| ctx.index().entity(id)) else {
        ctx.report(
            Diagnostic::new(
                Rule::UnresolvedSuperType,
                format!(
                    "Entity '{}' extends unknown entity '{}'{}",
                    entity.name,
                    reference.ref_text(),
                    resolution_detail(reference)
                ),
            )
            .at(path.as_str())
            .on(ElementKind::LocalEntity, entity.name.as_str()),
        );
        return;
    };

    let points_back = parent.super_type.as_ref().and_then(Reference::target) == Some(entity.id);
    if points_back {
        ctx.report(
            Diagnostic::new(
                Rule::CircularInheritance,
                format!(
                    "Circular inheritance between '{}' and '{}'",
                    entity.name, parent.name
                ),
            )
            .at(path.as_str())
            .on(ElementKind::LocalEntity, entity.name.as_str()),
        );
    }

    if !parent.is_abstract {
        ctx.report(
            Diagnostic::new(
                Rule::NonAbstractSupertype,
                format!(
                    "Entity '{}' extends '{}', which is not abstract",
                    entity.name, parent.name
                ),
            )
            .at(path.as_str())
            .on(ElementKind::LocalEntity, entity.name.as_str())
            .with_suggestion(format!("Mark '{}' as abstract", parent.name)),
        );
    }
}

fn resolution_detail<T>(reference: &Reference<T>) -> String {
    match reference.error() {
        Some(error) => format!(": {error}"),
        None => String::new(),
    }
}
