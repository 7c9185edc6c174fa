use model_guardian::model::{
    AttributeDecl, EntityDecl, EnumDecl, ModelDecl, ModuleDecl, RelationDecl,
};
use model_guardian::{
    filter_by_severity, format_results, is_valid, validate_model, Configuration, Severity,
};
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Produto".to_string()),
        Just("produto".to_string()),
        Just("Pedido".to_string()),
        Just("Status".to_string()),
        Just(String::new()),
        Just("2x".to_string()),
        "[A-Za-z_][A-Za-z0-9_]{0,6}",
    ]
}

fn primitive() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("string".to_string()),
        Just("integer".to_string()),
        Just("decimal".to_string()),
        Just("varchar".to_string()),
        Just(String::new()),
    ]
}

fn attribute() -> impl Strategy<Value = AttributeDecl> {
    (
        name(),
        prop::option::of(name()),
        primitive(),
        any::<bool>(),
        any::<bool>(),
        prop::option::of(-5i64..5),
        prop::option::of(-5i64..5),
    )
        .prop_map(|(name, enumeration, tag, unique, blank, min, max)| {
            let mut attribute = match enumeration {
                Some(enumeration) => AttributeDecl::enumerated(name, enumeration),
                None => AttributeDecl::new(name, tag),
            };
            attribute.unique = unique;
            attribute.blank = blank;
            attribute.min = min;
            attribute.max = max;
            attribute
        })
}

fn entity() -> impl Strategy<Value = EntityDecl> {
    (
        name(),
        any::<bool>(),
        prop::option::of(name()),
        prop::collection::vec(attribute(), 0..4),
        prop::collection::vec((name(), prop::option::of(name())), 0..3),
    )
        .prop_map(|(name, is_abstract, extends, attributes, relations)| {
            let mut entity = EntityDecl::new(name);
            entity.is_abstract = is_abstract;
            entity.super_type = extends;
            entity.attributes = attributes;
            for (role, target) in relations {
                let mut relation = RelationDecl::one_to_many(role, "");
                relation.entity = target;
                entity = entity.relation(relation);
            }
            entity
        })
}

fn enumeration() -> impl Strategy<Value = EnumDecl> {
    (name(), prop::collection::vec(name(), 0..4)).prop_map(|(name, literals)| {
        literals.into_iter().fold(EnumDecl::new(name), EnumDecl::literal)
    })
}

fn module() -> impl Strategy<Value = ModuleDecl> {
    let leaf = (
        name(),
        prop::collection::vec(entity(), 0..3),
        prop::collection::vec(enumeration(), 0..2),
    )
        .prop_map(|(name, entities, enums)| {
            let module = entities.into_iter().fold(ModuleDecl::new(name), ModuleDecl::entity);
            enums.into_iter().fold(module, ModuleDecl::enumeration)
        });

    leaf.prop_recursive(2, 8, 3, |inner| {
        (name(), prop::collection::vec(inner, 0..3), prop::collection::vec(entity(), 0..2))
            .prop_map(|(name, children, entities)| {
                let module = children.into_iter().fold(ModuleDecl::new(name), ModuleDecl::module);
                entities.into_iter().fold(module, ModuleDecl::entity)
            })
    })
}

fn model() -> impl Strategy<Value = ModelDecl> {
    (
        prop::option::of((
            name(),
            prop::option::of(prop_oneof![Just("1.0.0"), Just("1.0"), Just("x")]),
        )),
        prop::collection::vec(module(), 0..3),
        prop::collection::vec(entity(), 0..2),
    )
        .prop_map(|(configuration, modules, root_entities)| {
            let mut decl = ModelDecl::new();
            if let Some((name, version)) = configuration {
                let mut configuration = Configuration::new(name);
                configuration.version = version.map(str::to_string);
                decl = decl.configuration(configuration);
            }
            let decl = modules.into_iter().fold(decl, ModelDecl::module);
            root_entities.into_iter().fold(decl, ModelDecl::entity)
        })
}

proptest! {
    #[test]
    fn validation_is_deterministic_and_idempotent(decl in model()) {
        let model = decl.build();
        let first = validate_model(&model);
        let second = validate_model(&model);
        prop_assert_eq!(&first, &second);

        let rebuilt = decl.build();
        prop_assert_eq!(first, validate_model(&rebuilt));
    }

    #[test]
    fn validity_matches_fatal_findings(decl in model()) {
        let model = decl.build();
        let diagnostics = validate_model(&model);
        let fatal = filter_by_severity(&diagnostics, Severity::Error);

        prop_assert_eq!(is_valid(&model), fatal.is_empty());
        prop_assert!(diagnostics.iter().all(|d| d.severity == d.rule.severity()));
    }

    #[test]
    fn severity_filters_partition_the_list(decl in model()) {
        let diagnostics = validate_model(&decl.build());
        let total: usize = Severity::DESCENDING
            .iter()
            .map(|severity| filter_by_severity(&diagnostics, *severity).len())
            .sum();

        prop_assert_eq!(total, diagnostics.len());
        prop_assert!(!format_results(&diagnostics).is_empty());
    }

    #[test]
    fn missing_configuration_is_always_reported(decl in model()) {
        let mut decl = decl;
        decl.configuration = None;
        let model = decl.build();

        prop_assert!(!is_valid(&model));
        prop_assert!(validate_model(&model).iter().any(|d| d.message == "missing configuration"));
    }
}
