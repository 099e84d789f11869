//! Integration tests for the type registry: registration preconditions,
//! descriptor validity, built-ins, predicates and prototype composition.

use serde_json::json;
use typology::{Descriptor, SchemaError, TypeDef, TypeDefinition, Typology, Value};

fn even() -> TypeDef {
    TypeDef::predicate(|_, value| matches!(value, Value::Num(n) if n % 2.0 == 0.0))
}

// --------------------------------------------------------------- Registration

#[test]
fn test_register_and_has() {
    let mut types = Typology::new();
    assert!(!types.has("even"));
    types.register("even", even()).unwrap();
    assert!(types.has("even"));
}

#[test]
fn test_register_chains() {
    let mut types = Typology::new();
    types
        .register("word", TypeDef::schema("string"))
        .unwrap()
        .register("words", TypeDef::schema(Descriptor::from_json(&json!(["word"])).unwrap()))
        .unwrap();
    assert!(types.has("word"));
    assert!(types.has("words"));
    assert!(types
        .check(
            &Value::from(json!(["a", "b"])),
            &Descriptor::from("words")
        )
        .unwrap());
}

#[test]
fn test_empty_id_rejected() {
    let mut types = Typology::new();
    assert_eq!(
        types.register("", TypeDef::schema("string")).err(),
        Some(SchemaError::EmptyId)
    );
}

#[test]
fn test_duplicate_id_rejected() {
    let mut types = Typology::new();
    types.register("even", even()).unwrap();
    assert_eq!(
        types.register("even", even()).err(),
        Some(SchemaError::TypeExists("even".to_string()))
    );
}

#[test]
fn test_reserved_names_rejected() {
    let mut types = Typology::new();
    for reserved in ["number", "object", "arguments", "*"] {
        assert_eq!(
            types.register(reserved, TypeDef::schema("string")).err(),
            Some(SchemaError::ReservedName(reserved.to_string())),
            "{} should be reserved",
            reserved
        );
    }
}

#[test]
fn test_ids_with_expression_syntax_rejected() {
    let mut types = Typology::new();
    for id in ["!x", "?opt", "a|b", "x!"] {
        assert_eq!(
            types.register(id, TypeDef::schema("string")).err(),
            Some(SchemaError::InvalidId(id.to_string())),
            "{} should be rejected",
            id
        );
        assert!(!types.has(id));
    }
    // Prototype ids obey the same rule.
    assert_eq!(
        types
            .register_def(TypeDefinition::new("thing", TypeDef::schema("object")).proto("!p"))
            .err(),
        Some(SchemaError::InvalidId("!p".to_string()))
    );
    assert!(!types.has("thing"));
}

#[test]
fn test_invalid_definition_rejected_and_rolled_back() {
    let mut types = Typology::new();
    assert_eq!(
        types.register("bad", TypeDef::schema("no-such-type")).err(),
        Some(SchemaError::InvalidDefinition("bad".to_string()))
    );
    assert!(!types.has("bad"));
    // The rolled-back id is not referenceable either.
    assert!(!types.is_valid(&Descriptor::from("bad")));
}

#[test]
fn test_with_types_bulk_registration() {
    let types = Typology::with_types(vec![
        ("even".to_string(), even()),
        ("evens".to_string(), TypeDef::schema(Descriptor::from_json(&json!(["even"])).unwrap())),
    ])
    .unwrap();
    assert!(types.has("even"));
    assert!(types
        .check(&Value::from(json!([2, 4])), &Descriptor::from("evens"))
        .unwrap());
    assert!(!types
        .check(&Value::from(json!([2, 3])), &Descriptor::from("evens"))
        .unwrap());
}

// ----------------------------------------------------------------- Predicates

#[test]
fn test_predicate_types() {
    let mut types = Typology::new();
    types.register("even", even()).unwrap();
    assert!(types
        .check(&Value::from(json!(4)), &Descriptor::from("even"))
        .unwrap());
    assert!(!types
        .check(&Value::from(json!(3)), &Descriptor::from("even"))
        .unwrap());
}

#[test]
fn test_exclusive_predicate_match() {
    let mut types = Typology::new();
    types.register("even", even()).unwrap();
    let error = types
        .scan(&Value::from(json!(4)), &Descriptor::from("!even"))
        .unwrap()
        .unwrap();
    assert_eq!(error.matched.as_deref(), Some("even"));
    // A non-matching value is accepted by the exclusive form, even though
    // its native tag is not listed.
    assert!(types
        .check(&Value::from(json!(3)), &Descriptor::from("!even"))
        .unwrap());
}

#[test]
fn test_predicate_short_circuits_null_handling() {
    let mut types = Typology::new();
    types
        .register("nullish", TypeDef::predicate(|_, value| {
            matches!(value, Value::Null | Value::Undefined)
        }))
        .unwrap();
    // Without the custom member, a plain null would be "not allowed".
    assert!(types
        .check(&Value::Null, &Descriptor::from("nullish"))
        .unwrap());
    assert!(types
        .check(&Value::Undefined, &Descriptor::from("nullish"))
        .unwrap());
}

// ------------------------------------------------------------------ Built-ins

#[test]
fn test_builtin_type() {
    let types = Typology::new();
    assert!(types.has("type"));
    let is_type = Descriptor::from("type");
    assert!(types.check(&Value::from(json!("number")), &is_type).unwrap());
    assert!(types
        .check(&Value::from(json!({"a": ["string"]})), &is_type)
        .unwrap());
    assert!(!types.check(&Value::from(json!("?!string")), &is_type).unwrap());
    assert!(!types
        .check(&Value::from(json!(["a", "b"])), &is_type)
        .unwrap());
    assert!(!types.check(&Value::from(json!(42)), &is_type).unwrap());
}

#[test]
fn test_builtin_primitive() {
    let types = Typology::new();
    assert!(types.has("primitive"));
    let primitive = Descriptor::from("primitive");
    for value in [
        Value::from(json!(42)),
        Value::from(json!("x")),
        Value::from(json!(true)),
        Value::Null,
        Value::Undefined,
    ] {
        assert!(types.check(&value, &primitive).unwrap());
    }
    for value in [
        Value::from(json!({})),
        Value::from(json!([])),
        Value::Date(0),
        Value::Func,
    ] {
        assert!(!types.check(&value, &primitive).unwrap());
    }
}

// ---------------------------------------------------------- Descriptor validity

#[test]
fn test_is_valid() {
    let mut types = Typology::new();
    assert!(types.is_valid(&Descriptor::from("number")));
    assert!(types.is_valid(&Descriptor::from("?number|string")));
    assert!(types.is_valid(&Descriptor::from("!array")));
    assert!(types.is_valid(&Descriptor::from("*")));
    assert!(!types.is_valid(&Descriptor::from("?!string")));
    assert!(!types.is_valid(&Descriptor::from("")));
    assert!(!types.is_valid(&Descriptor::from("integer")));

    assert!(types.is_valid(&Descriptor::from_json(&json!({"a": "number"})).unwrap()));
    assert!(!types.is_valid(&Descriptor::from_json(&json!({"a": "integer"})).unwrap()));
    assert!(types.is_valid(&Descriptor::from_json(&json!(["number"])).unwrap()));
    assert!(!types.is_valid(&Descriptor::from_json(&json!(["number", "number"])).unwrap()));

    // Custom ids become valid members once registered.
    assert!(!types.is_valid(&Descriptor::from("even")));
    types.register("even", even()).unwrap();
    assert!(types.is_valid(&Descriptor::from("even|number")));
}

// ------------------------------------------------------- Prototype composition

#[test]
fn test_proto_is_consumed() {
    let mut types = Typology::new();
    types.register("base", TypeDef::schema("object")).unwrap();
    types
        .register_def(TypeDefinition::new("derived", TypeDef::schema("object")).proto("base"))
        .unwrap();
    assert!(!types.has("base"));
    assert!(types.has("derived"));
}

#[test]
fn test_proto_fields_fold_into_object_schemas() {
    let mut types = Typology::new();
    types
        .register(
            "point",
            TypeDef::schema(Descriptor::from_json(&json!({"x": "number", "y": "number"})).unwrap()),
        )
        .unwrap();
    types
        .register_def(
            TypeDefinition::new(
                "labelled",
                TypeDef::schema(Descriptor::from_json(&json!({"label": "string"})).unwrap()),
            )
            .proto("point"),
        )
        .unwrap();
    assert!(!types.has("point"));

    let labelled = Descriptor::from("labelled");
    assert!(types
        .check(
            &Value::from(json!({"x": 1, "y": 2, "label": "origin"})),
            &labelled
        )
        .unwrap());
    // The folded fields are required like any declared key.
    assert!(!types
        .check(&Value::from(json!({"label": "origin"})), &labelled)
        .unwrap());
    // And the shape stays closed.
    assert!(!types
        .check(
            &Value::from(json!({"x": 1, "y": 2, "label": "origin", "z": 3})),
            &labelled
        )
        .unwrap());
}

#[test]
fn test_proto_field_conflicts_favor_the_new_definition() {
    let mut types = Typology::new();
    types
        .register(
            "base",
            TypeDef::schema(Descriptor::from_json(&json!({"id": "number"})).unwrap()),
        )
        .unwrap();
    types
        .register_def(
            TypeDefinition::new(
                "derived",
                TypeDef::schema(Descriptor::from_json(&json!({"id": "string"})).unwrap()),
            )
            .proto("base"),
        )
        .unwrap();
    let derived = Descriptor::from("derived");
    assert!(types
        .check(&Value::from(json!({"id": "abc"})), &derived)
        .unwrap());
    assert!(!types
        .check(&Value::from(json!({"id": 1})), &derived)
        .unwrap());
}

#[test]
fn test_unknown_proto_ids_are_transient_placeholders() {
    let mut types = Typology::new();
    types
        .register_def(TypeDefinition::new("thing", TypeDef::schema("object")).proto("ghost"))
        .unwrap();
    assert!(types.has("thing"));
    assert!(!types.has("ghost"));
    // The placeholder is gone entirely, not merely demoted.
    assert!(!types.is_valid(&Descriptor::from("ghost")));
}

#[test]
fn test_consumed_proto_can_be_registered_again() {
    let mut types = Typology::new();
    types.register("base", TypeDef::schema("object")).unwrap();
    types
        .register_def(TypeDefinition::new("derived", TypeDef::schema("object")).proto("base"))
        .unwrap();
    // "base" was consumed, so the id is free again.
    types.register("base", TypeDef::schema("string")).unwrap();
    assert!(types.has("base"));
}

// ---------------------------------------------------------- Recursive types

#[test]
fn test_self_referential_type() {
    let mut types = Typology::new();
    types
        .register(
            "tree",
            TypeDef::schema(
                Descriptor::from_json(&json!({"value": "number", "children": ["tree"]})).unwrap(),
            ),
        )
        .unwrap();
    let tree = Descriptor::from("tree");
    let value = Value::from(json!({
        "value": 1,
        "children": [
            {"value": 2, "children": []},
            {"value": 3, "children": [{"value": 4, "children": []}]}
        ]
    }));
    assert!(types.check(&value, &tree).unwrap());

    let broken = Value::from(json!({
        "value": 1,
        "children": [{"value": "x", "children": []}]
    }));
    assert!(!types.check(&broken, &tree).unwrap());
}

#[test]
fn test_self_proto_is_kept() {
    let mut types = Typology::new();
    types
        .register_def(
            TypeDefinition::new(
                "node",
                TypeDef::schema(Descriptor::from_json(&json!({"next": "?node"})).unwrap()),
            )
            .proto("node"),
        )
        .unwrap();
    assert!(types.has("node"));
    let node = Descriptor::from("node");
    assert!(types
        .check(&Value::from(json!({"next": {"next": null}})), &node)
        .unwrap());
}

#[test]
fn test_recursive_types_scan_arbitrarily_deep_values() {
    let mut types = Typology::new();
    types
        .register(
            "node",
            TypeDef::schema(Descriptor::from_json(&json!({"next": "?node"})).unwrap()),
        )
        .unwrap();
    // Every level of the list descends into value structure, so depth is
    // bounded by the value alone, not by the recursion guard.
    let mut list = json!(null);
    for _ in 0..500 {
        list = json!({ "next": list });
    }
    assert!(types
        .check(&Value::from(list), &Descriptor::from("node"))
        .unwrap());
}

#[test]
fn test_cyclic_definition_hits_the_recursion_guard() {
    let mut types = Typology::new();
    // Valid at registration time (the id placeholder makes the expression
    // well-formed), but scanning it can never consume value structure.
    types.register("loop", TypeDef::schema("loop")).unwrap();
    assert_eq!(
        types.scan(&Value::from(json!(1)), &Descriptor::from("loop")),
        Err(SchemaError::RecursionLimit)
    );
}
