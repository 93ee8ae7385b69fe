//! End-to-end scenarios for the reconstruction engine.

use crate::{
    DatabaseSchema, FieldDefinition, NamedField, ScalarKind, TableInput, TableShape,
    TypeDescriptor,
};

fn fields(table: &str, defs: &[(&str, &str)]) -> Vec<FieldDefinition> {
    defs.iter()
        .map(|(path, rest)| {
            FieldDefinition::new(*path, format!("DEFINE FIELD {path} ON {table} {rest}"))
        })
        .collect()
}

fn field<'a>(ty: &'a TypeDescriptor, name: &str) -> &'a NamedField {
    ty.field(name)
        .unwrap_or_else(|| panic!("field '{name}' missing in {ty:?}"))
}

fn element(ty: &TypeDescriptor) -> &TypeDescriptor {
    match ty {
        TypeDescriptor::Array(element) => element,
        other => panic!("Expected Array, got {other:?}"),
    }
}

// ============================================================================
// Nesting
// ============================================================================

#[test]
fn test_deeply_nested_arrays_and_objects() {
    let schema = DatabaseSchema::build(vec![TableInput::schemaful(
        "user",
        "DEFINE TABLE user SCHEMAFULL",
        fields(
            "user",
            &[
                ("nested", "TYPE array"),
                ("nested[*]", "TYPE object"),
                ("nested[*].num", "TYPE int"),
                ("nested[*].positions", "TYPE array"),
                ("nested[*].positions[*]", "TYPE object"),
                ("nested[*].positions[*].row", "TYPE int"),
                ("nested[*].positions[*].column", "TYPE int"),
            ],
        ),
    )])
    .unwrap();

    let shape = schema
        .get_table("user")
        .and_then(|t| t.typed_shape())
        .expect("typed user table");

    let nested = field(shape, "nested");
    assert!(nested.optional);

    let item = element(&nested.ty);
    let item_fields = item.fields().expect("object element");
    let names: Vec<&str> = item_fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["num", "positions"]);

    assert_eq!(
        field(item, "num").ty,
        TypeDescriptor::Scalar(ScalarKind::Number)
    );

    let position = element(&field(item, "positions").ty);
    let names: Vec<&str> = position
        .fields()
        .expect("object element")
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["row", "column"]);
}

#[test]
fn test_object_inside_object_inside_array() {
    let shape = crate::build_shape(&fields(
        "post",
        &[
            ("revisions", "TYPE array ASSERT $value != NONE"),
            ("revisions[*]", "TYPE object"),
            ("revisions[*].author", "TYPE object"),
            ("revisions[*].author.id", "TYPE record(user) ASSERT $value != NONE"),
            ("revisions[*].author.name", "TYPE string"),
            ("revisions[*].at", "TYPE datetime"),
        ],
    ));

    let revisions = field(&shape, "revisions");
    assert!(!revisions.optional);

    let revision = element(&revisions.ty);
    let author = field(revision, "author");
    assert!(author.optional);

    let id = field(&author.ty, "id");
    assert_eq!(id.ty, TypeDescriptor::Reference("user".to_string()));
    assert!(!id.optional);

    assert_eq!(
        field(revision, "at").ty,
        TypeDescriptor::Scalar(ScalarKind::String)
    );
}

#[test]
fn test_matrix_of_objects() {
    let shape = crate::build_shape(&fields(
        "board",
        &[
            ("cells", "TYPE array"),
            ("cells[*]", "TYPE array"),
            ("cells[*][*]", "TYPE object"),
            ("cells[*][*].value", "TYPE int ASSERT $value != NONE"),
        ],
    ));

    let cell = element(element(&field(&shape, "cells").ty));
    let value = field(cell, "value");
    assert_eq!(value.ty, TypeDescriptor::Scalar(ScalarKind::Number));
    assert!(!value.optional);
}

#[test]
fn test_siblings_with_shared_prefix() {
    let shape = crate::build_shape(&fields(
        "user",
        &[
            ("tag", "TYPE string"),
            ("tags", "TYPE array"),
            ("tags[*]", "TYPE string"),
            ("tagline", "TYPE object"),
            ("tagline.text", "TYPE string"),
        ],
    ));

    let names: Vec<&str> = shape
        .fields()
        .expect("object")
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["tag", "tags", "tagline"]);
    assert_eq!(
        field(&shape, "tags").ty,
        TypeDescriptor::array(TypeDescriptor::Scalar(ScalarKind::String))
    );
    assert_eq!(
        field(&shape, "tagline").ty.fields().map(<[NamedField]>::len),
        Some(1)
    );
}

// ============================================================================
// Degraded input
// ============================================================================

#[test]
fn test_malformed_definitions_degrade_to_optional_string() {
    let shape = crate::build_shape(&[
        FieldDefinition::new("a", "garbage"),
        FieldDefinition::new("b", ""),
        FieldDefinition::new("c", "DEFINE FIELD c ON t TYPE"),
    ]);

    for f in shape.fields().expect("object") {
        assert_eq!(f.ty, TypeDescriptor::Scalar(ScalarKind::String));
        assert!(f.optional);
    }
}

#[test]
fn test_unknown_kinds_map_to_unknown() {
    let shape = crate::build_shape(&fields(
        "place",
        &[("location", "TYPE geometry<point>"), ("data", "TYPE any")],
    ));

    assert_eq!(
        field(&shape, "location").ty,
        TypeDescriptor::Scalar(ScalarKind::Unknown)
    );
    assert_eq!(
        field(&shape, "data").ty,
        TypeDescriptor::Scalar(ScalarKind::Unknown)
    );
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_schema_serialization() {
    let schema = DatabaseSchema::build(vec![
        TableInput::schemaful(
            "user",
            "DEFINE TABLE user SCHEMAFULL",
            fields("user", &[("age", "TYPE int ASSERT $value != NONE")]),
        ),
        TableInput::without_fields("log", "DEFINE TABLE log SCHEMALESS"),
    ])
    .unwrap();

    let json = serde_json::to_value(&schema).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "tables": [
                {
                    "name": "user",
                    "definition": "DEFINE TABLE user SCHEMAFULL",
                    "shape": {
                        "kind": "typed",
                        "shape": {
                            "type": "object",
                            "of": [{
                                "name": "age",
                                "type": {"type": "scalar", "of": "number"},
                                "optional": false,
                                "definition": "DEFINE FIELD age ON user TYPE int ASSERT $value != NONE"
                            }]
                        }
                    }
                },
                {
                    "name": "log",
                    "definition": "DEFINE TABLE log SCHEMALESS",
                    "shape": {"kind": "open"}
                }
            ]
        })
    );
    assert_eq!(schema.tables[1].shape, TableShape::Open);
}
