//! Tests for the `#[derive(Entity)]` macro output.
//!
//! These tests verify that the derive macro generates correct:
//! - type names and table markers
//! - field names, in declaration order, after `rename_all`
//! - key, alias, nullable and ignore markers
//! - accessors bound to the right struct fields

mod common;

use common::*;
use oxide_mapper::{Entity, FieldDef, IgnoreKind, SqlValue, TableMarkers};
use oxide_mapper_derive::Entity;

fn declared<E: Entity>() -> Vec<FieldDef<E>> {
    E::fields()
}

// =============================================================================
// Type-level output
// =============================================================================

#[test]
fn test_type_name_is_struct_ident() {
    assert_eq!(SimpleClass::TYPE_NAME, "SimpleClass");
    assert_eq!(NonScopeIdentityKeyClass::TYPE_NAME, "NonScopeIdentityKeyClass");
}

#[test]
fn test_table_markers() {
    assert_eq!(SimpleClass::table_markers(), TableMarkers::default());
    assert_eq!(
        Teachers::table_markers(),
        TableMarkers {
            alias: Some(String::from("Professors")),
            singular: false,
        }
    );
    assert!(Inventory::table_markers().singular);
}

// =============================================================================
// Field-level output
// =============================================================================

#[test]
fn test_field_names_are_pascal_case_in_declaration_order() {
    let fields = declared::<IgnoredColumnsClass>();
    let names: Vec<&str> = fields.iter().map(FieldDef::name).collect();

    assert_eq!(
        names,
        [
            "Id",
            "IgnoredForSelect",
            "IgnoredForInsert",
            "IgnoredForUpdate",
            "IgnoredForWrites",
            "IgnoredAlways",
        ]
    );
}

#[test]
fn test_ignore_markers() {
    let fields = declared::<IgnoredColumnsClass>();
    let kinds: Vec<Option<IgnoreKind>> = fields.iter().map(|f| f.markers().ignore).collect();

    assert_eq!(
        kinds,
        [
            None,
            Some(IgnoreKind::Select),
            Some(IgnoreKind::Insert),
            Some(IgnoreKind::Update),
            Some(IgnoreKind::Writes),
            Some(IgnoreKind::All),
        ]
    );
}

#[test]
fn test_alias_markers_keep_explicit_empty() {
    let fields = declared::<AliasedColumnsClass>();

    assert_eq!(fields[0].markers().alias, None);
    assert_eq!(fields[1].markers().alias.as_deref(), Some("ADifferentName"));
    assert_eq!(fields[2].markers().alias.as_deref(), Some(""));
}

#[test]
fn test_key_markers() {
    let fields = declared::<NonIdentityKeyClass>();
    let key = fields[0].markers().key.unwrap();
    assert_eq!(key.identity, Some(false));

    let fields = declared::<Student>();
    let key = fields[0].markers().key.unwrap();
    assert_eq!(fields[0].name(), "StudentNumber");
    assert_eq!(key.identity, None);
    assert!(fields[1].markers().key.is_none());
}

#[test]
fn test_nullable_marker_and_type_info() {
    let fields = declared::<NullableColumnsClass>();

    assert!(!fields[0].markers().nullable);
    assert!(fields[1].markers().nullable);
    assert!(!fields[2].markers().nullable);
    assert_eq!(fields[2].type_info().name, "i32");
}

// =============================================================================
// Naming rules
// =============================================================================

#[allow(dead_code)]
#[derive(Entity)]
#[entity(rename_all = "snake_case")]
struct SnakeCased {
    id: i32,
    first_name: String,
}

#[allow(dead_code)]
#[derive(Entity)]
#[entity(rename_all = "camelCase")]
struct CamelCased {
    id: i32,
    first_name: String,
}

#[allow(dead_code)]
#[derive(Entity)]
struct RawIdent {
    id: i32,
    r#type: String,
}

#[test]
fn test_rename_all() {
    let names: Vec<String> = declared::<SnakeCased>()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    assert_eq!(names, ["id", "first_name"]);

    let names: Vec<String> = declared::<CamelCased>()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    assert_eq!(names, ["id", "firstName"]);
}

#[test]
fn test_raw_identifiers_drop_prefix() {
    let fields = declared::<RawIdent>();
    assert_eq!(fields[1].name(), "Type");
}

// =============================================================================
// Accessors
// =============================================================================

#[test]
fn test_accessors_are_bound_to_fields() {
    let simple = register::<SimpleClass>();
    let mut row = SimpleClass {
        id: 3,
        name: String::from("three"),
    };

    let name = simple.field("Name").unwrap();
    assert_eq!(name.get(&row), SqlValue::Text(String::from("three")));

    name.set(&mut row, SqlValue::Text(String::from("four"))).unwrap();
    assert_eq!(row.name, "four");
    assert_eq!(row.id, 3);

    let other = SimpleClass {
        id: 99,
        name: String::from("four"),
    };
    assert!(name.equals(&row, &other));
    assert!(!simple.key_field().equals(&row, &other));
}

#[allow(dead_code)]
#[derive(Entity)]
struct Counter {
    id: u64,
    hits: u128,
}

#[test]
fn test_wide_unsigned_fields() {
    let counter = register::<Counter>();
    let mut row = Counter { id: 1, hits: 0 };

    assert!(counter.key_field().is_identity());
    counter
        .set_key_value(&mut row, SqlValue::Int(i64::MAX))
        .unwrap();
    assert_eq!(row.id, 9_223_372_036_854_775_807);

    let hits = counter.field("Hits").unwrap();
    row.hits = u128::MAX;
    assert_eq!(hits.get(&row), SqlValue::Text(u128::MAX.to_string()));
}

#[test]
fn test_optional_accessor_round_trip() {
    let nullable = register::<NullableColumnsClass>();
    let mut row = NullableColumnsClass::default();

    let age = nullable.field("Age").unwrap();
    assert_eq!(age.get(&row), SqlValue::Null);

    age.set(&mut row, SqlValue::Int(42)).unwrap();
    assert_eq!(row.age, Some(42));

    age.set(&mut row, SqlValue::Null).unwrap();
    assert_eq!(row.age, None);
}
