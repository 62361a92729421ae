#![allow(dead_code)]

use oxide_mapper::{
    Entity, EntityRegistry, EntityType, FieldType, FromSqlValue, MapperError, NumericKind,
    SqlValue, ToSqlValue, TypeInfo,
};
use oxide_mapper_derive::Entity;
use std::sync::Arc;

// =============================================================================
// Fixture entities
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Entity)]
pub struct SimpleClass {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct AliasedColumnsClass {
    pub id: i32,
    #[field(alias = "ADifferentName")]
    pub name: String,
    #[field(alias = "")]
    pub description: String,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct IgnoredColumnsClass {
    pub id: i32,
    #[field(ignore = "select")]
    pub ignored_for_select: String,
    #[field(ignore = "insert")]
    pub ignored_for_insert: String,
    #[field(ignore = "update")]
    pub ignored_for_update: String,
    #[field(ignore = "writes")]
    pub ignored_for_writes: String,
    #[field(ignore)]
    pub ignored_always: String,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct NullableColumnsClass {
    pub id: i64,
    #[field(nullable)]
    pub name: String,
    pub age: Option<i32>,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct NullableKeyClass {
    #[field(key)]
    pub id: Option<i32>,
    pub name: String,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct NonNullableMarkedClass {
    pub id: i32,
    #[field(nullable)]
    pub total: i32,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct NonIdentityKeyClass {
    #[field(key, identity = false)]
    pub id: i32,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct NonScopeIdentityKeyClass {
    pub id: Decimal,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct Document {
    pub guid: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct Account {
    pub guid: String,
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct NoKeyClass {
    pub name: String,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct Student {
    #[field(key)]
    pub student_number: i32,
    pub name: String,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct Tests {
    pub id: i32,
}

#[derive(Debug, Clone, Default, Entity)]
#[entity(alias = "Professors")]
pub struct Teachers {
    pub id: i32,
}

#[derive(Debug, Clone, Default, Entity)]
#[entity(singular, alias = "Ignored")]
pub struct Inventory {
    pub id: i32,
}

// =============================================================================
// A decimal-like key type supplied by the application
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Decimal(pub f64);

impl FieldType for Decimal {
    fn type_info() -> TypeInfo {
        TypeInfo::value("Decimal", Some(NumericKind::Decimal), SqlValue::Float(0.0))
    }
}

impl ToSqlValue for Decimal {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self.0)
    }
}

impl FromSqlValue for Decimal {
    fn from_sql_value(value: SqlValue) -> Result<Self, MapperError> {
        f64::from_sql_value(value).map(Self)
    }
}

// =============================================================================
// Helpers
// =============================================================================

pub fn register<E: Entity>() -> Arc<EntityType<E>> {
    EntityRegistry::new()
        .register::<E>()
        .unwrap_or_else(|e| panic!("Failed to register {}: {e}", E::TYPE_NAME))
}

pub fn names<'a, E: 'a>(
    fields: impl IntoIterator<Item = &'a oxide_mapper::FieldDescriptor<E>>,
) -> Vec<&'a str> {
    fields.into_iter().map(|field| field.name()).collect()
}
