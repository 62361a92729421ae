//! # oxide-mapper
//!
//! Entity metadata and SQL text generation for a data-access layer.
//!
//! This crate provides:
//! - Per-field descriptors with key, identity, nullable and visibility flags
//! - Introspection of declared fields, with key autodetection (`id`, `guid`)
//! - An explicit, thread-safe registry building each entity type once
//! - A fluent configuration pass to re-key, ignore, alias or nullable-mark
//!   fields before a type is published
//! - Table name derivation (pluralized type name, alias or singular)
//! - SELECT, INSERT, UPDATE and DELETE generation for SQL Server, Oracle
//!   and SQLite
//!
//! Executing statements and materializing rows is left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use oxide_mapper::{Entity, EntityRegistry, SqlDialect, SqlServer};
//! use oxide_mapper_derive::Entity;
//!
//! #[derive(Entity)]
//! struct SimpleClass {
//!     id: i32,
//!     name: String,
//! }
//!
//! let registry = EntityRegistry::new();
//! let simple = registry.register::<SimpleClass>().unwrap();
//!
//! let sql = SqlServer.insert(simple.table_name(), simple.insert_params(&SqlServer), simple.key_field());
//! assert_eq!(
//!     sql,
//!     "set nocount on insert into [SimpleClasses] (Name) values (@Name) select SCOPE_IDENTITY()"
//! );
//! ```

pub mod dialect;
pub mod entity;
pub mod error;
pub mod field;
pub mod generator;
pub mod introspect;
pub mod naming;
pub mod registry;
pub mod value;

pub use dialect::{DialectKind, IdentityRetrieval, Oracle, SqlDialect, SqlServer, Sqlite};
pub use entity::{Entity, EntityConfig, EntityType, TableMarkers};
pub use error::{MapperError, Result};
pub use field::{FieldDef, FieldDescriptor, FieldType, IgnoreKind, NumericKind, Nullability, TypeInfo};
pub use generator::SqlGenerator;
pub use naming::{EnglishPluralizer, Pluralizer};
pub use registry::EntityRegistry;
pub use value::{FromSqlValue, SqlValue, ToSqlValue};
