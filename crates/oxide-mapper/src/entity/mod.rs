//! Entity types: the cached table mapping of a Rust type.
//!
//! An [`Entity`] declares its fields; the registry introspects them once and
//! keeps the resulting [`EntityType`], whose filtered field views feed the
//! SQL generators.

mod config;

pub use config::EntityConfig;

use std::fmt;

use crate::dialect::SqlDialect;
use crate::error::{MapperError, Result};
use crate::field::{FieldDef, FieldDescriptor};
use crate::value::SqlValue;

/// Table-level markers declared by an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableMarkers {
    /// Explicit table name.
    pub alias: Option<String>,
    /// Use the bare type name instead of its plural.
    pub singular: bool,
}

/// A type mapped to one database table.
///
/// Usually derived:
///
/// ```
/// use oxide_mapper::{Entity, EntityRegistry};
/// use oxide_mapper_derive::Entity;
///
/// #[derive(Entity)]
/// struct Student {
///     #[field(key)]
///     id: i64,
///     name: String,
/// }
///
/// let registry = EntityRegistry::new();
/// let student = registry.register::<Student>().unwrap();
/// assert_eq!(student.table_name(), "Students");
/// assert_eq!(student.key_field().name(), "Id");
/// ```
pub trait Entity: Sized + 'static {
    /// The bare type name.
    const TYPE_NAME: &'static str;

    /// Table-level markers; none by default.
    fn table_markers() -> TableMarkers {
        TableMarkers::default()
    }

    /// The declared fields, in declaration order.
    fn fields() -> Vec<FieldDef<Self>>;
}

/// The validated table mapping of entity `E`.
///
/// Structure is fixed once built: the field list, the key and the
/// select/insert/update views never change afterwards.
pub struct EntityType<E> {
    type_name: &'static str,
    table_name: String,
    fields: Vec<FieldDescriptor<E>>,
    key: usize,
    select: Vec<usize>,
    insert: Vec<usize>,
    update: Vec<usize>,
}

impl<E> EntityType<E> {
    /// Assembles the type, computing the filtered views from field flags.
    pub(crate) fn new(
        type_name: &'static str,
        table_name: String,
        fields: Vec<FieldDescriptor<E>>,
    ) -> Result<Self> {
        let key = fields.iter().position(FieldDescriptor::is_key).ok_or_else(|| {
            MapperError::MissingPrimaryKey {
                entity: String::from(type_name),
            }
        })?;

        let view = |keep: fn(&FieldDescriptor<E>) -> bool| -> Vec<usize> {
            fields
                .iter()
                .enumerate()
                .filter(|(_, field)| keep(field))
                .map(|(i, _)| i)
                .collect()
        };
        let select = view(FieldDescriptor::is_selectable);
        let insert = view(FieldDescriptor::is_insertable);
        let update = view(FieldDescriptor::is_updatable);

        Ok(Self {
            type_name,
            table_name,
            fields,
            key,
            select,
            insert,
            update,
        })
    }

    /// The bare Rust type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The derived table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The primary key.
    #[must_use]
    pub fn key_field(&self) -> &FieldDescriptor<E> {
        &self.fields[self.key]
    }

    /// Every field, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor<E>] {
        &self.fields
    }

    /// Looks up a field by its own name.
    ///
    /// # Errors
    ///
    /// Fails with [`MapperError::UnknownField`] when no field has that name.
    pub fn field(&self, name: &str) -> Result<&FieldDescriptor<E>> {
        self.fields
            .iter()
            .find(|field| field.name() == name)
            .ok_or_else(|| MapperError::UnknownField {
                entity: String::from(self.type_name),
                field: String::from(name),
            })
    }

    /// Fields that appear in SELECT projections.
    pub fn select_fields(&self) -> impl ExactSizeIterator<Item = &FieldDescriptor<E>> + Clone {
        self.view(&self.select)
    }

    /// Fields that appear in INSERT column lists.
    pub fn insert_fields(&self) -> impl ExactSizeIterator<Item = &FieldDescriptor<E>> + Clone {
        self.view(&self.insert)
    }

    /// Fields that appear in UPDATE assignments.
    pub fn update_fields(&self) -> impl ExactSizeIterator<Item = &FieldDescriptor<E>> + Clone {
        self.view(&self.update)
    }

    fn view<'a>(
        &'a self,
        indices: &'a [usize],
    ) -> impl ExactSizeIterator<Item = &'a FieldDescriptor<E>> + Clone {
        indices.iter().map(move |&i| &self.fields[i])
    }

    /// The key placeholder in `dialect`'s syntax.
    pub fn key_param<D: SqlDialect + ?Sized>(&self, dialect: &D) -> String {
        dialect.format_param_name(self.key_field().name())
    }

    /// `(placeholder, field)` pairs for an INSERT, in declaration order.
    pub fn insert_params<D: SqlDialect + ?Sized>(
        &self,
        dialect: &D,
    ) -> Vec<(String, &FieldDescriptor<E>)> {
        Self::params(self.insert_fields(), dialect)
    }

    /// `(placeholder, field)` pairs for an UPDATE, in declaration order.
    pub fn update_params<D: SqlDialect + ?Sized>(
        &self,
        dialect: &D,
    ) -> Vec<(String, &FieldDescriptor<E>)> {
        Self::params(self.update_fields(), dialect)
    }

    fn params<'a, D: SqlDialect + ?Sized>(
        fields: impl Iterator<Item = &'a FieldDescriptor<E>>,
        dialect: &D,
    ) -> Vec<(String, &'a FieldDescriptor<E>)>
    where
        E: 'a,
    {
        fields
            .map(|field| (dialect.format_param_name(field.name()), field))
            .collect()
    }

    /// Reads the values of `fields` from `entity`, keyed by placeholder.
    pub fn bind<'a, D: SqlDialect + ?Sized>(
        &self,
        entity: &E,
        fields: impl IntoIterator<Item = &'a FieldDescriptor<E>>,
        dialect: &D,
    ) -> Vec<(String, SqlValue)>
    where
        E: 'a,
    {
        fields
            .into_iter()
            .map(|field| (dialect.format_param_name(field.name()), field.get(entity)))
            .collect()
    }

    /// Reads the key of `entity`.
    pub fn key_value(&self, entity: &E) -> SqlValue {
        self.key_field().get(entity)
    }

    /// Stores a key, typically the identity value returned by an insert.
    ///
    /// # Errors
    ///
    /// Fails when `value` does not convert to the key type.
    pub fn set_key_value(&self, entity: &mut E, value: SqlValue) -> Result<()> {
        self.key_field().set(entity, value)
    }
}

impl<E> fmt::Debug for EntityType<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("type_name", &self.type_name)
            .field("table_name", &self.table_name)
            .field("key", &self.key_field().name())
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
