//! Table-bound statement generation.

use tracing::trace;

use crate::dialect::{IdentityRetrieval, SqlDialect};
use crate::entity::EntityType;
use crate::field::FieldDescriptor;

/// A dialect bound to one table.
///
/// Forwards every statement to the dialect with the fixed table name, for
/// callers that generate many statements against the same table.
///
/// ```
/// use oxide_mapper::{Entity, EntityRegistry, SqlGenerator, SqlServer};
/// use oxide_mapper_derive::Entity;
///
/// #[derive(Entity)]
/// struct Note {
///     id: i32,
///     body: String,
/// }
///
/// let registry = EntityRegistry::new();
/// let note = registry.register::<Note>().unwrap();
/// let generator = SqlGenerator::for_entity(SqlServer, &note);
///
/// assert_eq!(
///     generator.select_all(note.select_fields(), note.key_field()),
///     "select Id, Body from [Notes] order by Id"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SqlGenerator<D> {
    dialect: D,
    table: String,
}

impl<D: SqlDialect> SqlGenerator<D> {
    /// Binds `dialect` to `table`.
    pub fn new(dialect: D, table: impl Into<String>) -> Self {
        Self {
            dialect,
            table: table.into(),
        }
    }

    /// Binds `dialect` to the table of an entity type.
    pub fn for_entity<E>(dialect: D, entity: &EntityType<E>) -> Self {
        Self::new(dialect, entity.table_name())
    }

    /// The bound table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The underlying dialect.
    #[must_use]
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    fn emit(&self, statement: &'static str, sql: String) -> String {
        trace!(
            dialect = self.dialect.name(),
            table = %self.table,
            statement,
            %sql,
            "generated sql"
        );
        sql
    }

    /// See [`SqlDialect::select_all`].
    pub fn select_all<'a, E: 'a>(
        &self,
        fields: impl IntoIterator<Item = &'a FieldDescriptor<E>>,
        key: &FieldDescriptor<E>,
    ) -> String {
        self.emit(
            "select_all",
            self.dialect.select_all(&self.table, fields, key),
        )
    }

    /// See [`SqlDialect::select`].
    pub fn select<'a, E: 'a>(
        &self,
        fields: impl IntoIterator<Item = &'a FieldDescriptor<E>>,
        key: &FieldDescriptor<E>,
        key_param: &str,
    ) -> String {
        self.emit(
            "select",
            self.dialect.select(&self.table, fields, key, key_param),
        )
    }

    /// See [`SqlDialect::select_many`].
    pub fn select_many<'a, E: 'a>(
        &self,
        fields: impl IntoIterator<Item = &'a FieldDescriptor<E>>,
        key: &FieldDescriptor<E>,
        keys_param: &str,
    ) -> String {
        self.emit(
            "select_many",
            self.dialect.select_many(&self.table, fields, key, keys_param),
        )
    }

    /// See [`SqlDialect::find`].
    pub fn find<'a, E: 'a>(
        &self,
        fields: impl IntoIterator<Item = &'a FieldDescriptor<E>>,
        where_clause: &str,
    ) -> String {
        self.emit("find", self.dialect.find(&self.table, fields, where_clause))
    }

    /// See [`SqlDialect::find_one`].
    pub fn find_one<'a, E: 'a>(
        &self,
        fields: impl IntoIterator<Item = &'a FieldDescriptor<E>>,
        where_clause: &str,
    ) -> String {
        self.emit(
            "find_one",
            self.dialect.find_one(&self.table, fields, where_clause),
        )
    }

    /// See [`SqlDialect::insert`].
    pub fn insert<'a, E: 'a, P: AsRef<str>>(
        &self,
        params: impl IntoIterator<Item = (P, &'a FieldDescriptor<E>)>,
        key: &FieldDescriptor<E>,
    ) -> String {
        self.emit("insert", self.dialect.insert(&self.table, params, key))
    }

    /// See [`SqlDialect::identity_retrieval`].
    pub fn identity_retrieval<E>(&self, key: &FieldDescriptor<E>) -> IdentityRetrieval {
        self.dialect.identity_retrieval(key)
    }

    /// See [`SqlDialect::update`].
    pub fn update<'a, E: 'a, P: AsRef<str>>(
        &self,
        params: impl IntoIterator<Item = (P, &'a FieldDescriptor<E>)>,
        key: &FieldDescriptor<E>,
        key_param: &str,
    ) -> String {
        self.emit(
            "update",
            self.dialect.update(&self.table, params, key, key_param),
        )
    }

    /// See [`SqlDialect::update_many`].
    pub fn update_many<'a, E: 'a, P: AsRef<str>>(
        &self,
        params: impl IntoIterator<Item = (P, &'a FieldDescriptor<E>)>,
        key: &FieldDescriptor<E>,
        keys_param: &str,
    ) -> String {
        self.emit(
            "update_many",
            self.dialect
                .update_many(&self.table, params, key, keys_param),
        )
    }

    /// See [`SqlDialect::delete_all`].
    pub fn delete_all(&self) -> String {
        self.emit("delete_all", self.dialect.delete_all(&self.table))
    }

    /// See [`SqlDialect::delete`].
    pub fn delete<E>(&self, key: &FieldDescriptor<E>, key_param: &str) -> String {
        self.emit("delete", self.dialect.delete(&self.table, key, key_param))
    }

    /// See [`SqlDialect::delete_many`].
    pub fn delete_many<E>(&self, key: &FieldDescriptor<E>, keys_param: &str) -> String {
        self.emit(
            "delete_many",
            self.dialect.delete_many(&self.table, key, keys_param),
        )
    }

    /// See [`SqlDialect::format_param_name`].
    pub fn format_param_name(&self, raw: &str) -> String {
        self.dialect.format_param_name(raw)
    }

    /// See [`SqlDialect::strip_param_formatting`].
    pub fn strip_param_formatting(&self, placeholder: &str) -> String {
        self.dialect.strip_param_formatting(placeholder)
    }
}
