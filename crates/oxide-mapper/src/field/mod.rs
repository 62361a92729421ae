//! Field descriptors and their capability flags.
//!
//! A [`FieldDescriptor`] is the validated, per-field metadata the SQL
//! generators consume. Its flags only change through the validating
//! operations below, which enforce the key/nullable/visibility invariants
//! during introspection and the one-time configuration pass.

mod def;
mod types;

use std::fmt;

pub use def::{FieldAccess, FieldDef, FieldMarkers, KeyMarker};
pub use types::{FieldType, NumericKind, Nullability, TypeInfo};

use crate::error::{MapperError, Result};
use crate::value::SqlValue;

/// Statement kinds a field can be hidden from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreKind {
    /// Hidden from SELECT only.
    Select,
    /// Hidden from INSERT only.
    Insert,
    /// Hidden from UPDATE only.
    Update,
    /// Hidden from INSERT and UPDATE.
    Writes,
    /// Hidden from every statement.
    All,
}

impl IgnoreKind {
    /// Returns the `(selectable, insertable, updatable)` flags this kind leaves.
    #[must_use]
    pub const fn visibility(self) -> (bool, bool, bool) {
        match self {
            Self::Select => (false, true, true),
            Self::Insert => (true, false, true),
            Self::Update => (true, true, false),
            Self::Writes => (true, false, false),
            Self::All => (false, false, false),
        }
    }
}

/// Validated metadata for one mapped field of entity `E`.
pub struct FieldDescriptor<E> {
    name: String,
    alias: Option<String>,
    info: TypeInfo,
    is_key: bool,
    is_identity: bool,
    is_nullable: bool,
    is_selectable: bool,
    is_insertable: bool,
    is_updatable: bool,
    default_value: Option<SqlValue>,
    access: FieldAccess<E>,
}

impl<E> FieldDescriptor<E> {
    /// Creates a plain, fully visible, non-key descriptor.
    pub(crate) fn new(name: String, info: TypeInfo, access: FieldAccess<E>) -> Self {
        let default_value = info.default_value.clone();
        Self {
            name,
            alias: None,
            info,
            is_key: false,
            is_identity: false,
            is_nullable: false,
            is_selectable: true,
            is_insertable: true,
            is_updatable: true,
            default_value,
            access,
        }
    }

    /// The field's own name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column alias, if the field is aliased.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The column name used in generated SQL: the alias if aliased, else
    /// the field name.
    #[must_use]
    pub fn effective_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Returns true when the field carries a non-empty alias.
    #[must_use]
    pub const fn is_aliased(&self) -> bool {
        self.alias.is_some()
    }

    /// Display name of the declared type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.info.name
    }

    /// Returns true for the primary key.
    #[must_use]
    pub const fn is_key(&self) -> bool {
        self.is_key
    }

    /// Returns true when the key value is assigned by the database.
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        self.is_identity
    }

    /// Returns true for numeric field types.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.info.numeric.is_some()
    }

    /// The numeric sub-kind, if numeric.
    #[must_use]
    pub const fn numeric_kind(&self) -> Option<NumericKind> {
        self.info.numeric
    }

    /// Returns true when the field may hold an absent value.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.is_nullable
    }

    /// Returns true when the field appears in SELECT projections.
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        self.is_selectable
    }

    /// Returns true when the field appears in INSERT column lists.
    #[must_use]
    pub const fn is_insertable(&self) -> bool {
        self.is_insertable
    }

    /// Returns true when the field appears in UPDATE assignments.
    #[must_use]
    pub const fn is_updatable(&self) -> bool {
        self.is_updatable
    }

    /// The zero value of the field type; `None` for nullable fields.
    #[must_use]
    pub const fn default_value(&self) -> Option<&SqlValue> {
        self.default_value.as_ref()
    }

    /// The accessor bindings.
    #[must_use]
    pub const fn access(&self) -> &FieldAccess<E> {
        &self.access
    }

    /// Reads this field from `entity`.
    pub fn get(&self, entity: &E) -> SqlValue {
        self.access.get(entity)
    }

    /// Writes `value` into this field of `entity`.
    ///
    /// # Errors
    ///
    /// Fails when the value cannot be converted to the field type.
    pub fn set(&self, entity: &mut E, value: SqlValue) -> Result<()> {
        self.access.set(entity, value)
    }

    /// Compares this field across two entities.
    pub fn equals(&self, a: &E, b: &E) -> bool {
        self.access.equals(a, b)
    }

    /// Designates the field as the primary key.
    ///
    /// Identity is requested by `identity` (default: yes) and granted only to
    /// numeric fields. The key is selectable, insertable only when not an
    /// identity, and never updatable.
    pub(crate) fn set_key(&mut self, identity: Option<bool>) -> Result<()> {
        if self.is_nullable {
            return Err(MapperError::NullableKey {
                field: self.name.clone(),
            });
        }

        self.is_key = true;
        self.is_identity = identity.unwrap_or(true) && self.is_numeric();
        self.is_selectable = true;
        self.is_insertable = !self.is_identity;
        self.is_updatable = false;
        Ok(())
    }

    /// Turns a key back into an ordinary, fully visible field.
    pub(crate) fn clear_key(&mut self) {
        self.is_key = false;
        self.is_identity = false;
        self.is_selectable = true;
        self.is_insertable = true;
        self.is_updatable = true;
    }

    /// Applies an ignore kind; `None` restores full visibility.
    pub(crate) fn set_ignore(&mut self, kind: Option<IgnoreKind>) -> Result<()> {
        if self.is_key {
            return Err(MapperError::KeyVisibilityLocked {
                field: self.name.clone(),
            });
        }

        let (select, insert, update) = kind.map_or((true, true, true), IgnoreKind::visibility);
        self.is_selectable = select;
        self.is_insertable = insert;
        self.is_updatable = update;
        Ok(())
    }

    /// Sets the alias; an empty alias leaves the field unaliased.
    pub(crate) fn set_alias(&mut self, alias: &str) {
        self.alias = if alias.is_empty() {
            None
        } else {
            Some(String::from(alias))
        };
    }

    /// Marks the field nullable.
    pub(crate) fn set_nullable(&mut self) -> Result<()> {
        if self.info.nullability == Nullability::Value {
            return Err(MapperError::NonNullableType {
                field: self.name.clone(),
            });
        }
        if self.is_key {
            return Err(MapperError::NullableKey {
                field: self.name.clone(),
            });
        }

        self.is_nullable = true;
        self.default_value = None;
        Ok(())
    }
}

impl<E> Clone for FieldDescriptor<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            alias: self.alias.clone(),
            info: self.info.clone(),
            is_key: self.is_key,
            is_identity: self.is_identity,
            is_nullable: self.is_nullable,
            is_selectable: self.is_selectable,
            is_insertable: self.is_insertable,
            is_updatable: self.is_updatable,
            default_value: self.default_value.clone(),
            access: self.access.clone(),
        }
    }
}

impl<E> fmt::Debug for FieldDescriptor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("type", &self.info.name)
            .field("is_key", &self.is_key)
            .field("is_identity", &self.is_identity)
            .field("is_nullable", &self.is_nullable)
            .field("is_selectable", &self.is_selectable)
            .field("is_insertable", &self.is_insertable)
            .field("is_updatable", &self.is_updatable)
            .finish_non_exhaustive()
    }
}
