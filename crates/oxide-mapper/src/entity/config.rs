//! Fluent post-detection configuration of an entity type.

use std::fmt;

use tracing::debug;

use super::{Entity, EntityType, TableMarkers};
use crate::error::{MapperError, Result};
use crate::field::{FieldDescriptor, IgnoreKind};
use crate::introspect::introspect_all;
use crate::naming::{self, Pluralizer};

/// Handle passed to a registration callback to adjust an entity type after
/// automatic detection.
///
/// Every call re-validates the invariant it touches and fails without
/// changing anything when it does not hold. Fields are addressed by their
/// own (source) name.
///
/// ```
/// use oxide_mapper::{Entity, EntityRegistry, IgnoreKind};
/// use oxide_mapper_derive::Entity;
///
/// #[derive(Entity)]
/// struct Account {
///     code: String,
///     owner: String,
///     balance: f64,
/// }
///
/// let registry = EntityRegistry::new();
/// let account = registry
///     .register_with::<Account, _>(|config| {
///         config
///             .key("Code", None)?
///             .ignore("Balance", Some(IgnoreKind::Writes))?
///             .alias_table("Ledger");
///         Ok(())
///     })
///     .unwrap();
///
/// assert_eq!(account.table_name(), "Ledger");
/// assert_eq!(account.update_fields().count(), 1);
/// ```
pub struct EntityConfig<E> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<E>>,
    table: TableMarkers,
}

impl<E: Entity> EntityConfig<E> {
    /// Introspects the declared fields of `E`.
    pub(crate) fn introspect() -> Result<Self> {
        Ok(Self {
            type_name: E::TYPE_NAME,
            fields: introspect_all(E::TYPE_NAME, E::fields())?,
            table: E::table_markers(),
        })
    }
}

impl<E> EntityConfig<E> {
    /// The entity type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The fields as currently configured.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor<E>] {
        &self.fields
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|field| field.name() == name)
            .ok_or_else(|| MapperError::UnknownField {
                entity: String::from(self.type_name),
                field: String::from(name),
            })
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut FieldDescriptor<E>> {
        let index = self.position(name)?;
        Ok(&mut self.fields[index])
    }

    /// Makes `name` the primary key.
    ///
    /// `identity` defaults to true and only applies to numeric fields. A
    /// previous key becomes an ordinary, fully visible field.
    ///
    /// # Errors
    ///
    /// Fails for unknown or nullable fields.
    pub fn key(&mut self, name: &str, identity: Option<bool>) -> Result<&mut Self> {
        let index = self.position(name)?;
        let previous = self.fields.iter().position(FieldDescriptor::is_key);

        self.fields[index].set_key(identity)?;
        if let Some(previous) = previous.filter(|&previous| previous != index) {
            let demoted = &mut self.fields[previous];
            debug!(
                entity = self.type_name,
                from = demoted.name(),
                to = name,
                "key re-designated"
            );
            demoted.clear_key();
        }
        Ok(self)
    }

    /// Hides `name` from the statements named by `kind`; `None` makes it
    /// fully visible again.
    ///
    /// # Errors
    ///
    /// Fails for unknown fields and for the key, whose visibility is fixed.
    pub fn ignore(&mut self, name: &str, kind: Option<IgnoreKind>) -> Result<&mut Self> {
        self.field_mut(name)?.set_ignore(kind)?;
        Ok(self)
    }

    /// Maps `name` to a differently named column; an empty alias removes it.
    ///
    /// # Errors
    ///
    /// Fails for unknown fields.
    pub fn alias(&mut self, name: &str, alias: &str) -> Result<&mut Self> {
        self.field_mut(name)?.set_alias(alias);
        Ok(self)
    }

    /// Marks `name` nullable.
    ///
    /// # Errors
    ///
    /// Fails for unknown fields, concrete value types and the key.
    pub fn nullable(&mut self, name: &str) -> Result<&mut Self> {
        self.field_mut(name)?.set_nullable()?;
        Ok(self)
    }

    /// Uses `table` as the table name instead of the pluralized type name.
    pub fn alias_table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table.alias = Some(table.into());
        self
    }

    /// Uses the bare type name as the table name. Takes precedence over
    /// [`alias_table`](Self::alias_table).
    pub fn singular(&mut self) -> &mut Self {
        self.table.singular = true;
        self
    }

    /// Finalizes the type.
    pub(crate) fn build(self, pluralizer: &dyn Pluralizer) -> Result<EntityType<E>> {
        let table_name = naming::table_name(self.type_name, &self.table, pluralizer);
        EntityType::new(self.type_name, table_name, self.fields)
    }
}

impl<E> fmt::Debug for EntityConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityConfig")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field("table", &self.table)
            .finish()
    }
}
