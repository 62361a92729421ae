//! Declared fields: the input to introspection.
//!
//! A [`FieldDef`] is what an entity says about one of its fields before any
//! validation happens: name, declared type, declarative markers and the
//! accessor bindings. `#[derive(Entity)]` emits one per struct field; hand
//! written [`Entity`](crate::Entity) impls build them directly.

use std::fmt;
use std::sync::Arc;

use super::types::{FieldType, TypeInfo};
use super::IgnoreKind;
use crate::error::Result;
use crate::value::{FromSqlValue, SqlValue, ToSqlValue};

type Getter<E> = dyn Fn(&E) -> SqlValue + Send + Sync;
type Setter<E> = dyn Fn(&mut E, SqlValue) -> Result<()> + Send + Sync;
type Comparer<E> = dyn Fn(&E, &E) -> bool + Send + Sync;

/// Getter, setter and comparer bound to one field of `E`.
///
/// Built once from a pair of field projections and shared by every clone of
/// the owning descriptor.
pub struct FieldAccess<E> {
    getter: Arc<Getter<E>>,
    setter: Arc<Setter<E>>,
    comparer: Arc<Comparer<E>>,
}

impl<E: 'static> FieldAccess<E> {
    /// Builds the accessors from a shared and a mutable projection.
    pub fn from_lens<V>(get: fn(&E) -> &V, get_mut: fn(&mut E) -> &mut V) -> Self
    where
        V: ToSqlValue + FromSqlValue + Clone + PartialEq + 'static,
    {
        Self {
            getter: Arc::new(move |entity: &E| get(entity).clone().to_sql_value()),
            setter: Arc::new(move |entity: &mut E, value: SqlValue| {
                *get_mut(entity) = V::from_sql_value(value)?;
                Ok(())
            }),
            comparer: Arc::new(move |a: &E, b: &E| get(a) == get(b)),
        }
    }
}

impl<E> FieldAccess<E> {
    /// Reads the field as a SQL value.
    pub fn get(&self, entity: &E) -> SqlValue {
        (self.getter)(entity)
    }

    /// Writes a SQL value into the field.
    ///
    /// # Errors
    ///
    /// Fails when the value cannot be converted to the field type.
    pub fn set(&self, entity: &mut E, value: SqlValue) -> Result<()> {
        (self.setter)(entity, value)
    }

    /// Compares the field across two entities.
    pub fn equals(&self, a: &E, b: &E) -> bool {
        (self.comparer)(a, b)
    }
}

impl<E> Clone for FieldAccess<E> {
    fn clone(&self) -> Self {
        Self {
            getter: Arc::clone(&self.getter),
            setter: Arc::clone(&self.setter),
            comparer: Arc::clone(&self.comparer),
        }
    }
}

impl<E> fmt::Debug for FieldAccess<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccess").finish_non_exhaustive()
    }
}

/// Explicit key marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyMarker {
    /// Requested identity status; `None` means "identity if numeric".
    pub identity: Option<bool>,
}

/// Declarative markers attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMarkers {
    /// Key marker, if present.
    pub key: Option<KeyMarker>,
    /// Alias marker. `Some("")` is an explicit "not aliased", which differs
    /// from carrying no marker at all.
    pub alias: Option<String>,
    /// Nullable marker.
    pub nullable: bool,
    /// Ignore marker.
    pub ignore: Option<IgnoreKind>,
}

/// One declared field of an entity, before introspection.
pub struct FieldDef<E> {
    pub(crate) name: String,
    pub(crate) info: TypeInfo,
    pub(crate) markers: FieldMarkers,
    pub(crate) access: FieldAccess<E>,
}

impl<E: 'static> FieldDef<E> {
    /// Declares a field of type `V` reachable through the given projections.
    ///
    /// ```
    /// use oxide_mapper::FieldDef;
    ///
    /// struct Student {
    ///     id: i32,
    /// }
    ///
    /// let def = FieldDef::<Student>::new::<i32>("Id", |s| &s.id, |s| &mut s.id);
    /// assert_eq!(def.name(), "Id");
    /// ```
    pub fn new<V>(
        name: impl Into<String>,
        get: fn(&E) -> &V,
        get_mut: fn(&mut E) -> &mut V,
    ) -> Self
    where
        V: FieldType + ToSqlValue + FromSqlValue + Clone + PartialEq + 'static,
    {
        Self {
            name: name.into(),
            info: V::type_info(),
            markers: FieldMarkers::default(),
            access: FieldAccess::from_lens(get, get_mut),
        }
    }
}

impl<E> FieldDef<E> {
    /// Returns the declared field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type description.
    #[must_use]
    pub const fn type_info(&self) -> &TypeInfo {
        &self.info
    }

    /// Returns the markers collected so far.
    #[must_use]
    pub const fn markers(&self) -> &FieldMarkers {
        &self.markers
    }

    /// Marks the field as the key, identity if numeric.
    #[must_use]
    pub fn key(mut self) -> Self {
        self.markers.key = Some(KeyMarker { identity: None });
        self
    }

    /// Marks the field as the key with an explicit identity request.
    #[must_use]
    pub fn key_with_identity(mut self, identity: bool) -> Self {
        self.markers.key = Some(KeyMarker {
            identity: Some(identity),
        });
        self
    }

    /// Sets the column alias. An empty alias means "explicitly not aliased".
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.markers.alias = Some(alias.into());
        self
    }

    /// Marks the field nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.markers.nullable = true;
        self
    }

    /// Hides the field from the statement kinds named by `kind`.
    #[must_use]
    pub fn ignore(mut self, kind: IgnoreKind) -> Self {
        self.markers.ignore = Some(kind);
        self
    }
}

impl<E> fmt::Debug for FieldDef<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("info", &self.info)
            .field("markers", &self.markers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample {
        id: i32,
        name: String,
    }

    #[test]
    fn test_markers_chain() {
        let def = FieldDef::<Sample>::new::<String>("Name", |s| &s.name, |s| &mut s.name)
            .alias("FullName")
            .nullable()
            .ignore(IgnoreKind::Update);

        assert_eq!(def.markers().alias.as_deref(), Some("FullName"));
        assert!(def.markers().nullable);
        assert_eq!(def.markers().ignore, Some(IgnoreKind::Update));
        assert_eq!(def.markers().key, None);
    }

    #[test]
    fn test_access_round_trip() {
        let def = FieldDef::<Sample>::new::<i32>("Id", |s| &s.id, |s| &mut s.id);
        let mut sample = Sample::default();

        def.access.set(&mut sample, SqlValue::Int(9)).unwrap();
        assert_eq!(sample.id, 9);
        assert_eq!(def.access.get(&sample), SqlValue::Int(9));

        let other = Sample {
            id: 9,
            name: String::from("other"),
        };
        assert!(def.access.equals(&sample, &other));
    }

    #[test]
    fn test_setter_rejects_wrong_kind() {
        let def = FieldDef::<Sample>::new::<i32>("Id", |s| &s.id, |s| &mut s.id);
        let mut sample = Sample::default();

        assert!(def
            .access
            .set(&mut sample, SqlValue::Text(String::from("x")))
            .is_err());
        assert_eq!(sample.id, 0);
    }
}
