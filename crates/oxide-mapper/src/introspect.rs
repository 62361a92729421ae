//! Turns declared fields into validated descriptors.

use tracing::warn;

use crate::error::{MapperError, Result};
use crate::field::{FieldDef, FieldDescriptor, Nullability};

/// Field names detected as the key when no field is marked explicitly.
pub const AUTODETECT_KEY_NAMES: [&str; 2] = ["id", "guid"];

/// Returns true when `name` is one of [`AUTODETECT_KEY_NAMES`], ignoring case.
#[must_use]
pub fn is_autodetect_key(name: &str) -> bool {
    AUTODETECT_KEY_NAMES
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(name))
}

/// Builds the descriptor for one declared field.
///
/// Resolution runs in a fixed order: numeric-ness (from the type), then
/// nullability, alias, key and finally ignore markers. When
/// `autodetect_key` is set, a field named `id` or `guid` becomes the key
/// without an explicit marker.
///
/// # Errors
///
/// - [`MapperError::NonNullableType`] when a concrete value type carries the
///   nullable marker.
/// - [`MapperError::NullableKey`] when a nullable field resolves to the key.
pub fn introspect<E>(def: FieldDef<E>, autodetect_key: bool) -> Result<FieldDescriptor<E>> {
    let FieldDef {
        name,
        info,
        markers,
        access,
    } = def;

    let optional = info.nullability == Nullability::Optional;
    let mut field = FieldDescriptor::new(name, info, access);

    if optional || markers.nullable {
        field.set_nullable()?;
    }

    if let Some(alias) = markers.alias.as_deref() {
        field.set_alias(alias);
    }

    let key = markers
        .key
        .map(|marker| marker.identity)
        .or_else(|| (autodetect_key && is_autodetect_key(field.name())).then_some(None));

    if let Some(identity) = key {
        field.set_key(identity)?;
        if let Some(kind) = markers.ignore {
            warn!(
                field = field.name(),
                ?kind,
                "ignore marker on key field discarded"
            );
        }
    } else {
        field.set_ignore(markers.ignore)?;
    }

    Ok(field)
}

/// Introspects every declared field of an entity, in declaration order.
///
/// Any explicit key marker disables name-based key detection for the whole
/// type. Otherwise at most one field is detected, the first match in
/// [`AUTODETECT_KEY_NAMES`] order, so an entity with both `Id` and `Guid`
/// is keyed on `Id` and can be re-keyed during configuration.
///
/// # Errors
///
/// Propagates per-field failures, and fails with
/// [`MapperError::DuplicateKey`] when two fields carry a key marker.
pub fn introspect_all<E>(
    entity: &str,
    defs: Vec<FieldDef<E>>,
) -> Result<Vec<FieldDescriptor<E>>> {
    let detected = if defs.iter().all(|def| def.markers().key.is_none()) {
        detect_key(&defs)
    } else {
        None
    };

    let mut fields = Vec::with_capacity(defs.len());
    let mut key: Option<usize> = None;
    for (index, def) in defs.into_iter().enumerate() {
        let field = introspect(def, detected == Some(index))?;
        if field.is_key() {
            if let Some(first) = key {
                return Err(MapperError::DuplicateKey {
                    entity: String::from(entity),
                    first: String::from(fields_name(&fields, first)),
                    second: String::from(field.name()),
                });
            }
            key = Some(fields.len());
        }
        fields.push(field);
    }

    Ok(fields)
}

/// Index of the field detected as key, by name priority.
fn detect_key<E>(defs: &[FieldDef<E>]) -> Option<usize> {
    AUTODETECT_KEY_NAMES.iter().find_map(|candidate| {
        defs.iter()
            .position(|def| def.name().eq_ignore_ascii_case(candidate))
    })
}

fn fields_name<E>(fields: &[FieldDescriptor<E>], index: usize) -> &str {
    fields.get(index).map_or("", FieldDescriptor::name)
}
