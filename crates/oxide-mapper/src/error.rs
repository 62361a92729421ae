//! Error types for entity mapping and SQL generation.

use thiserror::Error;

/// Errors raised while describing entity types or converting field values.
///
/// Definition errors (everything except [`MapperError::ValueConversion`] and
/// [`MapperError::UnknownDialect`]) are deterministic: the same entity
/// definition always fails registration the same way.
#[derive(Debug, Error)]
pub enum MapperError {
    /// No field was declared or detected as the primary key.
    #[error("missing primary key on entity `{entity}`")]
    MissingPrimaryKey {
        /// The entity type name.
        entity: String,
    },

    /// More than one field resolved to the primary key.
    #[error("entity `{entity}` declares more than one key: `{first}` and `{second}`")]
    DuplicateKey {
        /// The entity type name.
        entity: String,
        /// The first key field encountered.
        first: String,
        /// The conflicting key field.
        second: String,
    },

    /// A key field was marked nullable, or a nullable field was made the key.
    #[error("key properties may not be nullable: `{field}`")]
    NullableKey {
        /// The offending field.
        field: String,
    },

    /// A concrete value type was marked nullable.
    #[error("non-nullable property/type marked nullable: `{field}`")]
    NonNullableType {
        /// The offending field.
        field: String,
    },

    /// Select/insert/update visibility of a key field cannot change.
    #[error("visibility of key field `{field}` is fixed and cannot be ignored")]
    KeyVisibilityLocked {
        /// The key field.
        field: String,
    },

    /// A field name did not match any declared field.
    #[error("field `{field}` not found on entity `{entity}`")]
    UnknownField {
        /// The entity type name.
        entity: String,
        /// The requested field name.
        field: String,
    },

    /// A cached entity type could not be recovered with the requested type.
    #[error("registry entry for entity `{entity}` holds a different type")]
    TypeMismatch {
        /// The entity type name.
        entity: String,
    },

    /// A SQL value could not be converted to the field's type.
    #[error("cannot convert {found} value into {expected}")]
    ValueConversion {
        /// The Rust type that was expected.
        expected: &'static str,
        /// The kind of SQL value that was supplied.
        found: &'static str,
    },

    /// A dialect name did not match any supported dialect.
    #[error("unknown SQL dialect: {0}")]
    UnknownDialect(String),
}

/// Result type alias for mapper operations.
pub type Result<T> = std::result::Result<T, MapperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = MapperError::NullableKey {
            field: String::from("Id"),
        };
        assert_eq!(err.to_string(), "key properties may not be nullable: `Id`");

        let err = MapperError::MissingPrimaryKey {
            entity: String::from("Order"),
        };
        assert!(err.to_string().contains("Order"));

        let err = MapperError::NonNullableType {
            field: String::from("Count"),
        };
        assert_eq!(
            err.to_string(),
            "non-nullable property/type marked nullable: `Count`"
        );
    }
}
