//! Classification of Rust field types.
//!
//! Introspection needs three facts about a field's declared type: whether it
//! is numeric (identity eligibility), whether it may hold an absent value,
//! and its zero value. [`FieldType`] supplies them.

use crate::value::SqlValue;

/// The numeric sub-kind of a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    /// A fixed-width integer of the given bit width.
    Integer {
        /// Bit width (8, 16, 32, 64 or 128).
        bits: u8,
    },
    /// A binary floating point number.
    Float,
    /// A decimal type supplied by the application.
    Decimal,
}

impl NumericKind {
    /// Returns true for integer kinds.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Integer { .. })
    }
}

/// Whether a type can represent an absent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
    /// A concrete value type; may never be marked nullable.
    Value,
    /// An owned reference-like type (text, blobs) that may be marked nullable.
    Reference,
    /// An `Option<T>`; always nullable.
    Optional,
}

/// What introspection learns from a field's declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInfo {
    /// Display name of the type.
    pub name: &'static str,
    /// Numeric sub-kind, or `None` for non-numeric types.
    pub numeric: Option<NumericKind>,
    /// Nullability class.
    pub nullability: Nullability,
    /// Zero value of the type, absent for optional types.
    pub default_value: Option<SqlValue>,
}

impl TypeInfo {
    /// Describes a concrete value type.
    #[must_use]
    pub const fn value(name: &'static str, numeric: Option<NumericKind>, default: SqlValue) -> Self {
        Self {
            name,
            numeric,
            nullability: Nullability::Value,
            default_value: Some(default),
        }
    }

    /// Describes a reference-like type that may be marked nullable.
    #[must_use]
    pub const fn reference(name: &'static str, default: SqlValue) -> Self {
        Self {
            name,
            numeric: None,
            nullability: Nullability::Reference,
            default_value: Some(default),
        }
    }

    /// Returns true when the type is numeric.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.numeric.is_some()
    }
}

/// Types that can back an entity field.
///
/// Implemented for the primitive and standard types the mapper understands.
/// Applications implement it for their own value types, e.g. a decimal type
/// reporting [`NumericKind::Decimal`].
pub trait FieldType {
    /// Describes the type for introspection.
    fn type_info() -> TypeInfo;
}

macro_rules! impl_integer_type {
    ($($ty:ty => $bits:expr),+ $(,)?) => {
        $(
            impl FieldType for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::value(
                        stringify!($ty),
                        Some(NumericKind::Integer { bits: $bits }),
                        SqlValue::Int(0),
                    )
                }
            }
        )+
    };
}

impl_integer_type!(
    i8 => 8,
    i16 => 16,
    i32 => 32,
    i64 => 64,
    u8 => 8,
    u16 => 16,
    u32 => 32,
    u64 => 64,
    i128 => 128,
    u128 => 128,
);

impl FieldType for f32 {
    fn type_info() -> TypeInfo {
        TypeInfo::value("f32", Some(NumericKind::Float), SqlValue::Float(0.0))
    }
}

impl FieldType for f64 {
    fn type_info() -> TypeInfo {
        TypeInfo::value("f64", Some(NumericKind::Float), SqlValue::Float(0.0))
    }
}

// Primitive, but never numeric.
impl FieldType for bool {
    fn type_info() -> TypeInfo {
        TypeInfo::value("bool", None, SqlValue::Bool(false))
    }
}

impl FieldType for char {
    fn type_info() -> TypeInfo {
        TypeInfo::value("char", None, SqlValue::Text(String::from("\0")))
    }
}

impl FieldType for isize {
    fn type_info() -> TypeInfo {
        TypeInfo::value("isize", None, SqlValue::Int(0))
    }
}

impl FieldType for usize {
    fn type_info() -> TypeInfo {
        TypeInfo::value("usize", None, SqlValue::Int(0))
    }
}

impl FieldType for String {
    fn type_info() -> TypeInfo {
        TypeInfo::reference("String", SqlValue::Text(String::new()))
    }
}

impl FieldType for Vec<u8> {
    fn type_info() -> TypeInfo {
        TypeInfo::reference("Vec<u8>", SqlValue::Blob(Vec::new()))
    }
}

impl<T: FieldType> FieldType for Option<T> {
    fn type_info() -> TypeInfo {
        let inner = T::type_info();
        TypeInfo {
            name: inner.name,
            numeric: inner.numeric,
            nullability: Nullability::Optional,
            default_value: None,
        }
    }
}
