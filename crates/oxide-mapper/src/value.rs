//! SQL values moved in and out of entity fields.
//!
//! Field getters produce a [`SqlValue`] and setters consume one, so the
//! execution layer can bind parameters and write generated keys back without
//! knowing the concrete field types.

use crate::error::{MapperError, Result};

/// A SQL value read from or written to an entity field.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns the SQL representation for inline use (escaped).
    ///
    /// Only meant for logs and diagnostics; generated statements always use
    /// placeholders.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => {
                if *b {
                    String::from("TRUE")
                } else {
                    String::from("FALSE")
                }
            }
            Self::Int(n) => format!("{n}"),
            Self::Float(f) => format!("{f}"),
            Self::Text(s) => {
                let escaped = s.replace('\'', "''");
                format!("'{escaped}'")
            }
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }

    /// Returns a short name for the kind of value, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }

    /// Returns true for [`SqlValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

/// Trait for types that can be rebuilt from SQL values.
pub trait FromSqlValue: Sized {
    /// Converts a `SqlValue` back into the field type.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::ValueConversion`] when the value kind does not
    /// fit the type.
    fn from_sql_value(value: SqlValue) -> Result<Self>;
}

fn mismatch<T>(expected: &'static str, value: &SqlValue) -> Result<T> {
    Err(MapperError::ValueConversion {
        expected,
        found: value.kind_name(),
    })
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl FromSqlValue for SqlValue {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        Ok(value)
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl FromSqlValue for bool {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Bool(b) => Ok(b),
            SqlValue::Int(0) => Ok(false),
            SqlValue::Int(1) => Ok(true),
            other => mismatch("bool", &other),
        }
    }
}

impl ToSqlValue for char {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self.to_string())
    }
}

impl FromSqlValue for char {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        if let SqlValue::Text(ref s) = value {
            let mut chars = s.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return Ok(c);
            }
        }
        mismatch("char", &value)
    }
}

macro_rules! impl_integer {
    ($($ty:ty),+) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::Int(i64::from(self))
                }
            }

            impl FromSqlValue for $ty {
                fn from_sql_value(value: SqlValue) -> Result<Self> {
                    match value {
                        SqlValue::Int(n) => <$ty>::try_from(n).or_else(|_| {
                            mismatch(stringify!($ty), &SqlValue::Int(n))
                        }),
                        other => mismatch(stringify!($ty), &other),
                    }
                }
            }
        )+
    };
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32);

// Integers that may not fit in `i64`; out-of-range values travel as text.
macro_rules! impl_wide_integer {
    ($($ty:ty),+) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    i64::try_from(self).map_or_else(|_| SqlValue::Text(self.to_string()), SqlValue::Int)
                }
            }

            impl FromSqlValue for $ty {
                fn from_sql_value(value: SqlValue) -> Result<Self> {
                    match value {
                        SqlValue::Int(n) => <$ty>::try_from(n).or_else(|_| {
                            mismatch(stringify!($ty), &SqlValue::Int(n))
                        }),
                        SqlValue::Text(text) => text.parse::<$ty>().or_else(|_| {
                            mismatch(stringify!($ty), &SqlValue::Text(text))
                        }),
                        other => mismatch(stringify!($ty), &other),
                    }
                }
            }
        )+
    };
}

impl_wide_integer!(isize, usize, u64, i128, u128);

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl FromSqlValue for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Float(f) => Ok(f),
            SqlValue::Int(n) => Ok(n as Self),
            other => mismatch("f64", &other),
        }
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl FromSqlValue for f32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Float(f) => Ok(f as Self),
            SqlValue::Int(n) => Ok(n as Self),
            other => mismatch("f32", &other),
        }
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Text(s) => Ok(s),
            other => mismatch("String", &other),
        }
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Null => Ok(None),
            other => T::from_sql_value(other).map(Some),
        }
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl FromSqlValue for Vec<u8> {
    fn from_sql_value(value: SqlValue) -> Result<Self> {
        match value {
            SqlValue::Blob(b) => Ok(b),
            other => mismatch("Vec<u8>", &other),
        }
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_value_inline_text_escaping() {
        assert_eq!(
            SqlValue::Text(String::from("O'Brien")).to_sql_inline(),
            "'O''Brien'"
        );
        assert_eq!(SqlValue::Null.to_sql_inline(), "NULL");
        assert_eq!(
            SqlValue::Blob(vec![0x48, 0x49]).to_sql_inline(),
            "X'4849'"
        );
    }

    #[test]
    fn test_to_sql_value_conversions() {
        assert_eq!(true.to_sql_value(), SqlValue::Bool(true));
        assert_eq!(42_i32.to_sql_value(), SqlValue::Int(42));
        assert_eq!(2.5_f64.to_sql_value(), SqlValue::Float(2.5));
        assert_eq!('x'.to_sql_value(), SqlValue::Text(String::from("x")));
        assert_eq!(None::<i32>.to_sql_value(), SqlValue::Null);
        assert_eq!(Some(7_u8).to_sql_value(), SqlValue::Int(7));
        assert_eq!(5_u64.to_sql_value(), SqlValue::Int(5));
        assert_eq!(
            u64::MAX.to_sql_value(),
            SqlValue::Text(u64::MAX.to_string())
        );
    }

    #[test]
    fn test_from_sql_value_integers() {
        assert_eq!(i32::from_sql_value(SqlValue::Int(12)).unwrap(), 12);
        assert_eq!(usize::from_sql_value(SqlValue::Int(3)).unwrap(), 3);
        assert_eq!(u64::from_sql_value(SqlValue::Int(9)).unwrap(), 9);
        assert!(u64::from_sql_value(SqlValue::Int(-1)).is_err());
        assert_eq!(
            u64::from_sql_value(u64::MAX.to_sql_value()).unwrap(),
            u64::MAX
        );

        let err = u8::from_sql_value(SqlValue::Int(300)).unwrap_err();
        assert!(matches!(
            err,
            MapperError::ValueConversion { expected: "u8", .. }
        ));

        let err = i64::from_sql_value(SqlValue::Text(String::from("1"))).unwrap_err();
        assert_eq!(err.to_string(), "cannot convert text value into i64");
    }

    #[test]
    fn test_from_sql_value_options_and_text() {
        assert_eq!(Option::<i32>::from_sql_value(SqlValue::Null).unwrap(), None);
        assert_eq!(
            Option::<String>::from_sql_value(SqlValue::Text(String::from("a"))).unwrap(),
            Some(String::from("a"))
        );
        assert_eq!(
            char::from_sql_value(SqlValue::Text(String::from("z"))).unwrap(),
            'z'
        );
        assert!(char::from_sql_value(SqlValue::Text(String::from("zz"))).is_err());
        assert!(bool::from_sql_value(SqlValue::Int(1)).unwrap());
        assert!((f64::from_sql_value(SqlValue::Int(2)).unwrap() - 2.0).abs() < f64::EPSILON);
    }
}
