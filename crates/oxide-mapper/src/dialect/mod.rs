//! SQL dialects.
//!
//! Every dialect generates the same set of statements from entity metadata.
//! They differ in identifier quoting, the parameter indicator, how a result
//! is limited to one row and how an identity key is read back after an
//! insert. Shared statement shapes live in the default methods of
//! [`SqlDialect`]; dialects override the parts that differ.
//!
//! Placeholders and WHERE fragments supplied by the caller are inserted
//! verbatim. Guarding them against injection is the caller's job.

mod oracle;
mod sql_server;
mod sqlite;

pub use oracle::Oracle;
pub use sql_server::SqlServer;
pub use sqlite::Sqlite;

use std::fmt;
use std::str::FromStr;

use crate::error::MapperError;
use crate::field::FieldDescriptor;

/// Parameter indicators recognized (and replaced) when formatting a
/// parameter name.
pub const PARAM_INDICATORS: &[char] = &['@', ':', '?', '$'];

/// How the key generated by an identity insert reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityRetrieval {
    /// Nothing to read back: the key is not an identity.
    None,
    /// The insert statement returns the key as a scalar result.
    Scalar,
    /// The caller registers an output parameter with this placeholder and
    /// reads the key from it after execution.
    OutputParameter {
        /// The output parameter placeholder.
        name: String,
    },
}

/// Renders one projected column: `alias as name` when aliased.
fn projected_column<E>(field: &FieldDescriptor<E>) -> String {
    match field.alias() {
        Some(alias) => format!("{alias} as {}", field.name()),
        None => String::from(field.name()),
    }
}

/// Splits insert parameters into the column list and the placeholder list.
pub(crate) fn insert_lists<'a, E: 'a, P: AsRef<str>>(
    params: impl IntoIterator<Item = (P, &'a FieldDescriptor<E>)>,
) -> (String, String) {
    let (columns, placeholders): (Vec<&str>, Vec<P>) = params
        .into_iter()
        .map(|(placeholder, field)| (field.effective_name(), placeholder))
        .unzip();
    let placeholders: Vec<&str> = placeholders.iter().map(AsRef::as_ref).collect();
    (columns.join(", "), placeholders.join(", "))
}

/// Trait for dialect-specific SQL statement generation.
///
/// Every generator takes the table name per call. Use
/// [`SqlGenerator`](crate::SqlGenerator) to bind a table once.
pub trait SqlDialect {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the opening and closing identifier quote.
    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    /// Returns the parameter indicator.
    fn param_indicator(&self) -> char;

    /// Quotes a table name.
    fn quote_identifier(&self, name: &str) -> String {
        let (open, close) = self.identifier_quotes();
        format!("{open}{name}{close}")
    }

    /// Formats a bare name as a parameter placeholder.
    ///
    /// One leading indicator of any dialect is replaced, so formatting is
    /// idempotent. Blank input yields an empty string.
    fn format_param_name(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return String::new();
        }
        let bare = raw.strip_prefix(PARAM_INDICATORS).unwrap_or(raw);
        format!("{}{bare}", self.param_indicator())
    }

    /// Removes the prefix added by [`format_param_name`](Self::format_param_name).
    ///
    /// Drops exactly one leading character and leaves the rest untouched.
    fn strip_param_formatting(&self, placeholder: &str) -> String {
        placeholder.chars().skip(1).collect()
    }

    /// Builds a SELECT projection; no fields means `*`.
    fn column_list<'a, E: 'a>(
        &self,
        fields: impl IntoIterator<Item = &'a FieldDescriptor<E>>,
    ) -> String {
        let columns: Vec<String> = fields.into_iter().map(projected_column).collect();
        if columns.is_empty() {
            String::from("*")
        } else {
            columns.join(", ")
        }
    }

    /// Generates SQL selecting every row, ordered by the key.
    fn select_all<'a, E: 'a>(
        &self,
        table: &str,
        fields: impl IntoIterator<Item = &'a FieldDescriptor<E>>,
        key: &FieldDescriptor<E>,
    ) -> String {
        format!(
            "select {} from {} order by {}",
            self.column_list(fields),
            self.quote_identifier(table),
            key.effective_name()
        )
    }

    /// Generates SQL selecting the row with the given key.
    fn select<'a, E: 'a>(
        &self,
        table: &str,
        fields: impl IntoIterator<Item = &'a FieldDescriptor<E>>,
        key: &FieldDescriptor<E>,
        key_param: &str,
    ) -> String {
        format!(
            "select {} from {} where {} = {key_param}",
            self.column_list(fields),
            self.quote_identifier(table),
            key.effective_name()
        )
    }

    /// Generates SQL selecting the rows whose key is in `keys_param`.
    fn select_many<'a, E: 'a>(
        &self,
        table: &str,
        fields: impl IntoIterator<Item = &'a FieldDescriptor<E>>,
        key: &FieldDescriptor<E>,
        keys_param: &str,
    ) -> String {
        format!(
            "select {} from {} where {} in {keys_param}",
            self.column_list(fields),
            self.quote_identifier(table),
            key.effective_name()
        )
    }

    /// Generates SQL selecting the rows matching `where_clause`.
    fn find<'a, E: 'a>(
        &self,
        table: &str,
        fields: impl IntoIterator<Item = &'a FieldDescriptor<E>>,
        where_clause: &str,
    ) -> String {
        format!(
            "select {} from {} where {where_clause}",
            self.column_list(fields),
            self.quote_identifier(table)
        )
    }

    /// Generates SQL selecting at most one row matching `where_clause`.
    fn find_one<'a, E: 'a>(
        &self,
        table: &str,
        fields: impl IntoIterator<Item = &'a FieldDescriptor<E>>,
        where_clause: &str,
    ) -> String;

    /// How the caller reads back the key after [`insert`](Self::insert).
    fn identity_retrieval<E>(&self, key: &FieldDescriptor<E>) -> IdentityRetrieval;

    /// Generates an INSERT from `(placeholder, field)` pairs, in the given
    /// order. Identity keys add the dialect's retrieval clause.
    fn insert<'a, E: 'a, P: AsRef<str>>(
        &self,
        table: &str,
        params: impl IntoIterator<Item = (P, &'a FieldDescriptor<E>)>,
        key: &FieldDescriptor<E>,
    ) -> String;

    /// Generates an UPDATE of the row with the given key from
    /// `(placeholder, field)` pairs.
    fn update<'a, E: 'a, P: AsRef<str>>(
        &self,
        table: &str,
        params: impl IntoIterator<Item = (P, &'a FieldDescriptor<E>)>,
        key: &FieldDescriptor<E>,
        key_param: &str,
    ) -> String {
        format!(
            "update {} set {} where {} = {key_param}",
            self.quote_identifier(table),
            self.assignments(params),
            key.effective_name()
        )
    }

    /// Generates an UPDATE of the rows whose key is in `keys_param`.
    fn update_many<'a, E: 'a, P: AsRef<str>>(
        &self,
        table: &str,
        params: impl IntoIterator<Item = (P, &'a FieldDescriptor<E>)>,
        key: &FieldDescriptor<E>,
        keys_param: &str,
    ) -> String {
        format!(
            "update {} set {} where {} in {keys_param}",
            self.quote_identifier(table),
            self.assignments(params),
            key.effective_name()
        )
    }

    /// Builds `column = placeholder` pairs; no pairs means an empty string.
    fn assignments<'a, E: 'a, P: AsRef<str>>(
        &self,
        params: impl IntoIterator<Item = (P, &'a FieldDescriptor<E>)>,
    ) -> String {
        params
            .into_iter()
            .map(|(placeholder, field)| {
                format!("{} = {}", field.effective_name(), placeholder.as_ref())
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Generates SQL removing every row.
    fn delete_all(&self, table: &str) -> String {
        format!("truncate table {}", self.quote_identifier(table))
    }

    /// Generates SQL deleting the row with the given key.
    fn delete<E>(&self, table: &str, key: &FieldDescriptor<E>, key_param: &str) -> String {
        format!(
            "delete from {} where {} = {key_param}",
            self.quote_identifier(table),
            key.effective_name()
        )
    }

    /// Generates SQL deleting the rows whose key is in `keys_param`.
    fn delete_many<E>(&self, table: &str, key: &FieldDescriptor<E>, keys_param: &str) -> String {
        format!(
            "delete from {} where {} in {keys_param}",
            self.quote_identifier(table),
            key.effective_name()
        )
    }
}

/// A dialect chosen at runtime, e.g. from a configuration value.
///
/// ```
/// use oxide_mapper::{DialectKind, SqlDialect};
///
/// let dialect: DialectKind = "mssql".parse().unwrap();
/// assert_eq!(dialect, DialectKind::SqlServer);
/// assert_eq!(dialect.format_param_name("id"), "@id");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DialectKind {
    /// Microsoft SQL Server.
    #[default]
    SqlServer,
    /// Oracle Database.
    Oracle,
    /// SQLite.
    Sqlite,
}

impl DialectKind {
    /// Every supported dialect.
    pub const ALL: [Self; 3] = [Self::SqlServer, Self::Oracle, Self::Sqlite];
}

impl FromStr for DialectKind {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlserver" | "sql_server" | "mssql" | "tsql" => Ok(Self::SqlServer),
            "oracle" => Ok(Self::Oracle),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(MapperError::UnknownDialect(String::from(s))),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! delegate {
    ($self:ident, $dialect:ident => $body:expr) => {
        match $self {
            DialectKind::SqlServer => {
                let $dialect = SqlServer;
                $body
            }
            DialectKind::Oracle => {
                let $dialect = Oracle;
                $body
            }
            DialectKind::Sqlite => {
                let $dialect = Sqlite;
                $body
            }
        }
    };
}

impl SqlDialect for DialectKind {
    fn name(&self) -> &'static str {
        delegate!(self, d => d.name())
    }

    fn identifier_quotes(&self) -> (char, char) {
        delegate!(self, d => d.identifier_quotes())
    }

    fn param_indicator(&self) -> char {
        delegate!(self, d => d.param_indicator())
    }

    fn find_one<'a, E: 'a>(
        &self,
        table: &str,
        fields: impl IntoIterator<Item = &'a FieldDescriptor<E>>,
        where_clause: &str,
    ) -> String {
        delegate!(self, d => d.find_one(table, fields, where_clause))
    }

    fn identity_retrieval<E>(&self, key: &FieldDescriptor<E>) -> IdentityRetrieval {
        delegate!(self, d => d.identity_retrieval(key))
    }

    fn insert<'a, E: 'a, P: AsRef<str>>(
        &self,
        table: &str,
        params: impl IntoIterator<Item = (P, &'a FieldDescriptor<E>)>,
        key: &FieldDescriptor<E>,
    ) -> String {
        delegate!(self, d => d.insert(table, params, key))
    }

    fn delete_all(&self, table: &str) -> String {
        delegate!(self, d => d.delete_all(table))
    }
}
