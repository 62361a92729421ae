//! Oracle dialect.

use super::{insert_lists, IdentityRetrieval, SqlDialect};
use crate::field::FieldDescriptor;

/// Oracle statement generation.
///
/// Tables are double-quoted and parameters use `:`. Oracle has no scalar
/// identity query, so an identity insert ends in a `returning ... into`
/// clause and the caller reads the key from an output parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Oracle;

impl Oracle {
    /// Creates the dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generates SQL fetching the next value of a sequence, for keys that
    /// are supplied by the caller from a sequence rather than an identity
    /// column.
    #[must_use]
    pub fn next_sequence_value(&self, sequence: &str) -> String {
        format!("select {sequence}.nextval from dual")
    }
}

impl SqlDialect for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn param_indicator(&self) -> char {
        ':'
    }

    fn find_one<'a, E: 'a>(
        &self,
        table: &str,
        fields: impl IntoIterator<Item = &'a FieldDescriptor<E>>,
        where_clause: &str,
    ) -> String {
        format!(
            "{} fetch first 1 rows only",
            self.find(table, fields, where_clause)
        )
    }

    fn identity_retrieval<E>(&self, key: &FieldDescriptor<E>) -> IdentityRetrieval {
        if key.is_identity() {
            IdentityRetrieval::OutputParameter {
                name: self.format_param_name(key.name()),
            }
        } else {
            IdentityRetrieval::None
        }
    }

    fn insert<'a, E: 'a, P: AsRef<str>>(
        &self,
        table: &str,
        params: impl IntoIterator<Item = (P, &'a FieldDescriptor<E>)>,
        key: &FieldDescriptor<E>,
    ) -> String {
        let (columns, placeholders) = insert_lists(params);
        let mut sql = format!(
            "insert into {} ({columns}) values ({placeholders})",
            self.quote_identifier(table)
        );

        if let IdentityRetrieval::OutputParameter { name } = self.identity_retrieval(key) {
            sql.push_str(&format!(" returning {} into {name}", key.effective_name()));
        }
        sql
    }
}
