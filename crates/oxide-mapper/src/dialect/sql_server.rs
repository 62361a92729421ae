//! SQL Server dialect.

use super::{insert_lists, IdentityRetrieval, SqlDialect};
use crate::field::FieldDescriptor;

/// SQL Server (T-SQL) statement generation.
///
/// Tables are bracket quoted, parameters use `@`, and identity keys are
/// returned as a scalar by the insert itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServer;

impl SqlServer {
    /// Creates the dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SqlDialect for SqlServer {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('[', ']')
    }

    fn param_indicator(&self) -> char {
        '@'
    }

    fn find_one<'a, E: 'a>(
        &self,
        table: &str,
        fields: impl IntoIterator<Item = &'a FieldDescriptor<E>>,
        where_clause: &str,
    ) -> String {
        format!(
            "select top 1 {} from {} where {where_clause}",
            self.column_list(fields),
            self.quote_identifier(table)
        )
    }

    fn identity_retrieval<E>(&self, key: &FieldDescriptor<E>) -> IdentityRetrieval {
        if key.is_identity() {
            IdentityRetrieval::Scalar
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
        // SCOPE_IDENTITY() is typed for integer keys; other numeric
        // identities read @@IDENTITY.
        let identity = match key.numeric_kind() {
            _ if !key.is_identity() => "",
            Some(kind) if kind.is_integer() => "select SCOPE_IDENTITY()",
            _ => "select @@IDENTITY",
        };

        format!(
            "set nocount on insert into {} ({columns}) values ({placeholders}) {identity}",
            self.quote_identifier(table)
        )
        .trim_end()
        .to_string()
    }
}
