//! SQLite dialect.

use super::{insert_lists, IdentityRetrieval, SqlDialect};
use crate::field::FieldDescriptor;

/// SQLite statement generation.
///
/// Uses SQL Server style brackets and `@` parameters. SQLite has neither
/// `top` nor `truncate`, so single-row finds order by `rowid` and limit,
/// and delete-all is an unqualified `delete`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Sqlite {
    /// Creates the dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
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
            "{} order by rowid asc limit 1",
            self.find(table, fields, where_clause)
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
        let mut sql = format!(
            "insert into {} ({columns}) values ({placeholders})",
            self.quote_identifier(table)
        );
        if key.is_identity() {
            sql.push_str("; select last_insert_rowid()");
        }
        sql
    }

    fn delete_all(&self, table: &str) -> String {
        format!("delete from {}", self.quote_identifier(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldAccess, FieldType};

    struct Row {
        id: i32,
        name: String,
    }

    fn fields() -> (FieldDescriptor<Row>, FieldDescriptor<Row>) {
        let mut id = FieldDescriptor::new(
            String::from("Id"),
            i32::type_info(),
            FieldAccess::<Row>::from_lens::<i32>(|r| &r.id, |r| &mut r.id),
        );
        id.set_key(None).unwrap();
        let name = FieldDescriptor::new(
            String::from("Name"),
            String::type_info(),
            FieldAccess::<Row>::from_lens::<String>(|r| &r.name, |r| &mut r.name),
        );
        (id, name)
    }

    #[test]
    fn test_find_one_orders_by_rowid() {
        let (id, name) = fields();

        assert_eq!(
            Sqlite.find_one("Rows", [&id, &name], "Name = @name"),
            "select Id, Name from [Rows] where Name = @name order by rowid asc limit 1"
        );
    }

    #[test]
    fn test_identity_insert_selects_last_rowid() {
        let (id, name) = fields();

        assert_eq!(
            Sqlite.insert("Rows", [("@name", &name)], &id),
            "insert into [Rows] (Name) values (@name); select last_insert_rowid()"
        );
        assert_eq!(Sqlite.identity_retrieval(&id), IdentityRetrieval::Scalar);
    }

    #[test]
    fn test_delete_all_without_truncate() {
        assert_eq!(Sqlite::new().delete_all("Rows"), "delete from [Rows]");
    }
}
