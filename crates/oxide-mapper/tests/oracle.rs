//! Oracle statement generation against registered entity types.

mod common;

use common::*;
use oxide_mapper::{IdentityRetrieval, Oracle, SqlDialect, SqlGenerator};

#[test]
fn test_selects_quote_with_double_quotes() {
    let simple = register::<SimpleClass>();
    let generator = SqlGenerator::for_entity(Oracle, &simple);

    assert_eq!(
        generator.select_all(simple.select_fields(), simple.key_field()),
        "select Id, Name from \"SimpleClasses\" order by Id"
    );
    assert_eq!(
        generator.select(simple.select_fields(), simple.key_field(), ":id"),
        "select Id, Name from \"SimpleClasses\" where Id = :id"
    );
    assert_eq!(
        generator.select_many(simple.select_fields(), simple.key_field(), ":ids"),
        "select Id, Name from \"SimpleClasses\" where Id in :ids"
    );
}

#[test]
fn test_find_one_fetches_first_row() {
    let aliased = register::<AliasedColumnsClass>();

    assert_eq!(
        Oracle.find_one(aliased.table_name(), aliased.select_fields(), "Id > :min"),
        "select Id, ADifferentName as Name, Description from \"AliasedColumnsClasses\" where Id > :min fetch first 1 rows only"
    );
}

#[test]
fn test_identity_insert_returns_into_output_parameter() {
    let simple = register::<SimpleClass>();

    assert_eq!(
        Oracle.insert(
            simple.table_name(),
            simple.insert_params(&Oracle),
            simple.key_field()
        ),
        "insert into \"SimpleClasses\" (Name) values (:Name) returning Id into :Id"
    );
    assert_eq!(
        Oracle.identity_retrieval(simple.key_field()),
        IdentityRetrieval::OutputParameter {
            name: String::from(":Id")
        }
    );
}

#[test]
fn test_non_identity_insert_has_no_returning_clause() {
    let document = register::<Document>();

    assert_eq!(
        Oracle.insert(
            document.table_name(),
            document.insert_params(&Oracle),
            document.key_field()
        ),
        "insert into \"Documents\" (Guid, Title) values (:Guid, :Title)"
    );
    assert_eq!(
        Oracle.identity_retrieval(document.key_field()),
        IdentityRetrieval::None
    );
}

#[test]
fn test_update_and_delete() {
    let simple = register::<SimpleClass>();
    let generator = SqlGenerator::for_entity(Oracle, &simple);
    let key_param = simple.key_param(&Oracle);

    assert_eq!(
        generator.update(simple.update_params(&Oracle), simple.key_field(), &key_param),
        "update \"SimpleClasses\" set Name = :Name where Id = :Id"
    );
    assert_eq!(generator.delete_all(), "truncate table \"SimpleClasses\"");
    assert_eq!(
        generator.delete(simple.key_field(), &key_param),
        "delete from \"SimpleClasses\" where Id = :Id"
    );
}

#[test]
fn test_next_sequence_value() {
    assert_eq!(
        Oracle.next_sequence_value("STUDENT_SEQ"),
        "select STUDENT_SEQ.nextval from dual"
    );
}
