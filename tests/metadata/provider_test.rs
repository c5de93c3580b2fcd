//! Integration tests for the metadata provider.
//!
//! These tests drive the provider over in-memory fixture rows.

use std::sync::Arc;
use std::thread;

use regex::Regex;
use schemalens::metadata::{
    sql_types, DatabaseMetaDataProvider, MetadataError, MetadataQuery, MetadataRow, Schema,
    StandardPolicy, Value,
};
use schemalens::schema::{DataType, UNKNOWN_AUTONUMBER_START};
use schemalens::source::{ColumnRow, InMemorySource};

fn names<'a>(columns: impl IntoIterator<Item = &'a schemalens::schema::Column>) -> Vec<String> {
    columns.into_iter().map(|c| c.name.clone()).collect()
}

fn customer_source() -> InMemorySource {
    InMemorySource::new()
        .table("CUSTOMER")
        .column(ColumnRow::integer("CUSTOMER", "ID").not_null().auto_increment())
        .column(ColumnRow::varchar("CUSTOMER", "NAME", 50))
        .column(ColumnRow::integer("CUSTOMER", "VERSION").not_null())
        .primary_key("CUSTOMER", "ID", 1)
}

#[test]
fn test_customer_table() {
    let provider = DatabaseMetaDataProvider::new(customer_source());
    let customer = provider.get_table("CUSTOMER").unwrap();

    assert_eq!(customer.name(), "CUSTOMER");
    assert_eq!(customer.primary_key(), ["ID"]);
    assert!(!customer.is_temporary());

    let columns = customer.columns().unwrap();
    assert_eq!(names(columns), ["ID", "NAME", "VERSION"]);

    let id = &columns[0];
    assert!(id.primary_key);
    assert!(!id.nullable);
    assert!(id.autonumbered);
    assert_eq!(id.autonumber_start, UNKNOWN_AUTONUMBER_START);
    assert_eq!(id.default_value, "");

    let name = &columns[1];
    assert_eq!(name.data_type, DataType::String);
    assert_eq!(name.width, 50);
    assert!(name.nullable);
    assert!(!name.primary_key);
    assert_eq!(name.default_value, "");

    assert_eq!(columns[2].default_value, "0");
}

#[test]
fn test_lookup_ignores_case_and_keeps_display_name() {
    let provider = DatabaseMetaDataProvider::new(InMemorySource::new().table("Customer"));

    assert!(provider.table_exists("CUSTOMER").unwrap());
    assert!(provider.table_exists("customer").unwrap());
    assert!(!provider.table_exists("ORDERS").unwrap());
    assert_eq!(provider.get_table("cUsToMeR").unwrap().name(), "Customer");
}

#[test]
fn test_composite_key_reorders_columns() {
    let source = InMemorySource::new()
        .table("LINK")
        .column(ColumnRow::integer("LINK", "A").not_null())
        .column(ColumnRow::integer("LINK", "B").not_null())
        .primary_key("LINK", "A", 2)
        .primary_key("LINK", "B", 1);

    let provider = DatabaseMetaDataProvider::new(source);
    let link = provider.get_table("LINK").unwrap();

    assert_eq!(link.primary_key(), ["B", "A"]);
    let columns = link.columns().unwrap();
    assert_eq!(names(columns), ["B", "A"]);
    assert!(columns.iter().all(|c| c.primary_key));
}

#[test]
fn test_key_columns_interleaved_with_others() {
    let source = InMemorySource::new()
        .table("ORDER_LINE")
        .column(ColumnRow::integer("ORDER_LINE", "LINE_NO").not_null())
        .column(ColumnRow::varchar("ORDER_LINE", "NOTE", 200))
        .column(ColumnRow::integer("ORDER_LINE", "ORDER_ID").not_null())
        .primary_key("ORDER_LINE", "ORDER_ID", 1)
        .primary_key("ORDER_LINE", "LINE_NO", 2);

    let provider = DatabaseMetaDataProvider::new(source);
    let columns = provider.get_table("ORDER_LINE").unwrap().columns().unwrap().to_vec();

    assert_eq!(names(&columns), ["ORDER_ID", "NOTE", "LINE_NO"]);
    let keys: Vec<_> = columns.iter().filter(|c| c.primary_key).map(|c| c.name.as_str()).collect();
    assert_eq!(keys, ["ORDER_ID", "LINE_NO"]);
}

#[test]
fn test_repeated_lookup_returns_cached_table() {
    let source = Arc::new(customer_source());
    let provider = DatabaseMetaDataProvider::with_source(source.clone());

    let first = provider.get_table("CUSTOMER").unwrap();
    first.columns().unwrap();
    let queries = source.query_count();

    let second = provider.get_table("customer").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.columns().unwrap(), first.columns().unwrap());
    assert_eq!(source.query_count(), queries);
}

#[test]
fn test_catalogs_load_once() {
    let source = Arc::new(
        customer_source()
            .table("ORDERS")
            .column(ColumnRow::integer("ORDERS", "ID").not_null()),
    );
    let provider = DatabaseMetaDataProvider::with_source(source.clone());

    provider.table_names().unwrap();
    provider.table_exists("ORDERS").unwrap();
    provider.get_table("CUSTOMER").unwrap();
    provider.get_table("ORDERS").unwrap();

    assert_eq!(source.count_of(MetadataQuery::Tables), 1);
    assert_eq!(source.count_of(MetadataQuery::Columns), 1);
    assert_eq!(source.count_of(MetadataQuery::PrimaryKeys), 2);
    assert_eq!(source.count_of(MetadataQuery::IndexInfo), 0);
}

#[test]
fn test_missing_table_caches_nothing() {
    let source = Arc::new(customer_source());
    let provider = DatabaseMetaDataProvider::with_source(source.clone());

    let err = provider.get_table("MISSING").unwrap_err();
    assert!(matches!(err, MetadataError::TableNotFound(ref name) if name == "MISSING"));
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "table [MISSING] not found");

    assert_eq!(source.count_of(MetadataQuery::PrimaryKeys), 0);
    assert!(provider.get_table("MISSING").is_err());
}

#[test]
fn test_table_names_keep_source_order() {
    let source = InMemorySource::new()
        .table("ZEBRA")
        .table("apple")
        .table("Mango");
    let provider = DatabaseMetaDataProvider::new(source);

    assert_eq!(provider.table_names().unwrap(), ["ZEBRA", "apple", "Mango"]);
    let tables: Vec<String> = provider
        .tables()
        .unwrap()
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    assert_eq!(tables, ["ZEBRA", "apple", "Mango"]);
}

#[test]
fn test_empty_database() {
    let provider = DatabaseMetaDataProvider::new(InMemorySource::new().view("ONLY_A_VIEW"));
    assert!(provider.is_empty_database().unwrap());
    assert!(provider.table_names().unwrap().is_empty());
    assert!(provider.snapshot().unwrap().is_empty());
}

#[test]
fn test_filtered_tables_are_invisible() {
    let source = customer_source()
        .table("SYS_AUDIT")
        .table("TMP_LOAD")
        // A type no portable model supports; never read since the table is filtered.
        .column(ColumnRow::new("TMP_LOAD", "LOADED_AT", sql_types::TIMESTAMP, "TIMESTAMP", 26, 0))
        .column(ColumnRow::integer("SYS_AUDIT", "ID"));
    let policy = StandardPolicy::new()
        .with_system_tables(Regex::new("^SYS_").unwrap())
        .with_ignored_tables(Regex::new("^TMP_").unwrap());
    let provider = DatabaseMetaDataProvider::new(source).with_policy(policy);

    assert_eq!(provider.table_names().unwrap(), ["CUSTOMER"]);
    assert!(!provider.table_exists("SYS_AUDIT").unwrap());
    assert!(provider.get_table("TMP_LOAD").unwrap_err().is_not_found());
    assert_eq!(provider.get_table("CUSTOMER").unwrap().columns().unwrap().len(), 3);
}

#[test]
fn test_system_kind_not_enumerated() {
    let source = customer_source().object("sqlite_sequence", "SYSTEM TABLE");
    let provider = DatabaseMetaDataProvider::new(source);
    assert_eq!(provider.table_names().unwrap(), ["CUSTOMER"]);
}

#[test]
fn test_columns_of_unknown_tables_are_skipped() {
    let source = customer_source().column(ColumnRow::new(
        "NOT_A_TABLE",
        "GEOM",
        sql_types::OTHER,
        "GEOMETRY",
        0,
        0,
    ));
    let provider = DatabaseMetaDataProvider::new(source);
    assert_eq!(provider.get_table("CUSTOMER").unwrap().columns().unwrap().len(), 3);
}

#[test]
fn test_table_without_columns() {
    let provider = DatabaseMetaDataProvider::new(InMemorySource::new().table("EMPTY"));
    let table = provider.get_table("EMPTY").unwrap();
    assert!(table.columns().unwrap().is_empty());
    assert!(table.primary_key().is_empty());
}

#[test]
fn test_unknown_type_in_cataloged_table() {
    let source = customer_source().column(ColumnRow::new(
        "CUSTOMER",
        "CREATED_AT",
        sql_types::TIMESTAMP,
        "DATETIME",
        26,
        0,
    ));
    let provider = DatabaseMetaDataProvider::new(source);

    let err = provider.get_table("CUSTOMER").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("DATETIME"), "{message}");
    assert!(message.contains("93"), "{message}");
    assert!(message.contains("26"), "{message}");
}

#[test]
fn test_missing_primary_key_column() {
    let source = customer_source().primary_key("CUSTOMER", "GHOST", 2);
    let provider = DatabaseMetaDataProvider::new(source);

    let customer = provider.get_table("CUSTOMER").unwrap();
    let err = customer.columns().unwrap_err();
    assert!(err.is_inconsistency());
    match err {
        MetadataError::MissingPrimaryKeyColumn { table, column, columns } => {
            assert_eq!(table, "CUSTOMER");
            assert_eq!(column, "GHOST");
            assert_eq!(columns, ["ID", "NAME", "VERSION"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_duplicate_table_names() {
    let provider =
        DatabaseMetaDataProvider::new(InMemorySource::new().table("ORDERS").table("orders"));
    let err = provider.table_names().unwrap_err();
    assert!(matches!(err, MetadataError::DuplicateName { kind: "table", .. }));
}

#[test]
fn test_duplicate_column_names() {
    let source = customer_source().column(ColumnRow::varchar("CUSTOMER", "name", 10));
    let provider = DatabaseMetaDataProvider::new(source);
    let err = provider.get_table("CUSTOMER").unwrap_err();
    assert!(matches!(err, MetadataError::DuplicateName { kind: "column", .. }));
}

#[test]
fn test_query_failure_is_wrapped() {
    let source = customer_source().fail(MetadataQuery::Tables, "connection reset");
    let provider = DatabaseMetaDataProvider::new(source);

    let err = provider.table_exists("CUSTOMER").unwrap_err();
    assert!(matches!(err, MetadataError::Query { .. }));
    assert_eq!(
        err.to_string(),
        "error reading table metadata: connection reset"
    );
    assert!(!err.is_not_found());
}

#[test]
fn test_cursor_failure_is_wrapped() {
    let source = customer_source().fail_cursor(MetadataQuery::Columns, "cursor closed");
    let provider = DatabaseMetaDataProvider::new(source);

    let err = provider.get_table("CUSTOMER").unwrap_err();
    assert_eq!(err.to_string(), "error reading column metadata: cursor closed");
}

#[test]
fn test_primary_key_failure_names_table() {
    let source = customer_source().fail(MetadataQuery::PrimaryKeys, "timeout");
    let provider = DatabaseMetaDataProvider::new(source);

    let err = provider.get_table("CUSTOMER").unwrap_err();
    assert!(err.to_string().contains("primary keys for table [CUSTOMER]"));
}

#[test]
fn test_bad_column_row_names_column_and_table() {
    let bad_row = MetadataRow::new(vec![
        Value::from("CUSTOMER"),
        Value::from("BALANCE"),
        Value::from("not a number"),
        Value::from("DECIMAL"),
        Value::from(10),
        Value::from(2),
        Value::from("YES"),
        Value::from("NO"),
        Value::Null,
        Value::Null,
    ]);
    let source = customer_source().raw_row(MetadataQuery::Columns, bad_row);
    let provider = DatabaseMetaDataProvider::new(source);

    let err = provider.get_table("CUSTOMER").unwrap_err();
    assert!(matches!(err, MetadataError::Read { .. }));
    assert!(err
        .to_string()
        .contains("column [BALANCE] on table [CUSTOMER]"));
}

#[test]
fn test_bad_table_row_names_table() {
    // Too short to hold a table type.
    let short_row = MetadataRow::new(vec![Value::Null, Value::from("BROKEN")]);
    let source = customer_source().raw_row(MetadataQuery::Tables, short_row);
    let provider = DatabaseMetaDataProvider::new(source);

    let err = provider.table_names().unwrap_err();
    assert!(matches!(err, MetadataError::Read { .. }));
    assert!(err.to_string().contains("table [BROKEN]"));

    // Nothing was cached, so every call fails the same way.
    assert!(provider.table_exists("CUSTOMER").is_err());
}

#[test]
fn test_non_ascii_names_fold_like_table_names() {
    let source = InMemorySource::new()
        .table("Maße")
        .column(ColumnRow::varchar("MASSE", "bezeichnung", 40))
        .column(ColumnRow::integer("MASSE", "größe").not_null())
        .primary_key("MASSE", "GRÖSSE", 1);
    let provider = DatabaseMetaDataProvider::new(source);

    let table = provider.get_table("MASSE").unwrap();
    assert_eq!(table.name(), "Maße");

    let columns = table.columns().unwrap();
    assert_eq!(names(columns), ["bezeichnung", "größe"]);
    assert!(!columns[0].primary_key);
    assert!(columns[1].primary_key);
    assert!(table.column("GRÖSSE").unwrap().is_some());
}

#[test]
fn test_non_ascii_duplicate_columns() {
    let source = InMemorySource::new()
        .table("T")
        .column(ColumnRow::integer("T", "größe"))
        .column(ColumnRow::integer("T", "GRÖSSE"));
    let provider = DatabaseMetaDataProvider::new(source);

    let err = provider.get_table("T").unwrap_err();
    assert!(matches!(err, MetadataError::DuplicateName { kind: "column", .. }));
}

#[test]
fn test_column_defaults_are_configurable() {
    let policy = StandardPolicy::new()
        .without_column_defaults()
        .with_column_default("name", "anonymous");
    let provider = DatabaseMetaDataProvider::new(customer_source()).with_policy(policy);

    let customer = provider.get_table("CUSTOMER").unwrap();
    let columns = customer.columns().unwrap();
    assert_eq!(columns[1].default_value, "anonymous");
    assert_eq!(columns[2].default_value, "");
}

#[test]
fn test_concurrent_lookups_share_one_table() {
    let provider = DatabaseMetaDataProvider::new(customer_source());

    let tables: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| provider.get_table("CUSTOMER").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for table in &tables[1..] {
        assert!(Arc::ptr_eq(&tables[0], table));
    }
    assert_eq!(tables[0].columns().unwrap().len(), 3);
}

#[test]
fn test_snapshot() {
    let source = customer_source()
        .view("ACTIVE_CUSTOMER")
        .index("CUSTOMER", "IDX_NAME", false, &["NAME"]);
    let provider = DatabaseMetaDataProvider::new(source);

    let snapshot = provider.snapshot().unwrap();
    assert_eq!(snapshot.views, ["ACTIVE_CUSTOMER"]);

    let customer = snapshot.table("customer").unwrap();
    assert_eq!(customer.primary_key, ["ID"]);
    assert_eq!(customer.indexes.len(), 1);
    assert!(customer.column("id").unwrap().primary_key);
}
