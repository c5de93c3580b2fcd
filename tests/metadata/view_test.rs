//! Integration tests for view enumeration.

use std::sync::Arc;

use schemalens::metadata::{DatabaseMetaDataProvider, MetadataError, MetadataQuery, Schema};
use schemalens::schema::{DatabaseView, DeclaredView, View};
use schemalens::source::InMemorySource;

fn source() -> InMemorySource {
    InMemorySource::new()
        .table("CUSTOMER")
        .view("ActiveCustomers")
        .view("RECENT_ORDERS")
}

#[test]
fn test_view_names_in_source_order() {
    let provider = DatabaseMetaDataProvider::new(source());
    assert_eq!(provider.view_names().unwrap(), ["ActiveCustomers", "RECENT_ORDERS"]);
    assert_eq!(provider.table_names().unwrap(), ["CUSTOMER"]);
}

#[test]
fn test_view_lookup_ignores_case() {
    let provider = DatabaseMetaDataProvider::new(source());

    assert!(provider.view_exists("ACTIVECUSTOMERS").unwrap());
    assert!(provider.view_exists("recent_orders").unwrap());
    assert!(!provider.view_exists("CUSTOMER").unwrap());

    let view = provider.get_view("activecustomers").unwrap();
    assert_eq!(view.name(), "ActiveCustomers");
}

#[test]
fn test_missing_view() {
    let provider = DatabaseMetaDataProvider::new(source());
    let err = provider.get_view("NOPE").unwrap_err();
    assert!(matches!(err, MetadataError::ViewNotFound(ref name) if name == "NOPE"));
    assert!(err.is_not_found());
}

#[test]
fn test_views_loaded_once() {
    let source = Arc::new(source());
    let provider = DatabaseMetaDataProvider::with_source(source.clone());

    provider.views().unwrap();
    provider.view_exists("RECENT_ORDERS").unwrap();
    provider.get_view("ActiveCustomers").unwrap();

    // One query for views, none for tables.
    assert_eq!(source.count_of(MetadataQuery::Tables), 1);
    assert_eq!(source.query_count(), 1);
}

#[test]
fn test_view_query_failure() {
    let provider =
        DatabaseMetaDataProvider::new(source().fail(MetadataQuery::Tables, "no access"));
    let err = provider.view_names().unwrap_err();
    assert_eq!(err.to_string(), "error reading view metadata: no access");
}

#[test]
fn test_duplicate_views() {
    let provider =
        DatabaseMetaDataProvider::new(InMemorySource::new().view("V").view("v"));
    let err = provider.views().unwrap_err();
    assert!(matches!(err, MetadataError::DuplicateName { kind: "view", .. }));
}

#[test]
fn test_database_views_have_no_definition() {
    let provider = DatabaseMetaDataProvider::new(source());
    let view: View = provider.get_view("RECENT_ORDERS").unwrap().into();

    assert!(!view.knows_select_statement());
    assert!(!view.knows_dependencies());
    assert_eq!(view.select_statement(), None);
    assert_eq!(view.dependencies(), None);
}

#[test]
fn test_declared_views_carry_definition() {
    let declared = DeclaredView::new(
        "BIG_SPENDERS",
        "SELECT * FROM ActiveCustomers WHERE BALANCE > 1000",
        vec!["ActiveCustomers".to_string()],
    );
    let view = View::from(declared.clone());

    assert!(view.knows_select_statement());
    assert!(view.knows_dependencies());
    assert_eq!(view.select_statement(), Some(declared.select_statement()));
    assert_eq!(view.dependencies().unwrap(), ["ActiveCustomers"]);
    assert_ne!(view, View::from(DatabaseView::new("BIG_SPENDERS")));
}
