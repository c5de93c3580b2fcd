//! Schema trait definition.
//!
//! The Schema trait is the read surface over a database's structure: table
//! and view existence, lookup and enumeration. The primary implementation is
//! [`super::DatabaseMetaDataProvider`], which answers from live metadata.

use super::error::MetadataResult;

/// Trait for looking up tables and views by name.
///
/// Name lookups are case-insensitive. Enumerations return names with the
/// database's casing, in the order the database reported them.
///
/// # Example
///
/// ```
/// use schemalens::metadata::{DatabaseMetaDataProvider, Schema};
/// use schemalens::source::{ColumnRow, InMemorySource};
///
/// let source = InMemorySource::new()
///     .table("CUSTOMER")
///     .column(ColumnRow::integer("CUSTOMER", "ID").not_null());
/// let provider = DatabaseMetaDataProvider::new(source);
///
/// assert!(provider.table_exists("customer").unwrap());
/// let table = provider.get_table("Customer").unwrap();
/// assert_eq!(table.name(), "CUSTOMER");
/// assert_eq!(table.columns().unwrap().len(), 1);
/// ```
pub trait Schema {
    /// Handle returned for a table.
    type Table;

    /// Handle returned for a view.
    type View;

    // =========================================================================
    // Tables
    // =========================================================================

    /// Whether the schema holds no tables.
    fn is_empty_database(&self) -> MetadataResult<bool>;

    fn table_exists(&self, name: &str) -> MetadataResult<bool>;

    /// Look up a table; a name not in the schema is `TableNotFound`.
    fn get_table(&self, name: &str) -> MetadataResult<Self::Table>;

    fn table_names(&self) -> MetadataResult<Vec<String>>;

    /// Every table, in name order as reported.
    ///
    /// Default implementation looks up each name in turn.
    fn tables(&self) -> MetadataResult<Vec<Self::Table>> {
        self.table_names()?
            .iter()
            .map(|name| self.get_table(name))
            .collect()
    }

    // =========================================================================
    // Views
    // =========================================================================

    fn view_exists(&self, name: &str) -> MetadataResult<bool>;

    /// Look up a view; a name not in the schema is `ViewNotFound`.
    fn get_view(&self, name: &str) -> MetadataResult<Self::View>;

    fn view_names(&self) -> MetadataResult<Vec<String>>;

    /// Every view, in name order as reported.
    fn views(&self) -> MetadataResult<Vec<Self::View>> {
        self.view_names()?
            .iter()
            .map(|name| self.get_view(name))
            .collect()
    }
}
