//! Vendor-specific variation points.
//!
//! The provider consults a [`MetadataPolicy`] wherever databases disagree:
//! which tables and indexes belong to the canonical model, how to read names
//! out of rows, how type codes map, and how each column is finished off.
//! Every hook has a default; vendors override only what differs.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::MetadataResult;
use super::row::{layout, MetadataRow, RowError};
use super::typemap::data_type_from_sql_type;
use crate::schema::{name_key, names_match, Column, DataType, UNKNOWN_AUTONUMBER_START};

/// Index name sources use for the index backing a primary key.
pub const PRIMARY_KEY_INDEX_NAME: &str = "PRIMARY";

/// Indexes created for performance testing carry a `_PRF<n>` suffix.
static PERFORMANCE_INDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)_PRF\d+$").expect("performance index pattern is valid"));

/// Check whether an index name marks a performance-testing index.
pub fn is_performance_index(index_name: &str) -> bool {
    PERFORMANCE_INDEX.is_match(index_name)
}

/// The conventional default value for a column: `"0"` for a column named
/// `version`, empty otherwise.
pub fn conventional_default_value(column_name: &str) -> &'static str {
    if names_match(column_name, "version") {
        "0"
    } else {
        ""
    }
}

/// Hooks for vendor-specific metadata handling.
///
/// # Example
///
/// ```
/// use schemalens::metadata::MetadataPolicy;
///
/// /// Skips the scratch tables a batch job leaves behind.
/// struct BatchPolicy;
///
/// impl MetadataPolicy for BatchPolicy {
///     fn is_ignored_table(&self, table_name: &str) -> bool {
///         table_name.to_uppercase().starts_with("TMP_")
///     }
/// }
///
/// assert!(BatchPolicy.is_ignored_table("tmp_load"));
/// assert!(!BatchPolicy.is_system_table("tmp_load"));
/// ```
pub trait MetadataPolicy: Send + Sync {
    // =========================================================================
    // Name filters
    // =========================================================================

    /// Whether the table is owned by the database system rather than the
    /// application.
    fn is_system_table(&self, _table_name: &str) -> bool {
        false
    }

    /// Whether the table should be left out of the model (typically
    /// temporary tables).
    fn is_ignored_table(&self, _table_name: &str) -> bool {
        false
    }

    /// Whether the index backs the table's primary key.
    fn is_primary_key_index(&self, index_name: &str) -> bool {
        index_name == PRIMARY_KEY_INDEX_NAME
    }

    /// Whether the index should be left out of the model.
    fn is_ignored_index(&self, index_name: &str) -> bool {
        is_performance_index(index_name)
    }

    /// Object kinds enumerated as tables.
    fn table_kinds(&self) -> &[&str] {
        &["TABLE"]
    }

    /// Object kinds enumerated as views.
    fn view_kinds(&self) -> &[&str] {
        &["VIEW"]
    }

    // =========================================================================
    // Row readers
    // =========================================================================

    fn read_table_name(&self, row: &MetadataRow) -> Result<String, RowError> {
        row.required_string(layout::tables::TABLE_NAME)
    }

    fn read_view_name(&self, row: &MetadataRow) -> Result<String, RowError> {
        row.required_string(layout::tables::TABLE_NAME)
    }

    fn read_column_name(&self, row: &MetadataRow) -> Result<String, RowError> {
        row.required_string(layout::columns::COLUMN_NAME)
    }

    /// `None` marks a statistics row rather than an index.
    fn read_index_name(&self, row: &MetadataRow) -> Result<Option<String>, RowError> {
        row.string(layout::indexes::INDEX_NAME)
    }

    // =========================================================================
    // Column construction
    // =========================================================================

    /// Map a vendor type code to a portable type.
    fn data_type(&self, type_code: i32, type_name: &str, width: i32) -> MetadataResult<DataType> {
        data_type_from_sql_type(type_code, type_name, width)
    }

    fn set_column_nullability(
        &self,
        _table_name: &str,
        column: Column,
        row: &MetadataRow,
    ) -> Result<Column, RowError> {
        let nullable = row.string(layout::columns::IS_NULLABLE)?.as_deref() == Some("YES");
        Ok(if nullable { column.nullable() } else { column })
    }

    fn set_column_autonumbered(
        &self,
        _table_name: &str,
        column: Column,
        row: &MetadataRow,
    ) -> Result<Column, RowError> {
        let autonumbered =
            row.string(layout::columns::IS_AUTOINCREMENT)?.as_deref() == Some("YES");
        Ok(if autonumbered {
            column.autonumbered(UNKNOWN_AUTONUMBER_START)
        } else {
            column
        })
    }

    /// Database-level defaults are not carried into the model; only the
    /// conventional defaults are applied.
    fn set_column_default_value(
        &self,
        _table_name: &str,
        column: Column,
        _row: &MetadataRow,
    ) -> Column {
        let value = conventional_default_value(&column.name);
        column.default_value(value)
    }

    /// Vendor extension point, applied last.
    fn set_additional_column_metadata(
        &self,
        _table_name: &str,
        column: Column,
        _row: &MetadataRow,
    ) -> Result<Column, RowError> {
        Ok(column)
    }
}

/// Policy with every hook at its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl MetadataPolicy for DefaultPolicy {}

/// Configurable policy.
///
/// Table filters are regular expressions; column defaults map a column name
/// (case-insensitive) to the default value it gets.
#[derive(Debug, Clone)]
pub struct StandardPolicy {
    system_tables: Option<Regex>,
    ignored_tables: Option<Regex>,
    ignored_indexes: Option<Regex>,
    primary_key_index_name: String,
    column_defaults: HashMap<String, String>,
}

impl Default for StandardPolicy {
    fn default() -> Self {
        Self {
            system_tables: None,
            ignored_tables: None,
            ignored_indexes: Some((*PERFORMANCE_INDEX).clone()),
            primary_key_index_name: PRIMARY_KEY_INDEX_NAME.to_string(),
            column_defaults: HashMap::from([("VERSION".to_string(), "0".to_string())]),
        }
    }
}

impl StandardPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_tables(mut self, pattern: Regex) -> Self {
        self.system_tables = Some(pattern);
        self
    }

    pub fn with_ignored_tables(mut self, pattern: Regex) -> Self {
        self.ignored_tables = Some(pattern);
        self
    }

    /// Replace the ignored-index pattern; `None` keeps every index.
    pub fn with_ignored_indexes(mut self, pattern: Option<Regex>) -> Self {
        self.ignored_indexes = pattern;
        self
    }

    pub fn with_primary_key_index_name(mut self, name: impl Into<String>) -> Self {
        self.primary_key_index_name = name.into();
        self
    }

    pub fn with_column_default(mut self, column: &str, value: impl Into<String>) -> Self {
        self.column_defaults
            .insert(name_key(column), value.into());
        self
    }

    pub fn without_column_defaults(mut self) -> Self {
        self.column_defaults.clear();
        self
    }

    /// The default value configured for a column name.
    pub fn column_default(&self, column: &str) -> &str {
        self.column_defaults
            .get(&name_key(column))
            .map_or("", String::as_str)
    }
}

impl MetadataPolicy for StandardPolicy {
    fn is_system_table(&self, table_name: &str) -> bool {
        self.system_tables
            .as_ref()
            .is_some_and(|p| p.is_match(table_name))
    }

    fn is_ignored_table(&self, table_name: &str) -> bool {
        self.ignored_tables
            .as_ref()
            .is_some_and(|p| p.is_match(table_name))
    }

    fn is_primary_key_index(&self, index_name: &str) -> bool {
        index_name == self.primary_key_index_name
    }

    fn is_ignored_index(&self, index_name: &str) -> bool {
        self.ignored_indexes
            .as_ref()
            .is_some_and(|p| p.is_match(index_name))
    }

    fn set_column_default_value(
        &self,
        _table_name: &str,
        column: Column,
        _row: &MetadataRow,
    ) -> Column {
        let value = self.column_default(&column.name).to_string();
        column.default_value(value)
    }
}
