//! In-memory metadata source.
//!
//! Answers metadata queries from fixture rows. Used by tests and by callers
//! replaying metadata captured elsewhere.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::metadata::row::layout;
use crate::metadata::typemap::sql_types;
use crate::schema::names_match;
use crate::metadata::{
    rows_from_vec, MetadataQuery, MetadataRow, MetadataSource, Rows, SourceError, SourceResult,
    Value,
};

/// A column row built field by field.
///
/// Columns are nullable and not auto-incremented unless stated.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRow {
    pub table: String,
    pub name: String,
    pub type_code: i32,
    pub type_name: String,
    pub size: i32,
    pub digits: i32,
    pub nullable: bool,
    pub auto_increment: bool,
    pub default: Option<String>,
}

impl ColumnRow {
    pub fn new(
        table: impl Into<String>,
        name: impl Into<String>,
        type_code: i32,
        type_name: impl Into<String>,
        size: i32,
        digits: i32,
    ) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            type_code,
            type_name: type_name.into(),
            size,
            digits,
            nullable: true,
            auto_increment: false,
            default: None,
        }
    }

    pub fn integer(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(table, name, sql_types::INTEGER, "INTEGER", 10, 0)
    }

    pub fn bigint(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(table, name, sql_types::BIGINT, "BIGINT", 19, 0)
    }

    pub fn varchar(table: impl Into<String>, name: impl Into<String>, width: i32) -> Self {
        Self::new(table, name, sql_types::VARCHAR, "VARCHAR", width, 0)
    }

    pub fn decimal(
        table: impl Into<String>,
        name: impl Into<String>,
        precision: i32,
        scale: i32,
    ) -> Self {
        Self::new(table, name, sql_types::DECIMAL, "DECIMAL", precision, scale)
    }

    pub fn boolean(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(table, name, sql_types::BOOLEAN, "BOOLEAN", 1, 0)
    }

    pub fn date(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(table, name, sql_types::DATE, "DATE", 10, 0)
    }

    pub fn blob(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(table, name, sql_types::BLOB, "BLOB", 0, 0)
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    fn yes_no(flag: bool) -> &'static str {
        if flag {
            "YES"
        } else {
            "NO"
        }
    }

    pub fn into_row(self) -> MetadataRow {
        MetadataRow::new(vec![
            Value::from(self.table),
            Value::from(self.name),
            Value::from(self.type_code),
            Value::from(self.type_name),
            Value::from(self.size),
            Value::from(self.digits),
            Value::from(Self::yes_no(self.nullable)),
            Value::from(Self::yes_no(self.auto_increment)),
            Value::from(self.default),
            Value::Null,
        ])
    }
}

impl From<ColumnRow> for MetadataRow {
    fn from(row: ColumnRow) -> Self {
        row.into_row()
    }
}

/// Injected failure for one query.
#[derive(Debug, Clone)]
enum Failure {
    /// The query itself fails.
    Query(String),
    /// The query answers, then the cursor fails after the last row.
    Cursor(String),
}

/// Metadata source answering from fixture rows.
///
/// Fixture rows are schema-agnostic: the schema argument of every query is
/// ignored. Table and index lookups match the table name case-insensitively.
///
/// # Example
///
/// ```
/// use schemalens::metadata::MetadataSource;
/// use schemalens::source::{ColumnRow, InMemorySource};
///
/// let source = InMemorySource::new()
///     .table("CUSTOMER")
///     .column(ColumnRow::varchar("CUSTOMER", "NAME", 50));
///
/// let tables: Vec<_> = source.tables(None, &["TABLE"]).unwrap().collect();
/// assert_eq!(tables.len(), 1);
/// assert_eq!(source.query_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemorySource {
    tables: Vec<MetadataRow>,
    columns: Vec<MetadataRow>,
    primary_keys: Vec<MetadataRow>,
    indexes: Vec<MetadataRow>,
    failures: HashMap<MetadataQuery, Failure>,
    queries: Mutex<Vec<MetadataQuery>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table of kind `TABLE`.
    pub fn table(self, name: &str) -> Self {
        self.object(name, "TABLE")
    }

    /// Add a view.
    pub fn view(self, name: &str) -> Self {
        self.object(name, "VIEW")
    }

    /// Add an object of any kind, e.g. `SYSTEM TABLE`.
    pub fn object(mut self, name: &str, kind: &str) -> Self {
        self.tables.push(MetadataRow::new(vec![
            Value::Null,
            Value::from(name),
            Value::from(kind),
            Value::Null,
        ]));
        self
    }

    pub fn column(mut self, column: ColumnRow) -> Self {
        self.columns.push(column.into_row());
        self
    }

    /// Add one primary key column with its 1-based key sequence.
    pub fn primary_key(mut self, table: &str, column: &str, sequence: i32) -> Self {
        self.primary_keys.push(MetadataRow::new(vec![
            Value::from(table),
            Value::from(column),
            Value::from(sequence),
            Value::Null,
        ]));
        self
    }

    /// Add an index, one row per column in the given order.
    pub fn index(mut self, table: &str, name: &str, unique: bool, columns: &[&str]) -> Self {
        for (position, column) in columns.iter().enumerate() {
            self.indexes.push(MetadataRow::new(vec![
                Value::from(table),
                Value::from(!unique),
                Value::from(name),
                Value::from(position as i64 + 1),
                Value::from(*column),
            ]));
        }
        self
    }

    /// Append a row exactly as given to the answer of a query.
    pub fn raw_row(mut self, query: MetadataQuery, row: MetadataRow) -> Self {
        match query {
            MetadataQuery::Tables => self.tables.push(row),
            MetadataQuery::Columns => self.columns.push(row),
            MetadataQuery::PrimaryKeys => self.primary_keys.push(row),
            MetadataQuery::IndexInfo => self.indexes.push(row),
        }
        self
    }

    /// Make a query fail outright.
    pub fn fail(mut self, query: MetadataQuery, message: &str) -> Self {
        self.failures
            .insert(query, Failure::Query(message.to_string()));
        self
    }

    /// Make a query's cursor fail after its last row.
    pub fn fail_cursor(mut self, query: MetadataQuery, message: &str) -> Self {
        self.failures
            .insert(query, Failure::Cursor(message.to_string()));
        self
    }

    /// Number of queries answered or failed so far.
    pub fn query_count(&self) -> usize {
        self.log().len()
    }

    /// Number of times one kind of query was issued.
    pub fn count_of(&self, query: MetadataQuery) -> usize {
        self.log().iter().filter(|q| **q == query).count()
    }

    /// Queries issued so far, in order.
    pub fn queries(&self) -> Vec<MetadataQuery> {
        self.log().clone()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<MetadataQuery>> {
        self.queries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn answer(&self, query: MetadataQuery, rows: Vec<MetadataRow>) -> SourceResult<Rows<'_>> {
        self.log().push(query);
        match self.failures.get(&query) {
            None => Ok(rows_from_vec(rows)),
            Some(Failure::Query(message)) => Err(SourceError::from(message.clone())),
            Some(Failure::Cursor(message)) => {
                let error = SourceError::from(message.clone());
                Ok(Box::new(rows.into_iter().map(Ok).chain(std::iter::once(Err(error)))))
            }
        }
    }
}

/// Whether a row belongs to a table. Rows whose table name cannot be read
/// are kept, so malformed fixture rows still reach the caller.
fn for_table(row: &MetadataRow, position: usize, table: &str) -> bool {
    match row.string(position) {
        Ok(Some(name)) => names_match(&name, table),
        _ => true,
    }
}

impl MetadataSource for InMemorySource {
    fn tables(&self, _schema: Option<&str>, kinds: &[&str]) -> SourceResult<Rows<'_>> {
        let rows = self
            .tables
            .iter()
            .filter(|row| match row.string(layout::tables::TABLE_TYPE) {
                Ok(Some(kind)) => kinds.is_empty() || kinds.iter().any(|k| *k == kind),
                _ => true,
            })
            .cloned()
            .collect();
        self.answer(MetadataQuery::Tables, rows)
    }

    fn columns(&self, _schema: Option<&str>) -> SourceResult<Rows<'_>> {
        self.answer(MetadataQuery::Columns, self.columns.clone())
    }

    fn primary_keys(&self, _schema: Option<&str>, table: &str) -> SourceResult<Rows<'_>> {
        let rows = self
            .primary_keys
            .iter()
            .filter(|row| for_table(row, layout::primary_keys::TABLE_NAME, table))
            .cloned()
            .collect();
        self.answer(MetadataQuery::PrimaryKeys, rows)
    }

    fn index_info(
        &self,
        _schema: Option<&str>,
        table: &str,
        unique_only: bool,
        _approximate: bool,
    ) -> SourceResult<Rows<'_>> {
        let rows = self
            .indexes
            .iter()
            .filter(|row| for_table(row, layout::indexes::TABLE_NAME, table))
            .filter(|row| !unique_only || !row.boolean(layout::indexes::NON_UNIQUE).unwrap_or(true))
            .cloned()
            .collect();
        self.answer(MetadataQuery::IndexInfo, rows)
    }
}
