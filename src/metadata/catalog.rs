//! Schema-wide catalogs: table names, columns and views.
//!
//! Each catalog is built by one metadata query and then held for the life of
//! the provider. A build either completes or fails as a whole.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use super::context::MetadataContext;
use super::error::{MetadataError, MetadataResult};
use super::row::{layout, MetadataRow, RowError};
use crate::schema::{name_key, Column, DatabaseView};

/// Entries indexed by upper-case name, kept in discovery order.
#[derive(Debug, Clone)]
pub struct NameCatalog<T> {
    kind: &'static str,
    entries: Vec<T>,
    keys: HashMap<String, usize>,
}

impl<T> NameCatalog<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            keys: HashMap::new(),
        }
    }

    /// Add an entry. Names differing only by case collide.
    pub fn insert(&mut self, name: &str, value: T) -> MetadataResult<()> {
        let key = name_key(name);
        if self.keys.contains_key(&key) {
            return Err(MetadataError::DuplicateName {
                kind: self.kind,
                name: name.to_string(),
            });
        }
        self.keys.insert(key, self.entries.len());
        self.entries.push(value);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains_key(&name_key(name))
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.keys
            .get(&name_key(name))
            .map(|&position| &self.entries[position])
    }

    /// Entries in discovery order.
    pub fn values(&self) -> &[T] {
        &self.entries
    }
}

/// Columns of every cataloged table, keyed by upper-case table name.
#[derive(Debug, Clone, Default)]
pub struct ColumnCatalog {
    tables: HashMap<String, Arc<[Column]>>,
}

impl ColumnCatalog {
    /// Columns of a table in source order, without primary key flags.
    pub fn columns(&self, table_name: &str) -> Option<Arc<[Column]>> {
        self.tables.get(&name_key(table_name)).cloned()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

/// Build the catalog of table names, applying the policy's name filters.
pub fn load_table_names(context: &MetadataContext) -> MetadataResult<NameCatalog<String>> {
    let policy = context.policy();
    let rows = context
        .source()
        .tables(context.schema_name(), policy.table_kinds())
        .map_err(|e| MetadataError::query("table", e))?;

    let mut catalog = NameCatalog::new("table");
    for row in rows {
        let row = row.map_err(|e| MetadataError::query("table", e))?;
        let table_name = policy
            .read_table_name(&row)
            .map_err(|e| MetadataError::query("table", e))?;

        let (table_schema, table_type) = read_table_details(&row)
            .map_err(|e| MetadataError::read(format!("table [{}]", table_name), e))?;

        let system_table = policy.is_system_table(&table_name);
        let ignored_table = policy.is_ignored_table(&table_name);

        debug!(
            "Found table [{}] of type [{}] in schema [{}]{}{}",
            table_name,
            table_type.as_deref().unwrap_or(""),
            table_schema.as_deref().unwrap_or(""),
            if system_table { " - SYSTEM TABLE" } else { "" },
            if ignored_table { " - IGNORED" } else { "" },
        );

        if !system_table && !ignored_table {
            catalog.insert(&table_name, table_name.clone())?;
        }
    }

    info!("Loaded {} table names", catalog.len());
    Ok(catalog)
}

fn read_table_details(row: &MetadataRow) -> Result<(Option<String>, Option<String>), RowError> {
    let schema = row.string(layout::tables::TABLE_SCHEM)?;
    let table_type = row.string(layout::tables::TABLE_TYPE)?;
    Ok((schema, table_type))
}

/// Load the columns of every cataloged table with a single batched query.
///
/// Rows for tables outside the catalog are skipped: those tables were
/// filtered out on purpose.
pub fn load_all_columns(
    context: &MetadataContext,
    table_names: &NameCatalog<String>,
) -> MetadataResult<ColumnCatalog> {
    let policy = context.policy();
    let mut pending: HashMap<String, Vec<Column>> = table_names
        .values()
        .iter()
        .map(|name| (name_key(name), Vec::new()))
        .collect();

    let rows = context
        .source()
        .columns(context.schema_name())
        .map_err(|e| MetadataError::query("column", e))?;

    for row in rows {
        let row = row.map_err(|e| MetadataError::query("column", e))?;
        let table_name = row
            .required_string(layout::columns::TABLE_NAME)
            .map_err(|e| MetadataError::query("column", e))?;

        let Some(columns) = pending.get_mut(&name_key(&table_name)) else {
            continue;
        };

        let column_name = policy
            .read_column_name(&row)
            .map_err(|e| MetadataError::query("column", e))?;
        let column = read_column(context, &table_name, &column_name, &row)?;

        if columns.iter().any(|c| c.is_named(&column_name)) {
            return Err(MetadataError::DuplicateName {
                kind: "column",
                name: format!("{}.{}", table_name, column_name),
            });
        }

        debug!("Found column [{}] on table [{}]", column, table_name);
        columns.push(column);
    }

    let tables: HashMap<String, Arc<[Column]>> = pending
        .into_iter()
        .map(|(table, columns)| (table, Arc::from(columns)))
        .collect();

    info!("Loaded columns for {} tables", tables.len());
    Ok(ColumnCatalog { tables })
}

/// Convert one column row, running it through the policy hooks in order:
/// nullability, auto-numbering, default value, vendor extras.
fn read_column(
    context: &MetadataContext,
    table_name: &str,
    column_name: &str,
    row: &MetadataRow,
) -> MetadataResult<Column> {
    let policy = context.policy();
    let context = || format!("column [{}] on table [{}]", column_name, table_name);
    let read_error = |e: RowError| MetadataError::read(context(), e);

    let type_name = row
        .string(layout::columns::TYPE_NAME)
        .map_err(read_error)?
        .unwrap_or_default();
    let type_code = row.int(layout::columns::DATA_TYPE).map_err(read_error)?;
    let width = row.int(layout::columns::COLUMN_SIZE).map_err(read_error)?;
    let scale = row.int(layout::columns::DECIMAL_DIGITS).map_err(read_error)?;
    let data_type = policy.data_type(type_code, &type_name, width)?;

    let column = Column::new(column_name, data_type, width, scale);
    let column = policy
        .set_column_nullability(table_name, column, row)
        .map_err(read_error)?;
    let column = policy
        .set_column_autonumbered(table_name, column, row)
        .map_err(read_error)?;
    let column = policy.set_column_default_value(table_name, column, row);
    policy
        .set_additional_column_metadata(table_name, column, row)
        .map_err(read_error)
}

/// Build the catalog of views.
pub fn load_views(context: &MetadataContext) -> MetadataResult<NameCatalog<DatabaseView>> {
    let policy = context.policy();
    let rows = context
        .source()
        .tables(context.schema_name(), policy.view_kinds())
        .map_err(|e| MetadataError::query("view", e))?;

    let mut catalog = NameCatalog::new("view");
    for row in rows {
        let row = row.map_err(|e| MetadataError::query("view", e))?;
        let view_name = policy
            .read_view_name(&row)
            .map_err(|e| MetadataError::query("view", e))?;

        debug!("Found view [{}]", view_name);
        catalog.insert(&view_name, DatabaseView::new(view_name.clone()))?;
    }

    info!("Loaded {} views", catalog.len());
    Ok(catalog)
}
