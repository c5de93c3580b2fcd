//! Tables assembled from database metadata.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use super::context::MetadataContext;
use super::error::{MetadataError, MetadataResult};
use super::indexes::load_indexes;
use crate::schema::{Column, Index, TableSnapshot};

/// A table as reported by the database.
///
/// The name and primary key are fixed at construction. Final columns are
/// derived on first access; indexes are queried on first access. Both are
/// then kept for the life of the table.
pub struct DatabaseTable {
    name: String,
    primary_key: Vec<String>,
    raw_columns: Arc<[Column]>,
    context: MetadataContext,
    columns: OnceCell<Vec<Column>>,
    indexes: OnceCell<Vec<Index>>,
}

impl DatabaseTable {
    pub(crate) fn new(
        name: String,
        primary_key: Vec<String>,
        raw_columns: Arc<[Column]>,
        context: MetadataContext,
    ) -> Self {
        Self {
            name,
            primary_key,
            raw_columns,
            context,
            columns: OnceCell::new(),
            indexes: OnceCell::new(),
        }
    }

    /// The table name with the database's casing.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Primary key column names, in key sequence order.
    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    /// Columns with primary key flags set, key columns in key order.
    pub fn columns(&self) -> MetadataResult<&[Column]> {
        self.columns
            .get_or_try_init(|| {
                let columns = mark_primary_key(&self.raw_columns, &self.primary_key);
                apply_primary_key_order(&self.name, &self.primary_key, columns)
            })
            .map(Vec::as_slice)
    }

    /// Look up a column by case-insensitive name.
    pub fn column(&self, name: &str) -> MetadataResult<Option<&Column>> {
        Ok(self.columns()?.iter().find(|c| c.is_named(name)))
    }

    /// Secondary indexes of the table.
    pub fn indexes(&self) -> MetadataResult<&[Index]> {
        self.indexes
            .get_or_try_init(|| {
                debug!("Loading indexes for table [{}]", self.name);
                load_indexes(&self.context, &self.name)
            })
            .map(Vec::as_slice)
    }

    /// Database tables are never temporary.
    pub fn is_temporary(&self) -> bool {
        false
    }

    /// Detach a plain-data copy of the table.
    pub fn snapshot(&self) -> MetadataResult<TableSnapshot> {
        Ok(TableSnapshot {
            name: self.name.clone(),
            columns: self.columns()?.to_vec(),
            indexes: self.indexes()?.to_vec(),
            primary_key: self.primary_key.clone(),
        })
    }
}

impl fmt::Debug for DatabaseTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseTable")
            .field("name", &self.name)
            .field("primary_key", &self.primary_key)
            .field("columns", &self.columns.get())
            .field("indexes", &self.indexes.get())
            .finish()
    }
}

fn mark_primary_key(columns: &[Column], primary_key: &[String]) -> Vec<Column> {
    columns
        .iter()
        .map(|column| {
            if primary_key.iter().any(|key| column.is_named(key)) {
                column.clone().primary_key()
            } else {
                column.clone()
            }
        })
        .collect()
}

/// Reorder primary key columns into key sequence order.
///
/// Non-key columns keep their positions. Key columns occupy the same slots as
/// before, filled in key order: walking the columns, each key slot takes the
/// next name from `primary_key`. Every key name must match a column.
pub fn apply_primary_key_order(
    table_name: &str,
    primary_key: &[String],
    columns: Vec<Column>,
) -> MetadataResult<Vec<Column>> {
    if let Some(missing) = primary_key
        .iter()
        .find(|key| !columns.iter().any(|c| c.is_named(key)))
    {
        return Err(MetadataError::MissingPrimaryKeyColumn {
            table: table_name.to_string(),
            column: missing.clone(),
            columns: columns.iter().map(|c| c.name.clone()).collect(),
        });
    }

    let mut keys = primary_key.iter();
    let mut ordered = Vec::with_capacity(columns.len());
    for column in &columns {
        if !column.primary_key {
            ordered.push(column.clone());
            continue;
        }
        match keys.next() {
            Some(key) => {
                // Presence checked above.
                if let Some(key_column) = columns.iter().find(|c| c.is_named(key)) {
                    ordered.push(key_column.clone());
                }
            }
            None => ordered.push(column.clone()),
        }
    }

    Ok(ordered)
}
