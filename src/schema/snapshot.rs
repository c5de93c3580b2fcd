//! Plain-data copies of a schema.
//!
//! A snapshot owns everything it describes and holds no connection, so it can
//! be serialized, compared or kept after the provider that produced it is gone.

use serde::{Deserialize, Serialize};

use super::{names_match, Column, Index};

/// Everything known about one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub name: String,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
    /// Primary key column names in key sequence order.
    pub primary_key: Vec<String>,
}

impl TableSnapshot {
    /// Find a column by case-insensitive name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_named(name))
    }
}

/// All tables and views of a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    pub tables: Vec<TableSnapshot>,
    pub views: Vec<String>,
}

impl SchemaSnapshot {
    /// Find a table by case-insensitive name.
    pub fn table(&self, name: &str) -> Option<&TableSnapshot> {
        self.tables
            .iter()
            .find(|t| names_match(&t.name, name))
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
