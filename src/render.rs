//! Text and JSON rendering of schema snapshots.
//!
//! Text output lists one table per block:
//!
//! ```text
//! TABLE CUSTOMER
//!   ID INTEGER PK NOT NULL
//!   NAME STRING(50,0)
//!   PRIMARY KEY (ID)
//!   INDEX IDX_NAME (NAME)
//! ```

use std::fmt;

use crate::schema::{SchemaSnapshot, TableSnapshot};

/// Displays a table as a text block.
pub struct TableText<'a>(pub &'a TableSnapshot);

impl fmt::Display for TableText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.0;
        writeln!(f, "TABLE {}", table.name)?;
        for column in &table.columns {
            writeln!(f, "  {}", column)?;
        }
        if !table.primary_key.is_empty() {
            writeln!(f, "  PRIMARY KEY ({})", table.primary_key.join(", "))?;
        }
        for index in &table.indexes {
            writeln!(f, "  INDEX {}", index)?;
        }
        Ok(())
    }
}

/// Displays every table, then every view.
pub struct SchemaText<'a>(pub &'a SchemaSnapshot);

impl fmt::Display for SchemaText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schema = self.0;
        for (position, table) in schema.tables.iter().enumerate() {
            if position > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", TableText(table))?;
        }
        if !schema.views.is_empty() {
            if !schema.tables.is_empty() {
                writeln!(f)?;
            }
            for view in &schema.views {
                writeln!(f, "VIEW {}", view)?;
            }
        }
        Ok(())
    }
}

pub fn render_table(table: &TableSnapshot) -> String {
    TableText(table).to_string()
}

pub fn render_schema(schema: &SchemaSnapshot) -> String {
    SchemaText(schema).to_string()
}

/// Pretty-printed JSON.
pub fn render_json(schema: &SchemaSnapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(schema)
}
