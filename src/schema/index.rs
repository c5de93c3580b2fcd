//! Index definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A secondary index on a table.
///
/// Column names are in ordinal order within the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub unique: bool,
    pub column_names: Vec<String>,
}

impl Index {
    pub fn new(name: impl Into<String>, unique: bool, column_names: Vec<String>) -> Self {
        Self {
            name: name.into(),
            unique,
            column_names,
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.unique {
            f.write_str(" UNIQUE")?;
        }
        write!(f, " ({})", self.column_names.join(", "))
    }
}
