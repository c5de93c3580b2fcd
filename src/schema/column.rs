//! Column definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::name::names_match;
use super::types::DataType;

/// Start value recorded for an auto-numbered column when the vendor does not
/// report one.
pub const UNKNOWN_AUTONUMBER_START: i32 = -1;

/// A column of a table.
///
/// Built with [`Column::new`] and the consuming modifiers, in the same way the
/// metadata provider assembles columns row by row:
///
/// ```
/// use schemalens::schema::{Column, DataType};
///
/// let column = Column::new("NAME", DataType::String, 50, 0).nullable();
/// assert!(column.nullable);
/// assert_eq!(column.default_value, "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub width: i32,
    pub scale: i32,
    pub nullable: bool,
    pub primary_key: bool,
    pub autonumbered: bool,
    /// Meaningful only when `autonumbered` is set.
    pub autonumber_start: i32,
    pub default_value: String,
}

impl Column {
    /// Create a non-null, non-key column with an empty default.
    pub fn new(name: impl Into<String>, data_type: DataType, width: i32, scale: i32) -> Self {
        Self {
            name: name.into(),
            data_type,
            width,
            scale,
            nullable: false,
            primary_key: false,
            autonumbered: false,
            autonumber_start: UNKNOWN_AUTONUMBER_START,
            default_value: String::new(),
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn autonumbered(mut self, start: i32) -> Self {
        self.autonumbered = true;
        self.autonumber_start = start;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if self.data_type.has_width() {
            write!(f, "({},{})", self.width, self.scale)?;
        }
        if self.primary_key {
            f.write_str(" PK")?;
        }
        if !self.nullable {
            f.write_str(" NOT NULL")?;
        }
        if self.autonumbered {
            write!(f, " AUTONUMBER({})", self.autonumber_start)?;
        }
        if !self.default_value.is_empty() {
            write!(f, " DEFAULT '{}'", self.default_value)?;
        }
        Ok(())
    }
}
