//! Positional metadata rows.
//!
//! Every metadata query answers with rows whose columns sit at fixed
//! positions, listed in [`layout`]. Values are read through typed getters that
//! coerce the way a driver result set does, so sources are free to report a
//! flag as an integer, a boolean or text.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column positions for each metadata query.
pub mod layout {
    /// Rows returned by table enumeration.
    pub mod tables {
        pub const TABLE_SCHEM: usize = 0;
        pub const TABLE_NAME: usize = 1;
        pub const TABLE_TYPE: usize = 2;
        pub const REMARKS: usize = 3;
        pub const WIDTH: usize = 4;
    }

    /// Rows returned by column enumeration.
    pub mod columns {
        pub const TABLE_NAME: usize = 0;
        pub const COLUMN_NAME: usize = 1;
        pub const DATA_TYPE: usize = 2;
        pub const TYPE_NAME: usize = 3;
        pub const COLUMN_SIZE: usize = 4;
        pub const DECIMAL_DIGITS: usize = 5;
        pub const IS_NULLABLE: usize = 6;
        pub const IS_AUTOINCREMENT: usize = 7;
        pub const COLUMN_DEF: usize = 8;
        pub const REMARKS: usize = 9;
        pub const WIDTH: usize = 10;
    }

    /// Rows returned by primary key enumeration.
    pub mod primary_keys {
        pub const TABLE_NAME: usize = 0;
        pub const COLUMN_NAME: usize = 1;
        pub const KEY_SEQ: usize = 2;
        pub const PK_NAME: usize = 3;
        pub const WIDTH: usize = 4;
    }

    /// Rows returned by index enumeration, one per indexed column.
    pub mod indexes {
        pub const TABLE_NAME: usize = 0;
        pub const NON_UNIQUE: usize = 1;
        pub const INDEX_NAME: usize = 2;
        pub const ORDINAL_POSITION: usize = 3;
        pub const COLUMN_NAME: usize = 4;
        pub const WIDTH: usize = 5;
    }
}

/// A single cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Boolean(bool),
    Text(String),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
            Value::Text(_) => "text",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Errors reading a value out of a row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("no value at position {position} (row has {width} values)")]
    MissingValue { position: usize, width: usize },

    #[error("value at position {position} is null")]
    Null { position: usize },

    #[error("cannot read {found} value '{value}' at position {position} as {expected}")]
    Incompatible {
        position: usize,
        expected: &'static str,
        found: &'static str,
        value: String,
    },
}

/// One row of a metadata result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRow {
    values: Vec<Value>,
}

impl MetadataRow {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw access to a cell.
    pub fn value(&self, position: usize) -> Result<&Value, RowError> {
        self.values.get(position).ok_or(RowError::MissingValue {
            position,
            width: self.values.len(),
        })
    }

    /// Read a value as text. Null reads as `None`.
    pub fn string(&self, position: usize) -> Result<Option<String>, RowError> {
        match self.value(position)? {
            Value::Null => Ok(None),
            other => Ok(Some(other.to_string())),
        }
    }

    /// Read a value as text, failing on null.
    pub fn required_string(&self, position: usize) -> Result<String, RowError> {
        self.string(position)?.ok_or(RowError::Null { position })
    }

    /// Read a value as a 32-bit integer. Null reads as zero.
    pub fn int(&self, position: usize) -> Result<i32, RowError> {
        let value = self.value(position)?;
        let incompatible = || RowError::Incompatible {
            position,
            expected: "integer",
            found: value.kind(),
            value: value.to_string(),
        };

        match value {
            Value::Null => Ok(0),
            Value::Integer(n) => i32::try_from(*n).map_err(|_| incompatible()),
            Value::Boolean(b) => Ok(i32::from(*b)),
            Value::Text(s) => s.trim().parse().map_err(|_| incompatible()),
        }
    }

    /// Read a value as a boolean. Null reads as false.
    pub fn boolean(&self, position: usize) -> Result<bool, RowError> {
        let value = self.value(position)?;
        match value {
            Value::Null => Ok(false),
            Value::Integer(n) => Ok(*n != 0),
            Value::Boolean(b) => Ok(*b),
            Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "y" | "yes" => Ok(true),
                "false" | "0" | "n" | "no" | "" => Ok(false),
                _ => Err(RowError::Incompatible {
                    position,
                    expected: "boolean",
                    found: value.kind(),
                    value: s.clone(),
                }),
            },
        }
    }
}

impl<V: Into<Value>> FromIterator<V> for MetadataRow {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}
