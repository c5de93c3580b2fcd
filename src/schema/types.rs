//! Portable data types.
//!
//! Every column read from a database is classified into one of these types,
//! whatever the vendor calls it. The set is deliberately small: it describes
//! what a column holds, not how a particular product stores it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Vendor-neutral column data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    /// Integers up to 32 bits (TINYINT, SMALLINT, INTEGER).
    Integer,

    /// 64-bit integer (BIGINT).
    BigInteger,

    /// Fixed or floating point numbers.
    Decimal,

    /// Character data, sized or unsized.
    String,

    /// Boolean or single bit.
    Boolean,

    /// Date without time.
    Date,

    /// Binary large object and the binary family.
    Blob,

    /// Character large object.
    Clob,
}

impl DataType {
    /// All portable types, in declaration order.
    pub const ALL: [DataType; 8] = [
        DataType::Integer,
        DataType::BigInteger,
        DataType::Decimal,
        DataType::String,
        DataType::Boolean,
        DataType::Date,
        DataType::Blob,
        DataType::Clob,
    ];

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::BigInteger => "BIG_INTEGER",
            DataType::Decimal => "DECIMAL",
            DataType::String => "STRING",
            DataType::Boolean => "BOOLEAN",
            DataType::Date => "DATE",
            DataType::Blob => "BLOB",
            DataType::Clob => "CLOB",
        }
    }

    /// Returns true if this is a numeric type.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Integer | DataType::BigInteger | DataType::Decimal
        )
    }

    /// Returns true if width and scale are meaningful for this type.
    pub fn has_width(&self) -> bool {
        matches!(self, DataType::Decimal | DataType::String)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
