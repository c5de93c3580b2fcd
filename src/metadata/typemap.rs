//! Vendor type code to portable type mapping.
//!
//! Drivers report column types as numeric codes from the shared SQL type
//! numbering (the X/Open CLI codes also used by ODBC and JDBC). The codes are
//! listed in [`sql_types`]; [`data_type_from_sql_type`] groups them into
//! portable [`DataType`]s.

use super::error::{MetadataError, MetadataResult};
use crate::schema::DataType;

/// Standard SQL type codes.
pub mod sql_types {
    pub const BIT: i32 = -7;
    pub const TINYINT: i32 = -6;
    pub const SMALLINT: i32 = 5;
    pub const INTEGER: i32 = 4;
    pub const BIGINT: i32 = -5;
    pub const FLOAT: i32 = 6;
    pub const REAL: i32 = 7;
    pub const DOUBLE: i32 = 8;
    pub const NUMERIC: i32 = 2;
    pub const DECIMAL: i32 = 3;
    pub const CHAR: i32 = 1;
    pub const VARCHAR: i32 = 12;
    pub const LONGVARCHAR: i32 = -1;
    pub const NCHAR: i32 = -15;
    pub const NVARCHAR: i32 = -9;
    pub const LONGNVARCHAR: i32 = -16;
    pub const DATE: i32 = 91;
    pub const TIME: i32 = 92;
    pub const TIMESTAMP: i32 = 93;
    pub const BINARY: i32 = -2;
    pub const VARBINARY: i32 = -3;
    pub const LONGVARBINARY: i32 = -4;
    pub const NULL: i32 = 0;
    pub const OTHER: i32 = 1111;
    pub const BLOB: i32 = 2004;
    pub const CLOB: i32 = 2005;
    pub const BOOLEAN: i32 = 16;
    pub const NCLOB: i32 = 2011;
}

/// Map a vendor type code to a portable data type.
///
/// `type_name` and `width` only feed the error message; every code outside
/// the known families is rejected rather than defaulted.
pub fn data_type_from_sql_type(
    type_code: i32,
    type_name: &str,
    width: i32,
) -> MetadataResult<DataType> {
    use sql_types::*;

    match type_code {
        TINYINT | SMALLINT | INTEGER => Ok(DataType::Integer),
        BIGINT => Ok(DataType::BigInteger),
        FLOAT | REAL | DOUBLE | NUMERIC | DECIMAL => Ok(DataType::Decimal),
        CHAR | NCHAR | VARCHAR | NVARCHAR | LONGVARCHAR | LONGNVARCHAR => Ok(DataType::String),
        BOOLEAN | BIT => Ok(DataType::Boolean),
        DATE => Ok(DataType::Date),
        BLOB | BINARY | VARBINARY | LONGVARBINARY => Ok(DataType::Blob),
        CLOB | NCLOB => Ok(DataType::Clob),
        _ => Err(MetadataError::UnknownDataType {
            type_name: type_name.to_string(),
            type_code,
            width,
        }),
    }
}
