//! Integration tests for SQL type code mapping.

use schemalens::metadata::{data_type_from_sql_type, sql_types, MetadataError};
use schemalens::schema::DataType;

#[test]
fn test_every_supported_code_maps() {
    let cases = [
        (sql_types::TINYINT, DataType::Integer),
        (sql_types::SMALLINT, DataType::Integer),
        (sql_types::INTEGER, DataType::Integer),
        (sql_types::BIGINT, DataType::BigInteger),
        (sql_types::FLOAT, DataType::Decimal),
        (sql_types::REAL, DataType::Decimal),
        (sql_types::DOUBLE, DataType::Decimal),
        (sql_types::NUMERIC, DataType::Decimal),
        (sql_types::DECIMAL, DataType::Decimal),
        (sql_types::CHAR, DataType::String),
        (sql_types::NCHAR, DataType::String),
        (sql_types::VARCHAR, DataType::String),
        (sql_types::NVARCHAR, DataType::String),
        (sql_types::LONGVARCHAR, DataType::String),
        (sql_types::LONGNVARCHAR, DataType::String),
        (sql_types::BOOLEAN, DataType::Boolean),
        (sql_types::BIT, DataType::Boolean),
        (sql_types::DATE, DataType::Date),
        (sql_types::BLOB, DataType::Blob),
        (sql_types::BINARY, DataType::Blob),
        (sql_types::VARBINARY, DataType::Blob),
        (sql_types::LONGVARBINARY, DataType::Blob),
        (sql_types::CLOB, DataType::Clob),
        (sql_types::NCLOB, DataType::Clob),
    ];

    for (code, expected) in cases {
        assert_eq!(
            data_type_from_sql_type(code, "ANY", 0).unwrap(),
            expected,
            "type code {code}"
        );
    }
}

#[test]
fn test_mapping_ignores_name_and_width() {
    let narrow = data_type_from_sql_type(sql_types::VARCHAR, "VARCHAR2", 1).unwrap();
    let wide = data_type_from_sql_type(sql_types::VARCHAR, "TEXT", 65535).unwrap();
    assert_eq!(narrow, wide);
}

#[test]
fn test_unsupported_codes_fail() {
    for code in [
        sql_types::TIME,
        sql_types::TIMESTAMP,
        sql_types::NULL,
        sql_types::OTHER,
        9999,
    ] {
        let err = data_type_from_sql_type(code, "X", 1).unwrap_err();
        assert!(matches!(err, MetadataError::UnknownDataType { type_code, .. } if type_code == code));
    }
}

#[test]
fn test_unknown_type_message_names_type_code_and_width() {
    let err = data_type_from_sql_type(sql_types::TIMESTAMP, "DATETIME2", 27).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unknown SQL data type [DATETIME2] (type 93 width 27)"
    );
}

#[test]
fn test_failure_is_deterministic() {
    let first = data_type_from_sql_type(sql_types::OTHER, "GEOMETRY", 0).unwrap_err();
    let second = data_type_from_sql_type(sql_types::OTHER, "GEOMETRY", 0).unwrap_err();
    assert_eq!(first.to_string(), second.to_string());
}
