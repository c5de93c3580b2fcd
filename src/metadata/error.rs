//! Metadata-specific error types.

use std::error::Error as StdError;

use thiserror::Error;

/// Error raised by a metadata source (driver, cursor, connection).
pub type SourceError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type for metadata source calls.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors that can occur while reading and canonicalizing metadata.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// A metadata query, or the cursor over its results, failed.
    #[error("error reading {operation} metadata: {source}")]
    Query {
        /// What was being queried (e.g. "table", "primary keys for table [X]").
        operation: String,
        #[source]
        source: SourceError,
    },

    /// A single row could not be read.
    #[error("error reading metadata for {context}: {source}")]
    Read {
        /// The object being processed (e.g. "column [ID] on table [CUSTOMER]").
        context: String,
        #[source]
        source: SourceError,
    },

    /// The vendor type code has no portable equivalent.
    #[error("Unknown SQL data type [{type_name}] (type {type_code} width {width})")]
    UnknownDataType {
        type_name: String,
        type_code: i32,
        width: i32,
    },

    #[error("table [{0}] not found")]
    TableNotFound(String),

    #[error("view [{0}] not found")]
    ViewNotFound(String),

    /// A primary key column reported by the database is not among the
    /// table's columns.
    #[error("could not find primary key column [{column}] in columns {columns:?} of table [{table}]")]
    MissingPrimaryKeyColumn {
        table: String,
        column: String,
        columns: Vec<String>,
    },

    /// Two objects in one catalog share a case-insensitive name.
    #[error("duplicate {kind} [{name}]")]
    DuplicateName { kind: &'static str, name: String },
}

impl MetadataError {
    /// Create a query error.
    pub fn query(operation: impl Into<String>, source: impl Into<SourceError>) -> Self {
        Self::Query {
            operation: operation.into(),
            source: source.into(),
        }
    }

    /// Create a row read error.
    pub fn read(context: impl Into<String>, source: impl Into<SourceError>) -> Self {
        Self::Read {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Check if this error reports a missing table or view.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound(_) | Self::ViewNotFound(_))
    }

    /// Check if this error indicates inconsistent metadata rather than an I/O
    /// problem.
    pub fn is_inconsistency(&self) -> bool {
        matches!(
            self,
            Self::MissingPrimaryKeyColumn { .. } | Self::DuplicateName { .. }
        )
    }
}
