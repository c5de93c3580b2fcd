//! # schemalens
//!
//! Database metadata introspection and canonicalization.
//!
//! ## Architecture
//!
//! schemalens reads what a database reports about its own structure and
//! reduces it to one vendor-neutral model:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          MetadataSource (SQLite, in-memory rows)         │
//! │   (tables, columns, primary keys, index info)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [metadata: policy + type mapping]
//! ┌─────────────────────────────────────────────────────────┐
//! │            DatabaseMetaDataProvider (Schema)             │
//! │   cached catalogs, lazily assembled tables               │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [snapshot]
//! ┌─────────────────────────────────────────────────────────┐
//! │      Canonical model (schema: Column, Index, View)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [render]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Text / JSON output                      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use schemalens::prelude::*;
//!
//! let source = SqliteMetadataSource::open_in_memory().unwrap();
//! source
//!     .execute_batch("CREATE TABLE customer (id INTEGER PRIMARY KEY, name VARCHAR(50));")
//!     .unwrap();
//!
//! let provider = DatabaseMetaDataProvider::new(source);
//! let customer = provider.get_table("CUSTOMER").unwrap();
//! assert_eq!(customer.primary_key(), ["id"]);
//! assert_eq!(customer.columns().unwrap()[1].data_type, DataType::String);
//! ```

pub mod config;
pub mod metadata;
pub mod render;
pub mod schema;
pub mod source;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::metadata::{
        DatabaseMetaDataProvider, DatabaseTable, DefaultPolicy, MetadataError, MetadataPolicy,
        MetadataResult, MetadataSource, Schema, StandardPolicy,
    };
    pub use crate::schema::{
        Column, DataType, DatabaseView, DeclaredView, Index, SchemaSnapshot, TableSnapshot, View,
    };
    pub use crate::source::{ColumnRow, InMemorySource, SqliteMetadataSource};
}
