//! Metadata provider module.
//!
//! This module turns the raw metadata a database reports into the canonical
//! model in [`crate::schema`]: portable column types, primary key flags and
//! ordering, grouped indexes, with system, ignored and performance-testing
//! objects filtered out.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  DatabaseMetaDataProvider (Schema)              │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │  Compute-once catalogs     │  Per-table cache (DashMap)   │  │
//! │  │  - table names             │  - DatabaseTable             │  │
//! │  │  - columns (one batch)     │    - primary key (eager)     │  │
//! │  │  - views                   │    - columns (on access)     │  │
//! │  │                            │    - indexes (on access)     │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │                  MetadataPolicy (vendor hooks)                  │
//! └─────────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MetadataSource                             │
//! │           (positional rows: tables, columns, keys, indexes)     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use schemalens::metadata::{DatabaseMetaDataProvider, Schema, StandardPolicy};
//! use schemalens::source::{ColumnRow, InMemorySource};
//!
//! let source = InMemorySource::new()
//!     .table("ORDERS")
//!     .column(ColumnRow::integer("ORDERS", "ID").not_null())
//!     .column(ColumnRow::integer("ORDERS", "VERSION"))
//!     .primary_key("ORDERS", "ID", 1)
//!     .index("ORDERS", "ORDERS_PRF1", false, &["VERSION"]);
//!
//! let provider = DatabaseMetaDataProvider::new(source).with_policy(StandardPolicy::new());
//! let orders = provider.get_table("orders").unwrap();
//!
//! let columns = orders.columns().unwrap();
//! assert!(columns[0].primary_key);
//! assert_eq!(columns[1].default_value, "0");
//! assert!(orders.indexes().unwrap().is_empty());
//! ```

mod catalog;
mod context;
mod database_provider;
mod error;
mod indexes;
mod keys;
mod policy;
mod provider;
pub mod row;
mod source;
mod table;
pub mod typemap;

pub use catalog::{load_all_columns, load_table_names, load_views, ColumnCatalog, NameCatalog};
pub use context::MetadataContext;
pub use database_provider::DatabaseMetaDataProvider;
pub use error::{MetadataError, MetadataResult, SourceError, SourceResult};
pub use indexes::{group_index_rows, load_indexes};
pub use keys::load_primary_keys;
pub use policy::{
    conventional_default_value, is_performance_index, DefaultPolicy, MetadataPolicy,
    StandardPolicy, PRIMARY_KEY_INDEX_NAME,
};
pub use provider::Schema;
pub use row::{MetadataRow, RowError, Value};
pub use source::{rows_from_vec, MetadataQuery, MetadataSource, Rows};
pub use table::{apply_primary_key_order, DatabaseTable};
pub use typemap::{data_type_from_sql_type, sql_types};
