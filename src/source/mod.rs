//! Concrete metadata sources.
//!
//! - [`SqliteMetadataSource`]: live metadata from a SQLite database
//! - [`InMemorySource`]: fixture rows, for tests and replayed metadata

mod memory;
pub mod sqlite;

pub use memory::{ColumnRow, InMemorySource};
pub use sqlite::SqliteMetadataSource;
