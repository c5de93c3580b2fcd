//! MetadataSource trait definition.
//!
//! A metadata source is the database connection's structural query surface.
//! It answers four questions with positional rows (see [`super::row::layout`])
//! and knows nothing about filtering, typing or caching: that is the
//! provider's job.

use std::fmt;

use super::error::SourceResult;
use super::row::MetadataRow;

/// Rows produced by a metadata query.
///
/// An `Err` item is a failure of the underlying cursor; nothing after it is
/// read.
pub type Rows<'a> = Box<dyn Iterator<Item = SourceResult<MetadataRow>> + 'a>;

/// The metadata queries a source answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataQuery {
    Tables,
    Columns,
    PrimaryKeys,
    IndexInfo,
}

impl fmt::Display for MetadataQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MetadataQuery::Tables => "tables",
            MetadataQuery::Columns => "columns",
            MetadataQuery::PrimaryKeys => "primary_keys",
            MetadataQuery::IndexInfo => "index_info",
        })
    }
}

/// Trait for querying structural metadata from a database connection.
///
/// Each call is synchronous and blocks on the connection. `schema` scopes the
/// query to one schema; `None` means the connection's default.
pub trait MetadataSource: Send + Sync {
    /// Enumerate tables of the given kinds (e.g. `"TABLE"`, `"VIEW"`).
    ///
    /// Row layout: [`super::row::layout::tables`].
    fn tables(&self, schema: Option<&str>, kinds: &[&str]) -> SourceResult<Rows<'_>>;

    /// Enumerate the columns of every table in one batch.
    ///
    /// Row layout: [`super::row::layout::columns`].
    fn columns(&self, schema: Option<&str>) -> SourceResult<Rows<'_>>;

    /// Enumerate the primary key columns of one table.
    ///
    /// Row layout: [`super::row::layout::primary_keys`].
    fn primary_keys(&self, schema: Option<&str>, table: &str) -> SourceResult<Rows<'_>>;

    /// Enumerate the indexed columns of one table, ordered by index and then
    /// by ordinal position.
    ///
    /// With `unique_only` set only unique indexes are reported. With
    /// `approximate` set the source may answer from cached statistics.
    ///
    /// Row layout: [`super::row::layout::indexes`].
    fn index_info(
        &self,
        schema: Option<&str>,
        table: &str,
        unique_only: bool,
        approximate: bool,
    ) -> SourceResult<Rows<'_>>;
}

/// Box a finished row vector as [`Rows`].
pub fn rows_from_vec<'a>(rows: Vec<MetadataRow>) -> Rows<'a> {
    Box::new(rows.into_iter().map(Ok))
}
