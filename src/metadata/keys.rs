//! Primary key resolution.

use tracing::debug;

use super::context::MetadataContext;
use super::error::{MetadataError, MetadataResult};
use super::row::layout;

/// Load the primary key column names of a table, ordered by key sequence.
///
/// Rows sharing a sequence number keep their source order.
pub fn load_primary_keys(context: &MetadataContext, table_name: &str) -> MetadataResult<Vec<String>> {
    let operation = || format!("primary keys for table [{}]", table_name);
    let read_context = || format!("primary key of table [{}]", table_name);

    let rows = context
        .source()
        .primary_keys(context.schema_name(), table_name)
        .map_err(|e| MetadataError::query(operation(), e))?;

    let mut keys: Vec<(i32, String)> = Vec::new();
    for row in rows {
        let row = row.map_err(|e| MetadataError::query(operation(), e))?;
        let column_name = row
            .required_string(layout::primary_keys::COLUMN_NAME)
            .map_err(|e| MetadataError::read(read_context(), e))?;
        let sequence = row
            .int(layout::primary_keys::KEY_SEQ)
            .map_err(|e| MetadataError::read(read_context(), e))?;
        keys.push((sequence, column_name));
    }

    keys.sort_by_key(|(sequence, _)| *sequence);
    let keys: Vec<String> = keys.into_iter().map(|(_, name)| name).collect();

    debug!("Found primary key {:?} on table [{}]", keys, table_name);
    Ok(keys)
}
