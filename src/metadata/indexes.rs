//! Index loading.
//!
//! Index metadata arrives one row per indexed column. Rows are grouped by
//! index name into [`Index`]es, in the order each index is first seen.

use std::collections::HashMap;

use tracing::debug;

use super::context::MetadataContext;
use super::error::{MetadataError, MetadataResult, SourceResult};
use super::policy::MetadataPolicy;
use super::row::{layout, MetadataRow};
use crate::schema::Index;

/// Load the indexes of a table, leaving out the primary key index and any
/// index the policy ignores.
pub fn load_indexes(context: &MetadataContext, table_name: &str) -> MetadataResult<Vec<Index>> {
    let rows = context
        .source()
        .index_info(context.schema_name(), table_name, false, false)
        .map_err(|e| MetadataError::query(format!("indexes for table [{}]", table_name), e))?;

    group_index_rows(context.policy(), table_name, rows)
}

/// Group per-column index rows into indexes.
///
/// Uniqueness is taken from the first row of each index.
pub fn group_index_rows<I>(
    policy: &dyn MetadataPolicy,
    table_name: &str,
    rows: I,
) -> MetadataResult<Vec<Index>>
where
    I: IntoIterator<Item = SourceResult<MetadataRow>>,
{
    let mut indexes: Vec<Index> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let row = row.map_err(|e| {
            MetadataError::query(format!("indexes for table [{}]", table_name), e)
        })?;

        let index_name = policy
            .read_index_name(&row)
            .map_err(|e| MetadataError::read(format!("table [{}]", table_name), e))?;

        // Statistics rows carry no index name.
        let Some(index_name) = index_name else {
            continue;
        };

        if policy.is_primary_key_index(&index_name) {
            continue;
        }
        if policy.is_ignored_index(&index_name) {
            debug!("Ignoring index [{}] on table [{}]", index_name, table_name);
            continue;
        }

        let context = || format!("index [{}] on table [{}]", index_name, table_name);
        let column_name = row
            .required_string(layout::indexes::COLUMN_NAME)
            .map_err(|e| MetadataError::read(context(), e))?;

        match positions.get(&index_name) {
            Some(&position) => indexes[position].column_names.push(column_name),
            None => {
                let non_unique = row
                    .boolean(layout::indexes::NON_UNIQUE)
                    .map_err(|e| MetadataError::read(context(), e))?;
                positions.insert(index_name.clone(), indexes.len());
                indexes.push(Index::new(index_name, !non_unique, vec![column_name]));
            }
        }
    }

    for index in &indexes {
        debug!("Found index {} on table [{}]", index, table_name);
    }

    Ok(indexes)
}
