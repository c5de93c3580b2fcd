//! Database-backed implementation of the Schema trait.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::{debug, info};

use super::catalog::{load_all_columns, load_table_names, load_views, ColumnCatalog, NameCatalog};
use super::context::MetadataContext;
use super::error::{MetadataError, MetadataResult};
use super::keys::load_primary_keys;
use super::policy::{DefaultPolicy, MetadataPolicy};
use super::provider::Schema;
use super::source::MetadataSource;
use super::table::DatabaseTable;
use crate::schema::{name_key, DatabaseView, SchemaSnapshot};

/// Schema backed by live database metadata.
///
/// Nothing is read at construction. Table names, columns and views are each
/// loaded by one query on first use and kept for the life of the provider.
/// Tables are built on first lookup and cached by case-insensitive name, so
/// repeated lookups return the same [`DatabaseTable`].
///
/// Safe to share across threads. Concurrent first callers of a catalog are
/// serialized, so its query runs once. Two threads building the same table at
/// once may both query it; the first table inserted is the one every caller
/// gets. A failed load caches nothing and the next call retries.
pub struct DatabaseMetaDataProvider {
    context: MetadataContext,
    table_names: OnceCell<NameCatalog<String>>,
    columns: OnceCell<ColumnCatalog>,
    views: OnceCell<NameCatalog<DatabaseView>>,
    tables: DashMap<String, Arc<DatabaseTable>>,
}

impl DatabaseMetaDataProvider {
    /// Create a provider over the connection's default schema with the
    /// default policy.
    pub fn new(source: impl MetadataSource + 'static) -> Self {
        Self::from_context(MetadataContext::new(
            Arc::new(source),
            Arc::new(DefaultPolicy),
            None,
        ))
    }

    /// Create a provider over a shared source.
    pub fn with_source(source: Arc<dyn MetadataSource>) -> Self {
        Self::from_context(MetadataContext::new(source, Arc::new(DefaultPolicy), None))
    }

    fn from_context(context: MetadataContext) -> Self {
        Self {
            context,
            table_names: OnceCell::new(),
            columns: OnceCell::new(),
            views: OnceCell::new(),
            tables: DashMap::new(),
        }
    }

    /// Replace the policy. Anything already loaded is discarded.
    pub fn with_policy(self, policy: impl MetadataPolicy + 'static) -> Self {
        self.with_shared_policy(Arc::new(policy))
    }

    pub fn with_shared_policy(self, policy: Arc<dyn MetadataPolicy>) -> Self {
        let MetadataContext {
            source,
            schema_name,
            ..
        } = self.context;
        Self::from_context(MetadataContext {
            source,
            policy,
            schema_name,
        })
    }

    /// Scope every query to a schema. Anything already loaded is discarded.
    pub fn with_schema(self, schema_name: impl Into<String>) -> Self {
        let schema_name: String = schema_name.into();
        let MetadataContext { source, policy, .. } = self.context;
        Self::from_context(MetadataContext::new(source, policy, Some(&schema_name)))
    }

    /// The schema queries are scoped to, if any.
    pub fn schema_name(&self) -> Option<&str> {
        self.context.schema_name()
    }

    fn table_name_catalog(&self) -> MetadataResult<&NameCatalog<String>> {
        self.table_names
            .get_or_try_init(|| load_table_names(&self.context))
    }

    fn column_catalog(&self) -> MetadataResult<&ColumnCatalog> {
        self.columns.get_or_try_init(|| {
            let table_names = self.table_name_catalog()?;
            load_all_columns(&self.context, table_names)
        })
    }

    fn view_catalog(&self) -> MetadataResult<&NameCatalog<DatabaseView>> {
        self.views.get_or_try_init(|| load_views(&self.context))
    }

    fn load_table(&self, name: &str) -> MetadataResult<DatabaseTable> {
        let table_name = self
            .table_name_catalog()?
            .get(name)
            .cloned()
            .ok_or_else(|| MetadataError::TableNotFound(name.to_string()))?;

        let primary_key = load_primary_keys(&self.context, &table_name)?;
        let raw_columns = self
            .column_catalog()?
            .columns(&table_name)
            .unwrap_or_else(|| Arc::from(Vec::new()));

        debug!("Loaded table [{}]", table_name);
        Ok(DatabaseTable::new(
            table_name,
            primary_key,
            raw_columns,
            self.context.clone(),
        ))
    }

    /// Read every table and view into a detached snapshot.
    pub fn snapshot(&self) -> MetadataResult<SchemaSnapshot> {
        let tables = self
            .tables()?
            .iter()
            .map(|table| table.snapshot())
            .collect::<MetadataResult<Vec<_>>>()?;
        let views = self.view_names()?;

        info!(
            "Captured schema snapshot: {} tables, {} views",
            tables.len(),
            views.len()
        );
        Ok(SchemaSnapshot { tables, views })
    }
}

impl Schema for DatabaseMetaDataProvider {
    type Table = Arc<DatabaseTable>;
    type View = DatabaseView;

    fn is_empty_database(&self) -> MetadataResult<bool> {
        Ok(self.table_name_catalog()?.is_empty())
    }

    fn table_exists(&self, name: &str) -> MetadataResult<bool> {
        Ok(self.table_name_catalog()?.contains(name))
    }

    fn get_table(&self, name: &str) -> MetadataResult<Arc<DatabaseTable>> {
        let key = name_key(name);
        if let Some(table) = self.tables.get(&key) {
            return Ok(Arc::clone(table.value()));
        }

        let table = Arc::new(self.load_table(name)?);
        let entry = self.tables.entry(key).or_insert(table);
        Ok(Arc::clone(entry.value()))
    }

    fn table_names(&self) -> MetadataResult<Vec<String>> {
        Ok(self.table_name_catalog()?.values().to_vec())
    }

    fn view_exists(&self, name: &str) -> MetadataResult<bool> {
        Ok(self.view_catalog()?.contains(name))
    }

    fn get_view(&self, name: &str) -> MetadataResult<DatabaseView> {
        self.view_catalog()?
            .get(name)
            .cloned()
            .ok_or_else(|| MetadataError::ViewNotFound(name.to_string()))
    }

    fn view_names(&self) -> MetadataResult<Vec<String>> {
        Ok(self
            .view_catalog()?
            .values()
            .iter()
            .map(|view| view.name().to_string())
            .collect())
    }

    fn views(&self) -> MetadataResult<Vec<DatabaseView>> {
        Ok(self.view_catalog()?.values().to_vec())
    }
}
