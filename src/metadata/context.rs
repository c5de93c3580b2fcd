//! What every loader needs to talk to the database.

use std::fmt;
use std::sync::Arc;

use super::policy::MetadataPolicy;
use super::source::MetadataSource;

/// A metadata source, the policy that interprets it and the schema queries
/// are scoped to.
///
/// Cheap to clone: tables keep a copy so they can load their indexes later.
#[derive(Clone)]
pub struct MetadataContext {
    pub(crate) source: Arc<dyn MetadataSource>,
    pub(crate) policy: Arc<dyn MetadataPolicy>,
    pub(crate) schema_name: Option<Arc<str>>,
}

impl MetadataContext {
    pub fn new(
        source: Arc<dyn MetadataSource>,
        policy: Arc<dyn MetadataPolicy>,
        schema_name: Option<&str>,
    ) -> Self {
        Self {
            source,
            policy,
            schema_name: schema_name.map(Arc::from),
        }
    }

    pub fn source(&self) -> &dyn MetadataSource {
        self.source.as_ref()
    }

    pub fn policy(&self) -> &dyn MetadataPolicy {
        self.policy.as_ref()
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }
}

impl fmt::Debug for MetadataContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataContext")
            .field("schema_name", &self.schema_name)
            .finish_non_exhaustive()
    }
}
