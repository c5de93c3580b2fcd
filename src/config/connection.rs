//! Database connection configuration.
//!
//! Supports configuration via environment variables:
//! - `SCHEMALENS_DB_DRIVER`: Database driver (sqlite; optional, defaults to sqlite)
//! - `SCHEMALENS_DB_PATH`: Database file path
//! - `SCHEMALENS_DB_SCHEMA`: Attached database to inspect (optional)

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::metadata::{DatabaseMetaDataProvider, MetadataPolicy, MetadataSource};
use crate::source::SqliteMetadataSource;

/// Error type for connection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Unsupported driver: {0}. Supported: sqlite")]
    UnsupportedDriver(String),

    #[error("Failed to open database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
}

/// Supported database drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// SQLite database file
    Sqlite,
}

impl Driver {
    /// Parse driver from string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ConnectionError> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Driver::Sqlite),
            other => Err(ConnectionError::UnsupportedDriver(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Driver::Sqlite => "sqlite",
        }
    }
}

/// Database connection configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Database driver.
    pub driver: Driver,
    /// Database file path.
    pub path: PathBuf,
    /// Schema (attached database) to inspect; the driver default when absent.
    pub schema: Option<String>,
}

impl ConnectionConfig {
    /// Create a connection config for a SQLite file.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            driver: Driver::Sqlite,
            path: path.into(),
            schema: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `SCHEMALENS_DB_PATH`: Database file path
    ///
    /// Optional:
    /// - `SCHEMALENS_DB_DRIVER`: sqlite (the default)
    /// - `SCHEMALENS_DB_SCHEMA`: Attached database name
    pub fn from_env() -> Result<Self, ConnectionError> {
        let driver = match env::var("SCHEMALENS_DB_DRIVER") {
            Ok(name) => Driver::from_str(&name)?,
            Err(_) => Driver::Sqlite,
        };

        let path = env::var("SCHEMALENS_DB_PATH")
            .map_err(|_| ConnectionError::MissingEnvVar("SCHEMALENS_DB_PATH".to_string()))?;

        Ok(Self {
            driver,
            path: PathBuf::from(path),
            schema: env::var("SCHEMALENS_DB_SCHEMA").ok(),
        })
    }

    /// Open a metadata source for this connection.
    pub fn open_source(&self) -> Result<Arc<dyn MetadataSource>, ConnectionError> {
        debug!(
            "Opening {} database {}",
            self.driver.as_str(),
            self.path.display()
        );
        match self.driver {
            Driver::Sqlite => {
                let source =
                    SqliteMetadataSource::open(&self.path).map_err(|source| ConnectionError::Open {
                        path: self.path.clone(),
                        source,
                    })?;
                Ok(Arc::new(source))
            }
        }
    }

    /// Open a provider over this connection, scoped to its schema.
    pub fn open_provider(
        &self,
        policy: Arc<dyn MetadataPolicy>,
    ) -> Result<DatabaseMetaDataProvider, ConnectionError> {
        let provider =
            DatabaseMetaDataProvider::with_source(self.open_source()?).with_shared_policy(policy);
        Ok(match &self.schema {
            Some(schema) => provider.with_schema(schema.clone()),
            None => provider,
        })
    }
}
