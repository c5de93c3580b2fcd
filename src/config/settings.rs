//! TOML-based configuration for schemalens.
//!
//! Supports a config file (schemalens.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [connections.local]
//! driver = "sqlite"
//! path = "${HOME}/data/app.db"
//! schema = "main"
//!
//! [metadata]
//! ignored_index_pattern = "_PRF\\d+$"
//! ignored_table_pattern = "^TMP_"
//! system_table_pattern = "^SYS_"
//! primary_key_index_name = "PRIMARY"
//!
//! [metadata.column_defaults]
//! version = "0"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};

use super::connection::{ConnectionConfig, Driver};
use crate::metadata::{StandardPolicy, PRIMARY_KEY_INDEX_NAME};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SCHEMALENS_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("Unsupported driver: {0}")]
    UnsupportedDriver(String),

    #[error("Invalid {setting} pattern: {source}")]
    InvalidPattern {
        setting: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Named database connections.
    pub connections: HashMap<String, ConnectionSettings>,

    /// Metadata interpretation.
    pub metadata: MetadataSettings,
}

/// Connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionSettings {
    /// Database driver (sqlite).
    pub driver: String,

    /// Database file path (supports ${ENV_VAR} expansion).
    pub path: String,

    /// Schema to inspect for this connection.
    #[serde(default)]
    pub schema: Option<String>,
}

impl ConnectionSettings {
    /// Get the driver type.
    pub fn driver_type(&self) -> Result<Driver, SettingsError> {
        Driver::from_str(&self.driver)
            .map_err(|_| SettingsError::UnsupportedDriver(self.driver.clone()))
    }

    /// Get the path with environment variables expanded.
    pub fn resolved_path(&self) -> Result<PathBuf, SettingsError> {
        expand_env_vars(&self.path).map(PathBuf::from)
    }

    /// Resolve into a connection config.
    pub fn to_connection_config(&self) -> Result<ConnectionConfig, SettingsError> {
        Ok(ConnectionConfig {
            driver: self.driver_type()?,
            path: self.resolved_path()?,
            schema: self.schema.clone(),
        })
    }
}

/// How raw metadata is filtered and finished.
///
/// Patterns are case-insensitive regular expressions. An empty pattern
/// disables its filter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetadataSettings {
    /// Indexes to leave out of the model.
    pub ignored_index_pattern: String,

    /// Tables to leave out of the model.
    pub ignored_table_pattern: String,

    /// Tables owned by the database system.
    pub system_table_pattern: String,

    /// Name under which the primary key's backing index is reported.
    pub primary_key_index_name: String,

    /// Default values by column name.
    pub column_defaults: BTreeMap<String, String>,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            ignored_index_pattern: r"_PRF\d+$".to_string(),
            ignored_table_pattern: String::new(),
            system_table_pattern: String::new(),
            primary_key_index_name: PRIMARY_KEY_INDEX_NAME.to_string(),
            column_defaults: BTreeMap::from([("version".to_string(), "0".to_string())]),
        }
    }
}

fn compile_pattern(setting: &'static str, pattern: &str) -> Result<Option<Regex>, SettingsError> {
    if pattern.is_empty() {
        return Ok(None);
    }
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|source| SettingsError::InvalidPattern { setting, source })
}

impl MetadataSettings {
    /// Build the policy these settings describe.
    pub fn to_policy(&self) -> Result<StandardPolicy, SettingsError> {
        let mut policy = StandardPolicy::new()
            .with_ignored_indexes(compile_pattern(
                "ignored_index_pattern",
                &self.ignored_index_pattern,
            )?)
            .with_primary_key_index_name(self.primary_key_index_name.clone())
            .without_column_defaults();

        if let Some(pattern) = compile_pattern("ignored_table_pattern", &self.ignored_table_pattern)? {
            policy = policy.with_ignored_tables(pattern);
        }
        if let Some(pattern) = compile_pattern("system_table_pattern", &self.system_table_pattern)? {
            policy = policy.with_system_tables(pattern);
        }
        for (column, value) in &self.column_defaults {
            policy = policy.with_column_default(column, value.clone());
        }

        Ok(policy)
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SCHEMALENS_CONFIG`
    /// 2. `./schemalens.toml`
    /// 3. `<config dir>/schemalens/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("schemalens.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("schemalens").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Get a connection by name.
    pub fn get_connection(&self, name: &str) -> Result<&ConnectionSettings, SettingsError> {
        self.connections
            .get(name)
            .ok_or_else(|| SettingsError::ConnectionNotFound(name.to_string()))
    }

    /// Get the default connection ("default" if it exists, otherwise the
    /// first by name).
    pub fn default_connection(&self) -> Option<(&str, &ConnectionSettings)> {
        if let Some(conn) = self.connections.get("default") {
            return Some(("default", conn));
        }
        self.connections
            .iter()
            .min_by_key(|(name, _)| name.as_str())
            .map(|(k, v)| (k.as_str(), v))
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A `$` not followed by a name is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            let name: String = std::iter::from_fn(|| chars.next_if(|&ch| ch != '}')).collect();
            chars.next_if_eq(&'}');
            name
        } else {
            std::iter::from_fn(|| chars.next_if(|&ch| ch.is_alphanumeric() || ch == '_')).collect()
        };

        if var_name.is_empty() {
            result.push('$');
            continue;
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
