//! Integration tests for TOML settings.

use std::env;
use std::fs;
use std::path::PathBuf;

use schemalens::config::{Driver, Settings, SettingsError};
use schemalens::metadata::MetadataPolicy;

const FULL_CONFIG: &str = r#"
[connections.default]
driver = "sqlite"
path = "${SCHEMALENS_SETTINGS_TEST_DIR}/app.db"

[connections.archive]
driver = "sqlite3"
path = "/data/archive.db"
schema = "history"

[metadata]
ignored_index_pattern = "^STATS_"
ignored_table_pattern = "^tmp_"
system_table_pattern = "^SYS_"
primary_key_index_name = "PK"

[metadata.column_defaults]
version = "1"
status = "NEW"
"#;

fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schemalens.toml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = Settings::from_file(&missing).unwrap_err();
    assert!(matches!(err, SettingsError::FileNotFound(path) if path == missing));
}

#[test]
fn test_parse_error() {
    let (_dir, path) = write_config("[connections.default\ndriver = ");
    assert!(matches!(
        Settings::from_file(&path),
        Err(SettingsError::ParseError(_))
    ));
}

#[test]
fn test_full_config() {
    let (_dir, path) = write_config(FULL_CONFIG);
    let settings = Settings::from_file(&path).unwrap();

    assert_eq!(settings.connections.len(), 2);
    let (name, default) = settings.default_connection().unwrap();
    assert_eq!(name, "default");
    assert_eq!(default.driver_type().unwrap(), Driver::Sqlite);

    env::set_var("SCHEMALENS_SETTINGS_TEST_DIR", "/srv/db");
    let config = default.to_connection_config().unwrap();
    env::remove_var("SCHEMALENS_SETTINGS_TEST_DIR");
    assert_eq!(config.path, PathBuf::from("/srv/db/app.db"));
    assert_eq!(config.schema, None);

    let archive = settings
        .get_connection("archive")
        .unwrap()
        .to_connection_config()
        .unwrap();
    assert_eq!(archive.driver, Driver::Sqlite);
    assert_eq!(archive.schema.as_deref(), Some("history"));
}

#[test]
fn test_metadata_policy_from_config() {
    let (_dir, path) = write_config(FULL_CONFIG);
    let policy = Settings::from_file(&path)
        .unwrap()
        .metadata
        .to_policy()
        .unwrap();

    assert!(policy.is_ignored_index("stats_orders"));
    assert!(!policy.is_ignored_index("ORDERS_PRF1"));
    assert!(policy.is_ignored_table("TMP_LOAD"));
    assert!(policy.is_system_table("sys_audit"));
    assert!(policy.is_primary_key_index("PK"));
    assert!(!policy.is_primary_key_index("PRIMARY"));
    assert_eq!(policy.column_default("VERSION"), "1");
    assert_eq!(policy.column_default("Status"), "NEW");
    assert_eq!(policy.column_default("NAME"), "");
}

#[test]
fn test_metadata_section_is_optional() {
    let (_dir, path) = write_config(
        r#"
[connections.local]
driver = "sqlite"
path = "/tmp/local.db"
"#,
    );
    let settings = Settings::from_file(&path).unwrap();
    let policy = settings.metadata.to_policy().unwrap();

    assert!(policy.is_ignored_index("ORDERS_PRF1"));
    assert_eq!(policy.column_default("version"), "0");

    // Only one connection, so it is the default.
    let (name, _) = settings.default_connection().unwrap();
    assert_eq!(name, "local");
}

#[test]
fn test_default_connection_is_first_by_name() {
    let (_dir, path) = write_config(
        r#"
[connections.zeta]
driver = "sqlite"
path = "/tmp/z.db"

[connections.alpha]
driver = "sqlite"
path = "/tmp/a.db"
"#,
    );
    let settings = Settings::from_file(&path).unwrap();
    assert_eq!(settings.default_connection().unwrap().0, "alpha");
    assert!(Settings::default().default_connection().is_none());
}

#[test]
fn test_unknown_connection() {
    let (_dir, path) = write_config(FULL_CONFIG);
    let settings = Settings::from_file(&path).unwrap();
    let err = settings.get_connection("reporting").unwrap_err();
    assert_eq!(err.to_string(), "Connection not found: reporting");
}

#[test]
fn test_unsupported_driver() {
    let (_dir, path) = write_config(
        r#"
[connections.warehouse]
driver = "postgres"
path = "/tmp/w.db"
"#,
    );
    let settings = Settings::from_file(&path).unwrap();
    let err = settings
        .get_connection("warehouse")
        .unwrap()
        .to_connection_config()
        .unwrap_err();
    assert!(matches!(err, SettingsError::UnsupportedDriver(name) if name == "postgres"));
}

#[test]
fn test_missing_path_variable() {
    let (_dir, path) = write_config(
        r#"
[connections.default]
driver = "sqlite"
path = "${SCHEMALENS_SETTINGS_UNSET_VAR}/app.db"
"#,
    );
    let settings = Settings::from_file(&path).unwrap();
    let err = settings
        .get_connection("default")
        .unwrap()
        .resolved_path()
        .unwrap_err();
    assert!(matches!(err, SettingsError::MissingEnvVar(name) if name == "SCHEMALENS_SETTINGS_UNSET_VAR"));
}

#[test]
fn test_invalid_pattern_in_file() {
    let (_dir, path) = write_config(
        r#"
[metadata]
ignored_table_pattern = "["
"#,
    );
    let err = Settings::from_file(&path)
        .unwrap()
        .metadata
        .to_policy()
        .unwrap_err();
    assert!(err.to_string().starts_with("Invalid ignored_table_pattern pattern"));
}
