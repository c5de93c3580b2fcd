//! schemalens CLI - Inspect database structure
//!
//! Usage:
//!   schemalens tables [DB] [--schema <name>]
//!   schemalens views [DB]
//!   schemalens describe <TABLE> [DB]
//!   schemalens dump [DB] [--format text|json]
//!
//! Examples:
//!   schemalens tables ./data/app.db
//!   schemalens describe customer ./data/app.db
//!   schemalens --connection local dump --format json

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use schemalens::config::{ConnectionConfig, ConnectionError, Settings, SettingsError};
use schemalens::metadata::{DatabaseMetaDataProvider, MetadataError, Schema};
use schemalens::render::{render_json, render_schema, render_table};
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "schemalens")]
#[command(about = "schemalens - Inspect database structure as a vendor-neutral schema")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $SCHEMALENS_CONFIG, ./schemalens.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Named connection from the config file
    #[arg(short, long, global = true)]
    connection: Option<String>,

    /// Log level written to stderr
    #[arg(long, global = true, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

/// Database selection shared by every command.
#[derive(Args)]
struct Target {
    /// Path to a SQLite database (overrides --connection)
    db: Option<PathBuf>,

    /// Attached database to inspect
    #[arg(long)]
    schema: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List table names
    Tables {
        #[command(flatten)]
        target: Target,
    },

    /// List view names
    Views {
        #[command(flatten)]
        target: Target,
    },

    /// Show one table's columns, primary key and indexes
    Describe {
        /// Table name (case-insensitive)
        table: String,

        #[command(flatten)]
        target: Target,
    },

    /// Show every table and view
    Dump {
        #[command(flatten)]
        target: Target,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: DumpFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum DumpFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("Failed to serialize schema: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.log_level.clone().into());

    let result = match &cli.command {
        Commands::Tables { target } => cmd_tables(&cli, target),
        Commands::Views { target } => cmd_views(&cli, target),
        Commands::Describe { table, target } => cmd_describe(&cli, target, table),
        Commands::Dump { target, format } => cmd_dump(&cli, target, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings, SettingsError> {
    match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
}

/// Pick the database: an explicit path, then the named connection, then the
/// config's default connection, then the environment.
fn resolve_connection(
    cli: &Cli,
    settings: &Settings,
    target: &Target,
) -> Result<ConnectionConfig, CliError> {
    let mut config = if let Some(path) = &target.db {
        ConnectionConfig::sqlite(path)
    } else if let Some(name) = &cli.connection {
        settings.get_connection(name)?.to_connection_config()?
    } else if let Some((name, connection)) = settings.default_connection() {
        debug!("Using connection [{}]", name);
        connection.to_connection_config()?
    } else {
        ConnectionConfig::from_env()?
    };

    if let Some(schema) = &target.schema {
        config.schema = Some(schema.clone());
    }
    Ok(config)
}

fn open_provider(cli: &Cli, target: &Target) -> Result<DatabaseMetaDataProvider, CliError> {
    let settings = load_settings(cli)?;
    let policy = settings.metadata.to_policy()?;
    let config = resolve_connection(cli, &settings, target)?;
    Ok(config.open_provider(Arc::new(policy))?)
}

fn cmd_tables(cli: &Cli, target: &Target) -> Result<(), CliError> {
    let provider = open_provider(cli, target)?;
    for name in provider.table_names()? {
        println!("{}", name);
    }
    Ok(())
}

fn cmd_views(cli: &Cli, target: &Target) -> Result<(), CliError> {
    let provider = open_provider(cli, target)?;
    for name in provider.view_names()? {
        println!("{}", name);
    }
    Ok(())
}

fn cmd_describe(cli: &Cli, target: &Target, table: &str) -> Result<(), CliError> {
    let provider = open_provider(cli, target)?;
    let table = provider.get_table(table)?;
    print!("{}", render_table(&table.snapshot()?));
    Ok(())
}

fn cmd_dump(cli: &Cli, target: &Target, format: &DumpFormat) -> Result<(), CliError> {
    let provider = open_provider(cli, target)?;
    let snapshot = provider.snapshot()?;
    match format {
        DumpFormat::Text => print!("{}", render_schema(&snapshot)),
        DumpFormat::Json => println!("{}", render_json(&snapshot)?),
    }
    Ok(())
}
