//! SQLite metadata source.
//!
//! Reads structure from `sqlite_master` and the `pragma_table_info`,
//! `pragma_index_list` and `pragma_index_info` table-valued functions, and
//! reports it in the shared row layouts.
//!
//! SQLite has no type codes of its own. Declared column types are classified
//! with SQLite's type-name conventions, so `VARCHAR(50)` reports as
//! `VARCHAR` width 50 and `DATETIME` as `TIMESTAMP`.
//!
//! Indexes over expressions are left out of index metadata: the model only
//! holds indexes on named columns.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OpenFlags};
use tracing::debug;

use crate::metadata::typemap::sql_types;
use crate::metadata::{
    rows_from_vec, MetadataRow, MetadataSource, Rows, SourceError, SourceResult, Value,
    PRIMARY_KEY_INDEX_NAME,
};

/// Database queried when no schema is given.
pub const DEFAULT_DATABASE: &str = "main";

/// Kind reported for SQLite's internal tables.
pub const SYSTEM_TABLE_KIND: &str = "SYSTEM TABLE";

/// Metadata source over a SQLite connection.
pub struct SqliteMetadataSource {
    conn: Mutex<Connection>,
}

impl SqliteMetadataSource {
    /// Open an existing database file read-only.
    pub fn open(path: impl AsRef<Path>) -> rusqlite::Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )?;
        Ok(Self::from_connection(conn))
    }

    /// Open an empty in-memory database (for testing).
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Run statements against the underlying connection, e.g. to set up a
    /// fixture schema.
    pub fn execute_batch(&self, sql: &str) -> SourceResult<()> {
        self.connection()?.execute_batch(sql)?;
        Ok(())
    }

    fn connection(&self) -> SourceResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| SourceError::from("sqlite connection lock poisoned"))
    }
}

/// A schema object listed in `sqlite_master`.
struct MasterEntry {
    name: String,
    kind: String,
    sql: Option<String>,
}

/// One row of `pragma_table_info`.
struct TableInfoRow {
    name: String,
    declared_type: String,
    not_null: bool,
    default: Option<String>,
    pk: i32,
}

/// One row of `pragma_index_list`.
struct IndexListRow {
    name: String,
    unique: bool,
    origin: String,
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn database_name(schema: Option<&str>) -> &str {
    schema.unwrap_or(DEFAULT_DATABASE)
}

fn master_entries(conn: &Connection, database: &str) -> rusqlite::Result<Vec<MasterEntry>> {
    let sql = format!(
        "SELECT name, type, sql FROM {}.sqlite_master \
         WHERE type IN ('table', 'view') ORDER BY name",
        quote_identifier(database)
    );
    let mut stmt = conn.prepare(&sql)?;
    let entries = stmt
        .query_map([], |row| {
            Ok(MasterEntry {
                name: row.get(0)?,
                kind: row.get(1)?,
                sql: row.get(2)?,
            })
        })?
        .collect();
    entries
}

fn table_info(conn: &Connection, database: &str, table: &str) -> rusqlite::Result<Vec<TableInfoRow>> {
    let mut stmt = conn.prepare(
        "SELECT name, type, \"notnull\", dflt_value, pk \
         FROM pragma_table_info(?1, ?2) ORDER BY cid",
    )?;
    let rows = stmt
        .query_map(params![table, database], |row| {
            Ok(TableInfoRow {
                name: row.get(0)?,
                declared_type: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                not_null: row.get::<_, i64>(2)? != 0,
                default: row.get(3)?,
                pk: row.get(4)?,
            })
        })?
        .collect();
    rows
}

fn index_list(conn: &Connection, database: &str, table: &str) -> rusqlite::Result<Vec<IndexListRow>> {
    let mut stmt =
        conn.prepare("SELECT name, \"unique\", origin FROM pragma_index_list(?1, ?2)")?;
    let rows = stmt
        .query_map(params![table, database], |row| {
            Ok(IndexListRow {
                name: row.get(0)?,
                unique: row.get::<_, i64>(1)? != 0,
                origin: row.get(2)?,
            })
        })?
        .collect();
    rows
}

/// Indexed columns in key order; expression columns have no name.
fn index_columns(
    conn: &Connection,
    database: &str,
    index: &str,
) -> rusqlite::Result<Vec<(i64, Option<String>)>> {
    let mut stmt =
        conn.prepare("SELECT seqno, name FROM pragma_index_info(?1, ?2) ORDER BY seqno")?;
    let rows = stmt
        .query_map(params![index, database], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect();
    rows
}

fn is_system_object(name: &str) -> bool {
    name.to_ascii_lowercase().starts_with("sqlite_")
}

fn object_kind(entry: &MasterEntry) -> &str {
    if is_system_object(&entry.name) {
        SYSTEM_TABLE_KIND
    } else if entry.kind == "view" {
        "VIEW"
    } else {
        "TABLE"
    }
}

/// A declared column type split into its code, base name, width and scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    pub type_code: i32,
    pub type_name: String,
    pub width: i32,
    pub scale: i32,
}

/// Classify a declared SQLite column type.
///
/// ```
/// use schemalens::metadata::sql_types;
/// use schemalens::source::sqlite::classify_declared_type;
///
/// let declared = classify_declared_type("decimal(10, 2)");
/// assert_eq!(declared.type_code, sql_types::DECIMAL);
/// assert_eq!(declared.type_name, "DECIMAL");
/// assert_eq!((declared.width, declared.scale), (10, 2));
/// ```
pub fn classify_declared_type(declared: &str) -> DeclaredType {
    let upper = declared.trim().to_uppercase();
    let (base, width, scale) = match upper.split_once('(') {
        Some((base, rest)) => {
            let args = rest.trim_end().trim_end_matches(')');
            let mut numbers = args.split(',').map(|n| n.trim().parse::<i32>().unwrap_or(0));
            let width = numbers.next().unwrap_or(0);
            let scale = numbers.next().unwrap_or(0);
            (base.trim().to_string(), width, scale)
        }
        None => (upper.clone(), 0, 0),
    };

    use sql_types::*;
    let type_code = if base.is_empty() {
        BLOB
    } else if base.contains("BIGINT") {
        BIGINT
    } else if base.contains("TINYINT") {
        TINYINT
    } else if base.contains("SMALLINT") {
        SMALLINT
    } else if base.contains("INT") {
        INTEGER
    } else if base.contains("BOOL") || base == "BIT" {
        BOOLEAN
    } else if base.contains("CLOB") {
        CLOB
    } else if base.contains("CHAR") {
        if base.contains("VAR") {
            VARCHAR
        } else {
            CHAR
        }
    } else if base.contains("TEXT") {
        VARCHAR
    } else if base.contains("BLOB") {
        BLOB
    } else if base.contains("BINARY") {
        VARBINARY
    } else if base.contains("DOUB") {
        DOUBLE
    } else if base.contains("FLOA") {
        FLOAT
    } else if base.contains("REAL") {
        REAL
    } else if base.contains("DEC") {
        DECIMAL
    } else if base.contains("NUMERIC") {
        NUMERIC
    } else if base.contains("DATETIME") || base.contains("TIMESTAMP") {
        TIMESTAMP
    } else if base.contains("DATE") {
        DATE
    } else if base.contains("TIME") {
        TIME
    } else {
        NUMERIC
    };

    DeclaredType {
        type_code,
        type_name: base,
        width,
        scale,
    }
}

/// Whether a column is the auto-incremented rowid alias of its table.
fn is_autoincrement(table_sql: Option<&str>, columns: &[TableInfoRow], column: &TableInfoRow) -> bool {
    let declared = table_sql.is_some_and(|sql| sql.to_uppercase().contains("AUTOINCREMENT"));
    let key_columns = columns.iter().filter(|c| c.pk > 0).count();
    declared
        && key_columns == 1
        && column.pk == 1
        && column.declared_type.eq_ignore_ascii_case("INTEGER")
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}

impl MetadataSource for SqliteMetadataSource {
    fn tables(&self, schema: Option<&str>, kinds: &[&str]) -> SourceResult<Rows<'_>> {
        let database = database_name(schema);
        let conn = self.connection()?;
        let rows = master_entries(&conn, database)?
            .iter()
            .filter(|entry| kinds.is_empty() || kinds.iter().any(|k| *k == object_kind(entry)))
            .map(|entry| {
                MetadataRow::new(vec![
                    Value::from(database),
                    Value::from(entry.name.as_str()),
                    Value::from(object_kind(entry)),
                    Value::Null,
                ])
            })
            .collect();
        Ok(rows_from_vec(rows))
    }

    fn columns(&self, schema: Option<&str>) -> SourceResult<Rows<'_>> {
        let database = database_name(schema);
        let conn = self.connection()?;
        let mut rows = Vec::new();

        for entry in master_entries(&conn, database)? {
            if entry.kind != "table" {
                continue;
            }
            let columns = table_info(&conn, database, &entry.name)?;
            for column in &columns {
                let declared = classify_declared_type(&column.declared_type);
                let autoincrement = is_autoincrement(entry.sql.as_deref(), &columns, column);
                let nullable = !column.not_null && column.pk == 0;

                rows.push(MetadataRow::new(vec![
                    Value::from(entry.name.as_str()),
                    Value::from(column.name.as_str()),
                    Value::from(declared.type_code),
                    Value::from(declared.type_name),
                    Value::from(declared.width),
                    Value::from(declared.scale),
                    Value::from(yes_no(nullable)),
                    Value::from(yes_no(autoincrement)),
                    Value::from(column.default.clone()),
                    Value::Null,
                ]));
            }
        }

        Ok(rows_from_vec(rows))
    }

    fn primary_keys(&self, schema: Option<&str>, table: &str) -> SourceResult<Rows<'_>> {
        let database = database_name(schema);
        let conn = self.connection()?;
        let rows = table_info(&conn, database, table)?
            .into_iter()
            .filter(|column| column.pk > 0)
            .map(|column| {
                MetadataRow::new(vec![
                    Value::from(table),
                    Value::from(column.name),
                    Value::from(column.pk),
                    Value::Null,
                ])
            })
            .collect();
        Ok(rows_from_vec(rows))
    }

    fn index_info(
        &self,
        schema: Option<&str>,
        table: &str,
        unique_only: bool,
        _approximate: bool,
    ) -> SourceResult<Rows<'_>> {
        let database = database_name(schema);
        let conn = self.connection()?;

        let mut entries: Vec<(bool, String, i64, Option<String>)> = Vec::new();
        for index in index_list(&conn, database, table)? {
            if unique_only && !index.unique {
                continue;
            }
            let reported_name = if index.origin == "pk" {
                PRIMARY_KEY_INDEX_NAME.to_string()
            } else {
                index.name.clone()
            };
            let columns = index_columns(&conn, database, &index.name)?;
            if columns.iter().any(|(_, column)| column.is_none()) {
                debug!(
                    "Skipping expression index [{}] on table [{}]",
                    index.name, table
                );
                continue;
            }
            for (seqno, column) in columns {
                entries.push((!index.unique, reported_name.clone(), seqno + 1, column));
            }
        }
        entries.sort_by(|a, b| (a.0, &a.1, a.2).cmp(&(b.0, &b.1, b.2)));

        let rows = entries
            .into_iter()
            .map(|(non_unique, name, ordinal, column)| {
                MetadataRow::new(vec![
                    Value::from(table),
                    Value::from(non_unique),
                    Value::from(name),
                    Value::from(ordinal),
                    Value::from(column),
                ])
            })
            .collect();
        Ok(rows_from_vec(rows))
    }
}
