pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

pub use schema::StoreKind;

/// Open (or create) one of the two stores at the given path, with pragmas set
/// and its schema initialized.
pub fn open_database(path: impl AsRef<Path>, kind: StoreKind) -> Result<Connection> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open {kind} database at {}", path.display()))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.busy_timeout(std::time::Duration::from_millis(5000))?;

    schema::init_schema(&conn, kind)
        .with_context(|| format!("failed to initialize {kind} schema"))?;

    tracing::info!(path = %path.display(), store = %kind, "database initialized");
    Ok(conn)
}

/// Open an in-memory store with its schema applied.
pub fn open_memory_database(kind: StoreKind) -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    schema::init_schema(&conn, kind)
        .with_context(|| format!("failed to initialize {kind} schema"))?;
    Ok(conn)
}

/// Result of [`check_database_health`].
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub integrity_ok: bool,
    pub integrity_details: String,
    pub schema_version: u32,
    pub row_count: u64,
}

/// Run `PRAGMA integrity_check` and gather basic counts for one store.
pub fn check_database_health(conn: &Connection, kind: StoreKind) -> Result<HealthReport> {
    let integrity: String = conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))
        .context("integrity check failed to run")?;

    let schema_version = schema::get_schema_version(conn)?;

    let row_count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", kind.table()),
        [],
        |row| row.get(0),
    )?;

    Ok(HealthReport {
        integrity_ok: integrity == "ok",
        integrity_details: integrity,
        schema_version,
        row_count: row_count as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_on_fresh_store() {
        let conn = open_memory_database(StoreKind::Traits).unwrap();
        let report = check_database_health(&conn, StoreKind::Traits).unwrap();
        assert!(report.integrity_ok);
        assert_eq!(report.schema_version, schema::SCHEMA_VERSION);
        assert_eq!(report.row_count, 0);
    }
}
