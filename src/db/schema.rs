//! SQL DDL for the person and trait stores.
//!
//! Each store lives in its own SQLite file with its own `schema_meta` table.
//! All DDL uses `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

/// The schema version that the current binary writes.
pub const SCHEMA_VERSION: u32 = 1;

const PERSONS_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS persons (
    name TEXT PRIMARY KEY,
    friendliness REAL NOT NULL DEFAULT 0.0,
    dominance REAL NOT NULL DEFAULT 0.0,
    observations INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_persons_friendliness ON persons(friendliness);
CREATE INDEX IF NOT EXISTS idx_persons_dominance ON persons(dominance);

CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

// `match_key` is the name as the analyzer sees it (Unicode-lowercased word
// tokens joined by one space). Two names with the same key would match the
// same text, so it is UNIQUE. NOCASE on `name` only folds ASCII.
const TRAITS_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS traits (
    name TEXT PRIMARY KEY COLLATE NOCASE,
    match_key TEXT NOT NULL UNIQUE,
    friendliness REAL NOT NULL,
    dominance REAL NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Which of the two stores a connection backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Persons,
    Traits,
}

impl StoreKind {
    /// Name of the single data table in this store.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Persons => "persons",
            Self::Traits => "traits",
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// Initialize the tables for `kind`. Idempotent.
pub fn init_schema(conn: &Connection, kind: StoreKind) -> rusqlite::Result<()> {
    match kind {
        StoreKind::Persons => conn.execute_batch(PERSONS_SCHEMA_SQL)?,
        StoreKind::Traits => conn.execute_batch(TRAITS_SCHEMA_SQL)?,
    }

    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

/// Read the stored schema version.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT value FROM schema_meta WHERE key = 'schema_version'",
        [],
        |row| {
            let val: String = row.get(0)?;
            Ok(val.parse::<u32>().unwrap_or(0))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn persons_schema_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn, StoreKind::Persons).unwrap();

        let tables = table_names(&conn);
        assert!(tables.contains(&"persons".to_string()));
        assert!(tables.contains(&"schema_meta".to_string()));
        assert!(!tables.contains(&"traits".to_string()));
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn traits_schema_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn, StoreKind::Traits).unwrap();

        let tables = table_names(&conn);
        assert!(tables.contains(&"traits".to_string()));
        assert!(!tables.contains(&"persons".to_string()));
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn, StoreKind::Persons).unwrap();
        init_schema(&conn, StoreKind::Persons).unwrap();
    }

    #[test]
    fn trait_names_collide_case_insensitively() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn, StoreKind::Traits).unwrap();

        conn.execute(
            "INSERT INTO traits (name, match_key, friendliness, dominance, created_at) \
             VALUES ('Friendly', 'friendly', 1, 1, 'now')",
            [],
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO traits (name, match_key, friendliness, dominance, created_at) \
             VALUES ('friendly', 'friendly-2', 2, 2, 'now')",
            [],
        );
        assert!(result.is_err(), "NOCASE primary key should reject case variant");
    }

    #[test]
    fn trait_match_keys_are_unique() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn, StoreKind::Traits).unwrap();

        conn.execute(
            "INSERT INTO traits (name, match_key, friendliness, dominance, created_at) \
             VALUES ('élan', 'élan', 1, 1, 'now')",
            [],
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO traits (name, match_key, friendliness, dominance, created_at) \
             VALUES ('ÉLAN', 'élan', 2, 2, 'now')",
            [],
        );
        assert!(result.is_err(), "same match key must be rejected");
    }
}
