//! SQLite database schema for kotoba
//!
//! Each version only adds tables and indices, so upgrading an existing store
//! keeps every imported record.

use crate::error::{KotobaError, Result};
use rusqlite::{Connection, OptionalExtension};

pub const CURRENT_SCHEMA_VERSION: i32 = 3;

/// Result of schema creation
#[derive(Debug, PartialEq, Eq)]
pub enum SchemaCreateResult {
    /// Fresh database, every table created
    Created,
    /// Existing database brought forward from an older layout
    Migrated { from: i32 },
    /// Already at the target layout
    Current,
}

const SCHEMA_V1_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS dictionaries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE,
    revision TEXT NOT NULL,
    sequenced INTEGER NOT NULL DEFAULT 0,
    version INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_dictionaries_version ON dictionaries(version);

CREATE TABLE IF NOT EXISTS terms (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    dictionary TEXT NOT NULL REFERENCES dictionaries(title),
    expression TEXT NOT NULL,
    reading TEXT NOT NULL,
    definition_tags TEXT NOT NULL DEFAULT '[]',
    rules TEXT NOT NULL DEFAULT '[]',
    score REAL NOT NULL DEFAULT 0,
    glossary TEXT NOT NULL DEFAULT '[]',
    sequence INTEGER NOT NULL DEFAULT -1,
    term_tags TEXT NOT NULL DEFAULT '[]'
);
CREATE INDEX IF NOT EXISTS idx_terms_dictionary ON terms(dictionary);
CREATE INDEX IF NOT EXISTS idx_terms_expression ON terms(expression);
CREATE INDEX IF NOT EXISTS idx_terms_reading ON terms(reading);

CREATE TABLE IF NOT EXISTS kanji (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    dictionary TEXT NOT NULL REFERENCES dictionaries(title),
    character TEXT NOT NULL,
    onyomi TEXT NOT NULL DEFAULT '[]',
    kunyomi TEXT NOT NULL DEFAULT '[]',
    tags TEXT NOT NULL DEFAULT '[]',
    meanings TEXT NOT NULL DEFAULT '[]',
    stats TEXT
);
CREATE INDEX IF NOT EXISTS idx_kanji_dictionary ON kanji(dictionary);
CREATE INDEX IF NOT EXISTS idx_kanji_character ON kanji(character);

CREATE TABLE IF NOT EXISTS tag_meta (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    dictionary TEXT NOT NULL REFERENCES dictionaries(title),
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    sort_order REAL NOT NULL DEFAULT 0,
    notes TEXT NOT NULL DEFAULT '',
    score REAL NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_tag_meta_dictionary ON tag_meta(dictionary);

CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT
);
"#;

const SCHEMA_V2_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS term_meta (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    dictionary TEXT NOT NULL REFERENCES dictionaries(title),
    expression TEXT NOT NULL,
    mode TEXT NOT NULL,
    data TEXT NOT NULL DEFAULT 'null'
);
CREATE INDEX IF NOT EXISTS idx_term_meta_dictionary ON term_meta(dictionary);
CREATE INDEX IF NOT EXISTS idx_term_meta_expression ON term_meta(expression);

CREATE TABLE IF NOT EXISTS kanji_meta (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    dictionary TEXT NOT NULL REFERENCES dictionaries(title),
    character TEXT NOT NULL,
    mode TEXT NOT NULL,
    data TEXT NOT NULL DEFAULT 'null'
);
CREATE INDEX IF NOT EXISTS idx_kanji_meta_dictionary ON kanji_meta(dictionary);
CREATE INDEX IF NOT EXISTS idx_kanji_meta_character ON kanji_meta(character);

CREATE INDEX IF NOT EXISTS idx_tag_meta_name ON tag_meta(name);
"#;

const SCHEMA_V3_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_terms_sequence ON terms(sequence);
"#;

/// Layout steps in order; step `n` (1-based) upgrades version `n - 1` to `n`
const MIGRATIONS: [&str; CURRENT_SCHEMA_VERSION as usize] =
    [SCHEMA_V1_SQL, SCHEMA_V2_SQL, SCHEMA_V3_SQL];

/// Every record table, children of `dictionaries`
pub const RECORD_TABLES: [&str; 5] = ["terms", "term_meta", "kanji", "kanji_meta", "tag_meta"];

pub fn drop_all_tables(conn: &Connection) -> Result<()> {
    for table in RECORD_TABLES {
        conn.execute(&format!("DROP TABLE IF EXISTS {}", table), [])?;
    }
    conn.execute("DROP TABLE IF EXISTS dictionaries", [])?;
    conn.execute("DROP TABLE IF EXISTS schema_meta", [])?;
    Ok(())
}

/// Read the stored layout version, `None` for a blank database
pub fn stored_schema_version(conn: &Connection) -> Result<Option<i32>> {
    let has_meta: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'schema_meta'",
        [],
        |r| r.get(0),
    )?;
    if !has_meta {
        return Ok(None);
    }

    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM schema_meta WHERE key = 'schema_version'",
            [],
            |r| r.get(0),
        )
        .optional()?;

    Ok(value.map(|s| s.parse().unwrap_or(0)))
}

fn write_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
        [&version.to_string()],
    )?;
    Ok(())
}

pub fn create_schema(conn: &Connection) -> Result<SchemaCreateResult> {
    create_schema_at(conn, CURRENT_SCHEMA_VERSION)
}

/// Bring the layout up to `target_version`, applying each missing step in order.
pub fn create_schema_at(conn: &Connection, target_version: i32) -> Result<SchemaCreateResult> {
    if !(1..=CURRENT_SCHEMA_VERSION).contains(&target_version) {
        return Err(KotobaError::invalid_value(
            "schema version",
            target_version,
        ));
    }

    let current_version = stored_schema_version(conn)?;

    let from = match current_version {
        Some(v) if v == target_version => return Ok(SchemaCreateResult::Current),
        Some(v) if v > target_version => {
            return Err(KotobaError::FailedOperation {
                operation: "open database".to_string(),
                reason: format!(
                    "schema version {} is newer than supported version {}",
                    v, target_version
                ),
            });
        }
        Some(v) => v.max(0),
        None => 0,
    };

    // Join the caller's transaction when there is one (purge runs inside its own)
    let tx = if conn.is_autocommit() {
        Some(conn.unchecked_transaction()?)
    } else {
        None
    };
    for (step, sql) in MIGRATIONS
        .iter()
        .enumerate()
        .take(target_version as usize)
        .skip(from as usize)
    {
        conn.execute_batch(sql)?;
        tracing::debug!(version = step + 1, "Applied schema step");
    }
    write_schema_version(conn, target_version)?;
    if let Some(tx) = tx {
        tx.commit()?;
    }

    if current_version.is_none() {
        Ok(SchemaCreateResult::Created)
    } else {
        tracing::info!(
            "Database schema updated from version {} to {}",
            from,
            target_version
        );
        Ok(SchemaCreateResult::Migrated { from })
    }
}

#[cfg(test)]
pub fn force_set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    write_schema_version(conn, version)
}
