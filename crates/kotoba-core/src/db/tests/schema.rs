use super::*;
use crate::db::schema::{create_schema_at, force_set_schema_version, stored_schema_version};
use crate::db::{create_schema, SchemaCreateResult, CURRENT_SCHEMA_VERSION};
use crate::error::KotobaError;
use rusqlite::Connection;
use tempfile::tempdir;

fn index_exists(conn: &Connection, name: &str) -> bool {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'index' AND name = ?1",
        [name],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn test_fresh_database_created_at_current_version() {
    let conn = Connection::open_in_memory().unwrap();
    assert_eq!(create_schema(&conn).unwrap(), SchemaCreateResult::Created);
    assert_eq!(
        stored_schema_version(&conn).unwrap(),
        Some(CURRENT_SCHEMA_VERSION)
    );
    assert!(index_exists(&conn, "idx_terms_sequence"));
    assert_eq!(create_schema(&conn).unwrap(), SchemaCreateResult::Current);
}

#[test]
fn test_blank_database_has_no_version() {
    let conn = Connection::open_in_memory().unwrap();
    assert_eq!(stored_schema_version(&conn).unwrap(), None);
}

#[test]
fn test_migration_from_second_layout_keeps_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DATABASE_FILE);
    {
        let conn = Connection::open(&path).unwrap();
        create_schema_at(&conn, 2).unwrap();
        assert!(!index_exists(&conn, "idx_terms_sequence"));
        conn.execute_batch(
            "INSERT INTO dictionaries (title, revision, sequenced, version) VALUES ('old', 'r1', 1, 2);
             INSERT INTO terms (dictionary, expression, reading, sequence) VALUES ('old', '打つ', 'うつ', 7);",
        )
        .unwrap();
    }

    let db = Database::open(&path, StoreConfig::default()).unwrap();
    assert_eq!(db.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
    assert!(index_exists(db.conn().unwrap(), "idx_terms_sequence"));

    let found = db.find_terms_by_sequence_bulk(&[7], "old").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].expression, "打つ");
    assert_eq!(db.summarize().unwrap()[0].title, "old");
}

#[test]
fn test_migration_from_first_layout_adds_meta_tables() {
    let conn = Connection::open_in_memory().unwrap();
    create_schema_at(&conn, 1).unwrap();
    assert_eq!(
        create_schema(&conn).unwrap(),
        SchemaCreateResult::Migrated { from: 1 }
    );
    conn.execute_batch(
        "INSERT INTO dictionaries (title, revision, sequenced, version) VALUES ('d', 'r', 0, 3);
         INSERT INTO term_meta (dictionary, expression, mode, data) VALUES ('d', '打つ', 'freq', '1');",
    )
    .unwrap();
    assert!(index_exists(&conn, "idx_tag_meta_name"));
}

#[test]
fn test_newer_stored_version_is_refused() {
    let conn = Connection::open_in_memory().unwrap();
    create_schema(&conn).unwrap();
    force_set_schema_version(&conn, CURRENT_SCHEMA_VERSION + 1).unwrap();

    let err = create_schema(&conn).unwrap_err();
    assert!(matches!(err, KotobaError::FailedOperation { .. }));
    // Nothing was dropped
    assert_eq!(
        stored_schema_version(&conn).unwrap(),
        Some(CURRENT_SCHEMA_VERSION + 1)
    );
}

#[test]
fn test_invalid_target_version() {
    let conn = Connection::open_in_memory().unwrap();
    assert!(create_schema_at(&conn, 0).is_err());
    assert!(create_schema_at(&conn, CURRENT_SCHEMA_VERSION + 1).is_err());
}
