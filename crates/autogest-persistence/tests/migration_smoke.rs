//! Arranque repetido sobre la misma base: no falla ni duplica columnas.

use autogest_persistence::migrations::{apply_additive_columns, run_pending_migrations, table_columns, AdditiveColumn,
                                       ADDITIVE_COLUMNS};
use autogest_persistence::sqlite::build_pool;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;

fn db_path(dir: &tempfile::TempDir) -> String { dir.path().join("tramites.db").to_string_lossy().into_owned() }

#[test]
fn startup_twice_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = db_path(&dir);

    let first = build_pool(&url, 1, 1_000).expect("first startup");
    drop(first);
    let second = build_pool(&url, 1, 1_000).expect("second startup");

    let mut conn = second.get().expect("conn");
    let cols = table_columns(&mut conn, "requests").expect("columns");
    assert_eq!(cols, vec!["id", "citizen_id", "document_type", "priority", "created_at", "contact_email"]);
    assert_eq!(cols.iter().filter(|c| c.as_str() == "contact_email").count(), 1);
}

#[test]
fn running_migrations_again_on_same_connection_is_a_noop() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut conn = SqliteConnection::establish(&db_path(&dir)).expect("establish");
    run_pending_migrations(&mut conn).expect("first");
    run_pending_migrations(&mut conn).expect("second");
    assert_eq!(apply_additive_columns(&mut conn, ADDITIVE_COLUMNS).expect("third"), 0);
}

#[test]
fn additive_column_is_added_to_pre_existing_table() {
    // Tabla creada por una versión anterior, sin contact_email ni registro de
    // migraciones Diesel.
    let dir = tempfile::tempdir().expect("tempdir");
    let mut conn = SqliteConnection::establish(&db_path(&dir)).expect("establish");
    conn.batch_execute("CREATE TABLE requests (id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL, citizen_id TEXT NOT NULL, \
                        document_type TEXT NOT NULL, priority TEXT NOT NULL, created_at TEXT NOT NULL);
                        INSERT INTO requests (citizen_id, document_type, priority, created_at)
                        VALUES ('111', 'Solicitud Simple', 'Baja', '2025-10-01 08:00');")
        .expect("legacy table");

    run_pending_migrations(&mut conn).expect("migrate legacy");
    let cols = table_columns(&mut conn, "requests").expect("columns");
    assert!(cols.iter().any(|c| c == "contact_email"));
}

#[test]
fn additive_columns_are_applied_only_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut conn = SqliteConnection::establish(&db_path(&dir)).expect("establish");
    run_pending_migrations(&mut conn).expect("migrate");
    let extra = [AdditiveColumn { table: "requests",
                                  name: "channel",
                                  sql_type: "TEXT" }];
    assert_eq!(apply_additive_columns(&mut conn, &extra).expect("add"), 1);
    assert_eq!(apply_additive_columns(&mut conn, &extra).expect("re-add"), 0);
}

#[test]
fn unsafe_table_name_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut conn = SqliteConnection::establish(&db_path(&dir)).expect("establish");
    assert!(table_columns(&mut conn, "requests; DROP TABLE requests").is_err());
}
