use std::sync::Arc;

use autogest_core::RecordStore;
use autogest_domain::{NewRecord, Priority};
use autogest_persistence::sqlite::{build_pool, PoolProvider, SqliteRecordStore};
use chrono::NaiveDateTime;
use diesel::connection::SimpleConnection;

fn at(raw: &str) -> NaiveDateTime { NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").unwrap() }

fn new_store(dir: &tempfile::TempDir) -> SqliteRecordStore<PoolProvider> {
    let url = dir.path().join("tramites.db").to_string_lossy().into_owned();
    let pool = build_pool(&url, 2, 2_000).expect("pool");
    SqliteRecordStore::new(PoolProvider { pool })
}

fn sample(citizen: &str, priority: Priority) -> NewRecord {
    NewRecord::new(citizen, "Emergencia Médica", priority, at("2025-11-03 09:41:27"), "a@b.com")
}

#[test]
fn append_assigns_increasing_ids_and_lists_newest_first() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = new_store(&dir);

    let ids: Vec<i64> = ["1", "2", "3", "4"].iter()
                                            .map(|c| store.append(sample(c, Priority::Medium)).expect("append").id)
                                            .collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids={ids:?}");

    let all = store.list_all().expect("list");
    assert_eq!(all.len(), 4);
    assert!(all.windows(2).all(|w| w[0].id > w[1].id));
    assert_eq!(all[0].citizen_id, "4");
}

#[test]
fn stored_row_round_trips_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = new_store(&dir);
    let rec = store.append(sample("74700819", Priority::High)).expect("append");

    let all = store.list_all().expect("list");
    assert_eq!(all, vec![rec.clone()]);
    assert_eq!(rec.priority, Priority::High);
    assert_eq!(rec.created_at, at("2025-11-03 09:41:00"));
    assert_eq!(rec.contact_email.as_deref(), Some("a@b.com"));
}

#[test]
fn created_at_is_persisted_with_minute_precision() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = dir.path().join("tramites.db").to_string_lossy().into_owned();
    let pool = build_pool(&url, 1, 2_000).expect("pool");
    let store = SqliteRecordStore::new(PoolProvider { pool: pool.clone() });
    store.append(sample("1", Priority::Low)).expect("append");

    use diesel::prelude::*;
    use autogest_persistence::schema::requests;
    let mut conn = pool.get().expect("conn");
    let raw: Vec<(String, String)> = requests::table.select((requests::created_at, requests::priority))
                                                    .load(&mut conn)
                                                    .expect("raw");
    assert_eq!(raw, vec![("2025-11-03 09:41".to_string(), "Baja".to_string())]);
}

#[test]
fn legacy_rows_without_email_are_listed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = dir.path().join("tramites.db").to_string_lossy().into_owned();
    let pool = build_pool(&url, 1, 2_000).expect("pool");
    pool.get()
        .expect("conn")
        .batch_execute("INSERT INTO requests (citizen_id, document_type, priority, created_at) \
                        VALUES ('999', 'Matrimonio Civil', 'Media', '2025-10-30 12:00');")
        .expect("legacy insert");
    let store = SqliteRecordStore::new(PoolProvider { pool });
    let all = store.list_all().expect("list");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].contact_email, None);
    assert_eq!(all[0].priority, Priority::Medium);
}

#[test]
fn ids_beyond_32_bits_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = dir.path().join("tramites.db").to_string_lossy().into_owned();
    let pool = build_pool(&url, 1, 2_000).expect("pool");
    pool.get()
        .expect("conn")
        .batch_execute("INSERT INTO requests (id, citizen_id, document_type, priority, created_at) \
                        VALUES (3000000000, '999', 'Matrimonio Civil', 'Media', '2025-10-30 12:00');")
        .expect("insert");
    let store = SqliteRecordStore::new(PoolProvider { pool });

    let rec = store.append(sample("74700819", Priority::High)).expect("append");
    assert_eq!(rec.id, 3_000_000_001);
    let ids: Vec<i64> = store.list_all().expect("list").iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3_000_000_001, 3_000_000_000]);
}

#[test]
fn corrupt_priority_is_a_storage_fault() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = dir.path().join("tramites.db").to_string_lossy().into_owned();
    let pool = build_pool(&url, 1, 2_000).expect("pool");
    // El CHECK impide etiquetas inválidas; una fecha ilegible sí puede colarse.
    pool.get()
        .expect("conn")
        .batch_execute("INSERT INTO requests (citizen_id, document_type, priority, created_at) \
                        VALUES ('999', 'Matrimonio Civil', 'Media', 'ayer');")
        .expect("insert");
    let store = SqliteRecordStore::new(PoolProvider { pool });
    assert!(store.list_all().is_err());
}

#[test]
fn concurrent_appends_keep_ids_unique() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(new_store(&dir));
    let handles: Vec<_> = (0..4).map(|t| {
                                    let store = store.clone();
                                    std::thread::spawn(move || {
                                        (0..5).map(|i| store.append(sample(&format!("{t}-{i}"), Priority::Low)).expect("append").id)
                                              .collect::<Vec<_>>()
                                    })
                                })
                                .collect();
    let mut ids: Vec<i64> = handles.into_iter().flat_map(|h| h.join().expect("join")).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 20);
    assert_eq!(store.list_all().expect("list").len(), 20);
}
