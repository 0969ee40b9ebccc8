#![forbid(unsafe_code)]

use rusqlite::Connection;
use seq_storage::{CounterStore, StoreError};
use std::path::{Path, PathBuf};

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = base.join(format!("seq_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn counter_row_count(storage_dir: &Path) -> i64 {
    let conn = Connection::open(storage_dir.join("seqstamp.db")).expect("open raw db");
    conn.query_row("SELECT COUNT(1) FROM counter", [], |row| row.get(0))
        .expect("count counter rows")
}

#[test]
fn first_load_on_empty_storage_returns_one() {
    let storage_dir = temp_dir("first_load_on_empty_storage_returns_one");
    let mut store = CounterStore::open(&storage_dir).expect("open store");

    assert_eq!(store.current().get(), 1);
    assert_eq!(store.load().expect("load").get(), 1);
    assert_eq!(counter_row_count(&storage_dir), 1);
}

#[test]
fn load_is_idempotent_without_an_increment() {
    let storage_dir = temp_dir("load_is_idempotent_without_an_increment");
    let mut store = CounterStore::open(&storage_dir).expect("open store");

    let first = store.load().expect("first load");
    let second = store.load().expect("second load");
    assert_eq!(first, second);
    assert_eq!(counter_row_count(&storage_dir), 1);
}

#[test]
fn increment_survives_reopen() {
    let storage_dir = temp_dir("increment_survives_reopen");

    {
        let mut store = CounterStore::open(&storage_dir).expect("open store");
        assert_eq!(store.increment().expect("increment").get(), 2);
    }

    let mut store = CounterStore::open(&storage_dir).expect("reopen store");
    assert_eq!(store.load().expect("load after reopen").get(), 2);
}

#[test]
fn increments_are_monotonic() {
    let storage_dir = temp_dir("increments_are_monotonic");
    let mut store = CounterStore::open(&storage_dir).expect("open store");

    assert_eq!(store.increment().expect("increment").get(), 2);
    assert_eq!(store.increment().expect("increment").get(), 3);
    assert_eq!(store.increment().expect("increment").get(), 4);

    drop(store);
    let store = CounterStore::open(&storage_dir).expect("reopen store");
    assert_eq!(store.current().get(), 4);
}

#[test]
fn corrupt_value_is_surfaced_not_repaired() {
    let storage_dir = temp_dir("corrupt_value_is_surfaced_not_repaired");

    {
        let _store = CounterStore::open(&storage_dir).expect("open store");
    }

    // CHECK(value >= 1) guards normal writes; bypass it to plant the bad row.
    let conn = Connection::open(storage_dir.join("seqstamp.db")).expect("open raw db");
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON; UPDATE counter SET value = 0 WHERE id = 1;",
    )
    .expect("plant corrupt value");

    let err = CounterStore::open(&storage_dir).expect_err("expected corrupt value");
    match err {
        StoreError::CorruptValue { found } => assert_eq!(found, 0),
        other => panic!("expected CorruptValue error, got {other:?}"),
    }
}

#[test]
fn foreign_tables_require_reset() {
    let storage_dir = temp_dir("foreign_tables_require_reset");
    std::fs::create_dir_all(&storage_dir).expect("create dir");

    {
        let conn = Connection::open(storage_dir.join("seqstamp.db")).expect("open raw db");
        conn.execute_batch("CREATE TABLE stray (id INTEGER PRIMARY KEY);")
            .expect("create stray table");
    }

    let err = CounterStore::open(&storage_dir).expect_err("expected preflight failure");
    match err {
        StoreError::InvalidInput(msg) => {
            assert!(msg.starts_with("RESET_REQUIRED"), "unexpected message: {msg}");
        }
        other => panic!("expected InvalidInput error, got {other:?}"),
    }
}
