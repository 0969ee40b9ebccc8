#![forbid(unsafe_code)]

mod error;

pub use error::StoreError;

use rusqlite::{Connection, OptionalExtension, params};
use seq_core::sequence::SequenceValue;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DB_FILE: &str = "seqstamp.db";
const SCHEMA_VERSION: i64 = 1;

/// Durable store for the single monotonic sequence value.
///
/// Holds both the open connection and the in-memory value; the in-memory
/// value is replaced only after a successful commit, so a failed write can
/// never leave memory ahead of disk.
#[derive(Debug)]
pub struct CounterStore {
    conn: Connection,
    storage_dir: PathBuf,
    current: SequenceValue,
}

impl CounterStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE);
        let conn = Connection::open(db_path).map_err(StoreError::Open)?;
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(StoreError::Open)?;

        preflight_gate(&conn)?;
        install_schema(&conn).map_err(StoreError::Open)?;

        let mut store = Self {
            conn,
            storage_dir,
            current: SequenceValue::FIRST,
        };
        store.load()?;
        Ok(store)
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// The value of the last successful load or increment.
    pub fn current(&self) -> SequenceValue {
        self.current
    }

    /// Reads the persisted sequence value, seeding the row with 1 if the
    /// store is empty. Repeated calls without an intervening increment
    /// return the same value and never create a second row.
    pub fn load(&mut self) -> Result<SequenceValue, StoreError> {
        ensure_counter_row(&self.conn, now_ms())?;

        let found = self
            .conn
            .query_row("SELECT value FROM counter WHERE id=1", [], |row| {
                row.get::<_, i64>(0)
            })?;

        let value =
            SequenceValue::try_new(found).map_err(|_| StoreError::CorruptValue { found })?;
        self.current = value;
        Ok(value)
    }

    /// Increments the sequence by one and persists it. Returns the new value.
    ///
    /// On any failure the persisted row is untouched (the transaction rolls
    /// back on drop) and the in-memory value stays at its pre-increment
    /// state. Not retried here; callers decide how to surface the error.
    pub fn increment(&mut self) -> Result<SequenceValue, StoreError> {
        let next = self
            .current
            .next()
            .map_err(|err| StoreError::InvalidInput(err.message()))?;

        let tx = self.conn.transaction().map_err(StoreError::Write)?;
        let updated = tx
            .execute(
                "UPDATE counter SET value=?1, updated_at_ms=?2 WHERE id=1",
                params![next.get(), now_ms()],
            )
            .map_err(StoreError::Write)?;
        if updated != 1 {
            return Err(StoreError::InvalidInput("counter row is missing"));
        }
        tx.commit().map_err(StoreError::Write)?;

        self.current = next;
        Ok(next)
    }
}

fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
        .map_err(StoreError::Open)?;
    let mut rows = stmt.query([]).map_err(StoreError::Open)?;
    let mut tables = BTreeSet::new();
    while let Some(row) = rows.next().map_err(StoreError::Open)? {
        tables.insert(row.get::<_, String>(0).map_err(StoreError::Open)?);
    }

    if tables.is_empty() {
        return Ok(());
    }

    let required: BTreeSet<&str> = ["store_state", "counter"].into_iter().collect();

    if tables
        .iter()
        .any(|table| !required.contains(table.as_str()))
    {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: unsupported tables detected",
        ));
    }

    for table in required {
        if !tables.contains(table) {
            return Err(StoreError::InvalidInput(
                "RESET_REQUIRED: required table is missing",
            ));
        }
    }

    let version = conn
        .query_row(
            "SELECT schema_version FROM store_state WHERE singleton=1",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()
        .map_err(StoreError::Open)?;

    match version {
        Some(v) if v == SCHEMA_VERSION => Ok(()),
        Some(_) => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema version mismatch",
        )),
        None => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema state row is missing",
        )),
    }
}

fn install_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    let now_ms = now_ms();

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS store_state (
          singleton INTEGER PRIMARY KEY CHECK(singleton = 1),
          schema_version INTEGER NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS counter (
          id INTEGER PRIMARY KEY CHECK(id = 1),
          value INTEGER NOT NULL CHECK(value >= 1),
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );
        "#,
    )?;

    conn.execute(
        "INSERT INTO store_state(singleton, schema_version, created_at_ms, updated_at_ms) \
         VALUES (1, ?1, ?2, ?2) \
         ON CONFLICT(singleton) DO UPDATE SET schema_version=excluded.schema_version, updated_at_ms=excluded.updated_at_ms",
        params![SCHEMA_VERSION, now_ms],
    )?;

    Ok(())
}

fn ensure_counter_row(conn: &Connection, now_ms: i64) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR IGNORE INTO counter(id, value, created_at_ms, updated_at_ms) VALUES (1, ?1, ?2, ?2)",
        params![SequenceValue::FIRST.get(), now_ms],
    )?;
    Ok(())
}

fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration,
        Err(_) => return 0,
    };

    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
