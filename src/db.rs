//! SQLite storage gateway
//!
//! Wraps a single shared connection behind a cloneable handle. The schema is
//! applied idempotently on open, so there is no separate migration step.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Params, Row, Transaction};

use crate::error::StorageError;

/// Thread-safe wrapper around the process-wide database connection.
///
/// All statement execution goes through the parameterized primitives below;
/// callers never build SQL from user input.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Database {
    /// Open or create the database at the given path.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let conn = Connection::open(&path).map_err(StorageError::from)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };

        db.apply_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        };

        db.apply_schema()?;
        Ok(db)
    }

    /// Get the database file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Get database file size in bytes.
    pub fn size_bytes(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }

    fn apply_schema(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Execute a parameterized read query, mapping each row with `map_row`.
    pub fn select<T, P, F>(&self, sql: &str, params: P, map_row: F) -> Result<Vec<T>, StorageError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Execute a parameterized write statement, returning the affected row count.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize, StorageError> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn.execute(sql, params)?;
        Ok(rows_affected)
    }

    /// Identifier generated by the most recent insert on this connection.
    ///
    /// Only meaningful immediately after an insert.
    pub fn last_insert_id(&self) -> i64 {
        self.conn.lock().unwrap().last_insert_rowid()
    }

    /// Run `f` inside a transaction: committed on `Ok`, rolled back on `Err`.
    ///
    /// The transaction rolls back on drop, so no exit path leaves it open.
    pub fn with_transaction<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, StorageError>,
    {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }
}

/// Parse an RFC3339 timestamp column, falling back to now on garbage.
pub(crate) fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    price      REAL NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
);
"#;
