use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::errors::StoreError;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

// Thread-local connection slots, one per database file.
thread_local! {
    static DB_CONNS: RefCell<HashMap<String, Connection>> = RefCell::new(HashMap::new());
}

#[derive(Clone, Debug)]
pub struct Database {
    path: String,
    busy_timeout: Duration,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// How long a writer waits for another connection's lock before the
    /// statement fails with a storage error.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn open(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)
            .map_err(|e| StoreError::storage("open db failed", e))?;
        conn.busy_timeout(self.busy_timeout)
            .map_err(|e| StoreError::storage("set busy timeout failed", e))?;
        // Per-connection setting; the cascade on care_point_updates relies on it.
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| StoreError::storage("enable foreign keys failed", e))?;

        debug!(path = %self.path, "opened sqlite connection");
        Ok(conn)
    }

    /// Provides this thread's connection for `self.path` to the closure,
    /// opening it on first use. Must not be nested.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError>,
    {
        DB_CONNS
            .try_with(|cell| {
                let mut conns = cell.borrow_mut();
                let conn = match conns.entry(self.path.clone()) {
                    Entry::Occupied(slot) => slot.into_mut(),
                    Entry::Vacant(slot) => slot.insert(self.open()?),
                };
                f(conn)
            })
            .map_err(|_| StoreError::Storage("connection slot unavailable".into()))?
    }
}

/// Apply the embedded schema. Safe to run on every start.
pub fn init_db(db: &Database) -> Result<(), StoreError> {
    db.with_conn(|conn| {
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(|e| StoreError::storage("set journal mode failed", e))?;
        debug!(journal_mode = %mode, "journal mode set");

        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| StoreError::storage("apply schema failed", e))
    })?;

    info!(path = %db.path(), "database initialized");
    Ok(())
}
