//! SQLite storage backend for Canopy

use super::traits::{NodeStore, OpenStore, StorageError, StorageResult};
use crate::forest::{NodeId, NodeRecord};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::info;

/// How long a statement waits on a lock held by another connection
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed node store
///
/// Uses a single SQLite database file with one `nodes` table.
/// Thread-safe via internal mutex on the connection: every call holds the
/// guard for exactly one statement (plus, for inserts, the rowid read), so
/// id assignment is serialized across callers.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Initialize the database schema
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(
            r#"
            -- AUTOINCREMENT keeps ids from ever being reused
            CREATE TABLE IF NOT EXISTS nodes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                label TEXT NOT NULL,
                parent_id INTEGER REFERENCES nodes(id)
            );

            CREATE INDEX IF NOT EXISTS idx_nodes_parent
                ON nodes(parent_id);

            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- Enable WAL mode so listings can read while a write is in flight
            PRAGMA journal_mode = WAL;
            "#,
        )?;

        Ok(())
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the connection for the duration of one store call
    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let store = Self::from_connection(Connection::open(path)?)?;
        info!(path = %path.display(), "opened node store");
        Ok(store)
    }

    fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }
}

impl NodeStore for SqliteStore {
    fn exists(&self, id: NodeId) -> StorageResult<bool> {
        let conn = self.conn()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM nodes WHERE id = ?1)",
            params![id.get()],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn insert(&self, label: &str, parent_id: Option<NodeId>) -> StorageResult<NodeId> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO nodes (label, parent_id) VALUES (?1, ?2)",
            params![label, parent_id.map(NodeId::get)],
        )?;
        Ok(NodeId::new(conn.last_insert_rowid()))
    }

    fn list_all(&self) -> StorageResult<Vec<NodeRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, label, parent_id FROM nodes ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(NodeRecord::new(
                NodeId::new(row.get(0)?),
                row.get::<_, String>(1)?,
                row.get::<_, Option<i64>>(2)?.map(NodeId::new),
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }

        Ok(records)
    }
}
