//! SQLite message store.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{Connection, params};
use tokio::task;

use crate::domain::{MessageRecord, MessageStore, StoreError};

/// SQLite-backed message store.
///
/// Timestamps are assigned by the database on insert. History queries order
/// by timestamp with the rowid as tiebreak, so records inserted within the
/// same second still come back in insertion order.
///
/// Statements run on the blocking thread pool so a slow disk never stalls
/// the async workers driving other sessions.
pub struct SqliteMessageStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMessageStore {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Open(e.to_string()))?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Open(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                room TEXT NOT NULL,
                username TEXT NOT NULL,
                message TEXT NOT NULL,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )
        .map_err(|e| StoreError::Open(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool.
    async fn with_blocking<T, F>(
        &self,
        wrap: fn(String) -> StoreError,
        f: F,
    ) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|e| wrap(e.to_string()))?;
            f(&conn).map_err(|e| wrap(e.to_string()))
        })
        .await
        .map_err(|e| wrap(e.to_string()))?
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn append(&self, room: &str, username: &str, text: &str) -> Result<(), StoreError> {
        let (room, username, text) = (room.to_string(), username.to_string(), text.to_string());
        self.with_blocking(StoreError::Append, move |conn| {
            conn.execute(
                "INSERT INTO messages (room, username, message) VALUES (?1, ?2, ?3)",
                params![room, username, text],
            )
            .map(|_| ())
        })
        .await
    }

    async fn query(&self, room: &str) -> Result<Vec<MessageRecord>, StoreError> {
        let room = room.to_string();
        self.with_blocking(StoreError::Query, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT username, message, timestamp FROM messages
                 WHERE room = ?1 ORDER BY timestamp ASC, id ASC",
            )?;
            let rows = stmt.query_map(params![room], |row| {
                Ok(MessageRecord {
                    username: row.get(0)?,
                    text: row.get(1)?,
                    timestamp: row.get(2)?,
                })
            })?;
            rows.collect()
        })
        .await
    }
}
