//! Local `SQLite` key/value storage.
//!
//! Provides durable string-keyed storage that survives restarts,
//! mirroring the get/set/remove surface of browser local storage.

use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{AppError, Result};

/// Durable string key/value storage.
pub trait KeyValueStore: Send {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    /// Returns error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns error if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key` if present.
    ///
    /// # Errors
    /// Returns error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Start an exclusive write section. Other writers, including other
    /// processes on the same store, wait until it is committed or rolled back.
    ///
    /// # Errors
    /// Returns error if the lock cannot be taken.
    fn begin_exclusive(&self) -> Result<()> {
        Ok(())
    }

    /// Commit the section opened by [`KeyValueStore::begin_exclusive`].
    ///
    /// # Errors
    /// Returns error if the commit fails.
    fn commit(&self) -> Result<()> {
        Ok(())
    }

    /// Abandon the section opened by [`KeyValueStore::begin_exclusive`].
    ///
    /// # Errors
    /// Returns error if the rollback fails.
    fn rollback(&self) -> Result<()> {
        Ok(())
    }
}

/// How long a writer waits for another connection's lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Key/value repository using `SQLite`.
pub struct LocalStorage {
    conn: Connection,
}

impl LocalStorage {
    /// Opens or creates the local storage database.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or schema creation fails.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create storage directory", e))?;
        }

        let conn = Connection::open(path).map_err(AppError::storage)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(AppError::storage)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(AppError::storage)?;

        let storage = Self { conn };
        storage.init_schema()?;

        tracing::debug!(path = %path.display(), "Opened local storage");

        Ok(storage)
    }

    /// Opens a throwaway in-memory database.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(AppError::storage)?;
        let storage = Self { conn };
        storage.init_schema()?;
        Ok(storage)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
            )
            .map_err(AppError::storage)?;

        Ok(())
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(AppError::storage)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                r"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            ",
                params![key, value],
            )
            .map_err(AppError::storage)?;

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .map_err(AppError::storage)?;

        Ok(())
    }

    fn begin_exclusive(&self) -> Result<()> {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(AppError::storage)
    }

    fn commit(&self) -> Result<()> {
        self.conn.execute_batch("COMMIT").map_err(AppError::storage)
    }

    fn rollback(&self) -> Result<()> {
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(AppError::storage)
    }
}
