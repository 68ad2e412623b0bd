//! Local persistence adapter.
//!
//! Wraps a SQLite database in a key → JSON document surface. Each persisted
//! collection (conversation history, memory graph, settings) is one document
//! under a `kindred:`-prefixed key, written whole on every mutation. Corrupt
//! documents are logged and treated as absent rather than surfaced as errors.

pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// Prefix shared by every document key, keeping the store safe to share with
/// unrelated data in the same database file.
pub const NAMESPACE: &str = "kindred";

/// Document key for the conversation history (array of turns, capped at 50).
pub const CONVERSATION_KEY: &str = "kindred:conversation-history";
/// Document key for the memory graph (`{nodes, connections}`, node cap 100).
pub const MEMORY_KEY: &str = "kindred:memory-data";
/// Document key for the settings record.
pub const SETTINGS_KEY: &str = "kindred:settings";

/// Upper bound on a single serialized document.
pub const MAX_DOCUMENT_BYTES: usize = 256 * 1024;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document {key} is {size} bytes, over the {limit} byte cap")]
    DocumentTooLarge {
        key: String,
        size: usize,
        limit: usize,
    },
}

/// Key → JSON document store over a single SQLite connection.
///
/// The connection sits behind its own mutex so each read-modify-write
/// persistence cycle is a single mutual-exclusion region.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the store at the given path, with WAL enabled and
    /// schema initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;

        // Enable WAL mode for better concurrent read performance
        conn.pragma_update(None, "journal_mode", "WAL")?;

        schema::init_schema(&conn).context("failed to initialize schema")?;
        migrations::run_migrations(&conn).context("failed to run migrations")?;

        if let Ok(Some(ns)) = migrations::get_namespace(&conn) {
            if ns != NAMESPACE {
                tracing::warn!(
                    stored = %ns,
                    expected = NAMESPACE,
                    "database belongs to a different namespace"
                );
            }
        }

        tracing::info!(path = %path.display(), "store initialized");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (used by tests and ephemeral sessions).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        schema::init_schema(&conn).context("failed to initialize schema")?;
        migrations::run_migrations(&conn).context("failed to run migrations")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Serialize `value` and write it whole under `key`.
    ///
    /// Documents over [`MAX_DOCUMENT_BYTES`] are rejected with
    /// [`StorageError::DocumentTooLarge`].
    pub fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).context("failed to serialize document")?;
        if json.len() > MAX_DOCUMENT_BYTES {
            return Err(StorageError::DocumentTooLarge {
                key: key.to_string(),
                size: json.len(),
                limit: MAX_DOCUMENT_BYTES,
            }
            .into());
        }

        let now = chrono::Utc::now().to_rfc3339();
        let conn = self.lock_conn();
        conn.execute(
            "INSERT OR REPLACE INTO documents (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, json, now],
        )?;
        Ok(())
    }

    /// Read and deserialize the document under `key`.
    ///
    /// A missing key returns `None`. A corrupt or unreadable document is
    /// logged and also returns `None` — callers fall back to their empty
    /// initial state.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let conn = self.lock_conn();
        let row: Option<String> = match conn
            .query_row(
                "SELECT value FROM documents WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read document");
                return None;
            }
        };

        let json = row?;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "corrupt document, treating as empty");
                None
            }
        }
    }

    /// Delete the document under `key`, if present.
    pub fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock_conn();
        conn.execute("DELETE FROM documents WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn lock_conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        // Recover rather than propagate poisoning: a panicked writer leaves
        // the last committed document intact.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}
