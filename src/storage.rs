//! Durable storage for the task collection and the theme preference.
//!
//! State lives under two logical keys of a [`KeyValueStore`]:
//! - [`keys::TASKS`] holds the task collection as a JSON array
//! - [`keys::THEME`] holds the theme preference (`"light"` or `"dark"`)
//!
//! Stored tasks are read back through the import coercion rules (without the
//! length caps), so one bad entry is repaired rather than costing the whole
//! collection. The
//! production backend is [`SqliteStore`], a single
//! `kv` table in a `SQLite` database.

use crate::error::Result;
use crate::tasks::import::repair_stored;
use crate::tasks::models::Task;
use crate::traits::KeyValueStore;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// Key name constants for consistent usage across the codebase.
pub mod keys {
    /// The serialized task collection.
    pub const TASKS: &str = "taskflow:v1";
    /// The theme preference.
    pub const THEME: &str = "taskflow:theme";
}

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Light theme.
    Light,
    /// Dark theme (default).
    #[default]
    Dark,
}

impl Theme {
    /// Interpret a stored preference; anything but `"light"` means dark.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("light") => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Get the string representation of the theme.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read the stored task collection.
///
/// A missing key yields an empty collection. Entries with missing or
/// mistyped fields are coerced the way an import coerces them.
///
/// # Errors
///
/// Returns an error if the backend cannot be read, the stored text is not
/// JSON, or the stored document is not an array.
pub fn load_tasks(store: &impl KeyValueStore) -> Result<Vec<Task>> {
    match store.get(keys::TASKS)? {
        Some(data) => {
            let document: serde_json::Value = serde_json::from_str(&data)?;
            repair_stored(&document)
        }
        None => Ok(Vec::new()),
    }
}

/// Write the task collection.
///
/// # Errors
///
/// Returns an error if the backend rejects the write.
pub fn save_tasks(store: &impl KeyValueStore, tasks: &[Task]) -> Result<()> {
    let data = serde_json::to_string(tasks)?;
    store.set(keys::TASKS, &data)
}

/// Read the theme preference, treating unreadable storage as the default.
pub fn load_theme(store: &impl KeyValueStore) -> Theme {
    match store.get(keys::THEME) {
        Ok(value) => Theme::from_stored(value.as_deref()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read theme preference");
            Theme::default()
        }
    }
}

/// Write the theme preference.
///
/// # Errors
///
/// Returns an error if the backend rejects the write.
pub fn save_theme(store: &impl KeyValueStore, theme: Theme) -> Result<()> {
    store.set(keys::THEME, theme.as_str())
}

/// SQLite-based key-value store.
///
/// Each operation opens a new connection to the database file.
/// This avoids thread safety issues and is acceptable for the
/// low frequency of state operations.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    /// Path to the database file.
    db_path: PathBuf,
}

impl SqliteStore {
    /// Create a new `SQLite` store at the given database path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let store = Self { db_path: db_path.as_ref().to_path_buf() };
        store.init_schema()?;
        Ok(store)
    }

    /// Get the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection to the database.
    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Ok(conn)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
        )?;

        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.open()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }
}
