//! Export of the task collection as a standalone JSON document.

use crate::error::Result;
use crate::paths;
use crate::tasks::models::Task;
use chrono::{DateTime, Utc};

/// A rendered export, ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Suggested file name, derived from the export time.
    pub filename: String,
    /// Pretty-printed JSON array of every task.
    pub contents: String,
}

/// Serialize the full collection exactly as stored, pretty-printed.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_tasks(tasks: &[Task], now: DateTime<Utc>) -> Result<Export> {
    Ok(Export { filename: paths::export_filename(now), contents: serde_json::to_string_pretty(tasks)? })
}
