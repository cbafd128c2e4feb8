//! Log setup for the command-line binary.
//!
//! Events go to `taskflow.log` in the data directory. Stdout carries command
//! output, so nothing is logged there. The file is rotated to
//! `taskflow.log.old` once it grows past [`MAX_LOG_SIZE`].

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Maximum log file size before rotation (1MB).
pub const MAX_LOG_SIZE: u64 = 1_048_576;

/// Move `path` aside to `<name>.old` if it is larger than `max_size`.
///
/// Returns whether the file was rotated.
pub fn rotate_if_large(path: &Path, max_size: u64) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    if metadata.len() <= max_size {
        return false;
    }
    let backup = path.with_extension("log.old");
    fs::rename(path, backup).is_ok()
}

/// Build the level filter, letting `RUST_LOG` override the configured level.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber, appending to `log_path`.
///
/// If the log file cannot be opened, events go to stderr instead. Calling
/// this more than once is harmless; later calls are ignored.
pub fn init(level: &str, log_path: &Path) {
    match open_log(log_path) {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_writer(Mutex::new(file))
                .with_env_filter(env_filter(level))
                .with_ansi(false)
                .try_init();
        }
        Err(e) => {
            let _ = tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter(level))
                .try_init();
            tracing::warn!(error = %e, path = %log_path.display(), "cannot open log file");
        }
    }
}

fn open_log(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    rotate_if_large(path, MAX_LOG_SIZE);
    OpenOptions::new().create(true).append(true).open(path)
}
