//! Path utilities for determining data storage locations.
//!
//! All taskflow data lives in a single per-user directory, `~/.taskflow/`
//! by default. Setting `TASKFLOW_HOME` points it somewhere else.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// The base directory name for taskflow data.
const DATA_DIR_NAME: &str = ".taskflow";

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "TASKFLOW_HOME";

/// The database filename.
pub const DATABASE_FILENAME: &str = "taskflow.sqlite3";

/// The config filename.
pub const CONFIG_FILENAME: &str = "config.yaml";

/// The log filename.
pub const LOG_FILENAME: &str = "taskflow.log";

/// Get the base data directory for taskflow.
///
/// Returns `$TASKFLOW_HOME` if set, otherwise `~/.taskflow/`, or `None`
/// if the home directory cannot be determined.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(home));
    }
    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}

/// Get the default database path inside a data directory.
#[must_use]
pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DATABASE_FILENAME)
}

/// Get the config file path inside a data directory.
#[must_use]
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILENAME)
}

/// Get the log file path inside a data directory.
#[must_use]
pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILENAME)
}

/// File name for an export taken at `now`.
///
/// Format: `taskflow-<stamp>.json` where the stamp is the ISO-8601 UTC time
/// with `:` and `.` replaced by `-`, e.g. `taskflow-2024-05-01T09-30-00-000Z.json`.
#[must_use]
pub fn export_filename(now: DateTime<Utc>) -> String {
    let stamp = now.format("%Y-%m-%dT%H-%M-%S-%3fZ");
    format!("taskflow-{stamp}.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_data_dir_env_override() {
        std::env::set_var(HOME_ENV, "/tmp/taskflow-test-home");
        assert_eq!(data_dir(), Some(PathBuf::from("/tmp/taskflow-test-home")));
        std::env::remove_var(HOME_ENV);
    }

    #[test]
    #[serial]
    fn test_data_dir_returns_home_based_path() {
        std::env::remove_var(HOME_ENV);
        if let Some(home) = dirs::home_dir() {
            assert_eq!(data_dir().unwrap(), home.join(".taskflow"));
        }
    }

    #[test]
    fn test_file_paths() {
        let dir = Path::new("/data");
        assert_eq!(db_path(dir), PathBuf::from("/data/taskflow.sqlite3"));
        assert_eq!(config_path(dir), PathBuf::from("/data/config.yaml"));
        assert_eq!(log_path(dir), PathBuf::from("/data/taskflow.log"));
    }

    #[test]
    fn test_export_filename() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
            + chrono::Duration::milliseconds(123);
        assert_eq!(export_filename(now), "taskflow-2024-05-01T09-30-00-123Z.json");
    }

    #[test]
    fn test_export_filename_has_no_colons_or_inner_dots() {
        let name = export_filename(Utc::now());
        let stem = name.strip_suffix(".json").unwrap();
        assert!(!stem.contains(':'));
        assert!(!stem.contains('.'));
    }
}
