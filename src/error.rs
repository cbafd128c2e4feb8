//! Error types for `taskflow`.

use crate::tasks::models::TaskNotFound;

/// Errors that can occur while managing the task list.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A `SQLite` database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// User input or an imported document was rejected.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// An operation referenced a task id that does not exist.
    #[error("{0}")]
    NotFound(#[from] TaskNotFound),
}

impl Error {
    /// Whether this error came from the durable store rather than from input.
    ///
    /// Persistence failures are logged and swallowed by the task store; they
    /// never roll back an in-memory mutation.
    #[must_use]
    pub const fn is_persistence(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Database(_))
    }
}

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The title was empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,

    /// The imported document is not an array of entries.
    #[error("Invalid format")]
    InvalidFormat,

    /// The imported document is not valid JSON.
    #[error("{0}")]
    Malformed(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationError::EmptyTitle.to_string(), "title must not be empty");
        assert_eq!(ValidationError::InvalidFormat.to_string(), "Invalid format");
        assert_eq!(
            Error::from(ValidationError::Malformed("EOF while parsing".to_string())).to_string(),
            "EOF while parsing"
        );
    }

    #[test]
    fn test_is_persistence() {
        let io = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded"));
        assert!(io.is_persistence());

        let db = Error::from(rusqlite::Error::InvalidQuery);
        assert!(db.is_persistence());

        assert!(!Error::from(ValidationError::EmptyTitle).is_persistence());
        assert!(!Error::from(TaskNotFound("x".to_string())).is_persistence());
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::from(TaskNotFound("abc".to_string()));
        assert_eq!(err.to_string(), "task not found: abc");
    }
}
