//! Task model types for the task list.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Task priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority (default).
    #[default]
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Parse a priority from its exact lowercase name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not `low`, `medium` or `high`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidPriority> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(InvalidPriority(s.to_string())),
        }
    }

    /// Get the string representation of the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Ordinal rank used when sorting by priority (low=1, medium=2, high=3).
    ///
    /// Rank 0 is reserved for unrecognized priorities, which cannot be
    /// represented by this type.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid priority name is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPriority(pub String);

impl std::fmt::Display for InvalidPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid priority: '{}' (must be one of: low, medium, high)", self.0)
    }
}

impl std::error::Error for InvalidPriority {}

/// Error when a referenced task is not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNotFound(pub String);

impl std::fmt::Display for TaskNotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task not found: {}", self.0)
    }
}

impl std::error::Error for TaskNotFound {}

/// A single to-do item.
///
/// Field names match the persisted and exported JSON document exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, immutable once assigned.
    pub id: String,
    /// Short title describing the task.
    pub title: String,
    /// ISO 8601 timestamp when the task was created.
    pub created: String,
    /// ISO date the task is due, or empty for no due date.
    #[serde(default)]
    pub due: String,
    /// Priority level.
    #[serde(default)]
    pub priority: Priority,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Whether the task is done.
    #[serde(default)]
    pub completed: bool,
    /// Position in the manual ordering (always equal to the collection index).
    pub order: usize,
}

impl Task {
    /// Whether a due date is set.
    #[must_use]
    pub fn has_due(&self) -> bool {
        !self.due.is_empty()
    }

    /// Whether the task is still open and its due date lies before `today`.
    ///
    /// Accepts date-only values (`2024-01-31`) and full timestamps; a due
    /// value that parses as neither is never overdue.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        if self.completed || !self.has_due() {
            return false;
        }
        parse_due_date(&self.due).is_some_and(|due| due < today)
    }
}

/// The current time as an ISO 8601 UTC timestamp with millisecond precision.
#[must_use]
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a due value as a calendar date.
fn parse_due_date(due: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(due, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(due).ok().map(|dt| dt.date_naive()))
}

/// A single field edit applied by [`TaskStore::set_field`](super::TaskStore::set_field).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskField {
    /// Replace the title.
    Title(String),
    /// Replace the notes.
    Notes(String),
    /// Replace the due date (empty clears it).
    Due(String),
    /// Replace the priority.
    Priority(Priority),
    /// Set the completion flag.
    Completed(bool),
}

impl TaskField {
    /// Name of the field being edited.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::Notes(_) => "notes",
            Self::Due(_) => "due",
            Self::Priority(_) => "priority",
            Self::Completed(_) => "completed",
        }
    }

    pub(crate) fn apply(self, task: &mut Task) {
        match self {
            Self::Title(title) => task.title = title,
            Self::Notes(notes) => task.notes = notes,
            Self::Due(due) => task.due = due,
            Self::Priority(priority) => task.priority = priority,
            Self::Completed(completed) => task.completed = completed,
        }
    }
}
