//! Filtered and sorted views over the task collection.
//!
//! [`project`] is a pure function: it borrows the canonical tasks and returns
//! a new sequence of references, so nothing about the projection can leak
//! back into the store. Sorting is stable; tasks that compare equal keep
//! their manual order.

use crate::tasks::models::{Priority, Task};
use chrono::{DateTime, NaiveDate};
use std::cmp::Ordering;

/// Completion-status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Every task.
    #[default]
    All,
    /// Tasks that are not completed.
    Active,
    /// Completed tasks.
    Completed,
}

impl StatusFilter {
    /// Parse a status filter name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not `all`, `active` or `completed`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidCriterion> {
        match s {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(InvalidCriterion::new("status", s, "all, active, completed")),
        }
    }

    /// Get the string representation of the filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

/// Priority filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    /// Every priority.
    #[default]
    All,
    /// Only tasks with exactly this priority.
    Only(Priority),
}

impl PriorityFilter {
    /// Parse a priority filter name (`all` or a priority name).
    ///
    /// # Errors
    ///
    /// Returns an error if the name is neither `all` nor a priority.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidCriterion> {
        if s == "all" {
            return Ok(Self::All);
        }
        Priority::from_str(s)
            .map(Self::Only)
            .map_err(|_| InvalidCriterion::new("priority", s, "all, low, medium, high"))
    }

    /// Get the string representation of the filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(p) => p.as_str(),
        }
    }

    fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(p) => task.priority == p,
        }
    }
}

/// Error when a filter name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCriterion {
    /// Which criterion was being parsed.
    pub criterion: &'static str,
    /// The rejected value.
    pub value: String,
    /// Accepted values, for the message.
    pub expected: &'static str,
}

impl InvalidCriterion {
    fn new(criterion: &'static str, value: &str, expected: &'static str) -> Self {
        Self { criterion, value: value.to_string(), expected }
    }
}

impl std::fmt::Display for InvalidCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid {}: '{}' (must be one of: {})",
            self.criterion, self.value, self.expected
        )
    }
}

impl std::error::Error for InvalidCriterion {}

/// Filter criteria. A task passes when it satisfies all three.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Case-insensitive substring matched against title or notes.
    /// Surrounding whitespace is ignored; empty matches everything.
    pub query: String,
    /// Completion-status filter.
    pub status: StatusFilter,
    /// Priority filter.
    pub priority: PriorityFilter,
}

impl Filter {
    /// Whether `task` passes the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let query = self.query.trim().to_lowercase();
        matches_query(task, &query) && self.status.matches(task) && self.priority.matches(task)
    }
}

fn matches_query(task: &Task, lowered_query: &str) -> bool {
    lowered_query.is_empty()
        || task.title.to_lowercase().contains(lowered_query)
        || task.notes.to_lowercase().contains(lowered_query)
}

/// The field a view is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Creation timestamp.
    Created,
    /// Due date; tasks without one sort lowest.
    Due,
    /// Priority rank.
    Priority,
    /// Title.
    Title,
    /// Stored manual order (the drag-and-drop arrangement).
    #[default]
    Manual,
}

impl SortKey {
    /// Look up a sort key by name. Unknown names fall back to manual order.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "created" => Self::Created,
            "due" => Self::Due,
            "priority" => Self::Priority,
            "title" => Self::Title,
            _ => Self::Manual,
        }
    }

    /// Get the string representation of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Due => "due",
            Self::Priority => "priority",
            Self::Title => "title",
            Self::Manual => "manual",
        }
    }

    fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::Created => compare_timestamps(&a.created, &b.created),
            Self::Due => a.due.cmp(&b.due),
            Self::Priority => a.priority.rank().cmp(&b.priority.rank()),
            Self::Title => locale_compare(&a.title, &b.title),
            Self::Manual => a.order.cmp(&b.order),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Get the string representation of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Sort criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    /// Field to sort by.
    pub key: SortKey,
    /// Direction.
    pub direction: SortDirection,
}

impl Sort {
    /// Create sort criteria.
    #[must_use]
    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Parse `"<key>-<direction>"`, e.g. `created-desc`.
    ///
    /// Never fails: an unknown key means manual order and anything other
    /// than `desc` means ascending.
    #[must_use]
    pub fn parse(criteria: &str) -> Self {
        let (key, direction) = criteria.split_once('-').unwrap_or((criteria, ""));
        let direction = if direction == "desc" { SortDirection::Desc } else { SortDirection::Asc };
        Self { key: SortKey::from_name(key), direction }
    }

    fn compare(self, a: &Task, b: &Task) -> Ordering {
        let ord = self.key.compare(a, b);
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

impl std::fmt::Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.key.as_str(), self.direction.as_str())
    }
}

/// Derive the display sequence for `tasks` under `filter` and `sort`.
#[must_use]
pub fn project<'a>(tasks: &'a [Task], filter: &Filter, sort: &Sort) -> Vec<&'a Task> {
    let query = filter.query.trim().to_lowercase();
    let mut out: Vec<&Task> = tasks
        .iter()
        .filter(|t| {
            matches_query(t, &query) && filter.status.matches(t) && filter.priority.matches(t)
        })
        .collect();
    out.sort_by(|a, b| sort.compare(a, b));
    out
}

/// Compare two creation timestamps chronologically.
///
/// Unparseable timestamps all compare equal to each other and sort before
/// every parseable one, which keeps the order total.
fn compare_timestamps(a: &str, b: &str) -> Ordering {
    timestamp_millis(a).cmp(&timestamp_millis(b))
}

fn timestamp_millis(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Human-oriented string comparison.
///
/// Letters compare case-insensitively first; at equal letters lowercase
/// sorts before uppercase.
fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a.chars().flat_map(char::to_lowercase).cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.chars().map(char::is_uppercase).cmp(b.chars().map(char::is_uppercase)))
}
