//! Task management.
//!
//! This module provides the task list core:
//! - Tasks with title, due date, priority, notes and a completion flag
//! - A canonical collection whose manual order survives any sort of the view
//! - Filtered and sorted projections that never touch the collection
//! - Sanitizing import and pretty-printed export
//!
//! # Example
//!
//! ```no_run
//! use taskflow::storage::SqliteStore;
//! use taskflow::tasks::{project, Filter, Priority, Sort, TaskStore};
//!
//! let backend = SqliteStore::new("/tmp/taskflow.sqlite3").unwrap();
//! let mut store = TaskStore::load_or_init(backend);
//!
//! let report = store.add("Write report", "2024-06-01", Priority::High, "").unwrap();
//! let groceries = store.add("Buy groceries", "", Priority::Low, "milk, eggs").unwrap();
//!
//! // Drag the groceries above the report
//! store.reorder(&groceries.id, &report.id);
//!
//! let by_due = project(store.tasks(), &Filter::default(), &Sort::parse("due-asc"));
//! ```

pub mod export;
pub mod id;
pub mod import;
pub mod models;
pub mod store;
pub mod view;

pub use export::{export_tasks, Export};
pub use import::{sanitize, sanitize_value};
pub use models::{InvalidPriority, Priority, Task, TaskField, TaskNotFound};
pub use store::TaskStore;
pub use view::{
    project, Filter, InvalidCriterion, PriorityFilter, Sort, SortDirection, SortKey, StatusFilter,
};
