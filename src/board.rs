//! The task board: collection, view criteria and theme behind one handle.
//!
//! A [`Board`] is what a front end drives. It owns the [`TaskStore`] plus
//! the current filter and sort, and wires import, export and the theme
//! preference to the same backing store.

use crate::error::Result;
use crate::storage::{self, Theme};
use crate::tasks::{export_tasks, import, project, Export, Filter, Sort, Task, TaskStore};
use crate::traits::KeyValueStore;
use chrono::{DateTime, Utc};

/// A task collection together with the criteria it is viewed through.
#[derive(Debug)]
pub struct Board<S: KeyValueStore> {
    store: TaskStore<S>,
    /// Current filter criteria.
    pub filter: Filter,
    /// Current sort criteria.
    pub sort: Sort,
}

impl<S: KeyValueStore> Board<S> {
    /// Load a board from `backend` with the default view.
    pub fn open(backend: S) -> Self {
        Self::with_sort(backend, Sort::default())
    }

    /// Load a board from `backend` with the given initial sort.
    pub fn with_sort(backend: S, sort: Sort) -> Self {
        Self { store: TaskStore::load_or_init(backend), filter: Filter::default(), sort }
    }

    /// The underlying collection.
    #[must_use]
    pub const fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    /// Mutable access to the underlying collection.
    pub fn store_mut(&mut self) -> &mut TaskStore<S> {
        &mut self.store
    }

    /// The tasks passing the current filter, in the current sort order.
    #[must_use]
    pub fn project(&self) -> Vec<&Task> {
        project(self.store.tasks(), &self.filter, &self.sort)
    }

    /// Replace the collection with the contents of an import document.
    ///
    /// Returns the number of imported tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or is not an
    /// array. The current collection is left untouched in that case.
    pub fn import_document(&mut self, raw: &str) -> Result<usize> {
        let tasks = import::sanitize(raw)?;
        let count = tasks.len();
        self.store.replace_all(tasks);
        tracing::info!(count, "tasks imported");
        Ok(count)
    }

    /// Render the whole collection as an export document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export(&self, now: DateTime<Utc>) -> Result<Export> {
        export_tasks(self.store.tasks(), now)
    }

    /// The stored theme preference.
    #[must_use]
    pub fn theme(&self) -> Theme {
        storage::load_theme(self.store.backend())
    }

    /// Switch to the other theme and persist the choice.
    ///
    /// A failed write is logged; the new theme is returned regardless.
    pub fn toggle_theme(&self) -> Theme {
        let theme = self.theme().toggled();
        if let Err(e) = storage::save_theme(self.store.backend(), theme) {
            tracing::warn!(error = %e, "failed to save theme preference");
        }
        theme
    }
}
