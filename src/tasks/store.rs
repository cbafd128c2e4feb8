//! The canonical task collection.
//!
//! [`TaskStore`] owns the ordered list of tasks and is the only writer of it.
//! Every mutating operation finishes with the collection renumbered (each
//! task's `order` equals its index) and written to the backing
//! [`KeyValueStore`]. A failed write is logged and otherwise ignored: the
//! in-memory state stays authoritative and [`TaskStore::is_synced`] reports
//! the divergence until the next successful write.

use crate::error::{Result, ValidationError};
use crate::storage;
use crate::tasks::id::generate_unique_id;
use crate::tasks::models::{now_timestamp, Priority, Task, TaskField, TaskNotFound};
use crate::traits::KeyValueStore;

/// Owner of the canonical, ordered task collection.
#[derive(Debug)]
pub struct TaskStore<S: KeyValueStore> {
    backend: S,
    tasks: Vec<Task>,
    synced: bool,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Load the collection from `backend`, or start empty.
    ///
    /// A stored document that cannot be read or is not a task array never
    /// fails the load; it is logged and the store starts with no tasks.
    /// Entries of a stored array are repaired, arranged by their recorded
    /// order and renumbered.
    pub fn load_or_init(backend: S) -> Self {
        let tasks = match storage::load_tasks(&backend) {
            Ok(tasks) => tasks,
            Err(e) if e.is_persistence() => {
                tracing::error!(error = %e, "failed to read tasks, starting with an empty list");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored tasks are malformed, starting with an empty list");
                Vec::new()
            }
        };
        tracing::debug!(count = tasks.len(), "task store loaded");
        Self { backend, tasks, synced: true }
    }

    /// The tasks in manual order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Get a task by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether there are no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The backing key-value store.
    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Whether the last write reached the backing store.
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        self.synced
    }

    /// Create a task and append it to the end of the manual order.
    ///
    /// Title, due date and notes are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] if the trimmed title is empty;
    /// the collection is left untouched.
    pub fn add(&mut self, title: &str, due: &str, priority: Priority, notes: &str) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }

        let id = generate_unique_id(|candidate| self.position(candidate).is_some());
        let task = Task {
            id,
            title: title.to_string(),
            created: now_timestamp(),
            due: due.trim().to_string(),
            priority,
            notes: notes.trim().to_string(),
            completed: false,
            order: self.tasks.len(),
        };

        tracing::debug!(task_id = %task.id, "task added");
        self.tasks.push(task.clone());
        self.persist();
        Ok(task)
    }

    /// Edit one field of a task in place. The manual order is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskNotFound`] if no task has the given ID.
    pub fn set_field(&mut self, id: &str, field: TaskField) -> Result<&Task> {
        let index = self.position(id).ok_or_else(|| TaskNotFound(id.to_string()))?;
        tracing::debug!(task_id = %id, field = field.name(), "task field updated");
        field.apply(&mut self.tasks[index]);
        self.persist();
        Ok(&self.tasks[index])
    }

    /// Flip the completion flag of a task, returning the new value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskNotFound`] if no task has the given ID.
    pub fn toggle_completed(&mut self, id: &str) -> Result<bool> {
        let current = self.get(id).ok_or_else(|| TaskNotFound(id.to_string()))?.completed;
        let task = self.set_field(id, TaskField::Completed(!current))?;
        Ok(task.completed)
    }

    /// Delete a task by ID.
    ///
    /// Deleting an ID that does not exist is a no-op. Returns whether a task
    /// was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.tasks.remove(index);
        tracing::debug!(task_id = %id, "task deleted");
        self.renumber();
        self.persist();
        true
    }

    /// Remove every completed task, returning how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        if removed == 0 {
            return 0;
        }
        tracing::debug!(removed, "completed tasks cleared");
        self.renumber();
        self.persist();
        removed
    }

    /// Move `source_id` to the position currently held by `target_id`.
    ///
    /// The source is taken out of the list and reinserted at the index the
    /// target had before the removal, so a task dragged upwards lands in
    /// front of the target and a task dragged downwards lands just after
    /// it. Missing IDs or `source_id == target_id` make this a no-op.
    /// Returns whether anything moved.
    pub fn reorder(&mut self, source_id: &str, target_id: &str) -> bool {
        let (Some(from), Some(to)) = (self.position(source_id), self.position(target_id)) else {
            return false;
        };
        if from == to {
            return false;
        }

        let moved = self.tasks.remove(from);
        self.tasks.insert(to, moved);
        tracing::debug!(source = %source_id, target = %target_id, from, to, "task reordered");
        self.renumber();
        self.persist();
        true
    }

    /// Replace the whole collection with already-sanitized tasks.
    ///
    /// The input is trusted as-is apart from renumbering its `order` fields
    /// to match the given sequence.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        tracing::debug!(count = tasks.len(), "task collection replaced");
        self.tasks = tasks;
        self.renumber();
        self.persist();
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn renumber(&mut self) {
        for (i, task) in self.tasks.iter_mut().enumerate() {
            task.order = i;
        }
    }

    fn persist(&mut self) {
        match storage::save_tasks(&self.backend, &self.tasks) {
            Ok(()) => self.synced = true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist tasks; changes are kept in memory");
                self.synced = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::storage::keys;
    use crate::tasks::id::{disable_deterministic_ids, enable_deterministic_ids};
    use crate::testing::MemoryStore;
    use serial_test::serial;

    fn create_test_store() -> TaskStore<MemoryStore> {
        TaskStore::load_or_init(MemoryStore::new())
    }

    fn add(store: &mut TaskStore<MemoryStore>, title: &str) -> String {
        store.add(title, "", Priority::Medium, "").unwrap().id
    }

    fn titles(store: &TaskStore<MemoryStore>) -> Vec<&str> {
        store.tasks().iter().map(|t| t.title.as_str()).collect()
    }

    fn assert_dense(store: &TaskStore<MemoryStore>) {
        for (i, task) in store.tasks().iter().enumerate() {
            assert_eq!(task.order, i, "task {} has order {}", task.id, task.order);
        }
    }

    #[test]
    #[serial]
    fn test_add_task() {
        enable_deterministic_ids();
        let mut store = create_test_store();

        let task = store.add("  Write report  ", " 2024-03-01 ", Priority::High, " draft ").unwrap();
        assert_eq!(task.id, "task-0000");
        assert_eq!(task.title, "Write report");
        assert_eq!(task.due, "2024-03-01");
        assert_eq!(task.notes, "draft");
        assert_eq!(task.priority, Priority::High);
        assert!(!task.completed);
        assert_eq!(task.order, 0);
        assert!(chrono::DateTime::parse_from_rfc3339(&task.created).is_ok());

        let second = store.add("Second", "", Priority::Low, "").unwrap();
        assert_eq!(second.order, 1);
        assert_eq!(store.len(), 2);

        disable_deterministic_ids();
    }

    #[test]
    fn test_add_empty_title_rejected() {
        let mut store = create_test_store();

        let err = store.add("   ", "", Priority::Medium, "").unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::EmptyTitle)));
        assert!(store.is_empty());
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn test_add_persists() {
        let mut store = create_test_store();
        let id = add(&mut store, "Persist me");

        let reloaded = storage::load_tasks(store.backend()).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].id, id);
    }

    #[test]
    fn test_set_field() {
        let mut store = create_test_store();
        let id = add(&mut store, "Original");
        add(&mut store, "Other");

        let task = store.set_field(&id, TaskField::Title("Renamed".to_string())).unwrap();
        assert_eq!(task.title, "Renamed");
        assert_eq!(task.order, 0);

        store.set_field(&id, TaskField::Priority(Priority::High)).unwrap();
        store.set_field(&id, TaskField::Due("2024-12-24".to_string())).unwrap();
        store.set_field(&id, TaskField::Notes("wrap gifts".to_string())).unwrap();

        let task = store.get(&id).unwrap();
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due, "2024-12-24");
        assert_eq!(task.notes, "wrap gifts");

        let persisted = storage::load_tasks(store.backend()).unwrap();
        assert_eq!(persisted[0].title, "Renamed");
        assert_eq!(persisted[0].notes, "wrap gifts");
    }

    #[test]
    fn test_set_field_missing_task() {
        let mut store = create_test_store();
        add(&mut store, "Only");

        let err = store.set_field("nope", TaskField::Completed(true)).unwrap_err();
        assert!(matches!(err, Error::NotFound(TaskNotFound(ref id)) if id == "nope"));
    }

    #[test]
    fn test_toggle_completed() {
        let mut store = create_test_store();
        let id = add(&mut store, "Toggle me");

        assert!(store.toggle_completed(&id).unwrap());
        assert!(store.get(&id).unwrap().completed);
        assert!(!store.toggle_completed(&id).unwrap());
        assert!(!store.get(&id).unwrap().completed);

        assert!(store.toggle_completed("missing").is_err());
    }

    #[test]
    fn test_delete_renumbers() {
        let mut store = create_test_store();
        add(&mut store, "A");
        let b = add(&mut store, "B");
        add(&mut store, "C");

        assert!(store.delete(&b));
        assert_eq!(titles(&store), vec!["A", "C"]);
        assert_dense(&store);

        let persisted = storage::load_tasks(store.backend()).unwrap();
        assert_eq!(persisted[1].title, "C");
        assert_eq!(persisted[1].order, 1);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut store = create_test_store();
        add(&mut store, "A");
        add(&mut store, "B");
        let before = store.tasks().to_vec();
        let writes = store.backend().write_count();

        assert!(!store.delete("missing"));
        assert!(!store.delete("missing"));
        assert_eq!(store.tasks(), before.as_slice());
        assert_eq!(store.backend().write_count(), writes);
    }

    #[test]
    fn test_clear_completed() {
        let mut store = create_test_store();
        let a = add(&mut store, "A");
        add(&mut store, "B");
        let c = add(&mut store, "C");
        add(&mut store, "D");
        store.toggle_completed(&a).unwrap();
        store.toggle_completed(&c).unwrap();

        assert_eq!(store.clear_completed(), 2);
        assert_eq!(titles(&store), vec!["B", "D"]);
        assert_dense(&store);

        assert_eq!(store.clear_completed(), 0);
    }

    #[test]
    fn test_reorder_upwards() {
        let mut store = create_test_store();
        add(&mut store, "A");
        let b = add(&mut store, "B");
        add(&mut store, "C");
        let d = add(&mut store, "D");

        assert!(store.reorder(&d, &b));
        assert_eq!(titles(&store), vec!["A", "D", "B", "C"]);
        let orders: Vec<usize> = store.tasks().iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_reorder_downwards() {
        let mut store = create_test_store();
        let a = add(&mut store, "A");
        add(&mut store, "B");
        let c = add(&mut store, "C");
        add(&mut store, "D");

        assert!(store.reorder(&a, &c));
        assert_eq!(titles(&store), vec!["B", "C", "A", "D"]);
        assert_dense(&store);
    }

    #[test]
    fn test_reorder_noops() {
        let mut store = create_test_store();
        let a = add(&mut store, "A");
        add(&mut store, "B");
        let writes = store.backend().write_count();

        assert!(!store.reorder(&a, &a));
        assert!(!store.reorder(&a, "missing"));
        assert!(!store.reorder("missing", &a));
        assert_eq!(titles(&store), vec!["A", "B"]);
        assert_eq!(store.backend().write_count(), writes);
    }

    #[test]
    fn test_replace_all_renumbers() {
        let mut store = create_test_store();
        add(&mut store, "Old");

        let mut incoming = vec![
            store.tasks()[0].clone(),
            Task { id: "new".to_string(), title: "New".to_string(), ..store.tasks()[0].clone() },
        ];
        incoming[0].id = "first".to_string();
        incoming[0].order = 7;
        incoming[1].order = 7;

        store.replace_all(incoming);
        let ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "new"]);
        assert_dense(&store);
        assert_eq!(storage::load_tasks(store.backend()).unwrap().len(), 2);
    }

    #[test]
    fn test_load_or_init_reads_existing() {
        let doc = r#"[
            {"id": "b", "title": "B", "created": "2024-01-02T00:00:00Z", "order": 1},
            {"id": "a", "title": "A", "created": "2024-01-01T00:00:00Z", "order": 0}
        ]"#;
        let store = TaskStore::load_or_init(MemoryStore::with_value(keys::TASKS, doc));

        let ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_dense(&store);
    }

    #[test]
    fn test_load_or_init_malformed_document() {
        let store = TaskStore::load_or_init(MemoryStore::with_value(keys::TASKS, "{{garbage"));
        assert!(store.is_empty());
        assert!(store.is_synced());
    }

    #[test]
    fn test_load_or_init_read_failure() {
        let backend = MemoryStore::with_value(keys::TASKS, "[]");
        backend.fail_reads(true);
        let store = TaskStore::load_or_init(backend);
        assert!(store.is_empty());
    }

    #[test]
    fn test_persistence_failure_keeps_mutation() {
        let mut store = create_test_store();
        let a = add(&mut store, "A");
        assert!(store.is_synced());

        store.backend().fail_writes(true);
        let b = add(&mut store, "B");
        assert_eq!(store.len(), 2);
        assert!(!store.is_synced());

        // Durable state still only has the first task
        assert_eq!(storage::load_tasks(store.backend()).unwrap().len(), 1);

        store.backend().fail_writes(false);
        store.reorder(&b, &a);
        assert!(store.is_synced());
        let persisted = storage::load_tasks(store.backend()).unwrap();
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[0].id, b);
    }

    #[test]
    fn test_load_or_init_ties_keep_stored_order() {
        let doc = r#"[
            {"id": "x", "title": "X", "order": 5},
            {"id": "y", "title": "Y", "order": 2},
            {"id": "z", "title": "Z", "order": 5, "priority": "urgent"}
        ]"#;
        let store = TaskStore::load_or_init(MemoryStore::with_value(keys::TASKS, doc));

        let ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["y", "x", "z"]);
        assert_dense(&store);
        assert_eq!(store.get("z").unwrap().priority, Priority::Medium);
    }
}
