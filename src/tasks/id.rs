//! Task ID generation utilities.
//!
//! Task IDs are random version 4 UUIDs rendered in their hyphenated form.
//! Tests can switch to a deterministic counter so that generated IDs are
//! predictable (`task-0000`, `task-0001`, ...).

use std::cell::Cell;

thread_local! {
    /// Counter for deterministic ID generation in tests.
    static TEST_COUNTER: Cell<u64> = const { Cell::new(0) };

    /// Whether to use deterministic IDs (for testing).
    static USE_DETERMINISTIC_IDS: Cell<bool> = const { Cell::new(false) };
}

/// Enable deterministic ID generation for testing.
///
/// When enabled, IDs on the calling thread use a counter instead of a
/// random UUID.
pub fn enable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.with(|flag| flag.set(true));
    TEST_COUNTER.with(|counter| counter.set(0));
}

/// Disable deterministic ID generation.
pub fn disable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.with(|flag| flag.set(false));
}

/// Generate a fresh task ID.
#[must_use]
pub fn generate_task_id() -> String {
    if USE_DETERMINISTIC_IDS.with(Cell::get) {
        let count = TEST_COUNTER.with(|counter| counter.replace(counter.get() + 1));
        format!("task-{count:04x}")
    } else {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Generate a task ID for which `is_taken` returns false.
///
/// The collection is unique by ID, so a colliding candidate is retried.
pub fn generate_unique_id(mut is_taken: impl FnMut(&str) -> bool) -> String {
    loop {
        let id = generate_task_id();
        if !is_taken(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_generate_task_id_is_uuid() {
        disable_deterministic_ids();

        let id = generate_task_id();
        assert_eq!(id.len(), 36);
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    #[serial]
    fn test_random_ids_differ() {
        disable_deterministic_ids();

        let id1 = generate_task_id();
        let id2 = generate_task_id();
        assert_ne!(id1, id2);
    }

    #[test]
    #[serial]
    fn test_deterministic_ids_increment() {
        enable_deterministic_ids();

        assert_eq!(generate_task_id(), "task-0000");
        assert_eq!(generate_task_id(), "task-0001");
        assert_eq!(generate_task_id(), "task-0002");

        disable_deterministic_ids();
    }

    #[test]
    #[serial]
    fn test_generate_unique_id_skips_taken() {
        enable_deterministic_ids();

        let taken = ["task-0000".to_string(), "task-0001".to_string()];
        let id = generate_unique_id(|candidate| taken.iter().any(|t| t == candidate));
        assert_eq!(id, "task-0002");

        disable_deterministic_ids();
    }
}
