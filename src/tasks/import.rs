//! Import sanitization.
//!
//! An imported document is untrusted: it may come from an older export, a
//! hand-edited file or something else entirely. [`sanitize`] rejects only a
//! document that is not a JSON array; every entry of an array is coerced into
//! a well-formed [`Task`] no matter how broken its fields are.
//!
//! Field rules:
//!
//! | field       | rule |
//! |-------------|------|
//! | `id`        | provided truthy value, else (or if already used in this document) a fresh ID |
//! | `title`     | text, at most [`MAX_TITLE_CHARS`] UTF-16 code units, may be empty |
//! | `created`   | provided truthy value, else now |
//! | `due`       | provided truthy value, else empty |
//! | `priority`  | `low`, `medium` or `high`, else `medium` |
//! | `notes`     | text, at most [`MAX_NOTES_CHARS`] UTF-16 code units |
//! | `completed` | truthiness of the provided value |
//! | `order`     | provided finite number, else the entry's index |
//!
//! The resulting tasks are arranged by that order (ties keep document order)
//! and renumbered from zero, so a document produced by export comes back
//! unchanged.

use crate::error::{Result, ValidationError};
use crate::tasks::id::generate_unique_id;
use crate::tasks::models::{now_timestamp, Priority, Task};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Maximum title length, in UTF-16 code units, kept from an imported entry.
pub const MAX_TITLE_CHARS: usize = 300;

/// Maximum notes length, in UTF-16 code units, kept from an imported entry.
pub const MAX_NOTES_CHARS: usize = 2000;

static MISSING: Value = Value::Null;

/// Parse and sanitize an imported document.
///
/// # Errors
///
/// Returns [`ValidationError::Malformed`] if `raw` is not valid JSON and
/// [`ValidationError::InvalidFormat`] if it is not an array.
pub fn sanitize(raw: &str) -> Result<Vec<Task>> {
    let document: Value =
        serde_json::from_str(raw).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    sanitize_value(&document)
}

/// Sanitize an already-parsed document.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidFormat`] if `document` is not an array.
pub fn sanitize_value(document: &Value) -> Result<Vec<Task>> {
    coerce_document(document, true)
}

/// Coerce a stored document the way an import is coerced, but keep text
/// fields at full length.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidFormat`] if `document` is not an array.
pub(crate) fn repair_stored(document: &Value) -> Result<Vec<Task>> {
    coerce_document(document, false)
}

fn coerce_document(document: &Value, truncate: bool) -> Result<Vec<Task>> {
    let Value::Array(entries) = document else {
        return Err(ValidationError::InvalidFormat.into());
    };

    let empty = Map::new();
    let mut seen = HashSet::with_capacity(entries.len());
    let mut keyed: Vec<(f64, Task)> = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let fields = entry.as_object().unwrap_or(&empty);
        let (order, task) = sanitize_entry(fields, index, &seen, truncate);
        seen.insert(task.id.clone());
        keyed.push((order, task));
    }

    keyed.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    let tasks = keyed
        .into_iter()
        .enumerate()
        .map(|(position, (_, task))| Task { order: position, ..task })
        .collect();
    Ok(tasks)
}

/// Coerce one entry, returning its recorded order alongside the task.
#[allow(clippy::cast_precision_loss)]
fn sanitize_entry(
    fields: &Map<String, Value>,
    index: usize,
    seen: &HashSet<String>,
    truncate: bool,
) -> (f64, Task) {
    let field = |name: &str| fields.get(name).unwrap_or(&MISSING);
    let capped = |text: String, max: usize| if truncate { truncate_utf16(text, max) } else { text };

    let id = Some(field("id"))
        .filter(|v| is_truthy(v))
        .map(coerce_text)
        .filter(|id| !seen.contains(id))
        .unwrap_or_else(|| generate_unique_id(|candidate| seen.contains(candidate)));

    let created =
        Some(field("created")).filter(|v| is_truthy(v)).map_or_else(now_timestamp, coerce_text);

    let priority = field("priority")
        .as_str()
        .and_then(|p| Priority::from_str(p).ok())
        .unwrap_or_default();

    let order = field("order").as_f64().filter(|n| n.is_finite()).unwrap_or(index as f64);

    let task = Task {
        id,
        title: capped(coerce_text(field("title")), MAX_TITLE_CHARS),
        created,
        due: coerce_text(field("due")),
        priority,
        notes: capped(coerce_text(field("notes")), MAX_NOTES_CHARS),
        completed: is_truthy(field("completed")),
        order: index,
    };
    (order, task)
}

/// Loose truthiness: `null`, `false`, `0`, `NaN` and `""` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a value as text; falsy values become the empty string.
fn coerce_text(value: &Value) -> String {
    if !is_truthy(value) {
        return String::new();
    }
    to_text(value)
}

fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(to_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Shortest decimal form: integers print without a fractional part.
#[allow(clippy::cast_possible_truncation)]
fn number_text(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{}", f as i128),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Keep at most `max` UTF-16 code units, never splitting a surrogate pair.
fn truncate_utf16(s: String, max: usize) -> String {
    let mut units = 0;
    for (byte_index, c) in s.char_indices() {
        units += c.len_utf16();
        if units > max {
            return s[..byte_index].to_string();
        }
    }
    s
}
