//! Command execution for the CLI.
//!
//! This module handles running CLI commands against a board and producing
//! output.

use crate::board::Board;
use crate::cli::{Command, ThemeCommand};
use crate::error::Error;
use crate::tasks::{Filter, Priority, PriorityFilter, Sort, StatusFilter, Task, TaskField};
use crate::traits::KeyValueStore;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Output from running the CLI, with separate stdout and stderr messages.
#[derive(Debug)]
pub struct CliOutput {
    /// Exit code for the process.
    pub exit_code: ExitCode,
    /// Messages to print to stdout.
    pub stdout: Vec<String>,
    /// Messages to print to stderr.
    pub stderr: Vec<String>,
}

/// Environment a command runs in.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Directory exports go to when `--dir` is not given.
    pub export_dir: PathBuf,
    /// Current time, used for export file names.
    pub now: DateTime<Utc>,
    /// Today's local date, used for the overdue flag.
    pub today: NaiveDate,
}

impl RunContext {
    /// A context for the current moment.
    #[must_use]
    pub fn now(export_dir: PathBuf) -> Self {
        Self { export_dir, now: Utc::now(), today: chrono::Local::now().date_naive() }
    }
}

/// Run a CLI command against `board`.
pub fn run<S: KeyValueStore>(command: Command, board: &mut Board<S>, ctx: &RunContext) -> CliOutput {
    let mutating = command.is_mutating();
    let output = match command {
        Command::Add { title, due, priority, notes } => {
            run_add(board, &title, &due, &priority, &notes, ctx)
        }
        Command::List { query, status, priority, sort } => {
            run_list(board, query, &status, &priority, sort.as_deref(), ctx)
        }
        Command::Edit { id, title, notes, due, priority } => {
            run_edit(board, &id, title, notes, due, priority.as_deref(), ctx)
        }
        Command::Toggle { id } => run_toggle(board, &id),
        Command::Delete { id } => run_delete(board, &id),
        Command::ClearCompleted => run_clear_completed(board),
        Command::Move { source, target } => run_move(board, &source, &target),
        Command::Export { dir } => {
            run_export(board, dir.as_deref().unwrap_or(ctx.export_dir.as_path()), ctx)
        }
        Command::Import { file } => run_import(board, &file),
        Command::Theme { action } => run_theme(board, action.unwrap_or(ThemeCommand::Show)),
    };

    if mutating && !board.store().is_synced() {
        return with_unsaved_warning(output);
    }
    output
}

// === Task Commands ===

fn run_add<S: KeyValueStore>(
    board: &mut Board<S>,
    title: &str,
    due: &str,
    priority: &str,
    notes: &str,
    ctx: &RunContext,
) -> CliOutput {
    let priority = match Priority::from_str(priority) {
        Ok(p) => p,
        Err(e) => return error_output(e),
    };
    match board.store_mut().add(title, due, priority, notes) {
        Ok(task) => json_output(&TaskOutput::new(&task, ctx.today)),
        Err(e) => error_output(e),
    }
}

fn run_list<S: KeyValueStore>(
    board: &mut Board<S>,
    query: String,
    status: &str,
    priority: &str,
    sort: Option<&str>,
    ctx: &RunContext,
) -> CliOutput {
    let status = match StatusFilter::from_str(status) {
        Ok(s) => s,
        Err(e) => return error_output(e),
    };
    let priority = match PriorityFilter::from_str(priority) {
        Ok(p) => p,
        Err(e) => return error_output(e),
    };

    board.filter = Filter { query, status, priority };
    if let Some(sort) = sort {
        board.sort = Sort::parse(sort);
    }

    let tasks: Vec<TaskOutput<'_>> =
        board.project().into_iter().map(|t| TaskOutput::new(t, ctx.today)).collect();
    json_output(&tasks)
}

fn run_edit<S: KeyValueStore>(
    board: &mut Board<S>,
    id: &str,
    title: Option<String>,
    notes: Option<String>,
    due: Option<String>,
    priority: Option<&str>,
    ctx: &RunContext,
) -> CliOutput {
    let mut fields = Vec::new();
    if let Some(title) = title {
        fields.push(TaskField::Title(title));
    }
    if let Some(notes) = notes {
        fields.push(TaskField::Notes(notes));
    }
    if let Some(due) = due {
        fields.push(TaskField::Due(due));
    }
    if let Some(priority) = priority {
        match Priority::from_str(priority) {
            Ok(p) => fields.push(TaskField::Priority(p)),
            Err(e) => return error_output(e),
        }
    }

    if fields.is_empty() {
        return error_output(
            "Nothing to edit: pass at least one of --title, --notes, --due, --priority",
        );
    }

    for field in fields {
        if let Err(e) = board.store_mut().set_field(id, field) {
            return error_output(e);
        }
    }

    match board.store().get(id) {
        Some(task) => json_output(&TaskOutput::new(task, ctx.today)),
        None => error_output(format!("task not found: {id}")),
    }
}

fn run_toggle<S: KeyValueStore>(board: &mut Board<S>, id: &str) -> CliOutput {
    match board.store_mut().toggle_completed(id) {
        Ok(true) => success_output(format!("Completed {id}")),
        Ok(false) => success_output(format!("Reopened {id}")),
        Err(e) => error_output(e),
    }
}

fn run_delete<S: KeyValueStore>(board: &mut Board<S>, id: &str) -> CliOutput {
    if board.store_mut().delete(id) {
        success_output(format!("Deleted {id}"))
    } else {
        success_output("Nothing to delete".to_string())
    }
}

fn run_clear_completed<S: KeyValueStore>(board: &mut Board<S>) -> CliOutput {
    let removed = board.store_mut().clear_completed();
    success_output(format!("Cleared {removed} completed task(s)"))
}

fn run_move<S: KeyValueStore>(board: &mut Board<S>, source: &str, target: &str) -> CliOutput {
    if board.store_mut().reorder(source, target) {
        let position = board.store().get(source).map_or(0, |t| t.order);
        success_output(format!("Moved {source} to position {position}"))
    } else {
        success_output("Nothing to move".to_string())
    }
}

// === Import / Export ===

fn run_export<S: KeyValueStore>(board: &Board<S>, dir: &Path, ctx: &RunContext) -> CliOutput {
    let export = match board.export(ctx.now) {
        Ok(export) => export,
        Err(e) => return error_output(format!("Export failed: {e}")),
    };

    let path = dir.join(&export.filename);
    let written =
        std::fs::create_dir_all(dir).and_then(|()| std::fs::write(&path, &export.contents));
    match written {
        Ok(()) => {
            tracing::info!(path = %path.display(), count = board.store().len(), "tasks exported");
            success_output(path.display().to_string())
        }
        Err(e) => error_output(format!("Export failed: {e}")),
    }
}

fn run_import<S: KeyValueStore>(board: &mut Board<S>, file: &Path) -> CliOutput {
    let raw = match std::fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(e) => return error_output(format!("Import failed: {e}")),
    };

    match board.import_document(&raw) {
        Ok(count) => success_output(format!("Imported {count} task(s)")),
        Err(e) => {
            tracing::warn!(error = %e, file = %file.display(), "import rejected");
            error_output(format!("Import failed: {}", import_reason(&e)))
        }
    }
}

fn import_reason(error: &Error) -> String {
    match error {
        Error::Validation(reason) => reason.to_string(),
        other => other.to_string(),
    }
}

// === Theme ===

fn run_theme<S: KeyValueStore>(board: &Board<S>, action: ThemeCommand) -> CliOutput {
    let theme = match action {
        ThemeCommand::Show => board.theme(),
        ThemeCommand::Toggle => board.toggle_theme(),
    };
    success_output(theme.to_string())
}

// === Output Helpers ===

fn json_output<T: Serialize>(value: &T) -> CliOutput {
    match serde_json::to_string_pretty(value) {
        Ok(json) => CliOutput { exit_code: ExitCode::SUCCESS, stdout: vec![json], stderr: vec![] },
        Err(e) => error_output(e),
    }
}

fn success_output(message: String) -> CliOutput {
    CliOutput { exit_code: ExitCode::SUCCESS, stdout: vec![message], stderr: vec![] }
}

fn error_output(message: impl Display) -> CliOutput {
    CliOutput { exit_code: ExitCode::from(1), stdout: vec![], stderr: vec![message.to_string()] }
}

fn with_unsaved_warning(mut output: CliOutput) -> CliOutput {
    output.stderr.push("Warning: changes could not be saved".to_string());
    output.exit_code = ExitCode::from(1);
    output
}

// === Output Types ===

/// A task as printed by the CLI, with its derived overdue flag.
#[derive(Debug, Serialize)]
struct TaskOutput<'a> {
    #[serde(flatten)]
    task: &'a Task,
    overdue: bool,
}

impl<'a> TaskOutput<'a> {
    fn new(task: &'a Task, today: NaiveDate) -> Self {
        Self { task, overdue: task.is_overdue(today) }
    }
}
