//! Command-line interface for taskflow.
//!
//! Each invocation loads the board, applies one command and prints the
//! result. Listings and edited tasks are printed as JSON.

mod run;


pub use run::{run, CliOutput, RunContext};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Taskflow - a personal task list with filtered views and manual ordering.
///
/// Data lives in `~/.taskflow/` unless `--data-dir` or `TASKFLOW_HOME`
/// says otherwise.
#[derive(Parser, Debug)]
#[command(name = "taskflow")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the database, config and log file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a task to the end of the list.
    Add {
        /// Task title (must not be blank)
        title: String,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long, default_value = "")]
        due: String,

        /// Priority: low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: String,

        /// Free-form notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// List tasks through a filter and sort.
    ///
    /// The stored manual order is never changed by listing.
    List {
        /// Case-insensitive text matched against title and notes
        #[arg(short, long, default_value = "")]
        query: String,

        /// Status filter: all, active or completed
        #[arg(short, long, default_value = "all")]
        status: String,

        /// Priority filter: all, low, medium or high
        #[arg(short, long, default_value = "all")]
        priority: String,

        /// Sort as `<key>-<direction>`, e.g. `due-asc` or `created-desc`.
        /// Defaults to the configured sort.
        #[arg(long)]
        sort: Option<String>,
    },

    /// Edit fields of a task. Only the given fields change.
    Edit {
        /// Task ID
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New notes
        #[arg(short, long)]
        notes: Option<String>,

        /// New due date (empty to clear)
        #[arg(short, long)]
        due: Option<String>,

        /// New priority: low, medium or high
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// Flip a task between active and completed.
    Toggle {
        /// Task ID
        id: String,
    },

    /// Delete a task.
    Delete {
        /// Task ID
        id: String,
    },

    /// Delete every completed task.
    #[command(name = "clear-completed")]
    ClearCompleted,

    /// Move a task to the position currently held by another.
    Move {
        /// ID of the task to move
        source: String,

        /// ID of the task whose position it takes
        target: String,
    },

    /// Write every task to a timestamped JSON file.
    Export {
        /// Output directory (defaults to the configured export directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Replace all tasks with the contents of a JSON file.
    Import {
        /// File to import
        file: PathBuf,
    },

    /// Show or toggle the theme preference.
    Theme {
        /// What to do with the theme
        #[command(subcommand)]
        action: Option<ThemeCommand>,
    },
}

/// Theme subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeCommand {
    /// Print the current theme.
    Show,
    /// Switch between light and dark.
    Toggle,
}

impl Command {
    /// Returns true if this command can change stored data.
    #[must_use]
    pub const fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Self::List { .. }
                | Self::Export { .. }
                | Self::Theme { action: None | Some(ThemeCommand::Show) }
        )
    }
}
