//! # `taskflow`
//!
//! A personal task list: a canonical, manually ordered collection of tasks,
//! filtered and sorted views over it, sanitizing JSON import and export, and
//! durable storage behind a small key-value seam.

pub mod board;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod storage;
pub mod tasks;
pub mod testing;
pub mod traits;

pub use board::Board;
pub use error::{Error, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
