//! CLI binary for `taskflow`.
//!
//! This binary is a thin wrapper that parses arguments, opens the board and
//! delegates to the library.

use std::process::ExitCode;

use clap::Parser;
use taskflow::board::Board;
use taskflow::cli::{run, Cli, RunContext};
use taskflow::config::Config;
use taskflow::storage::SqliteStore;
use taskflow::{logging, paths};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(data_dir) = cli.data_dir.clone().or_else(paths::data_dir) else {
        eprintln!("Error: cannot determine a data directory; set {}", paths::HOME_ENV);
        return ExitCode::from(1);
    };

    let config = Config::load_or_default(&data_dir);
    logging::init(config.log_level(), &paths::log_path(&data_dir));
    tracing::debug!(data_dir = %data_dir.display(), command = ?cli.command, "starting");

    let backend = match SqliteStore::new(config.database_path(&data_dir)) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "failed to open database");
            eprintln!("Error opening database: {e}");
            return ExitCode::from(1);
        }
    };

    let mut board = Board::with_sort(backend, config.default_view());
    let output = run(cli.command, &mut board, &RunContext::now(config.export_dir()));

    for line in output.stdout {
        println!("{line}");
    }
    for line in output.stderr {
        eprintln!("{line}");
    }

    output.exit_code
}
