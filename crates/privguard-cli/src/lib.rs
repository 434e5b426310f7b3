//! The `privguard` command-line shell.
//!
//! Parses arguments, sets up logging, resolves the data directory and
//! dispatches to `commands`. All network access lives in `api`.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod api;
pub mod commands;
pub mod error;
pub mod state;

#[cfg(test)]
mod test_server;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use commands::Command;
use error::AppError;
use state::AppContext;

#[derive(Parser, Debug)]
#[command(
    name = "privguard",
    version,
    about = "Password quality, breach checks and disposable identities"
)]
pub struct Cli {
    /// Directory holding settings.json and store.json
    #[arg(long, global = true, env = "PRIVGUARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Default log filter for a `-v` count, used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose)));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Run a parsed command line, writing command output to `out`.
///
/// # Errors
///
/// Returns the failure of context setup or of the command itself.
pub fn execute(cli: Cli, out: &mut dyn io::Write) -> Result<(), AppError> {
    let mut ctx = AppContext::load(cli.data_dir)?;
    commands::execute(cli.command, &mut ctx, out)
}

/// Entry point of the `privguard` binary.
#[must_use]
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("privguard: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_follows_verbosity() {
        assert_eq!(default_log_level(0), "warn");
        assert_eq!(default_log_level(1), "info");
        assert_eq!(default_log_level(5), "debug");
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
