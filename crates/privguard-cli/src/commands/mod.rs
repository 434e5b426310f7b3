//! Command handlers for the `privguard` binary.
//!
//! Each submodule owns its clap arguments, runs the operation against
//! `privguard-core` / `privguard-vault`, and renders text or JSON to the
//! writer it is given. Secrets are only ever written to that writer.

pub mod breach;
pub mod health;
pub mod identity;
pub mod inbox;
pub mod password_generator;
pub mod pwned;
pub mod settings;
pub mod strength;
pub mod vault;

use std::io::{self, BufRead, Write};

use clap::Subcommand;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::error::AppError;
use crate::state::AppContext;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a password (0-100) and label it Weak, Moderate or Strong
    Score(strength::ScoreArgs),

    /// Generate random passwords with every character class present
    Generate(password_generator::GenerateArgs),

    /// Check a password against the breached-password range service
    Pwned(pwned::PwnedArgs),

    /// Show breach analytics for an email address
    Breach(breach::BreachArgs),

    /// Generate a fake identity for sign-ups
    Identity(identity::IdentityArgs),

    /// Analyze vault entries for weak and reused passwords
    Health(health::HealthArgs),

    /// List and edit entries in the vault backend
    Vault(vault::VaultArgs),

    /// Use a temporary mailbox
    #[command(subcommand)]
    Inbox(inbox::InboxCommand),

    /// Show or change settings
    #[command(subcommand)]
    Settings(settings::SettingsCommand),
}

/// Run `command`, writing its output to `out`.
///
/// # Errors
///
/// Propagates the failure of the selected command.
pub fn execute(
    command: Command,
    ctx: &mut AppContext,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    match command {
        Command::Score(args) => strength::score(&args, out),
        Command::Generate(args) => password_generator::generate(&args, out),
        Command::Pwned(args) => pwned::check(&args, ctx, out),
        Command::Breach(args) => breach::check(&args, ctx, out),
        Command::Identity(args) => identity::generate(&args, out),
        Command::Health(args) => health::analyze(&args, ctx, out),
        Command::Vault(args) => vault::run(&args, ctx, out),
        Command::Inbox(cmd) => inbox::run(&cmd, ctx, out),
        Command::Settings(cmd) => settings::run(&cmd, ctx, out),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Password from the argument, or the first line of stdin with `--stdin`.
pub(crate) fn secret_input(
    arg: Option<&str>,
    from_stdin: bool,
) -> Result<Zeroizing<String>, AppError> {
    if from_stdin {
        return read_secret_line(&mut io::stdin().lock());
    }
    arg.map(|s| Zeroizing::new(s.to_owned()))
        .ok_or_else(|| AppError::InvalidInput("provide a password or use --stdin".into()))
}

/// First line of `reader` without its line ending.
pub(crate) fn read_secret_line(reader: &mut dyn BufRead) -> Result<Zeroizing<String>, AppError> {
    let mut line = Zeroizing::new(String::new());
    reader.read_line(&mut line)?;
    let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed_len);
    Ok(line)
}

/// Pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    out: &mut dyn Write,
    value: &T,
) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_line_strips_line_ending() {
        let mut input: &[u8] = b"hunter2\r\nignored\n";
        assert_eq!(read_secret_line(&mut input).unwrap().as_str(), "hunter2");

        let mut bare: &[u8] = b"no-newline";
        assert_eq!(read_secret_line(&mut bare).unwrap().as_str(), "no-newline");
    }

    #[test]
    fn secret_line_keeps_inner_whitespace() {
        let mut input: &[u8] = b" pass word \n";
        assert_eq!(
            read_secret_line(&mut input).unwrap().as_str(),
            " pass word "
        );
    }

    #[test]
    fn missing_password_is_invalid_input() {
        assert!(matches!(
            secret_input(None, false),
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(secret_input(Some("pw"), false).unwrap().as_str(), "pw");
    }
}
