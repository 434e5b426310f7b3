//! `privguard health <FILE>` or `privguard health --remote`

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use zeroize::Zeroizing;

use privguard_vault::{analyze_password_health, PasswordHealthReport, VaultEntry};

use crate::commands::{vault, write_json};
use crate::error::AppError;
use crate::state::AppContext;

#[derive(Args)]
pub struct HealthArgs {
    /// JSON array of vault entries with their passwords (the detail shape
    /// of the vault backend, e.g. `vault show <ID> --json` per entry)
    #[arg(required_unless_present = "remote", conflicts_with = "remote")]
    pub file: Option<PathBuf>,

    /// Fetch every entry from the vault backend instead of reading a file
    #[arg(long)]
    pub remote: bool,

    /// Session token for the vault backend, used with --remote
    #[arg(long, env = "PRIVGUARD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl std::fmt::Debug for HealthArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthArgs")
            .field("file", &self.file)
            .field("remote", &self.remote)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("json", &self.json)
            .finish()
    }
}

/// # Errors
///
/// Returns [`AppError::Io`] if the file cannot be read,
/// [`AppError::Json`] if it is not an entry array, or the backend's
/// errors with `--remote`.
pub fn analyze(args: &HealthArgs, ctx: &AppContext, out: &mut dyn Write) -> Result<(), AppError> {
    let entries = match &args.file {
        Some(file) if !args.remote => read_entries(file)?,
        _ => {
            let client = vault::connect(args.token.as_deref(), ctx)?;
            vault::fetch_with_passwords(&client)?
        }
    };
    report(&entries, args.json, out)
}

fn read_entries(file: &Path) -> Result<Vec<VaultEntry>, AppError> {
    let raw = Zeroizing::new(fs::read_to_string(file)?);
    Ok(serde_json::from_str(&raw)?)
}

fn report(entries: &[VaultEntry], json: bool, out: &mut dyn Write) -> Result<(), AppError> {
    let report = analyze_password_health(entries);
    tracing::info!(
        total = report.total_credentials,
        weak = report.weak_count,
        reused = report.reused_count,
        "password health analyzed"
    );
    render(&report, json, out)
}

fn render(report: &PasswordHealthReport, json: bool, out: &mut dyn Write) -> Result<(), AppError> {
    if json {
        return write_json(out, report);
    }
    writeln!(out, "Overall health: {}/100", report.overall_score)?;
    writeln!(
        out,
        "Credentials: {} (average strength {:.1})",
        report.total_credentials, report.average_strength
    )?;

    writeln!(out, "Weak passwords: {}", report.weak_count)?;
    for weak in &report.weak_credentials {
        writeln!(out, "  - {} ({}, {})", weak.service, weak.score, weak.label)?;
    }

    writeln!(
        out,
        "Reused passwords: {} in {} group(s)",
        report.reused_count,
        report.reused_groups.len()
    )?;
    for group in &report.reused_groups {
        let services: Vec<&str> = group
            .credentials
            .iter()
            .map(|c| c.service.as_str())
            .collect();
        writeln!(out, "  - {}", services.join(", "))?;
    }
    Ok(())
}
