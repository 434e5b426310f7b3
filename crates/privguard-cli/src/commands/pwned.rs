//! `privguard pwned`: k-anonymity breached-password check.

use std::io::Write;

use clap::Args;
use serde::Serialize;

use privguard_core::RangeQuery;

use crate::api::{self, RangeClient};
use crate::commands::{secret_input, write_json};
use crate::error::AppError;
use crate::state::AppContext;

#[derive(Args)]
pub struct PwnedArgs {
    /// Password to check (prefer --stdin)
    #[arg(required_unless_present = "stdin", conflicts_with = "stdin")]
    pub password: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub stdin: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl std::fmt::Debug for PwnedArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PwnedArgs")
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("stdin", &self.stdin)
            .field("json", &self.json)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PwnedReport {
    pub breached: bool,
    pub count: u64,
}

impl PwnedReport {
    #[must_use]
    pub const fn from_count(count: u64) -> Self {
        Self {
            breached: count > 0,
            count,
        }
    }
}

/// # Errors
///
/// Returns [`AppError::InvalidInput`] without a password, transport or API
/// errors from the range service, or [`AppError::Core`] for a malformed body.
pub fn check(args: &PwnedArgs, ctx: &AppContext, out: &mut dyn Write) -> Result<(), AppError> {
    let password = secret_input(args.password.as_deref(), args.stdin)?;
    let query = RangeQuery::new(&password);
    let client = RangeClient::new(api::http_client()?, &ctx.settings.range_api_url);
    let body = client.fetch_range(&query)?;
    let report = PwnedReport::from_count(query.breach_count(&body)?);
    tracing::info!(breached = report.breached, "password range check complete");
    render(report, args.json, out)
}

fn render(report: PwnedReport, json: bool, out: &mut dyn Write) -> Result<(), AppError> {
    if json {
        return write_json(out, &report);
    }
    if report.breached {
        writeln!(
            out,
            "This password appears {} times in known breaches. Do not use it.",
            report.count
        )?;
    } else {
        writeln!(out, "This password was not found in known breaches.")?;
    }
    Ok(())
}
