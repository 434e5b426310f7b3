//! `privguard breach <EMAIL>`

use std::io::Write;

use clap::Args;

use privguard_vault::breach_report::{parse_breach_response, summarize, BreachSummary};

use crate::api::{self, BreachClient};
use crate::commands::write_json;
use crate::error::AppError;
use crate::state::AppContext;

#[derive(Args, Debug)]
pub struct BreachArgs {
    /// Email address to look up
    pub email: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// # Errors
///
/// Returns [`AppError::InvalidInput`] for a malformed address, transport or
/// API errors from the analytics service, or [`AppError::Vault`] for an
/// undecodable body.
pub fn check(args: &BreachArgs, ctx: &AppContext, out: &mut dyn Write) -> Result<(), AppError> {
    let email = args.email.trim();
    validate_email(email)?;

    let client = BreachClient::new(api::http_client()?, &ctx.settings.breach_api_url);
    let body = client.fetch_analytics(email)?;
    let summary = parse_breach_response(&body)?.map(|response| summarize(&response));
    tracing::info!(
        breaches = summary.as_ref().map_or(0, |s| s.breach_count),
        "breach analytics received"
    );
    render(email, summary.as_ref(), args.json, out)
}

fn validate_email(email: &str) -> Result<(), AppError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::InvalidInput(format!(
            "'{email}' is not a valid email address"
        ))),
    }
}

fn render(
    email: &str,
    summary: Option<&BreachSummary>,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    if json {
        return write_json(out, &summary);
    }
    let Some(summary) = summary.filter(|s| s.breach_count > 0) else {
        writeln!(out, "No breaches found for {email}.")?;
        return Ok(());
    };

    writeln!(out, "Breaches: {}", summary.breach_count)?;
    if !summary.sites.is_empty() {
        writeln!(out, "Sites: {}", summary.sites.join(", "))?;
    }
    writeln!(out, "Exposed records: {}", summary.total_exposed_records)?;
    writeln!(
        out,
        "Risk: {} ({}/100)",
        summary.risk_level, summary.risk_score
    )?;
    if !summary.timeline.is_empty() {
        writeln!(out, "Timeline:")?;
        for point in &summary.timeline {
            let noun = if point.count == 1 { "breach" } else { "breaches" };
            writeln!(out, "  {}  {} {noun}", point.year, point.count)?;
        }
    }
    if !summary.exposed_data.is_empty() {
        writeln!(out, "Exposed data: {}", summary.exposed_data.join(", "))?;
    }
    let storage = summary.password_storage;
    writeln!(
        out,
        "Password storage: easy to crack {}, plain text {}, strong hash {}, unknown {}",
        storage.easy_to_crack, storage.plain_text, storage.strong_hash, storage.unknown
    )?;
    Ok(())
}
