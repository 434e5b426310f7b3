//! `privguard score`

use std::io::Write;

use clap::Args;
use serde::Serialize;

use privguard_core::{StrengthLabel, StrengthScheme};

use crate::commands::{secret_input, write_json};
use crate::error::AppError;

#[derive(Args)]
pub struct ScoreArgs {
    /// Password to score (prefer --stdin to keep it out of shell history)
    #[arg(required_unless_present = "stdin", conflicts_with = "stdin")]
    pub password: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub stdin: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl std::fmt::Debug for ScoreArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreArgs")
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("stdin", &self.stdin)
            .field("json", &self.json)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub score: u8,
    pub label: StrengthLabel,
    pub matched_rules: Vec<&'static str>,
}

impl ScoreReport {
    #[must_use]
    pub fn for_password(password: &str) -> Self {
        let scheme = StrengthScheme::CANONICAL;
        let assessment = scheme.assess(password);
        Self {
            score: assessment.score,
            label: assessment.label,
            matched_rules: scheme.matched_rules(password),
        }
    }
}

/// # Errors
///
/// Returns [`AppError::InvalidInput`] if no password was given, or
/// [`AppError::Io`] if stdin or the output cannot be used.
pub fn score(args: &ScoreArgs, out: &mut dyn Write) -> Result<(), AppError> {
    let password = secret_input(args.password.as_deref(), args.stdin)?;
    let report = ScoreReport::for_password(&password);
    render(&report, args.json, out)
}

fn render(report: &ScoreReport, json: bool, out: &mut dyn Write) -> Result<(), AppError> {
    if json {
        return write_json(out, report);
    }
    writeln!(out, "Score: {}/100 ({})", report.score, report.label)?;
    if report.matched_rules.is_empty() {
        writeln!(out, "Matched: none")?;
    } else {
        writeln!(out, "Matched: {}", report.matched_rules.join(", "))?;
    }
    Ok(())
}
