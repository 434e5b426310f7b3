//! `privguard settings show|set`

use std::io::Write;

use clap::Subcommand;

use privguard_vault::{Settings, SETTING_KEYS};

use crate::commands::write_json;
use crate::error::AppError;
use crate::state::AppContext;

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print every setting
    Show {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Change one setting and save it
    Set {
        /// Setting name, e.g. `inboxPollIntervalSecs`
        key: String,
        value: String,
    },
}

/// # Errors
///
/// Returns [`AppError::Vault`] for an invalid key or value, or if the
/// settings file cannot be written.
pub fn run(
    command: &SettingsCommand,
    ctx: &mut AppContext,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    match command {
        SettingsCommand::Show { json } => show(&ctx.settings, *json, out),
        SettingsCommand::Set { key, value } => {
            ctx.settings.set(key, value)?;
            ctx.settings.save(ctx.data_dir())?;
            tracing::info!(key = key.as_str(), "setting updated");
            show_one(&ctx.settings, key, out)
        }
    }
}

fn show(settings: &Settings, json: bool, out: &mut dyn Write) -> Result<(), AppError> {
    if json {
        return write_json(out, settings);
    }
    for key in SETTING_KEYS {
        show_one(settings, key, out)?;
    }
    Ok(())
}

fn show_one(settings: &Settings, key: &str, out: &mut dyn Write) -> Result<(), AppError> {
    let value = serde_json::to_value(settings)?;
    match value.get(key) {
        Some(serde_json::Value::String(s)) => writeln!(out, "{key} = {s}")?,
        Some(other) => writeln!(out, "{key} = {other}")?,
        None => {}
    }
    Ok(())
}
