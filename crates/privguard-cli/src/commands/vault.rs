//! `privguard vault`: entries stored in the vault backend.
//!
//! Ids are checked against the listing before anything is changed, so a
//! typo reports the missing id instead of a bare backend status.

use std::io::Write;

use clap::{Args, Subcommand};
use zeroize::Zeroizing;

use privguard_core::{generate_password, label_for};
use privguard_vault::{
    filter_entries, find_entry, group_by_domain, AddEntryRequest, DomainGroup, ServiceSuggestion,
    UpdateNotesRequest, UpdatePasswordRequest, VaultEntry,
};

use crate::api::{self, VaultClient};
use crate::commands::{secret_input, write_json};
use crate::error::AppError;
use crate::state::AppContext;

#[derive(Args)]
pub struct VaultArgs {
    /// Session token for the vault backend
    #[arg(long, global = true, env = "PRIVGUARD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: VaultCommand,
}

impl std::fmt::Debug for VaultArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultArgs")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("command", &self.command)
            .finish()
    }
}

#[derive(Subcommand, Debug)]
pub enum VaultCommand {
    /// List entries grouped by domain
    List {
        /// Only entries whose service or domain contains this text
        query: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show one entry, including its password
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Store a new credential
    Add {
        /// Service name, e.g. `GitHub`
        service: String,

        /// Service domain, e.g. `github.com`
        domain: String,

        /// Logo URL (defaults to the logo service's image for the domain)
        #[arg(long)]
        logo: Option<String>,

        #[arg(long, default_value = "")]
        notes: String,

        #[command(flatten)]
        secret: SecretArgs,
    },

    /// Replace the password of an entry
    UpdatePassword {
        id: String,

        #[command(flatten)]
        secret: SecretArgs,
    },

    /// Replace the notes of an entry
    UpdateNote { id: String, notes: String },

    /// Delete an entry
    Delete { id: String },
}

/// Where a new password comes from.
#[derive(Args)]
pub struct SecretArgs {
    /// Password to store (prefer --stdin or --generate)
    #[arg(
        required_unless_present_any = ["stdin", "generate"],
        conflicts_with_all = ["stdin", "generate"]
    )]
    pub password: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long, conflicts_with = "generate")]
    pub stdin: bool,

    /// Generate a 16-character password and print it
    #[arg(long)]
    pub generate: bool,
}

impl std::fmt::Debug for SecretArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretArgs")
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("stdin", &self.stdin)
            .field("generate", &self.generate)
            .finish()
    }
}

impl SecretArgs {
    fn resolve(&self, out: &mut dyn Write) -> Result<Zeroizing<String>, AppError> {
        if self.generate {
            let password = Zeroizing::new(generate_password());
            writeln!(out, "Generated password: {}", password.as_str())?;
            return Ok(password);
        }
        secret_input(self.password.as_deref(), self.stdin)
    }
}

/// # Errors
///
/// Returns [`AppError::InvalidInput`] without a token, transport or API
/// errors from the backend, and [`AppError::Vault`] for an unknown id or
/// an invalid request.
pub fn run(args: &VaultArgs, ctx: &AppContext, out: &mut dyn Write) -> Result<(), AppError> {
    let client = connect(args.token.as_deref(), ctx)?;
    execute(&args.command, &client, out)
}

/// Vault client for the configured backend.
pub(crate) fn connect(token: Option<&str>, ctx: &AppContext) -> Result<VaultClient, AppError> {
    let token = token.filter(|t| !t.is_empty()).ok_or_else(|| {
        AppError::InvalidInput(
            "the vault needs a session token; pass --token or set PRIVGUARD_TOKEN".into(),
        )
    })?;
    Ok(VaultClient::new(api::http_client()?, &ctx.settings.backend_url, token))
}

/// Every entry with its password filled in from the detail endpoint.
pub(crate) fn fetch_with_passwords(client: &VaultClient) -> Result<Vec<VaultEntry>, AppError> {
    client
        .list()?
        .iter()
        .map(|entry| client.entry(&entry.id))
        .collect()
}

fn execute(
    command: &VaultCommand,
    client: &VaultClient,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    match command {
        VaultCommand::List { query, json } => {
            let entries = client.list()?;
            let matched = filter_entries(&entries, query.as_deref().unwrap_or_default());
            if *json {
                return write_json(out, &matched);
            }
            if matched.is_empty() {
                writeln!(out, "No entries.")?;
            }
            render_groups(&group_by_domain(&matched), out)?;
        }
        VaultCommand::Show { id, json } => {
            let entry = client.entry(id)?;
            if *json {
                return write_json(out, &entry);
            }
            render_entry(&entry, out)?;
        }
        VaultCommand::Add {
            service,
            domain,
            logo,
            notes,
            secret,
        } => {
            let password = secret.resolve(out)?;
            let suggestion = ServiceSuggestion {
                name: service.clone(),
                domain: domain.clone(),
                logo: logo.clone(),
            };
            let request = AddEntryRequest::new(&suggestion, password.as_str(), notes.as_str())?;
            client.add(&request)?;
            tracing::info!(service = request.service.as_str(), "vault entry added");
            writeln!(
                out,
                "Saved {} ({}), strength {}/100 ({}).",
                request.service,
                request.domain,
                request.strength,
                label_for(request.strength)
            )?;
        }
        VaultCommand::UpdatePassword { id, secret } => {
            let entries = client.list()?;
            let mut entry = find_entry(&entries, id)?.clone();
            let password = secret.resolve(out)?;
            let request = UpdatePasswordRequest::new(password.as_str())?;
            client.update_password(id, &request)?;
            entry.apply_password_update(&request);
            tracing::info!(id = id.as_str(), "vault password updated");
            writeln!(
                out,
                "Updated password for {}, strength {}/100 ({}).",
                entry.service,
                entry.strength,
                label_for(entry.strength)
            )?;
        }
        VaultCommand::UpdateNote { id, notes } => {
            let entries = client.list()?;
            let mut entry = find_entry(&entries, id)?.clone();
            let request = UpdateNotesRequest {
                notes: notes.clone(),
            };
            client.update_notes(id, &request)?;
            entry.apply_notes_update(&request);
            writeln!(out, "Updated notes for {}.", entry.service)?;
        }
        VaultCommand::Delete { id } => {
            let entries = client.list()?;
            let entry = find_entry(&entries, id)?;
            client.delete(id)?;
            tracing::info!(id = id.as_str(), "vault entry deleted");
            writeln!(out, "Deleted {} ({id}).", entry.service)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_groups(groups: &[DomainGroup<'_>], out: &mut dyn Write) -> Result<(), AppError> {
    for group in groups {
        if group.is_group() {
            writeln!(out, "{} ({})", group.domain, group.entries.len())?;
        } else {
            writeln!(out, "{}", group.domain)?;
        }
        for entry in &group.entries {
            writeln!(out, "  {}  {}", entry.id, entry.service)?;
        }
    }
    Ok(())
}

fn render_entry(entry: &VaultEntry, out: &mut dyn Write) -> Result<(), AppError> {
    writeln!(out, "Service:  {}", entry.service)?;
    writeln!(out, "Domain:   {}", entry.domain)?;
    writeln!(out, "Password: {}", entry.password)?;
    if let Some(notes) = entry.notes.as_deref().filter(|n| !n.is_empty()) {
        writeln!(out, "Notes:    {notes}")?;
    }
    Ok(())
}
