//! `privguard inbox`: temporary mailbox.
//!
//! The mailbox session is cached in the data directory's key-value store
//! and reused until its TTL runs out; any subcommand creates a fresh one
//! when needed.

use std::io::Write;
use std::thread;
use std::time::Duration;

use clap::Subcommand;
use rand::rngs::OsRng;

use privguard_core::generate_password;
use privguard_vault::tempmail::{
    pick_domain, random_local_part, AccountCredentials, Inbox, MailMessage, MessageDetail,
    SessionCache, TempMailSession,
};
use privguard_vault::KvStore;

use crate::api::{self, MailClient};
use crate::commands::write_json;
use crate::error::AppError;
use crate::state::{now_ms, AppContext};

#[derive(Subcommand, Debug)]
pub enum InboxCommand {
    /// Print the current temporary address
    Address,

    /// Discard the current address and create a new one
    New,

    /// List received messages
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show one message
    Read {
        id: String,
        #[arg(long)]
        json: bool,
    },

    /// Delete one message
    Delete { id: String },

    /// Poll for new messages and print them as they arrive
    Watch {
        /// Stop after this many polls
        #[arg(long)]
        max_polls: Option<u32>,
    },
}

/// # Errors
///
/// Returns transport or API errors from the mailbox provider, or
/// [`AppError::Vault`] if the session cannot be stored.
pub fn run(command: &InboxCommand, ctx: &AppContext, out: &mut dyn Write) -> Result<(), AppError> {
    let client = MailClient::new(api::http_client()?, &ctx.settings.mail_api_url);
    let mut cache = SessionCache::new(ctx.store(), ctx.settings.temp_email_ttl_ms());

    if matches!(command, InboxCommand::New) {
        cache.clear()?;
    }
    let session = ensure_session(&client, &mut cache, now_ms())?;
    let client = client.with_token(&session.token);

    match command {
        InboxCommand::Address | InboxCommand::New => {
            writeln!(out, "{}", session.address)?;
        }
        InboxCommand::List { json } => {
            let messages = client.messages()?;
            if *json {
                write_json(out, &messages)?;
            } else {
                render_listing(&messages, out)?;
            }
        }
        InboxCommand::Read { id, json } => {
            let message = client.message(id)?;
            if *json {
                write_json(out, &message)?;
            } else {
                render_message(&message, out)?;
            }
        }
        InboxCommand::Delete { id } => delete(&client, id, out)?,
        InboxCommand::Watch { max_polls } => {
            let interval = Duration::from_secs(ctx.settings.inbox_poll_interval_secs);
            writeln!(out, "Watching {} (Ctrl-C to stop)", session.address)?;
            watch(&client, interval, *max_polls, out)?;
        }
    }
    Ok(())
}

/// Cached session if still fresh, otherwise a newly registered one.
fn ensure_session<S: KvStore>(
    client: &MailClient,
    cache: &mut SessionCache<S>,
    now: u64,
) -> Result<TempMailSession, AppError> {
    if let Some(session) = cache.load(now)? {
        tracing::debug!(address = %session.address, "reusing mailbox session");
        return Ok(session);
    }

    let domains = client.domains()?;
    let domain = pick_domain(&domains)?;
    let credentials = AccountCredentials {
        address: format!("{}@{domain}", random_local_part(&mut OsRng)),
        password: generate_password(),
    };
    client.create_account(&credentials)?;
    let token = client.token(&credentials)?;

    let session = TempMailSession {
        address: credentials.address,
        token,
        created_at_ms: now,
    };
    cache.save(&session)?;
    tracing::info!(address = %session.address, "created temporary mailbox");
    Ok(session)
}

/// Delete `id` if the current listing has it.
fn delete(client: &MailClient, id: &str, out: &mut dyn Write) -> Result<(), AppError> {
    let mut inbox = Inbox::new();
    inbox.replace(client.messages()?);
    if !inbox.remove(id) {
        return Err(AppError::InvalidInput(format!(
            "no message '{id}' in the inbox"
        )));
    }
    client.delete_message(id)?;
    tracing::info!(id, "message deleted");
    writeln!(
        out,
        "Deleted {id}. {} message(s) left.",
        inbox.messages().len()
    )?;
    Ok(())
}

fn watch(
    client: &MailClient,
    interval: Duration,
    max_polls: Option<u32>,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let mut inbox = Inbox::new();
    let mut polls: u32 = 0;
    loop {
        let arrived = inbox.replace(client.messages()?);
        polls = polls.saturating_add(1);
        tracing::debug!(polls, new = arrived.len(), "inbox polled");
        for message in &arrived {
            render_summary_line(message, out)?;
        }
        out.flush()?;

        if max_polls.is_some_and(|max| polls >= max) {
            return Ok(());
        }
        thread::sleep(interval);
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_summary_line(message: &MailMessage, out: &mut dyn Write) -> Result<(), AppError> {
    let subject = if message.subject.is_empty() {
        "(no subject)"
    } else {
        message.subject.as_str()
    };
    writeln!(
        out,
        "{}  {}  {}  {subject}",
        message.id, message.created_at, message.from
    )?;
    Ok(())
}

fn render_listing(messages: &[MailMessage], out: &mut dyn Write) -> Result<(), AppError> {
    if messages.is_empty() {
        writeln!(out, "Inbox is empty.")?;
        return Ok(());
    }
    for message in messages {
        render_summary_line(message, out)?;
    }
    Ok(())
}

fn render_message(message: &MessageDetail, out: &mut dyn Write) -> Result<(), AppError> {
    writeln!(out, "From:    {}", message.from)?;
    writeln!(out, "Subject: {}", message.subject)?;
    writeln!(out, "Date:    {}", message.created_at)?;
    writeln!(out)?;
    if message.text.is_empty() {
        writeln!(out, "{}", message.html.join("\n"))?;
    } else {
        writeln!(out, "{}", message.text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::TestServer;
    use privguard_vault::tempmail::MailAddress;
    use privguard_vault::MemoryStore;

    const NOW: u64 = 1_700_000_000_000;
    const TTL: u64 = 3_600_000;

    const TWO_MESSAGES: &str = r#"{"hydra:member":[
        {"id":"m1","from":{"address":"a@b.test"},"subject":"One","createdAt":"2025-03-01T10:00:00+00:00"},
        {"id":"m2","from":{"address":"a@b.test"},"subject":"Two","createdAt":"2025-03-01T10:05:00+00:00"}
    ]}"#;

    fn mail_client(server: &TestServer) -> MailClient {
        MailClient::new(api::http_client().unwrap(), &server.base_url)
    }

    fn message(id: &str, subject: &str) -> MailMessage {
        MailMessage {
            id: id.into(),
            from: MailAddress {
                address: "noreply@service.example".into(),
                name: Some("Service".into()),
            },
            subject: subject.into(),
            intro: String::new(),
            created_at: "2025-03-01T10:00:00+00:00".into(),
            seen: false,
        }
    }

    fn text(f: impl FnOnce(&mut dyn Write) -> Result<(), AppError>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_listing() {
        assert_eq!(text(|out| render_listing(&[], out)), "Inbox is empty.\n");
    }

    #[test]
    fn listing_lines() {
        let messages = [message("m1", "Verify"), message("m2", "")];
        let rendered = text(|out| render_listing(&messages, out));
        assert_eq!(
            rendered,
            "m1  2025-03-01T10:00:00+00:00  Service <noreply@service.example>  Verify\n\
             m2  2025-03-01T10:00:00+00:00  Service <noreply@service.example>  (no subject)\n"
        );
    }

    #[test]
    fn message_falls_back_to_html() {
        let detail = MessageDetail {
            id: "m1".into(),
            from: MailAddress {
                address: "a@b.example".into(),
                name: None,
            },
            subject: "Code".into(),
            text: String::new(),
            html: vec!["<p>123456</p>".into()],
            created_at: "2025-03-01T10:00:00+00:00".into(),
        };
        let rendered = text(|out| render_message(&detail, out));
        assert!(rendered.starts_with("From:    a@b.example\nSubject: Code\n"));
        assert!(rendered.ends_with("\n<p>123456</p>\n"));
    }

    #[test]
    fn fresh_cached_session_makes_no_requests() {
        let server = TestServer::start(Vec::new());
        let cached = TempMailSession {
            address: "k3x9q0ab@example.test".into(),
            token: "tok".into(),
            created_at_ms: NOW,
        };
        let mut cache = SessionCache::new(MemoryStore::new(), TTL);
        cache.save(&cached).unwrap();

        let client = mail_client(&server);
        let session = ensure_session(&client, &mut cache, NOW + 1_000).unwrap();
        assert_eq!(session, cached);
        assert!(server.requests().is_empty());
    }

    #[test]
    fn missing_session_registers_a_new_mailbox() {
        let server = TestServer::start(vec![
            (
                200,
                r#"{"hydra:member":[{"domain":"old.test","isActive":false},{"domain":"fresh.test","isActive":true}]}"#,
            ),
            (201, r#"{"id":"acc1","address":"ignored@fresh.test"}"#),
            (200, r#"{"token":"new-token","id":"acc1"}"#),
        ]);
        let mut cache = SessionCache::new(MemoryStore::new(), TTL);

        let client = mail_client(&server);
        let session = ensure_session(&client, &mut cache, NOW).unwrap();
        assert!(session.address.ends_with("@fresh.test"));
        assert_eq!(session.token, "new-token");
        assert_eq!(session.created_at_ms, NOW);

        let requests = server.requests();
        let calls: Vec<(&str, &str)> = requests
            .iter()
            .map(|r| (r.method.as_str(), r.path.as_str()))
            .collect();
        assert_eq!(
            calls,
            [
                ("GET", "/domains"),
                ("POST", "/accounts"),
                ("POST", "/token")
            ]
        );
        let account: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
        assert_eq!(account["address"], session.address.as_str());
        assert_eq!(requests[2].body, requests[1].body);

        assert_eq!(cache.load(NOW + 1).unwrap(), Some(session));
    }

    #[test]
    fn expired_session_is_replaced() {
        let server = TestServer::start(vec![
            (200, r#"{"hydra:member":[{"domain":"fresh.test"}]}"#),
            (201, "{}"),
            (200, r#"{"token":"second"}"#),
        ]);
        let mut cache = SessionCache::new(MemoryStore::new(), TTL);
        cache
            .save(&TempMailSession {
                address: "old@fresh.test".into(),
                token: "first".into(),
                created_at_ms: NOW,
            })
            .unwrap();

        let client = mail_client(&server);
        let session = ensure_session(&client, &mut cache, NOW + TTL).unwrap();
        assert_eq!(session.token, "second");
        assert_eq!(server.requests().len(), 3);
    }

    #[test]
    fn failed_registration_saves_nothing() {
        let server = TestServer::start(vec![
            (200, r#"{"hydra:member":[{"domain":"fresh.test"}]}"#),
            (422, r#"{"detail":"address already used"}"#),
        ]);
        let mut cache = SessionCache::new(MemoryStore::new(), TTL);
        let client = mail_client(&server);
        let err = ensure_session(&client, &mut cache, NOW).unwrap_err();
        assert!(matches!(err, AppError::Api { status: 422, .. }));
        assert_eq!(cache.into_inner(), MemoryStore::new());
    }

    #[test]
    fn delete_checks_listing_first() {
        let server = TestServer::start(vec![(200, TWO_MESSAGES), (204, "")]);
        let client = mail_client(&server).with_token("tok");
        let rendered = text(|out| delete(&client, "m1", out));
        assert_eq!(rendered, "Deleted m1. 1 message(s) left.\n");

        let requests = server.requests();
        assert_eq!(requests[1].method, "DELETE");
        assert_eq!(requests[1].path, "/messages/m1");
    }

    #[test]
    fn delete_of_unknown_message_sends_no_delete() {
        let server = TestServer::start(vec![(200, TWO_MESSAGES), (204, "")]);
        let client = mail_client(&server).with_token("tok");
        let err = delete(&client, "m9", &mut Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(server.requests().len(), 1);
    }
}
