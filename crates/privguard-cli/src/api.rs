//! Blocking HTTP clients for the remote services.
//!
//! Only transport lives here. Every body is handed to `privguard-core` or
//! `privguard-vault` for parsing, and nothing secret reaches the log.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use privguard_core::RangeQuery;
use privguard_vault::tempmail::{
    AccountCredentials, HydraCollection, MailDomain, MailMessage, MessageDetail, TokenResponse,
};
use privguard_vault::{
    AddEntryRequest, UpdateNotesRequest, UpdatePasswordRequest, VaultApiRoutes, VaultEntry,
    VaultListing,
};

use crate::error::AppError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = concat!("privguard/", env!("CARGO_PKG_VERSION"));
const HYDRA_JSON: &str = "application/ld+json";

/// Build the shared HTTP client.
///
/// # Errors
///
/// Returns [`AppError::Http`] if the TLS backend cannot be initialized.
pub fn http_client() -> Result<Client, AppError> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

fn ensure_success(response: Response, service: &'static str) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(AppError::Api {
            service,
            status: status.as_u16(),
        })
    }
}

// ---------------------------------------------------------------------------
// Password range lookup
// ---------------------------------------------------------------------------

/// k-anonymity password range service. Only the 5-character prefix is sent.
#[derive(Debug, Clone)]
pub struct RangeClient {
    http: Client,
    base_url: String,
}

impl RangeClient {
    #[must_use]
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Raw range body for the prefix of `query`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Http`] on transport failure and [`AppError::Api`]
    /// on a non-success status.
    pub fn fetch_range(&self, query: &RangeQuery) -> Result<String, AppError> {
        let url = format!("{}/range/{}", self.base_url, query.prefix());
        tracing::debug!(prefix = query.prefix(), "querying password range");
        let response = self.http.get(url).header("Add-Padding", "true").send()?;
        Ok(ensure_success(response, "password range service")?.text()?)
    }
}

// ---------------------------------------------------------------------------
// Email breach analytics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BreachClient {
    http: Client,
    base_url: String,
}

impl BreachClient {
    #[must_use]
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Raw analytics body for `email`.
    ///
    /// The service answers unknown addresses with 404 and a `"Not found"`
    /// marker body, which is passed through for the parser to recognize.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Http`] on transport failure and [`AppError::Api`]
    /// on any other non-success status.
    pub fn fetch_analytics(&self, email: &str) -> Result<String, AppError> {
        let url = format!("{}/v1/breach-analytics", self.base_url);
        let response = self.http.get(url).query(&[("email", email)]).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(response.text()?);
        }
        Ok(ensure_success(response, "breach analytics service")?.text()?)
    }
}

// ---------------------------------------------------------------------------
// Disposable mailbox provider
// ---------------------------------------------------------------------------

/// Client for the disposable mailbox provider.
///
/// Message endpoints require a bearer token, set with [`Self::with_token`].
#[derive(Clone)]
pub struct MailClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for MailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

const MAIL_SERVICE: &str = "mailbox provider";

impl MailClient {
    #[must_use]
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_owned());
        self
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(ACCEPT, HYDRA_JSON);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let url = format!("{}{path}", self.base_url);
        let response = self.request(self.http.get(url)).send()?;
        Ok(ensure_success(response, MAIL_SERVICE)?.json()?)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Http`] or [`AppError::Api`] on failure.
    pub fn domains(&self) -> Result<Vec<MailDomain>, AppError> {
        let domains: HydraCollection<MailDomain> = self.get_json("/domains")?;
        Ok(domains.members)
    }

    /// Register a new mailbox account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Http`] or [`AppError::Api`] on failure.
    pub fn create_account(&self, credentials: &AccountCredentials) -> Result<(), AppError> {
        let url = format!("{}/accounts", self.base_url);
        let response = self.request(self.http.post(url)).json(credentials).send()?;
        ensure_success(response, MAIL_SERVICE)?;
        Ok(())
    }

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Http`] or [`AppError::Api`] on failure.
    pub fn token(&self, credentials: &AccountCredentials) -> Result<String, AppError> {
        let url = format!("{}/token", self.base_url);
        let response = self.request(self.http.post(url)).json(credentials).send()?;
        let body: TokenResponse = ensure_success(response, MAIL_SERVICE)?.json()?;
        Ok(body.token)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Http`] or [`AppError::Api`] on failure.
    pub fn messages(&self) -> Result<Vec<MailMessage>, AppError> {
        let messages: HydraCollection<MailMessage> = self.get_json("/messages")?;
        Ok(messages.members)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Http`] or [`AppError::Api`] on failure.
    pub fn message(&self, id: &str) -> Result<MessageDetail, AppError> {
        self.get_json(&format!("/messages/{id}"))
    }

    /// # Errors
    ///
    /// Returns [`AppError::Http`] or [`AppError::Api`] on failure.
    pub fn delete_message(&self, id: &str) -> Result<(), AppError> {
        let url = format!("{}/messages/{id}", self.base_url);
        let response = self.request(self.http.delete(url)).send()?;
        ensure_success(response, MAIL_SERVICE)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Vault backend
// ---------------------------------------------------------------------------

/// Client for the vault backend.
///
/// Every route is protected; the session token is sent as the raw
/// `Authorization` header value.
#[derive(Clone)]
pub struct VaultClient {
    http: Client,
    routes: VaultApiRoutes,
    token: String,
}

impl std::fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultClient")
            .field("routes", &self.routes)
            .field("token", &"***")
            .finish_non_exhaustive()
    }
}

const VAULT_SERVICE: &str = "vault backend";

impl VaultClient {
    #[must_use]
    pub fn new(http: Client, base_url: &str, token: &str) -> Self {
        Self {
            http,
            routes: VaultApiRoutes::new(base_url),
            token: token.to_owned(),
        }
    }

    fn send(&self, builder: RequestBuilder) -> Result<Response, AppError> {
        let response = builder.header(AUTHORIZATION, self.token.as_str()).send()?;
        ensure_success(response, VAULT_SERVICE)
    }

    /// Every entry's metadata. Passwords are not part of the listing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Http`] or [`AppError::Api`] on failure.
    pub fn list(&self) -> Result<Vec<VaultEntry>, AppError> {
        let response = self.send(self.http.get(self.routes.list()))?;
        let listing: VaultListing = response.json()?;
        tracing::debug!(entries = listing.vault.len(), "vault listed");
        Ok(listing.vault)
    }

    /// One entry including its decrypted password.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Http`] or [`AppError::Api`] on failure.
    pub fn entry(&self, id: &str) -> Result<VaultEntry, AppError> {
        Ok(self.send(self.http.get(self.routes.entry(id)))?.json()?)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Http`] or [`AppError::Api`] on failure.
    pub fn add(&self, request: &AddEntryRequest) -> Result<(), AppError> {
        self.send(self.http.post(self.routes.add()).json(request))?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`AppError::Http`] or [`AppError::Api`] on failure.
    pub fn update_password(
        &self,
        id: &str,
        request: &UpdatePasswordRequest,
    ) -> Result<(), AppError> {
        let url = self.routes.update_password(id);
        self.send(self.http.post(url).json(request))?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`AppError::Http`] or [`AppError::Api`] on failure.
    pub fn update_notes(&self, id: &str, request: &UpdateNotesRequest) -> Result<(), AppError> {
        let url = self.routes.update_notes(id);
        self.send(self.http.post(url).json(request))?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`AppError::Http`] or [`AppError::Api`] on failure.
    pub fn delete(&self, id: &str) -> Result<(), AppError> {
        self.send(self.http.delete(self.routes.entry(id)))?;
        Ok(())
    }
}
