//! CAS ticket exchange
//!
//! Login is a fixed three-request protocol:
//! 1. `POST <sso>/rest/tickets` with the credentials mints a ticket-granting
//!    ticket (TGT), returned inside an HTML form's `action` attribute.
//! 2. `POST <sso>/rest/tickets/<TGT>` with `service=<service-url>` mints a
//!    single-use service ticket (ST), returned as the raw body.
//! 3. `GET <service-url>?ticket=<ST>` redeems the ST; the portal answers by
//!    setting the session cookies.

use crate::auth::session::SessionContext;
use crate::config::SsoConfig;
use crate::fetch::Fetcher;
use crate::AuthError;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use std::fmt;

/// Login credentials
///
/// Consumed by [`authenticate`]; the password does not outlive the handshake.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Ticket proving a completed login; used to mint service tickets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketGrantingTicket(String);

impl TicketGrantingTicket {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Single-use ticket redeemed once against the portal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTicket(String);

impl ServiceTicket {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns `<sso-base>/rest/tickets`
pub fn tickets_url(sso: &SsoConfig) -> String {
    format!("{}/rest/tickets", sso.base_url.trim_end_matches('/'))
}

/// Returns `<sso-base>/rest/tickets/<TGT>`, used for both minting and revocation
pub fn ticket_url(sso: &SsoConfig, tgt: &TicketGrantingTicket) -> String {
    format!("{}/{}", tickets_url(sso), tgt.as_str())
}

/// Runs steps 1 and 2 of the handshake
///
/// # Errors
///
/// * `AuthError::InvalidCredentials` - the gateway answered 400 to the login
/// * `AuthError::BadRequest` - the gateway answered 400 to the service ticket request
/// * `AuthError::UnexpectedStatus` - any other unexpected status
/// * `AuthError::MissingTicket` - the login response carried no ticket form
pub async fn authenticate(
    client: &Client,
    sso: &SsoConfig,
    credentials: Credentials,
) -> Result<(TicketGrantingTicket, ServiceTicket), AuthError> {
    let tgt = request_ticket_granting_ticket(client, sso, credentials).await?;
    let st = request_service_ticket(client, sso, &tgt).await?;
    Ok((tgt, st))
}

/// Step 1: exchanges credentials for a ticket-granting ticket
pub async fn request_ticket_granting_ticket(
    client: &Client,
    sso: &SsoConfig,
    credentials: Credentials,
) -> Result<TicketGrantingTicket, AuthError> {
    let url = tickets_url(sso);
    tracing::debug!("Requesting ticket-granting ticket for {}", credentials.username);

    let response = client
        .post(&url)
        .form(&[
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ])
        .send()
        .await?;

    match response.status() {
        StatusCode::CREATED => {}
        StatusCode::BAD_REQUEST => return Err(AuthError::InvalidCredentials),
        other => return Err(AuthError::UnexpectedStatus(other.as_u16())),
    }

    let body = response.text().await?;
    extract_ticket(&body).ok_or(AuthError::MissingTicket)
}

/// Step 2: exchanges a ticket-granting ticket for a service ticket
pub async fn request_service_ticket(
    client: &Client,
    sso: &SsoConfig,
    tgt: &TicketGrantingTicket,
) -> Result<ServiceTicket, AuthError> {
    tracing::debug!("Requesting service ticket for {}", sso.service_url);

    let response = client
        .post(ticket_url(sso, tgt))
        .form(&[("service", sso.service_url.as_str())])
        .send()
        .await?;

    match response.status() {
        StatusCode::OK => {}
        StatusCode::BAD_REQUEST => return Err(AuthError::BadRequest),
        other => return Err(AuthError::UnexpectedStatus(other.as_u16())),
    }

    Ok(ServiceTicket::new(response.text().await?))
}

/// Step 3: redeems the service ticket and wraps the client into a session
///
/// The redemption status is not checked: the cookie jar is the session, and
/// a bad one surfaces on the first real request.
pub async fn redeem(
    client: Client,
    sso: &SsoConfig,
    tgt: TicketGrantingTicket,
    st: &ServiceTicket,
) -> Result<SessionContext, AuthError> {
    let response = client
        .get(&sso.service_url)
        .query(&[("ticket", st.as_str())])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("Service ticket redemption returned {}", status);
    }

    let revocation_url = ticket_url(sso, &tgt);
    Ok(SessionContext::new(Fetcher::new(client), tgt, revocation_url))
}

/// Pulls the ticket out of the ticket-granting response body
///
/// The body is an HTML form whose `action` ends in `tickets/<TGT>`; the
/// ticket is the final path segment.
pub fn extract_ticket(body: &str) -> Option<TicketGrantingTicket> {
    let document = Html::parse_document(body);
    let selector = Selector::parse("form[action]").ok()?;

    document
        .select(&selector)
        .filter_map(|form| form.value().attr("action"))
        .find(|action| action.contains("tickets/"))
        .and_then(|action| action.trim_end_matches('/').rsplit('/').next())
        .map(str::trim)
        .filter(|ticket| !ticket.is_empty())
        .map(TicketGrantingTicket::new)
}
