use crate::auth::tickets::TicketGrantingTicket;
use crate::fetch::Fetcher;
use crate::{Result, TsquareError};
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicBool, Ordering};

/// An authenticated portal session
///
/// Holds the cookie-carrying fetcher and the ticket needed to revoke the
/// login. Once the `authenticated` flag drops to false it never comes back;
/// callers must log in again.
#[derive(Debug)]
pub struct SessionContext {
    fetcher: Fetcher,
    ticket: TicketGrantingTicket,
    revocation_url: String,
    authenticated: AtomicBool,
    established_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(fetcher: Fetcher, ticket: TicketGrantingTicket, revocation_url: String) -> Self {
        Self {
            fetcher,
            ticket,
            revocation_url,
            authenticated: AtomicBool::new(true),
            established_at: Utc::now(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    /// Fails with `NotAuthenticated` naming `operation` if the session is gone
    pub fn ensure_authenticated(&self, operation: &str) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(TsquareError::NotAuthenticated {
                operation: operation.to_string(),
            })
        }
    }

    /// Marks the session expired and returns the matching error
    pub fn expire(&self) -> TsquareError {
        tracing::warn!("Portal session expired");
        self.authenticated.store(false, Ordering::SeqCst);
        TsquareError::SessionExpired
    }

    /// Revokes the ticket-granting ticket
    ///
    /// Best-effort: the session is marked unauthenticated whatever the
    /// revocation endpoint answers, including transport failures.
    pub async fn invalidate(&self) {
        match self.fetcher.client().delete(&self.revocation_url).send().await {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!("Ticket revocation returned {}", response.status());
            }
            Ok(_) => tracing::debug!("Ticket revoked"),
            Err(e) => tracing::warn!("Ticket revocation failed: {}", e),
        }
        self.authenticated.store(false, Ordering::SeqCst);
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn ticket(&self) -> &TicketGrantingTicket {
        &self.ticket
    }

    pub fn revocation_url(&self) -> &str {
        &self.revocation_url
    }

    pub fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }

    /// Time since the service ticket was redeemed
    pub fn age(&self) -> Duration {
        Utc::now() - self.established_at
    }
}
