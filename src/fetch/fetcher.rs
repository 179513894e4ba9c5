//! HTTP fetcher implementation
//!
//! This module handles the HTTP side of portal access, including:
//! - Building the cookie-carrying client shared by the handshake and the session
//! - GET requests with optional caller-supplied deadlines
//! - Status and JSON decoding helpers

use crate::config::HttpConfig;
use crate::{Result, TsquareError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// A fetched document
#[derive(Debug, Clone)]
pub struct Document {
    /// Final URL after redirects
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response body text
    pub body: String,
}

impl Document {
    /// Returns true for 2xx responses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client keeps a cookie jar: the cookies set while redeeming the
/// service ticket are what authenticate every later request.
///
/// # Example
///
/// ```no_run
/// use tsquare::config::HttpConfig;
/// use tsquare::fetch::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .cookie_store(true)
        .https_only(config.https_only)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues GET requests on behalf of an authenticated session
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Wraps an existing client (and therefore its cookie jar)
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches a URL using the client's configured timeout
    pub async fn get(&self, url: &str) -> Result<Document> {
        self.get_with_deadline(url, None).await
    }

    /// Fetches a URL, overriding the request timeout when `deadline` is given
    ///
    /// Non-2xx responses are returned as documents, not errors; use
    /// [`Fetcher::get_ok`] when only success is acceptable.
    pub async fn get_with_deadline(&self, url: &str, deadline: Option<Duration>) -> Result<Document> {
        tracing::debug!("GET {}", url);

        let mut request = self.client.get(url);
        if let Some(deadline) = deadline {
            request = request.timeout(deadline);
        }

        let response = request.send().await.map_err(|source| TsquareError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|source| TsquareError::Http {
            url: url.to_string(),
            source,
        })?;

        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(Document {
            url: final_url,
            status,
            body,
        })
    }

    /// Fetches a URL and fails on any non-2xx status
    pub async fn get_ok(&self, url: &str) -> Result<Document> {
        let document = self.get(url).await?;
        if !document.is_success() {
            return Err(TsquareError::Status {
                url: url.to_string(),
                status: document.status,
            });
        }
        Ok(document)
    }

    /// Fetches a URL and decodes its body as JSON
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let document = self.get_ok(url).await?;
        serde_json::from_str(&document.body).map_err(|source| TsquareError::Json {
            url: url.to_string(),
            source,
        })
    }
}
