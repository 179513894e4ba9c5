//! TSquare: a client for the T-Square (Sakai) course portal
//!
//! This crate logs in through the CAS single-sign-on gateway and recovers
//! typed records (tools, assignments, grades, iframes) from the portal's
//! HTML pages, which expose no machine-readable API for those views.

pub mod auth;
pub mod client;
pub mod config;
pub mod fetch;
pub mod models;
pub mod scrape;

use thiserror::Error;

/// Main error type for TSquare operations
#[derive(Debug, Error)]
pub enum TsquareError {
    #[error("Authentication failed: {0}")]
    Authentication(#[from] AuthError),

    #[error("Operation '{operation}' requires authentication")]
    NotAuthenticated { operation: String },

    #[error("The session has expired")]
    SessionExpired,

    #[error("Extraction error: {0}")]
    Extraction(ExtractionError),

    #[error("Backend '{backend}' does not support '{operation}'")]
    UnsupportedOperation {
        backend: &'static str,
        operation: &'static str,
    },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid JSON from {url}: {source}")]
    Json {
        url: String,
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExtractionError> for TsquareError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Unsupported { backend, operation } => {
                TsquareError::UnsupportedOperation { backend, operation }
            }
            other => TsquareError::Extraction(other),
        }
    }
}

/// Failures of the ticket handshake
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username or password incorrect")]
    InvalidCredentials,

    #[error("Parameters missing from service ticket request")]
    BadRequest,

    #[error("Received unexpected HTTP code: {0}")]
    UnexpectedStatus(u16),

    #[error("No ticket found in the ticket-granting response")]
    MissingTicket,

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// HTML extraction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Required element not found: {0}")]
    MissingElement(String),

    #[error("Backend '{backend}' does not support '{operation}'")]
    Unsupported {
        backend: &'static str,
        operation: &'static str,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for TSquare operations
pub type Result<T> = std::result::Result<T, TsquareError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for extraction operations
pub type ExtractResult<T> = std::result::Result<T, ExtractionError>;

// Re-export commonly used types
pub use auth::{Credentials, SessionContext};
pub use client::TsquareClient;
pub use config::Config;
pub use scrape::{scraper_for, HtmlScraper};
