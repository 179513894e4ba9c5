//! Document fetcher
//!
//! Issues authenticated GET requests through the session's cookie-carrying
//! HTTP client and hands back raw document text with its status code.

mod fetcher;

pub use fetcher::{build_http_client, Document, Fetcher};
