//! Configuration module for TSquare
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; omitted values default to the production portal.
//!
//! # Example
//!
//! ```no_run
//! use tsquare::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tsquare.toml")).unwrap();
//! println!("Extraction backend: {}", config.scraper.backend);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, HttpConfig, PortalConfig, ScraperConfig, SsoConfig, DEFAULT_DIRECT_URL,
    DEFAULT_SERVICE_URL, DEFAULT_SSO_BASE_URL,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
