//! Name-keyed registry of extraction backends

use crate::scrape::{HtmlScraper, TagScanScraper, TreeScraper};

/// Builds a fresh backend instance
pub type ScraperConstructor = fn() -> Box<dyn HtmlScraper>;

/// Backend used when a requested name is not registered
pub const DEFAULT_BACKEND: &str = "default";

const REGISTERED_BACKENDS: [(&str, ScraperConstructor); 2] =
    [("default", new_tag_scan), ("tree", new_tree)];

fn new_tag_scan() -> Box<dyn HtmlScraper> {
    Box::new(TagScanScraper::new())
}

fn new_tree() -> Box<dyn HtmlScraper> {
    Box::new(TreeScraper::new())
}

/// Returns the backend registered under `name`
///
/// Unknown names fall back to [`DEFAULT_BACKEND`]; this is not an error.
pub fn scraper_for(name: &str) -> Box<dyn HtmlScraper> {
    let constructor = lookup(name).unwrap_or_else(|| {
        tracing::debug!(
            "No scraper backend named '{}', using '{}'",
            name,
            DEFAULT_BACKEND
        );
        new_tag_scan as ScraperConstructor
    });
    constructor()
}

/// Names of all registered backends
pub fn backend_names() -> Vec<&'static str> {
    REGISTERED_BACKENDS.iter().map(|(name, _)| *name).collect()
}

fn lookup(name: &str) -> Option<ScraperConstructor> {
    REGISTERED_BACKENDS
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(_, constructor)| *constructor)
}
