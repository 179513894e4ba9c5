//! HTML extraction engine
//!
//! Portal pages are scraped through the [`HtmlScraper`] capability trait.
//! Two backends implement it:
//!
//! - `default`: [`TagScanScraper`], a single forward pass over tag and text
//!   events driven by explicit state machines
//! - `tree`: [`TreeScraper`], which parses the whole document and queries it
//!   structurally; the only backend that extracts grades and syllabi
//!
//! Backends are stateless. Every call allocates its own scan or tree state,
//! so one instance can serve any number of documents, sequentially or from
//! several threads.

mod records;
mod registry;
mod tag_scan;
mod tree;

pub use records::{
    Assignment, CourseGrade, GradeEntry, GradeReport, Iframe, Tool, NOT_YET_AVAILABLE,
    UNNAMED_CATEGORY,
};
pub use registry::{backend_names, scraper_for, ScraperConstructor, DEFAULT_BACKEND};
pub use tag_scan::TagScanScraper;
pub use tree::TreeScraper;

use crate::{ExtractResult, ExtractionError};

/// CSS class markers of the tool links, with their canonical tool names
pub const TOOL_MARKERS: [(&str, &str); 4] = [
    ("icon-sakai-syllabus", "syllabus"),
    ("icon-sakai-resources", "resources"),
    ("icon-sakai-assignment-grades", "assignments"),
    ("icon-sakai-gradebook-tool", "gradebook-tool"),
];

/// Capability interface shared by the extraction backends
pub trait HtmlScraper: Send + Sync {
    /// Registry name of the backend
    fn name(&self) -> &'static str;

    /// Every `<iframe>` with its `name`, trimmed `title` and `src`
    ///
    /// An iframe missing any of the three attributes is an error.
    fn get_iframes(&self, html: &str) -> ExtractResult<Vec<Iframe>>;

    /// Tool links carrying one of the [`TOOL_MARKERS`] classes
    ///
    /// Unmarked anchors are skipped.
    fn get_tools(&self, html: &str) -> ExtractResult<Vec<Tool>>;

    /// Assignment rows of the assignments tool page
    ///
    /// Rows missing any of title, status, open date or due date are dropped.
    fn get_assignments(&self, html: &str) -> ExtractResult<Vec<Assignment>>;

    /// Gradebook summary and per-category entries
    fn get_grades(&self, _html: &str) -> ExtractResult<GradeReport> {
        Err(ExtractionError::Unsupported {
            backend: self.name(),
            operation: "get_grades",
        })
    }

    /// Outer markup of the first `<table>` of the syllabus page
    fn get_syllabus(&self, _html: &str) -> ExtractResult<String> {
        Err(ExtractionError::Unsupported {
            backend: self.name(),
            operation: "get_syllabus",
        })
    }
}

/// Maps a `class` attribute to a canonical tool name
///
/// The first class token found in [`TOOL_MARKERS`] wins.
pub(crate) fn tool_name_for_class(class: &str) -> Option<&'static str> {
    class.split_whitespace().find_map(|token| {
        TOOL_MARKERS
            .iter()
            .find(|(marker, _)| *marker == token)
            .map(|(_, name)| *name)
    })
}

/// Strips leading and trailing tabs and newlines, leaving spaces alone
pub(crate) fn trim_tabs_and_newlines(text: &str) -> &str {
    text.trim_matches(|c| c == '\t' || c == '\n')
}
