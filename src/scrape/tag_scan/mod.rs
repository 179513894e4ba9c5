//! Streaming tag-scan backend
//!
//! Extracts records from a single forward pass of tag and text events,
//! without building a document tree. Grades and syllabi need structural
//! navigation and are not supported here.

mod assignments;
mod events;

use crate::scrape::records::{Assignment, Iframe, Tool};
use crate::scrape::{tool_name_for_class, HtmlScraper};
use crate::ExtractResult;
use assignments::AssignmentScan;
use events::{scan, ScanHandler, StartTag};

/// Event-driven backend, registered as `default`
#[derive(Debug, Clone, Copy, Default)]
pub struct TagScanScraper;

impl TagScanScraper {
    pub fn new() -> Self {
        Self
    }
}

impl HtmlScraper for TagScanScraper {
    fn name(&self) -> &'static str {
        "default"
    }

    fn get_iframes(&self, html: &str) -> ExtractResult<Vec<Iframe>> {
        Ok(scan(html, IframeScan::default())?.iframes)
    }

    fn get_tools(&self, html: &str) -> ExtractResult<Vec<Tool>> {
        Ok(scan(html, ToolScan::default())?.tools)
    }

    fn get_assignments(&self, html: &str) -> ExtractResult<Vec<Assignment>> {
        Ok(scan(html, AssignmentScan::new())?.finish())
    }
}

#[derive(Default)]
struct IframeScan {
    iframes: Vec<Iframe>,
}

impl ScanHandler for IframeScan {
    fn start_tag(&mut self, tag: &StartTag<'_>) -> ExtractResult<()> {
        if tag.name() == "iframe" {
            self.iframes.push(Iframe {
                name: tag.required_attr("iframe", "name")?.to_string(),
                title: tag.required_attr("iframe", "title")?.trim().to_string(),
                src: tag.required_attr("iframe", "src")?.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
struct ToolScan {
    tools: Vec<Tool>,
}

impl ScanHandler for ToolScan {
    fn start_tag(&mut self, tag: &StartTag<'_>) -> ExtractResult<()> {
        if tag.name() != "a" {
            return Ok(());
        }

        if let Some(name) = tag.attr("class").and_then(tool_name_for_class) {
            self.tools.push(Tool {
                name: name.to_string(),
                href: tag.required_attr("a", "href")?.to_string(),
                desc: tag.required_attr("a", "title")?.to_string(),
            });
        }
        Ok(())
    }
}
