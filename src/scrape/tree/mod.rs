//! Tree-parse backend
//!
//! Parses the full document with `scraper` and locates records by structure
//! (tag name, class, row and cell position) instead of scan state.

mod grades;

use crate::scrape::records::{Assignment, GradeReport, Iframe, Tool};
use crate::scrape::{tool_name_for_class, trim_tabs_and_newlines, HtmlScraper};
use crate::{ExtractResult, ExtractionError};
use scraper::{ElementRef, Html, Selector};

/// Structural backend, registered as `tree`
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeScraper;

impl TreeScraper {
    pub fn new() -> Self {
        Self
    }
}

impl HtmlScraper for TreeScraper {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn get_iframes(&self, html: &str) -> ExtractResult<Vec<Iframe>> {
        let document = Html::parse_document(html);
        let iframe_selector = selector("iframe")?;

        document
            .select(&iframe_selector)
            .map(|iframe| {
                Ok(Iframe {
                    name: required_attr(iframe, "iframe", "name")?.to_string(),
                    title: required_attr(iframe, "iframe", "title")?.trim().to_string(),
                    src: required_attr(iframe, "iframe", "src")?.to_string(),
                })
            })
            .collect()
    }

    fn get_tools(&self, html: &str) -> ExtractResult<Vec<Tool>> {
        let document = Html::parse_document(html);
        let anchor_selector = selector("a[class]")?;
        let mut tools = Vec::new();

        for anchor in document.select(&anchor_selector) {
            let Some(name) = anchor.value().attr("class").and_then(tool_name_for_class) else {
                continue;
            };
            tools.push(Tool {
                name: name.to_string(),
                href: required_attr(anchor, "a", "href")?.to_string(),
                desc: required_attr(anchor, "a", "title")?.to_string(),
            });
        }

        Ok(tools)
    }

    fn get_assignments(&self, html: &str) -> ExtractResult<Vec<Assignment>> {
        let document = Html::parse_document(html);
        let heading_selector = selector("h4")?;
        let link_selector = selector("a")?;
        let status_selector = selector(r#"td[headers="status"]"#)?;
        let open_selector = selector(r#"td[headers="openDate"]"#)?;
        let due_selector = selector(r#"td[headers="dueDate"]"#)?;

        let mut assignments = Vec::new();

        for heading in document.select(&heading_selector) {
            let Some(link) = heading.select(&link_selector).next() else {
                continue;
            };
            let href = required_attr(link, "a", "href")?;

            let Some(row) = enclosing_row(heading) else {
                tracing::debug!("Assignment heading for {} is outside a table row", href);
                continue;
            };

            let cell_text = |cell_selector: &Selector| {
                row.select(cell_selector).next().and_then(first_text)
            };

            let fields = (
                first_text(link),
                cell_text(&status_selector),
                cell_text(&open_selector),
                cell_text(&due_selector),
            );

            match fields {
                (Some(title), Some(status), Some(open_date), Some(due_date)) => {
                    assignments.push(Assignment {
                        href: href.to_string(),
                        title,
                        status,
                        open_date,
                        due_date,
                    })
                }
                _ => tracing::debug!("Dropping incomplete assignment row for {}", href),
            }
        }

        Ok(assignments)
    }

    fn get_grades(&self, html: &str) -> ExtractResult<GradeReport> {
        grades::extract_grades(&Html::parse_document(html))
    }

    fn get_syllabus(&self, html: &str) -> ExtractResult<String> {
        let document = Html::parse_document(html);
        let table_selector = selector("table")?;

        document
            .select(&table_selector)
            .next()
            .map(|table| table.html())
            .ok_or_else(|| ExtractionError::MissingElement("syllabus <table>".to_string()))
    }
}

/// Parses a static CSS selector
pub(crate) fn selector(css: &str) -> ExtractResult<Selector> {
    Selector::parse(css)
        .map_err(|e| ExtractionError::MissingElement(format!("invalid selector '{}': {:?}", css, e)))
}

fn required_attr<'a>(
    element: ElementRef<'a>,
    name: &'static str,
    attribute: &'static str,
) -> ExtractResult<&'a str> {
    element
        .value()
        .attr(attribute)
        .ok_or(ExtractionError::MissingAttribute {
            element: name,
            attribute,
        })
}

/// First descendant text that is non-empty once tabs and newlines are trimmed
fn first_text(element: ElementRef<'_>) -> Option<String> {
    element
        .text()
        .map(trim_tabs_and_newlines)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

/// Nearest `<tr>` ancestor
fn enclosing_row(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "tr")
}
