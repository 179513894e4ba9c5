//! Gradebook extraction
//!
//! The gradebook page is a stack of tables, addressed by position:
//!
//! - table 0: page header, ignored
//! - table 1: course grade summary; the grade is the text of its second
//!   `<span>`, and a table without one means the grade is not released
//! - table 2: the grade listing. Its first row carries an image and is
//!   skipped. A row holding a `<span>` is a category header. Every other
//!   cell feeds a cycle name -> date -> grade -> comments -> attachment,
//!   where a name cell is one with the `left` class.
//!
//! Positions and the `left` class are what the current portal renders;
//! other portal versions may lay the page out differently.

use crate::scrape::records::{CourseGrade, GradeEntry, GradeReport, UNNAMED_CATEGORY};
use crate::scrape::tree::selector;
use crate::{ExtractResult, ExtractionError};
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;

const SUMMARY_TABLE: usize = 1;
const LISTING_TABLE: usize = 2;

/// Which cell of an entry comes next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GradeField {
    Name,
    Date,
    Grade,
    Comments,
    Attachment,
}

#[derive(Debug, Default)]
struct PendingEntry {
    name: String,
    date: String,
    grade: String,
}

/// Accumulates entries into category buckets
struct GradeListing {
    awaiting: GradeField,
    pending: PendingEntry,
    category: Option<String>,
    grades: BTreeMap<String, Vec<GradeEntry>>,
}

impl GradeListing {
    fn new() -> Self {
        Self {
            awaiting: GradeField::Name,
            pending: PendingEntry::default(),
            category: None,
            grades: BTreeMap::new(),
        }
    }

    /// Starts a new, empty category bucket
    fn start_category(&mut self, name: String) {
        self.awaiting = GradeField::Name;
        self.pending = PendingEntry::default();
        self.grades.insert(name.clone(), Vec::new());
        self.category = Some(name);
    }

    fn cell(&mut self, cell: ElementRef<'_>) {
        let text = || cell.text().collect::<String>().trim().to_string();

        self.awaiting = match self.awaiting {
            GradeField::Name => {
                if !has_class(cell, "left") {
                    return;
                }
                self.pending.name = text();
                GradeField::Date
            }
            GradeField::Date => {
                self.pending.date = text();
                GradeField::Grade
            }
            GradeField::Grade => {
                self.pending.grade = text();
                GradeField::Comments
            }
            GradeField::Comments => {
                let pending = std::mem::take(&mut self.pending);
                self.push(GradeEntry {
                    name: pending.name,
                    date: pending.date,
                    grade: pending.grade,
                    comments: text(),
                });
                GradeField::Attachment
            }
            GradeField::Attachment => GradeField::Name,
        };
    }

    /// Closes a row; a missing attachment cell does not carry over
    fn end_row(&mut self) {
        if self.awaiting == GradeField::Attachment {
            self.awaiting = GradeField::Name;
        }
    }

    fn push(&mut self, entry: GradeEntry) {
        let bucket = self
            .category
            .clone()
            .unwrap_or_else(|| UNNAMED_CATEGORY.to_string());
        self.grades.entry(bucket).or_default().push(entry);
    }
}

pub(crate) fn extract_grades(document: &Html) -> ExtractResult<GradeReport> {
    let table_selector = selector("table")?;
    let tables: Vec<ElementRef<'_>> = document.select(&table_selector).collect();

    let listing = tables.get(LISTING_TABLE).ok_or_else(|| {
        ExtractionError::MissingElement(format!(
            "gradebook listing table (found {} tables)",
            tables.len()
        ))
    })?;

    let course_grade = course_grade(tables[SUMMARY_TABLE])?;
    let grades = grade_listing(*listing)?;

    Ok(GradeReport {
        course_grade,
        grades,
    })
}

fn course_grade(summary: ElementRef<'_>) -> ExtractResult<CourseGrade> {
    let span_selector = selector("span")?;

    Ok(summary
        .select(&span_selector)
        .nth(1)
        .map(|span| CourseGrade::Grade(span.text().collect::<String>().trim().to_string()))
        .unwrap_or(CourseGrade::NotYetAvailable))
}

fn grade_listing(listing: ElementRef<'_>) -> ExtractResult<BTreeMap<String, Vec<GradeEntry>>> {
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;
    let span_selector = selector("span")?;
    let image_selector = selector("img")?;

    let mut state = GradeListing::new();

    for (index, row) in listing.select(&row_selector).enumerate() {
        if index == 0 && row.select(&image_selector).next().is_some() {
            continue;
        }

        if let Some(span) = row.select(&span_selector).next() {
            let name = span.text().collect::<String>().trim().to_string();
            state.start_category(name);
            continue;
        }

        for cell in row.select(&cell_selector) {
            state.cell(cell);
        }
        state.end_row();
    }

    Ok(state.grades)
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}
