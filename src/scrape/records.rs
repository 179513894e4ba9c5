//! Typed records recovered from portal pages

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Bucket for grade entries that appear before any category header
pub const UNNAMED_CATEGORY: &str = "unnamed";

/// Marker text for a course grade the gradebook has not released
pub const NOT_YET_AVAILABLE: &str = "Not yet available";

/// An embedded `<iframe>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Iframe {
    pub name: String,
    /// Whitespace-trimmed `title` attribute
    pub title: String,
    pub src: String,
}

/// A site tool link from the portal navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tool {
    /// Canonical tool name (`syllabus`, `resources`, `assignments`, `gradebook-tool`)
    pub name: String,
    pub href: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub href: String,
    pub title: String,
    pub status: String,
    pub open_date: String,
    pub due_date: String,
}

/// One gradebook row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeEntry {
    pub name: String,
    pub date: String,
    pub grade: String,
    pub comments: String,
}

/// Course-level grade summary
///
/// Serializes as `{"grade": "..."}` or `{"error": "Not yet available"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseGrade {
    Grade(String),
    NotYetAvailable,
}

impl Serialize for CourseGrade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            CourseGrade::Grade(grade) => map.serialize_entry("grade", grade)?,
            CourseGrade::NotYetAvailable => map.serialize_entry("error", NOT_YET_AVAILABLE)?,
        }
        map.end()
    }
}

/// Gradebook contents for one site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeReport {
    pub course_grade: CourseGrade,
    /// Category name -> entries in page order
    pub grades: BTreeMap<String, Vec<GradeEntry>>,
}

impl GradeReport {
    /// Entries under `category`, if that category exists
    pub fn category(&self, category: &str) -> Option<&[GradeEntry]> {
        self.grades.get(category).map(Vec::as_slice)
    }

    /// Total number of entries across all categories
    pub fn entry_count(&self) -> usize {
        self.grades.values().map(Vec::len).sum()
    }
}
