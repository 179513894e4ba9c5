//! Assignment list state machine
//!
//! Two orthogonal state variables drive the scan. The parser state names
//! the field being awaited; the lexer state says whether the next text event
//! should be captured, and which field it feeds. Cells announce their field
//! through the `headers` attribute, so the lexer state can be set by a cell
//! independently of where the parser is.
//!
//! ```text
//! WaitingForH4 --<h4>--> WaitingForLink --<a href>--> WaitingForTitle
//!   --text--> WaitingForStatus --text--> WaitingForOpenDate
//!   --text--> WaitingForDueDate --text (emit)--> WaitingForH4
//! ```

use crate::scrape::records::Assignment;
use crate::scrape::tag_scan::events::{ScanHandler, StartTag};
use crate::scrape::trim_tabs_and_newlines;
use crate::ExtractResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    WaitingForH4,
    WaitingForLink,
    WaitingForTitle,
    WaitingForStatus,
    WaitingForOpenDate,
    WaitingForDueDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexerState {
    Starting,
    NextIsTitle,
    NextIsStatus,
    NextIsOpenDate,
    NextIsDueDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Status,
    OpenDate,
    DueDate,
}

/// Text transition table: the field a text event fills in a given state,
/// and the parser state that follows
fn capture_transition(parser: ParserState, lexer: LexerState) -> Option<(Field, ParserState)> {
    use LexerState::*;
    use ParserState::*;

    match (parser, lexer) {
        (WaitingForTitle, NextIsTitle) => Some((Field::Title, WaitingForStatus)),
        (WaitingForStatus, NextIsStatus) => Some((Field::Status, WaitingForOpenDate)),
        (WaitingForOpenDate, NextIsOpenDate) => Some((Field::OpenDate, WaitingForDueDate)),
        (WaitingForDueDate, NextIsDueDate) => Some((Field::DueDate, WaitingForH4)),
        _ => None,
    }
}

/// Lexer state announced by a `<td headers="...">` cell
fn lexer_state_for_cell(headers: &str) -> Option<LexerState> {
    match headers {
        "status" => Some(LexerState::NextIsStatus),
        "openDate" => Some(LexerState::NextIsOpenDate),
        "dueDate" => Some(LexerState::NextIsDueDate),
        _ => None,
    }
}

#[derive(Debug, Default)]
struct PendingAssignment {
    href: Option<String>,
    title: Option<String>,
    status: Option<String>,
    open_date: Option<String>,
}

impl PendingAssignment {
    fn complete(self, due_date: String) -> Option<Assignment> {
        Some(Assignment {
            href: self.href?,
            title: self.title?,
            status: self.status?,
            open_date: self.open_date?,
            due_date,
        })
    }
}

/// Per-run scan state
#[derive(Debug)]
pub(crate) struct AssignmentScan {
    parser: ParserState,
    lexer: LexerState,
    pending: PendingAssignment,
    assignments: Vec<Assignment>,
}

impl AssignmentScan {
    pub fn new() -> Self {
        Self {
            parser: ParserState::WaitingForH4,
            lexer: LexerState::Starting,
            pending: PendingAssignment::default(),
            assignments: Vec::new(),
        }
    }

    fn at(&self, parser: ParserState, lexer: LexerState) -> bool {
        self.parser == parser && self.lexer == lexer
    }

    fn reset(&mut self) {
        self.parser = ParserState::WaitingForH4;
        self.lexer = LexerState::Starting;
        self.pending = PendingAssignment::default();
    }

    /// Completed assignments; a trailing partial record is dropped
    pub fn finish(mut self) -> Vec<Assignment> {
        if self.parser != ParserState::WaitingForH4 {
            tracing::debug!(
                "Dropping incomplete assignment (stopped in {:?})",
                self.parser
            );
        }
        self.reset();
        self.assignments
    }
}

impl ScanHandler for AssignmentScan {
    fn start_tag(&mut self, tag: &StartTag<'_>) -> ExtractResult<()> {
        match tag.name() {
            "h4" => {
                if self.at(ParserState::WaitingForH4, LexerState::Starting) {
                    self.parser = ParserState::WaitingForLink;
                }
            }
            "a" => {
                if self.at(ParserState::WaitingForLink, LexerState::Starting) {
                    let href = tag.required_attr("a", "href")?;
                    self.pending.href = Some(href.to_string());
                    self.parser = ParserState::WaitingForTitle;
                    self.lexer = LexerState::NextIsTitle;
                }
            }
            "td" => {
                if let Some(lexer) = tag.attr("headers").and_then(lexer_state_for_cell) {
                    self.lexer = lexer;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> ExtractResult<()> {
        let text = trim_tabs_and_newlines(text);
        if text.is_empty() {
            return Ok(());
        }

        let Some((field, next)) = capture_transition(self.parser, self.lexer) else {
            return Ok(());
        };

        let value = text.to_string();
        match field {
            Field::Title => self.pending.title = Some(value),
            Field::Status => self.pending.status = Some(value),
            Field::OpenDate => self.pending.open_date = Some(value),
            Field::DueDate => {
                let pending = std::mem::take(&mut self.pending);
                if let Some(assignment) = pending.complete(value) {
                    self.assignments.push(assignment);
                }
                self.reset();
                return Ok(());
            }
        }

        self.parser = next;
        self.lexer = LexerState::Starting;
        Ok(())
    }
}
