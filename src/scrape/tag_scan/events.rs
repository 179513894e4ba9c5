//! Tag and text event stream over the html5ever tokenizer
//!
//! The tokenizer runs without a tree builder, so handlers see the document
//! as written: one start-tag event per opening tag, and one text event per
//! run of character data between markup.

use crate::{ExtractResult, ExtractionError};
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

/// An opening tag as seen by a [`ScanHandler`]
pub(crate) struct StartTag<'a> {
    tag: &'a Tag,
}

impl<'a> StartTag<'a> {
    /// Lowercased tag name
    pub fn name(&self) -> &'a str {
        &self.tag.name
    }

    /// Value of the attribute `name`, if present
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.tag
            .attrs
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| &*attr.value)
    }

    /// Value of a required attribute
    pub fn required_attr(
        &self,
        element: &'static str,
        attribute: &'static str,
    ) -> ExtractResult<&'a str> {
        self.attr(attribute)
            .ok_or(ExtractionError::MissingAttribute { element, attribute })
    }
}

/// Receives scan events in document order
///
/// Returning an error stops the scan; later events are discarded.
pub(crate) trait ScanHandler {
    fn start_tag(&mut self, tag: &StartTag<'_>) -> ExtractResult<()>;

    fn text(&mut self, _text: &str) -> ExtractResult<()> {
        Ok(())
    }
}

struct EventSink<H> {
    handler: H,
    text: String,
    error: Option<ExtractionError>,
}

impl<H: ScanHandler> EventSink<H> {
    fn record(&mut self, result: ExtractResult<()>) {
        if let Err(e) = result {
            self.error = Some(e);
        }
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        let result = self.handler.text(&text);
        self.record(result);
    }
}

impl<H: ScanHandler> TokenSink for EventSink<H> {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        if self.error.is_some() {
            return TokenSinkResult::Continue;
        }

        match token {
            Token::CharacterTokens(chars) => self.text.push_str(&chars),
            Token::NullCharacterToken | Token::ParseError(_) => {}
            Token::TagToken(tag) => {
                self.flush_text();
                if self.error.is_none() && tag.kind == TagKind::StartTag {
                    let result = self.handler.start_tag(&StartTag { tag: &tag });
                    self.record(result);

                    // Script and style bodies are not markup
                    match &*tag.name {
                        "script" if !tag.self_closing => {
                            return TokenSinkResult::RawData(RawKind::ScriptData)
                        }
                        "style" if !tag.self_closing => {
                            return TokenSinkResult::RawData(RawKind::Rawtext)
                        }
                        _ => {}
                    }
                }
            }
            Token::CommentToken(_) | Token::DoctypeToken(_) | Token::EOFToken => {
                self.flush_text()
            }
        }

        TokenSinkResult::Continue
    }
}

/// Feeds `html` through `handler` in a single forward pass
///
/// Returns the handler for the caller to collect its results.
pub(crate) fn scan<H: ScanHandler>(html: &str, handler: H) -> ExtractResult<H> {
    let sink = EventSink {
        handler,
        text: String::new(),
        error: None,
    };

    let mut tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from(html));
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();

    let mut sink = tokenizer.sink;
    sink.flush_text();
    match sink.error {
        Some(e) => Err(e),
        None => Ok(sink.handler),
    }
}
