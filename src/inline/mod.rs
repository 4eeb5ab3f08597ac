//! Inline parser for Markdown.
//!
//! Scans a span of text for marker characters and offers the text at each
//! marker to the constructors registered for that marker, in order:
//! 1. Find the next marker with a byte lookup table
//! 2. Try each constructor; the first match wins
//! 3. Flush pending literal text, emit the match, resume after it
//!
//! Unmatched markers stay in the pending literal text. Matched elements
//! whose content is itself inline Markdown are parsed recursively when they
//! are written out.

mod code_span;
mod emphasis;
mod links;
mod special;
mod strikethrough;

pub(crate) use code_span::closing_backticks;
use strikethrough::CloserMemo;

use crate::Options;
use crate::element::Element;
use crate::limits::MAX_INLINE_NESTING;
use crate::line::LineRecord;
use crate::link_ref::ReferenceTable;
use crate::render::{ContentHandler, HtmlWriter, write_element, write_escaped_lines};

/// The inline constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineKind {
    Code,
    Emphasis,
    EmailTag,
    EscapeSequence,
    Image,
    Link,
    SpecialCharacter,
    Strikethrough,
    Url,
    UrlTag,
}

/// Constructors tried for `marker`, in priority order.
pub fn inline_types(marker: u8) -> &'static [InlineKind] {
    use InlineKind::*;

    match marker {
        b'"' | b'>' | b'&' => &[SpecialCharacter],
        b'!' => &[Image],
        b'*' | b'_' => &[Emphasis],
        b':' => &[Url],
        b'<' => &[UrlTag, EmailTag, SpecialCharacter],
        b'[' => &[Link],
        b'`' => &[Code],
        b'~' => &[Strikethrough],
        b'\\' => &[EscapeSequence],
        _ => &[],
    }
}

/// Lookup table for inline marker bytes.
static INLINE_MARKERS: [bool; 256] = {
    let mut table = [false; 256];
    let markers = b"!\"*_&[:<>`~\\";
    let mut i = 0;
    while i < markers.len() {
        table[markers[i] as usize] = true;
        i += 1;
    }
    table
};

/// Check if a byte starts an inline construct.
#[inline]
pub fn is_inline_marker(b: u8) -> bool {
    INLINE_MARKERS[b as usize]
}

#[inline]
pub(crate) fn is_ascii_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[inline]
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The text a constructor sees.
struct Excerpt<'t> {
    /// From the marker to the end of the span.
    text: &'t str,
    /// All text not yet emitted, starting before the marker.
    context: &'t str,
    /// Offset of the marker within the span.
    offset: usize,
}

/// What a matched construct is replaced with.
#[derive(Debug)]
enum Replacement {
    /// Final HTML, written as is.
    Markup(String),
    Element(Element),
}

/// A successful constructor result.
#[derive(Debug)]
struct InlineMatch {
    /// Bytes consumed from `position`.
    extent: usize,
    /// Start of the match within the context. `None` means at the marker.
    position: Option<usize>,
    replacement: Replacement,
}

impl InlineMatch {
    fn at_marker(extent: usize, replacement: Replacement) -> Self {
        Self {
            extent,
            position: None,
            replacement,
        }
    }
}

/// Inline parser state.
pub struct InlineParser<'a> {
    refs: &'a ReferenceTable,
    options: &'a Options,
    /// Recursion depth of nested inline content.
    depth: usize,
    /// Inside link text, where links and bare URLs are not recognized.
    in_link: bool,
}

impl<'a> InlineParser<'a> {
    /// Create a parser for top-level inline content.
    pub fn new(refs: &'a ReferenceTable, options: &'a Options) -> Self {
        Self {
            refs,
            options,
            depth: 0,
            in_link: false,
        }
    }

    /// Parser for the content of `element`.
    fn nested(&self, element: &Element) -> Self {
        Self {
            refs: self.refs,
            options: self.options,
            depth: self.depth + 1,
            in_link: self.in_link || element.name == Some("a"),
        }
    }

    /// Render a span of inline Markdown to HTML.
    pub fn line(&mut self, text: &str) -> String {
        let mut out = HtmlWriter::with_capacity_for(text.len());
        self.line_into(text, &mut out);
        out.into_string()
    }

    /// Render a span of inline Markdown into `out`.
    pub fn line_into(&mut self, text: &str, out: &mut HtmlWriter) {
        let breaks = self.options.breaks_enabled;
        if self.depth > MAX_INLINE_NESTING {
            unmarked_text(out, text, breaks);
            return;
        }

        let bytes = text.as_bytes();
        // `start`: first byte not yet emitted. `scan`: where the marker search resumes.
        let mut start = 0;
        let mut scan = 0;
        let mut memo = CloserMemo::default();
        while let Some(found) = bytes[scan..].iter().position(|&b| is_inline_marker(b)) {
            let marker_pos = scan + found;
            let offset = marker_pos - start;
            let excerpt = Excerpt {
                text: &text[marker_pos..],
                context: &text[start..],
                offset: marker_pos,
            };

            let matched = inline_types(bytes[marker_pos])
                .iter()
                .filter(|&&kind| self.allows(kind))
                .find_map(|&kind| {
                    self.try_kind(kind, &excerpt, &mut memo)
                        .filter(|m| m.position.is_none_or(|p| p <= offset))
                });

            match matched {
                Some(m) => {
                    let position = start + m.position.unwrap_or(offset);
                    unmarked_text(out, &text[start..position], breaks);
                    self.emit(m.replacement, out);
                    start = position + m.extent;
                    scan = start;
                }
                None => scan = marker_pos + 1,
            }
        }
        unmarked_text(out, &text[start..], breaks);
    }

    fn allows(&self, kind: InlineKind) -> bool {
        match kind {
            InlineKind::Link | InlineKind::Url if self.in_link => false,
            InlineKind::Url => self.options.urls_linked,
            _ => true,
        }
    }

    fn try_kind(
        &self,
        kind: InlineKind,
        excerpt: &Excerpt<'_>,
        memo: &mut CloserMemo,
    ) -> Option<InlineMatch> {
        let text = excerpt.text;
        match kind {
            InlineKind::Code => code_span::code_span(text),
            InlineKind::Emphasis => emphasis::emphasis(text),
            InlineKind::EmailTag => links::email_tag(text),
            InlineKind::EscapeSequence => special::escape_sequence(text),
            InlineKind::Image => links::image(text, self.refs),
            InlineKind::Link => links::link(text, self.refs),
            InlineKind::SpecialCharacter => special::special_character(text),
            InlineKind::Strikethrough => strikethrough::strikethrough(text, excerpt.offset, memo),
            InlineKind::Url => links::url(excerpt),
            InlineKind::UrlTag => links::url_tag(text),
        }
    }

    fn emit(&self, replacement: Replacement, out: &mut HtmlWriter) {
        match replacement {
            Replacement::Markup(markup) => out.write_string(&markup),
            Replacement::Element(element) => {
                let mut content = self.nested(&element);
                write_element(&element, &mut content, out);
            }
        }
    }
}

impl ContentHandler for InlineParser<'_> {
    fn inline(&mut self, text: &str, out: &mut HtmlWriter) {
        self.line_into(text, out);
    }

    // Inline elements never carry block content.
    fn lines(&mut self, lines: &[LineRecord], out: &mut HtmlWriter) {
        write_escaped_lines(lines, out);
    }

    fn list_item(&mut self, lines: &[LineRecord], out: &mut HtmlWriter) {
        write_escaped_lines(lines, out);
    }
}

/// Write literal text: HTML-escaped, with hard breaks resolved.
///
/// A line ending in a backslash or in two or more spaces becomes
/// `<br />`; with `breaks_enabled` every line ending does.
pub fn unmarked_text(out: &mut HtmlWriter, text: &str, breaks_enabled: bool) {
    let mut lines = text.split('\n').peekable();
    while let Some(line) = lines.next() {
        if lines.peek().is_none() {
            out.write_escaped_text(line.as_bytes());
            break;
        }

        let trimmed = line.trim_end_matches(' ');
        let (kept, hard_break) = if breaks_enabled {
            (trimmed, true)
        } else if let Some(before) = line.strip_suffix('\\') {
            (before.trim_end_matches(' '), true)
        } else if line.len() - trimmed.len() >= 2 {
            (trimmed, true)
        } else {
            (line.strip_suffix(' ').unwrap_or(line), false)
        };

        out.write_escaped_text(kept.as_bytes());
        out.write_str(if hard_break { "<br />\n" } else { "\n" });
    }
}
