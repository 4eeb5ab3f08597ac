//! HTML output: the byte buffer writer and the element serializer.
//!
//! Elements are written depth-first. Content that still needs parsing
//! (inline Markdown, quote bodies, list items) is handed to a
//! [`ContentHandler`], so the same serializer serves the block and the
//! inline layer.

use crate::Options;
use crate::block::{Block, BlockParser};
use crate::element::{Content, Element};
use crate::error::Error;
use crate::escape;
use crate::inline::InlineParser;
use crate::line::LineRecord;
use crate::link_ref::ReferenceTable;
use crate::sanitize::sanitized_attributes;

/// HTML output writer over a byte buffer.
///
/// # Example
/// ```
/// use linemark::HtmlWriter;
///
/// let mut writer = HtmlWriter::with_capacity_for(1000);
/// writer.write_str("<p>");
/// writer.write_escaped_text(b"Hello <World>");
/// writer.write_str("</p>");
///
/// let html = writer.into_string();
/// assert_eq!(html, "<p>Hello &lt;World&gt;</p>");
/// ```
pub struct HtmlWriter {
    out: Vec<u8>,
}

impl HtmlWriter {
    /// Create a new writer with default capacity.
    #[inline]
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(1024),
        }
    }

    /// Create with pre-allocated capacity based on expected input size.
    ///
    /// Typical HTML is ~1.25x input size.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        let capacity = input_len + input_len / 4;
        Self {
            out: Vec::with_capacity(capacity),
        }
    }

    /// Write a static string (compile-time known).
    #[inline]
    pub fn write_str(&mut self, s: &'static str) {
        self.out.extend_from_slice(s.as_bytes());
    }

    /// Write a dynamic string without escaping.
    #[inline]
    pub fn write_string(&mut self, s: &str) {
        self.out.extend_from_slice(s.as_bytes());
    }

    /// Write a single ASCII byte.
    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        debug_assert!(b.is_ascii());
        self.out.push(b);
    }

    /// Write text with HTML escaping (for text content).
    #[inline]
    pub fn write_escaped_text(&mut self, text: &[u8]) {
        escape::escape_text_into(&mut self.out, text);
    }

    /// Write attribute value with full escaping (including quotes).
    #[inline]
    pub fn write_escaped_attr(&mut self, attr: &[u8]) {
        escape::escape_attr_into(&mut self.out, attr);
    }

    /// Write a newline.
    #[inline]
    pub fn newline(&mut self) {
        self.out.push(b'\n');
    }

    /// Current output length.
    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// Check if output is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Get output as str.
    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: only `&str` data and ASCII bytes are ever written, and
        // escaping replaces whole ASCII characters.
        unsafe { std::str::from_utf8_unchecked(&self.out) }
    }

    /// Take ownership as String.
    #[inline]
    pub fn into_string(self) -> String {
        // SAFETY: see `as_str`.
        unsafe { String::from_utf8_unchecked(self.out) }
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the content variants that need parsing context.
pub trait ContentHandler {
    /// Inline Markdown inside an element.
    fn inline(&mut self, text: &str, out: &mut HtmlWriter);

    /// A nested document (block quote body).
    fn lines(&mut self, lines: &[LineRecord], out: &mut HtmlWriter);

    /// The body of one list item, without the `<li>` tags.
    fn list_item(&mut self, lines: &[LineRecord], out: &mut HtmlWriter);
}

/// Serialize `element` with sanitized attributes.
pub fn write_element<H>(element: &Element, handler: &mut H, out: &mut HtmlWriter)
where
    H: ContentHandler + ?Sized,
{
    let Some(name) = element.name else {
        if let Some(content) = &element.content {
            write_content(content, handler, out);
        }
        return;
    };

    out.write_byte(b'<');
    out.write_string(name);
    for (attr, value) in sanitized_attributes(element) {
        out.write_byte(b' ');
        out.write_string(attr);
        out.write_str("=\"");
        out.write_escaped_attr(value.as_bytes());
        out.write_byte(b'"');
    }

    match &element.content {
        None => out.write_str(" />"),
        Some(content) => {
            out.write_byte(b'>');
            write_content(content, handler, out);
            out.write_str("</");
            out.write_string(name);
            out.write_byte(b'>');
        }
    }
}

fn write_content<H>(content: &Content, handler: &mut H, out: &mut HtmlWriter)
where
    H: ContentHandler + ?Sized,
{
    match content {
        Content::Text(text) => out.write_escaped_text(text.as_bytes()),
        Content::Inline(text) => handler.inline(text, out),
        Content::Element(child) => write_element(child, handler, out),
        Content::Children(children) => {
            for child in children {
                out.newline();
                write_element(child, handler, out);
            }
            out.newline();
        }
        Content::ListItems(items) => {
            for item in items {
                out.write_str("\n<li>");
                handler.list_item(item, out);
                out.write_str("</li>");
            }
            out.newline();
        }
        Content::Lines(lines) => handler.lines(lines, out),
    }
}

/// Lines as escaped literal text, joined by newlines.
pub fn write_escaped_lines(lines: &[LineRecord], out: &mut HtmlWriter) {
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.newline();
        }
        out.write_escaped_text(line.body().as_bytes());
    }
}

/// Block-level renderer for one document.
///
/// List items and quotes are parsed again while they are written out. Their
/// reference definitions were collected by the block pass, so the table is
/// only read here.
pub struct Renderer<'a> {
    options: &'a Options,
    refs: &'a ReferenceTable,
    /// Nesting level of the document being written.
    depth: usize,
    /// First nesting overflow, if any.
    truncated: Option<Error>,
}

impl<'a> Renderer<'a> {
    pub fn new(options: &'a Options, refs: &'a ReferenceTable) -> Self {
        Self {
            options,
            refs,
            depth: 0,
            truncated: None,
        }
    }

    /// Write top-level blocks separated by a blank line.
    pub fn render_blocks(&mut self, blocks: &[Block], out: &mut HtmlWriter) {
        for (i, block) in blocks.iter().filter(|b| !b.hidden).enumerate() {
            if i > 0 {
                out.write_str("\n\n");
            }
            write_element(&block.element, self, out);
        }
    }

    /// Parse and write a nested document: each block after a newline, then
    /// a final newline.
    fn write_document(&mut self, lines: &[LineRecord], out: &mut HtmlWriter) {
        // Definitions met again here are already in `self.refs`.
        let mut seen = ReferenceTable::new();
        let parsed =
            BlockParser::nested(&mut seen, self.depth + 1).map(|p| p.shallow().parse(lines));
        let blocks = match parsed {
            Ok(blocks) => blocks,
            Err(err) => {
                self.truncated.get_or_insert(err);
                write_escaped_lines(lines, out);
                return;
            }
        };

        self.depth += 1;
        for block in blocks.iter().filter(|b| !b.hidden) {
            out.newline();
            write_element(&block.element, self, out);
        }
        self.depth -= 1;
        out.newline();
    }

    /// The first nesting overflow seen so far.
    pub fn error(&self) -> Option<&Error> {
        self.truncated.as_ref()
    }

    pub fn into_error(self) -> Option<Error> {
        self.truncated
    }
}

impl ContentHandler for Renderer<'_> {
    fn inline(&mut self, text: &str, out: &mut HtmlWriter) {
        InlineParser::new(self.refs, self.options).line_into(text, out);
    }

    fn lines(&mut self, lines: &[LineRecord], out: &mut HtmlWriter) {
        self.write_document(lines, out);
    }

    /// Tight items (no blank line inside) lose the `<p>` around their first
    /// paragraph.
    fn list_item(&mut self, lines: &[LineRecord], out: &mut HtmlWriter) {
        let mut item = HtmlWriter::with_capacity_for(lines.iter().map(|l| l.body().len()).sum());
        self.write_document(lines, &mut item);
        let markup = item.into_string();

        let tight = !lines.iter().any(|line| line.body().is_empty());
        match markup.trim().strip_prefix("<p>") {
            Some(rest) if tight => match rest.find("</p>") {
                Some(close) => {
                    out.write_string(&rest[..close]);
                    out.write_string(&rest[close + 4..]);
                }
                None => out.write_string(rest),
            },
            _ => out.write_string(&markup),
        }
    }
}
