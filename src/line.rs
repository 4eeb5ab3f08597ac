//! Line reading: newline normalization, tab expansion and indentation.
//!
//! Every block-level decision is made on a [`LineRecord`], so this is the
//! only place that looks at raw input bytes for line structure.

use std::borrow::Cow;

use memchr::memchr;

use crate::limits::TAB_WIDTH;

/// One input line, tab-expanded, with its indentation measured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    body: String,
    indent: usize,
}

impl LineRecord {
    /// Build a record from a single line (no newline characters).
    pub fn new(line: &str) -> Self {
        let body = expand_tabs(line);
        let indent = body.bytes().take_while(|&b| b == b' ').count();
        Self { body, indent }
    }

    /// An empty line, used as the separator inside nested buffers.
    pub fn blank() -> Self {
        Self {
            body: String::new(),
            indent: 0,
        }
    }

    /// The tab-expanded line, indentation included.
    #[inline]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Number of leading spaces.
    #[inline]
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// The line with its indentation stripped.
    #[inline]
    pub fn text(&self) -> &str {
        &self.body[self.indent..]
    }

    /// First character of [`text`](Self::text), the block dispatch key.
    #[inline]
    pub fn marker(&self) -> Option<u8> {
        self.text().as_bytes().first().copied()
    }

    /// Whether the line is empty once trailing whitespace is removed.
    #[inline]
    pub fn is_blank(&self) -> bool {
        trim_end_ws(&self.body).is_empty()
    }

    /// The body with up to `max` leading spaces removed.
    pub fn body_after_indent(&self, max: usize) -> &str {
        &self.body[self.indent.min(max)..]
    }
}

/// Iterator over the [`LineRecord`]s of a document.
///
/// `\r\n` and lone `\r` are normalized to `\n`, and leading/trailing
/// newlines of the document are dropped.
pub struct LineReader<'a> {
    input: Cow<'a, str>,
    pos: usize,
    done: bool,
}

impl<'a> LineReader<'a> {
    /// Create a reader over a whole document.
    pub fn new(document: &'a str) -> Self {
        let input = normalize_newlines(document);
        let done = input.is_empty();
        Self {
            input,
            pos: 0,
            done,
        }
    }
}

impl Iterator for LineReader<'_> {
    type Item = LineRecord;

    fn next(&mut self) -> Option<LineRecord> {
        if self.done {
            return None;
        }
        let rest = &self.input[self.pos..];
        let line = match memchr(b'\n', rest.as_bytes()) {
            Some(i) => {
                self.pos += i + 1;
                &rest[..i]
            }
            None => {
                self.done = true;
                rest
            }
        };
        Some(LineRecord::new(line))
    }
}

fn normalize_newlines(document: &str) -> Cow<'_, str> {
    if memchr(b'\r', document.as_bytes()).is_none() {
        return Cow::Borrowed(document.trim_matches('\n'));
    }
    let normalized = document.replace("\r\n", "\n").replace('\r', "\n");
    Cow::Owned(normalized.trim_matches('\n').to_owned())
}

/// Expand each tab to the next multiple of [`TAB_WIDTH`] columns.
///
/// Columns are counted in characters, not bytes.
pub fn expand_tabs(line: &str) -> String {
    if memchr(b'\t', line.as_bytes()).is_none() {
        return line.to_owned();
    }
    let mut out = String::with_capacity(line.len() + TAB_WIDTH);
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let shortage = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', shortage));
            column += shortage;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}

/// Trim trailing whitespace, NUL and vertical tab included.
#[inline]
pub(crate) fn trim_end_ws(s: &str) -> &str {
    s.trim_end_matches(&[' ', '\t', '\n', '\r', '\0', '\x0B'][..])
}
