//! Code spans.
//!
//! A backtick run opens a span that closes on the next run of exactly the
//! same length. Runs of other lengths in between are content.

use super::{InlineMatch, Replacement};
use crate::element::{Content, Element};
use crate::limits::MAX_CODE_SPAN_BACKTICKS;

/// End of the first backtick run of exactly `run` backticks at or after
/// `from`.
pub(crate) fn closing_backticks(bytes: &[u8], from: usize, run: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let len = bytes[i..].iter().take_while(|&&b| b == b'`').count();
        if len == run {
            return Some(i + len);
        }
        i += len;
    }
    None
}

/// Parse a code span at the start of `text`.
pub(super) fn code_span(text: &str) -> Option<InlineMatch> {
    let bytes = text.as_bytes();
    let run = bytes.iter().take_while(|&&b| b == b'`').count();
    if run == 0 || run > MAX_CODE_SPAN_BACKTICKS {
        return None;
    }
    let end = closing_backticks(bytes, run, run)?;
    let content = normalize_content(&text[run..end - run]);
    Some(InlineMatch::at_marker(
        end,
        Replacement::Element(Element::new("code", Content::Text(content))),
    ))
}

/// Trim surrounding spaces and fold `[ ]*\n` into a single space.
fn normalize_content(raw: &str) -> String {
    let trimmed = raw.trim_matches(' ');
    if trimmed.is_empty() {
        return " ".to_owned();
    }
    let mut out = String::with_capacity(trimmed.len());
    for (i, line) in trimmed.split('\n').enumerate() {
        if i > 0 {
            let len = out.trim_end_matches(' ').len();
            out.truncate(len);
            out.push(' ');
        }
        out.push_str(line);
    }
    out
}
