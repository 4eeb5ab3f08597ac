//! HTML escaping utilities.
//!
//! Fast-path optimized: scans for the first escapable byte with `memchr`,
//! then bulk-copies segments between escapes. Only ASCII bytes are ever
//! replaced, so escaping valid UTF-8 yields valid UTF-8.

use memchr::{memchr, memchr2, memchr3};

/// Lookup table for escapable bytes in text content.
/// `"` is escaped too, so text can be pasted into attribute context safely.
const TEXT_ESCAPE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table[b'"' as usize] = true;
    table
};

/// Lookup table for escapable bytes in attribute values.
const ATTR_ESCAPE_TABLE: [bool; 256] = {
    let mut table = TEXT_ESCAPE_TABLE;
    table[b'\'' as usize] = true;
    table
};

/// Escape HTML text content into output buffer.
///
/// # Example
/// ```
/// use linemark::escape::escape_text_into;
///
/// let mut out = Vec::new();
/// escape_text_into(&mut out, b"<script>");
/// assert_eq!(out, b"&lt;script&gt;");
/// ```
#[inline]
pub fn escape_text_into(out: &mut Vec<u8>, input: &[u8]) {
    match first_text_escape(input) {
        Some(pos) => escape_from(out, input, pos, &TEXT_ESCAPE_TABLE),
        None => out.extend_from_slice(input),
    }
}

/// Escape an HTML attribute value into output buffer.
///
/// Escapes `<`, `>`, `&`, `"` and `'`.
///
/// # Example
/// ```
/// use linemark::escape::escape_attr_into;
///
/// let mut out = Vec::new();
/// escape_attr_into(&mut out, b"it's \"quoted\"");
/// assert_eq!(out, b"it&#39;s &quot;quoted&quot;");
/// ```
#[inline]
pub fn escape_attr_into(out: &mut Vec<u8>, input: &[u8]) {
    match first_attr_escape(input) {
        Some(pos) => escape_from(out, input, pos, &ATTR_ESCAPE_TABLE),
        None => out.extend_from_slice(input),
    }
}

/// Copy `input[..first]` verbatim, then escape the rest using `table`.
#[inline]
fn escape_from(out: &mut Vec<u8>, input: &[u8], first: usize, table: &[bool; 256]) {
    out.reserve(input.len() + 8);
    out.extend_from_slice(&input[..first]);

    let mut pos = first;
    while pos < input.len() {
        let scan_start = pos;
        while pos < input.len() && !table[input[pos] as usize] {
            pos += 1;
        }
        if pos > scan_start {
            out.extend_from_slice(&input[scan_start..pos]);
        }
        if pos < input.len() {
            out.extend_from_slice(entity_for(input[pos]));
            pos += 1;
        }
    }
}

#[inline]
fn entity_for(b: u8) -> &'static [u8] {
    match b {
        b'<' => b"&lt;",
        b'>' => b"&gt;",
        b'&' => b"&amp;",
        b'"' => b"&quot;",
        b'\'' => b"&#39;",
        _ => b"",
    }
}

#[inline]
fn first_text_escape(input: &[u8]) -> Option<usize> {
    let a = memchr3(b'<', b'>', b'&', input);
    let b = memchr(b'"', input);
    min_opt(a, b)
}

#[inline]
fn first_attr_escape(input: &[u8]) -> Option<usize> {
    let a = memchr3(b'<', b'>', b'&', input);
    let b = memchr2(b'"', b'\'', input);
    min_opt(a, b)
}

#[inline]
fn min_opt(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
