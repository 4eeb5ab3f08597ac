//! Link and image parsing.
//!
//! Handles:
//! - Inline links: `[text](url "title")`
//! - Reference links: `[text][label]`, `[text][]` and `[text]`
//! - Images: `![alt](url "title")`
//! - Autolinks: `<https://example.com>` and `<user@example.com>`
//! - Bare `http://` and `https://` URLs

use memchr::{memchr, memchr2};

use super::{Excerpt, InlineMatch, Replacement, is_ascii_word};
use crate::element::{Content, Element};
use crate::link_ref::ReferenceTable;

/// A link after destination or reference resolution.
struct ParsedLink<'t> {
    /// Raw text between the brackets.
    text: &'t str,
    url: String,
    title: Option<String>,
    /// Bytes consumed, from the opening bracket.
    extent: usize,
}

#[inline]
fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
        i += 1;
    }
    i
}

/// Position of the `]` balancing the `[` at `bytes[0]`.
/// Backslash-escaped brackets do not count.
fn bracket_end(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'[' => depth += 1,
            b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// `(url "title")` at the start of `s`. Returns url, title and extent.
///
/// The url has no spaces; it may hold `(...)` groups one level deep, and
/// an enclosing `<...>` is dropped.
fn inline_destination(s: &str) -> Option<(&str, Option<&str>, usize)> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'(') {
        return None;
    }
    let url_start = skip_ws(bytes, 1);
    let mut i = url_start;
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b')' => break,
            b'(' => {
                let inner = bytes[i + 1..]
                    .iter()
                    .take_while(|&&b| b != b' ' && b != b')')
                    .count();
                if inner == 0 || bytes.get(i + 1 + inner) != Some(&b')') {
                    break;
                }
                i += inner + 2;
            }
            _ => i += 1,
        }
    }
    if i == url_start {
        return None;
    }
    let url = &s[url_start..i];
    let url = match url.strip_prefix('<').and_then(|u| u.strip_suffix('>')) {
        Some("") => return None,
        Some(inner) => inner,
        None => url,
    };

    let mut end = i;
    let mut title = None;
    let spaces = bytes[i..].iter().take_while(|&&b| b == b' ').count();
    if spaces > 0 {
        let quote_at = i + spaces;
        if let Some(&quote) = bytes.get(quote_at).filter(|&&b| b == b'"' || b == b'\'') {
            if let Some(len) = memchr(quote, &bytes[quote_at + 1..]) {
                title = Some(&s[quote_at + 1..quote_at + 1 + len]);
                end = quote_at + len + 2;
            }
        }
    }

    let close = skip_ws(bytes, end);
    if bytes.get(close) != Some(&b')') {
        return None;
    }
    Some((url, title, close + 1))
}

/// `[label]` after the link text, on the same line. Returns label and extent.
fn reference_label(s: &str) -> Option<(&str, usize)> {
    let bytes = s.as_bytes();
    let open = skip_ws(bytes, 0);
    if bytes.get(open) != Some(&b'[') {
        return None;
    }
    let start = open + 1;
    let close = start + memchr2(b']', b'\n', &bytes[start..])?;
    if bytes[close] != b']' {
        return None;
    }
    Some((&s[start..close], close + 1))
}

fn parse_link<'t>(text: &'t str, refs: &ReferenceTable) -> Option<ParsedLink<'t>> {
    if !text.starts_with('[') {
        return None;
    }
    let close = bracket_end(text.as_bytes())?;
    let link_text = &text[1..close];
    let rest = &text[close + 1..];
    let mut extent = close + 1;

    if let Some((url, title, len)) = inline_destination(rest) {
        return Some(ParsedLink {
            text: link_text,
            url: url.to_owned(),
            title: title.map(str::to_owned),
            extent: extent + len,
        });
    }

    let label = match reference_label(rest) {
        Some((label, len)) => {
            extent += len;
            if label.is_empty() { link_text } else { label }
        }
        None => link_text,
    };
    let def = refs.get(label)?;
    Some(ParsedLink {
        text: link_text,
        url: def.url.clone(),
        title: def.title.clone(),
        extent,
    })
}

/// `[text](url)` or a reference link. The text is inline-parsed later.
pub(super) fn link(text: &str, refs: &ReferenceTable) -> Option<InlineMatch> {
    let link = parse_link(text, refs)?;
    let element = Element::new("a", Content::Inline(link.text.to_owned()))
        .with_attr("href", link.url)
        .with_opt_attr("title", link.title);
    Some(InlineMatch::at_marker(
        link.extent,
        Replacement::Element(element),
    ))
}

/// `![alt](src)`. The alt text is used verbatim.
pub(super) fn image(text: &str, refs: &ReferenceTable) -> Option<InlineMatch> {
    let rest = text.strip_prefix('!')?;
    let link = parse_link(rest, refs)?;
    let element = Element::empty("img")
        .with_attr("src", link.url)
        .with_attr("alt", link.text)
        .with_opt_attr("title", link.title);
    Some(InlineMatch::at_marker(
        link.extent + 1,
        Replacement::Element(element),
    ))
}

fn link_to(url: &str) -> Element {
    Element::new("a", Content::Text(url.to_owned())).with_attr("href", url)
}

fn scheme_len(bytes: &[u8]) -> Option<usize> {
    let starts = |prefix: &[u8]| {
        bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix)
    };
    if starts(b"https://") {
        Some(8)
    } else if starts(b"http://") {
        Some(7)
    } else {
        None
    }
}

/// First bare URL in `context` as a byte range.
fn find_url(context: &str) -> Option<(usize, usize)> {
    let bytes = context.as_bytes();
    let mut from = 0;
    while let Some(k) = memchr2(b'h', b'H', &bytes[from..]) {
        let start = from + k;
        from = start + 1;
        if start > 0 && is_ascii_word(bytes[start - 1]) {
            continue;
        }
        let Some(scheme) = scheme_len(&bytes[start..]) else {
            continue;
        };

        let body = start + scheme;
        let run = bytes[body..]
            .iter()
            .take_while(|&&b| !b.is_ascii_whitespace() && b != b'<')
            .count();
        // Back off to the last word boundary, then take trailing slashes.
        let mut end = body + run;
        while end > body
            && is_ascii_word(bytes[end - 1]) == bytes.get(end).is_some_and(|&b| is_ascii_word(b))
        {
            end -= 1;
        }
        if end == body {
            continue;
        }
        while bytes.get(end) == Some(&b'/') {
            end += 1;
        }
        return Some((start, end));
    }
    None
}

/// A bare `http(s)://` URL around a `:` marker.
pub(super) fn url(excerpt: &Excerpt<'_>) -> Option<InlineMatch> {
    if !excerpt.text.starts_with("://") {
        return None;
    }
    let (start, end) = find_url(excerpt.context)?;
    Some(InlineMatch {
        extent: end - start,
        position: Some(start),
        replacement: Replacement::Element(link_to(&excerpt.context[start..end])),
    })
}

/// `<scheme://...>`.
pub(super) fn url_tag(text: &str) -> Option<InlineMatch> {
    let rest = text.strip_prefix('<')?;
    let bytes = rest.as_bytes();
    let scheme = bytes.iter().take_while(|&&b| is_ascii_word(b)).count();
    if scheme == 0 || !rest[scheme..].starts_with("://") {
        return None;
    }
    let body = scheme + 3;
    let run = bytes[body..]
        .iter()
        .take_while(|&&b| b != b' ' && b != b'>')
        .count();
    if run == 0 || bytes.get(body + run) != Some(&b'>') {
        return None;
    }
    let element = link_to(&rest[..body + run]);
    Some(InlineMatch::at_marker(
        body + run + 2,
        Replacement::Element(element),
    ))
}

/// `<user@host>` or `<mailto:user@host>`.
pub(super) fn email_tag(text: &str) -> Option<InlineMatch> {
    let rest = text.strip_prefix('<')?;
    let bytes = rest.as_bytes();
    let region = bytes
        .iter()
        .take_while(|b| !b.is_ascii_whitespace())
        .count();
    let at = 1 + bytes.get(1..region)?.iter().position(|&b| b == b'@')?;
    let close = at + 2 + bytes.get(at + 2..region)?.iter().position(|&b| b == b'>')?;

    let address = &rest[..close];
    let has_scheme = address
        .get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("mailto:"));
    let href = if has_scheme {
        address.to_owned()
    } else {
        format!("mailto:{address}")
    };
    let element = Element::new("a", Content::Text(address.to_owned())).with_attr("href", href);
    Some(InlineMatch::at_marker(
        close + 2,
        Replacement::Element(element),
    ))
}
