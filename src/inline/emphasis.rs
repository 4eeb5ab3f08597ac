//! Emphasis and strong emphasis.
//!
//! Content is a lazy repetition of tokens followed by a closing delimiter:
//! the shortest content after which the closer matches wins. Tokens are
//! escaped markers, non-marker characters, or a nested pair of the other
//! delimiter width. Positions that already failed are never searched again,
//! so each attempt is linear in the remaining text.

use memchr::memchr;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::{InlineMatch, Replacement, is_word_char};
use crate::element::{Content, Element};

type Steps = SmallVec<[usize; 3]>;

/// Byte length of the UTF-8 sequence starting with `lead`.
#[inline]
fn utf8_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

/// Search for the shortest token sequence from `start` that `closer` accepts.
///
/// `closer(i)` returns the match end when a closing delimiter starts at `i`.
/// `steps(i)` pushes the positions reachable by consuming one token at `i`,
/// in priority order. Returns `(content_end, match_end)`.
fn lazy_match(
    len: usize,
    start: usize,
    closer: impl Fn(usize) -> Option<usize>,
    steps: impl Fn(usize, &mut Steps),
) -> Option<(usize, usize)> {
    let mut visited = FxHashSet::default();
    let mut stack = vec![start];
    let mut next = Steps::new();

    while let Some(i) = stack.pop() {
        if !visited.insert(i) {
            continue;
        }
        if i > start {
            if let Some(end) = closer(i) {
                return Some((i, end));
            }
        }
        if i >= len {
            continue;
        }
        next.clear();
        steps(i, &mut next);
        stack.extend(next.iter().rev().copied());
    }
    None
}

/// Escaped marker, then any non-marker character.
#[inline]
fn push_simple_steps(bytes: &[u8], i: usize, marker: u8, next: &mut Steps) {
    if bytes[i] == b'\\' && bytes.get(i + 1) == Some(&marker) {
        next.push(i + 2);
    }
    if bytes[i] != marker {
        next.push(i + utf8_len(bytes[i]));
    }
}

/// `MM content MM`, where content may hold single-marker pairs.
fn strong(bytes: &[u8], marker: u8) -> Option<(usize, usize)> {
    let closer = |i: usize| {
        (bytes.get(i) == Some(&marker)
            && bytes.get(i + 1) == Some(&marker)
            && bytes.get(i + 2) != Some(&marker))
            .then_some(i + 2)
    };
    let steps = |i: usize, next: &mut Steps| {
        push_simple_steps(bytes, i, marker, next);
        if bytes[i] == marker {
            if let Some(k) = memchr(marker, &bytes[i + 1..]) {
                next.push(i + k + 2);
            }
        }
    };
    lazy_match(bytes.len(), 2, closer, steps)
}

/// `M content M`, where content may hold double-marker pairs.
fn em(text: &str, marker: u8) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let closer = |i: usize| {
        if bytes.get(i) != Some(&marker) || bytes.get(i + 1) == Some(&marker) {
            return None;
        }
        // A closing underscore must end a word.
        if marker == b'_' && text[i + 1..].chars().next().is_some_and(is_word_char) {
            return None;
        }
        Some(i + 1)
    };
    let steps = |i: usize, next: &mut Steps| {
        push_simple_steps(bytes, i, marker, next);
        if bytes[i] == marker && bytes.get(i + 1) == Some(&marker) {
            let inner = i + 2;
            if let Some(k) = memchr(marker, bytes.get(inner..).unwrap_or_default()) {
                // `**` needs non-empty content, `__` does not.
                let close = inner + k;
                if (k > 0 || marker == b'_') && bytes.get(close + 1) == Some(&marker) {
                    next.push(close + 2);
                }
            }
        }
    };
    lazy_match(bytes.len(), 1, closer, steps)
}

/// Parse `**strong**`, `__strong__`, `*em*` or `_em_` at the start of `text`.
pub(super) fn emphasis(text: &str) -> Option<InlineMatch> {
    let bytes = text.as_bytes();
    let marker = *bytes.first()?;
    if bytes.len() < 2 {
        return None;
    }

    if bytes[1] == marker {
        if let Some((content_end, end)) = strong(bytes, marker) {
            let element = Element::new("strong", Content::Inline(text[2..content_end].to_owned()));
            return Some(InlineMatch::at_marker(end, Replacement::Element(element)));
        }
    }

    let (content_end, end) = em(text, marker)?;
    let element = Element::new("em", Content::Inline(text[1..content_end].to_owned()));
    Some(InlineMatch::at_marker(end, Replacement::Element(element)))
}
