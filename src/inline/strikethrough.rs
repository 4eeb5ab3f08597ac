//! Strikethrough (`~~text~~`).
//!
//! Content stays on one line and must start and end with a non-space.

use memchr::{memchr, memmem};

use super::{InlineMatch, Replacement};
use crate::element::{Content, Element};

/// Where a closer search already failed within one span.
///
/// Whether a `~~` run can close does not depend on the opener, so once the
/// search from one opener reaches the end of its line empty-handed, every
/// later opener on that line fails too.
#[derive(Debug, Default)]
pub(super) struct CloserMemo {
    /// Span offset of the end of the last line searched without success.
    exhausted_until: usize,
}

/// `~~text~~` starting at span offset `at`.
pub(super) fn strikethrough(text: &str, at: usize, memo: &mut CloserMemo) -> Option<InlineMatch> {
    let bytes = text.as_bytes();
    if !text.starts_with("~~") || bytes.get(2).is_none_or(u8::is_ascii_whitespace) {
        return None;
    }
    if at < memo.exhausted_until {
        return None;
    }

    let line_end = memchr(b'\n', bytes).unwrap_or(bytes.len());
    let finder = memmem::Finder::new("~~");
    let mut from = 3;
    while from < line_end {
        let Some(found) = finder.find(&bytes[from..line_end]) else {
            break;
        };
        let close = from + found;
        if !bytes[close - 1].is_ascii_whitespace() {
            let element = Element::new("del", Content::Inline(text[2..close].to_owned()));
            return Some(InlineMatch::at_marker(
                close + 2,
                Replacement::Element(element),
            ));
        }
        from = close + 1;
    }
    memo.exhausted_until = at + line_end;
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strike(text: &str) -> Option<(String, usize)> {
        strikethrough(text, 0, &mut CloserMemo::default()).map(|m| {
            let Replacement::Element(el) = m.replacement else {
                panic!("expected element");
            };
            let Some(Content::Inline(inner)) = el.content else {
                panic!("expected inline content");
            };
            (inner, m.extent)
        })
    }

    #[test]
    fn test_basic_strikethrough() {
        assert_eq!(strike("~~gone~~ rest"), Some(("gone".into(), 8)));
        assert_eq!(strike("~~a~~"), Some(("a".into(), 5)));
    }

    #[test]
    fn test_spaces_at_edges() {
        assert_eq!(strike("~~ a~~"), None);
        assert_eq!(strike("~~a ~~"), None);
        assert_eq!(strike("~~a ~~ b~~"), Some(("a ~~ b".into(), 10)));
    }

    #[test]
    fn test_single_line_only() {
        assert_eq!(strike("~~a\nb~~"), None);
    }

    #[test]
    fn test_single_tilde() {
        assert_eq!(strike("~a~"), None);
        assert_eq!(strike("~~"), None);
    }

    #[test]
    fn test_failed_search_skips_rest_of_line() {
        let text = "~~a ~~b ~~c\n~~d~~";
        let mut memo = CloserMemo::default();
        assert!(strikethrough(text, 0, &mut memo).is_none());
        assert_eq!(memo.exhausted_until, 11);
        // Later openers on the same line are not searched again.
        assert!(strikethrough(&text[4..], 4, &mut memo).is_none());
        assert!(strikethrough(&text[8..], 8, &mut memo).is_none());
        // The next line starts fresh.
        assert!(strikethrough(&text[12..], 12, &mut memo).is_some());
    }
}
