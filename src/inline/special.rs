//! Backslash escapes and HTML special characters.

use super::{InlineMatch, Replacement, is_ascii_word};

/// Characters a backslash can escape.
const ESCAPABLE: &[u8] = b"\\`*_{}[]()>#+-.!|~";

/// `\*` and friends: the escaped character as literal text.
pub(super) fn escape_sequence(text: &str) -> Option<InlineMatch> {
    let bytes = text.as_bytes();
    let escaped = *bytes.get(1)?;
    if bytes[0] != b'\\' || !ESCAPABLE.contains(&escaped) {
        return None;
    }
    let markup = match escaped {
        b'>' => "&gt;".to_owned(),
        other => char::from(other).to_string(),
    };
    Some(InlineMatch::at_marker(2, Replacement::Markup(markup)))
}

/// Length of an entity reference (`&name;`, `&#123;`, `&#x1F;`) at the
/// start of `bytes`.
fn entity_len(bytes: &[u8]) -> Option<usize> {
    let mut i = 1;
    if bytes.get(i) == Some(&b'#') {
        i += 1;
    }
    let name = bytes[i..].iter().take_while(|&&b| is_ascii_word(b)).count();
    (name > 0 && bytes.get(i + name) == Some(&b';')).then_some(i + name + 1)
}

/// `&`, `<`, `>` and `"`. Entity references pass through untouched.
pub(super) fn special_character(text: &str) -> Option<InlineMatch> {
    let bytes = text.as_bytes();
    let markup = match *bytes.first()? {
        b'&' => match entity_len(bytes) {
            Some(len) => {
                return Some(InlineMatch::at_marker(
                    len,
                    Replacement::Markup(text[..len].to_owned()),
                ));
            }
            None => "&amp;",
        },
        b'<' => "&lt;",
        b'>' => "&gt;",
        b'"' => "&quot;",
        _ => return None,
    };
    Some(InlineMatch::at_marker(
        1,
        Replacement::Markup(markup.to_owned()),
    ))
}
