//! Attribute filtering and URL scheme neutralization.
//!
//! Runs per element at serialization time, so parsed URLs stay untouched
//! until they are written out.

use std::borrow::Cow;

use memchr::memchr;

use crate::element::Element;

/// URL prefixes that are written unchanged. Compared case-insensitively.
pub const SAFE_URL_SCHEMES: &[&str] = &[
    "http://",
    "https://",
    "ftp://",
    "ftps://",
    "mailto:",
    "data:image/png;base64,",
    "data:image/gif;base64,",
    "data:image/jpeg;base64,",
    "irc:",
    "ircs:",
    "git:",
    "ssh:",
    "news:",
    "steam:",
];

/// Attribute holding a URL for the given element name.
#[inline]
fn url_attribute(element: &str) -> Option<&'static str> {
    match element {
        "a" => Some("href"),
        "img" => Some("src"),
        _ => None,
    }
}

/// `[a-zA-Z0-9][a-zA-Z0-9_-]*`, and not an `on*` event handler.
pub fn is_safe_attribute_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    let Some((&first, rest)) = bytes.split_first() else {
        return false;
    };
    if !first.is_ascii_alphanumeric() {
        return false;
    }
    if !rest
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    {
        return false;
    }
    !starts_with_ignore_case(name, "on")
}

/// Replace the first `:` of a URL with an unknown scheme by `%3A`.
///
/// # Example
/// ```
/// use linemark::sanitize::safe_url;
///
/// assert_eq!(safe_url("javascript:alert(1)"), "javascript%3Aalert(1)");
/// assert_eq!(safe_url("https://example.com"), "https://example.com");
/// ```
pub fn safe_url(url: &str) -> Cow<'_, str> {
    if SAFE_URL_SCHEMES
        .iter()
        .any(|scheme| starts_with_ignore_case(url, scheme))
    {
        return Cow::Borrowed(url);
    }
    match memchr(b':', url.as_bytes()) {
        Some(colon) => Cow::Owned(format!("{}%3A{}", &url[..colon], &url[colon + 1..])),
        None => Cow::Borrowed(url),
    }
}

/// The attributes of `element` that may be written, with URL values made
/// safe. Attributes whose value is `None` are skipped.
pub fn sanitized_attributes(element: &Element) -> impl Iterator<Item = (&str, Cow<'_, str>)> {
    let url_attr = element.name.and_then(url_attribute);
    element.attributes.iter().filter_map(move |(name, value)| {
        let value = value.as_deref()?;
        if !is_safe_attribute_name(name) {
            return None;
        }
        let value = if url_attr == Some(name.as_str()) {
            safe_url(value)
        } else {
            Cow::Borrowed(value)
        };
        Some((name.as_str(), value))
    })
}

#[inline]
fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
