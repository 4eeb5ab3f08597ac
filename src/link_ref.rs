//! Link reference definitions (`[label]: url "title"`).

use rustc_hash::FxHashMap;

/// A link reference definition (URL + optional title).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRefDef {
    pub url: String,
    pub title: Option<String>,
}

/// Reference definitions of one document, keyed by normalized label.
///
/// Built while blocks are parsed and consulted by the inline parser.
/// Entries are never removed.
#[derive(Debug, Default)]
pub struct ReferenceTable {
    by_label: FxHashMap<String, LinkRefDef>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition if the label is new. First definition wins.
    pub fn insert(&mut self, label: &str, def: LinkRefDef) {
        let key = normalize_label(label);
        if key.is_empty() {
            return;
        }
        self.by_label.entry(key).or_insert(def);
    }

    /// Look up a label, ignoring case and inner whitespace differences.
    pub fn get(&self, label: &str) -> Option<&LinkRefDef> {
        if self.by_label.is_empty() {
            return None;
        }
        self.by_label.get(&normalize_label(label))
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

/// Normalize a link label: decode entities, collapse internal whitespace to
/// single spaces, trim, and lower-case.
pub fn normalize_label(label: &str) -> String {
    let decoded = html_escape::decode_html_entities(label);
    let mut out = String::with_capacity(decoded.len());
    let mut last_was_space = true;

    for ch in decoded.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
            continue;
        }
        last_was_space = false;
        out.extend(ch.to_lowercase());
    }

    if out.ends_with(' ') {
        out.pop();
    }
    out
}
