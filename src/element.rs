//! Render nodes shared by the block parser, inline parser and serializer.

use smallvec::SmallVec;

use crate::line::LineRecord;

/// Ordered attribute list. A `None` value is omitted on output.
pub type Attributes = SmallVec<[(String, Option<String>); 2]>;

/// What goes between an element's opening and closing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Escaped verbatim, never inline-parsed.
    Text(String),
    /// Raw Markdown that still needs the inline parser.
    Inline(String),
    /// A single child written directly inside the parent (`<pre><code>`).
    Element(Box<Element>),
    /// Child elements, one per line.
    Children(Vec<Element>),
    /// List items, each a mini-document rendered inside `<li>`.
    ListItems(Vec<Vec<LineRecord>>),
    /// A nested mini-document (block quote body).
    Lines(Vec<LineRecord>),
}

/// An HTML element, or a bare text node when `name` is `None`.
///
/// Elements without content are self-closing (`<hr />`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: Option<&'static str>,
    pub attributes: Attributes,
    pub content: Option<Content>,
}

impl Element {
    /// A self-closing element.
    pub fn empty(name: &'static str) -> Self {
        Self {
            name: Some(name),
            attributes: Attributes::new(),
            content: None,
        }
    }

    pub fn new(name: &'static str, content: Content) -> Self {
        Self {
            name: Some(name),
            attributes: Attributes::new(),
            content: Some(content),
        }
    }

    /// A nameless node whose text is escaped on output.
    pub fn text_node(text: impl Into<String>) -> Self {
        Self {
            name: None,
            attributes: Attributes::new(),
            content: Some(Content::Text(text.into())),
        }
    }

    /// Builder-style attribute append.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), Some(value.into())));
        self
    }

    /// Builder-style append of an attribute that may be absent.
    pub fn with_opt_attr(mut self, name: impl Into<String>, value: Option<String>) -> Self {
        self.attributes.push((name.into(), value));
        self
    }

    /// Value of the first attribute called `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// The raw inline text of this element, if it carries any.
    pub fn inline_text_mut(&mut self) -> Option<&mut String> {
        match &mut self.content {
            Some(Content::Inline(text)) => Some(text),
            _ => None,
        }
    }

    /// Child elements, if this element holds any.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Element>> {
        match &mut self.content {
            Some(Content::Children(children)) => Some(children),
            _ => None,
        }
    }
}

/// `h1`..`h6` as static tag names.
pub fn heading_tag(level: usize) -> &'static str {
    match level {
        1 => "h1",
        2 => "h2",
        3 => "h3",
        4 => "h4",
        5 => "h5",
        _ => "h6",
    }
}
