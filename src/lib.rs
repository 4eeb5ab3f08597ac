//! linemark: a line-oriented Markdown to HTML compiler
//!
//! Input is read line by line into blocks by a small state machine; inline
//! markup inside each block is resolved while the block is written out.
//!
//! # Design Principles
//! - One pass over the lines: every block type is a constructor plus an
//!   optional Continue and Complete step
//! - No regex: byte-level scanning with lookup tables
//! - Raw HTML is never passed through; attributes and URLs are sanitized
//!   at serialization time
//! - Recursion is bounded (see [`limits`])

pub mod block;
pub mod element;
pub mod error;
pub mod escape;
pub mod inline;
pub mod limits;
pub mod line;
pub mod link_ref;
pub mod render;
pub mod sanitize;

// Re-export primary types
pub use block::{Block, BlockKind, BlockParser};
pub use element::{Content, Element};
pub use error::Error;
pub use inline::InlineParser;
pub use line::{LineReader, LineRecord};
pub use link_ref::{LinkRefDef, ReferenceTable};
pub use render::{HtmlWriter, Renderer};

/// Rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Turn every line break inside a paragraph into `<br />`.
    pub breaks_enabled: bool,
    /// Link bare `http://` and `https://` URLs.
    pub urls_linked: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            breaks_enabled: false,
            urls_linked: true,
        }
    }
}

/// A parsed document: its top-level blocks and the reference definitions
/// collected while parsing them.
#[derive(Debug)]
pub struct Document {
    pub blocks: Vec<Block>,
    pub references: ReferenceTable,
}

impl Document {
    /// Run the block parser over `input`.
    pub fn parse(input: &str) -> Self {
        let mut references = ReferenceTable::new();
        let blocks = BlockParser::new(&mut references).parse(LineReader::new(input));
        Self { blocks, references }
    }

    /// Write the document as HTML, reporting the first nesting overflow.
    pub fn render(self, options: &Options) -> (String, Option<Error>) {
        let mut out = HtmlWriter::new();
        let mut renderer = Renderer::new(options, &self.references);
        renderer.render_blocks(&self.blocks, &mut out);
        (out.into_string(), renderer.into_error())
    }
}

/// Convert Markdown to HTML.
///
/// This is the primary API for simple use cases. It never fails: input the
/// parser cannot structure comes out as escaped text.
///
/// # Example
/// ```
/// let html = linemark::render("# Hello\n\nWorld");
/// assert_eq!(html, "<h1>Hello</h1>\n\n<p>World</p>");
/// ```
pub fn render(document: &str) -> String {
    render_with_options(document, &Options::default())
}

/// Convert Markdown to HTML with options.
///
/// # Example
/// ```
/// use linemark::{Options, render_with_options};
///
/// let options = Options { breaks_enabled: true, ..Options::default() };
/// assert_eq!(render_with_options("a\nb", &options), "<p>a<br />\nb</p>");
/// ```
pub fn render_with_options(document: &str, options: &Options) -> String {
    Document::parse(document).render(options).0
}

/// Convert Markdown to HTML, failing if nested lists or quotes were too
/// deep to be structured.
///
/// The output on success is identical to [`render_with_options`].
pub fn try_render(document: &str, options: &Options) -> Result<String, Error> {
    match Document::parse(document).render(options) {
        (_, Some(err)) => Err(err),
        (html, None) => Ok(html),
    }
}

/// Render a single span of inline Markdown, without block structure.
///
/// # Example
/// ```
/// assert_eq!(linemark::render_inline("*hi* <you>"), "<em>hi</em> &lt;you&gt;");
/// ```
pub fn render_inline(text: &str) -> String {
    let refs = ReferenceTable::new();
    let options = Options::default();
    InlineParser::new(&refs, &options).line(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        assert_eq!(render(""), "");
        assert_eq!(render("\n\n  \n"), "");
    }

    #[test]
    fn test_options_default() {
        let options = Options::default();
        assert!(!options.breaks_enabled);
        assert!(options.urls_linked);
    }

    #[test]
    fn test_document_parse_collects_references() {
        let doc = Document::parse("[a]: /a\n[b]: /b\n\ntext");
        assert_eq!(doc.references.len(), 2);
        assert_eq!(doc.blocks.len(), 3);
    }

    #[test]
    fn test_try_render_ok() {
        assert_eq!(
            try_render("> quoted", &Options::default()),
            Ok("<blockquote>\n<p>quoted</p>\n</blockquote>".to_owned())
        );
    }

    #[test]
    fn test_try_render_reports_depth() {
        let deep = ">".repeat(limits::MAX_BLOCK_NESTING + 5);
        let result = try_render(&deep, &Options::default());
        assert_eq!(
            result,
            Err(Error::DepthExceeded {
                limit: limits::MAX_BLOCK_NESTING
            })
        );
        // The lossy entry point still produces output.
        assert!(render(&deep).contains("<blockquote>"));
    }
}
