//! Block-level parser for Markdown.
//!
//! The block parser is line-oriented and handles:
//! - ATX and setext headings
//! - Thematic breaks
//! - Indented and fenced code blocks
//! - Blockquotes
//! - Lists
//! - Tables
//! - Link reference definitions
//! - Paragraphs

mod kinds;
mod parser;
pub mod registry;

pub use parser::BlockParser;

use smallvec::SmallVec;

use crate::element::{Content, Element};
use crate::line::trim_end_ws;

/// The block types, in no particular order. Priority lives in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Header,
    SetextHeader,
    Rule,
    List,
    Quote,
    Code,
    FencedCode,
    Table,
    Reference,
}

impl BlockKind {
    /// Whether the type has a Continue step.
    pub fn is_continuable(self) -> bool {
        matches!(
            self,
            Self::Code | Self::FencedCode | Self::List | Self::Quote | Self::Table
        )
    }

    /// Whether the type needs a Complete step once continuation ends.
    pub fn is_completable(self) -> bool {
        matches!(self, Self::Code | Self::FencedCode)
    }
}

/// Column alignment for table cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Left-aligned (`:---`).
    Left,
    /// Center-aligned (`:---:`).
    Center,
    /// Right-aligned (`---:`).
    Right,
}

impl Alignment {
    /// Value for the `text-align` CSS property.
    pub fn css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// State of an open list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    /// Indentation of the item markers.
    pub indent: usize,
    /// `[0-9]+.` markers when true, `[*+-]` otherwise.
    pub ordered: bool,
}

/// State of an open fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceState {
    /// The fence character (` or ~).
    pub fence_char: u8,
    /// Set once the closing fence has been seen.
    pub complete: bool,
}

/// State of an open table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub column_alignments: SmallVec<[Option<Alignment>; 8]>,
}

/// Per-type data of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variant {
    Paragraph,
    Header,
    SetextHeader,
    Rule,
    /// The in-progress item is the last entry of the element's list items.
    List(ListState),
    Quote,
    Code,
    FencedCode(FenceState),
    Table(TableState),
    Reference,
}

/// A parsed block with its render node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub variant: Variant,
    pub element: Element,
    pub identified: bool,
    /// Blank lines seen since the last accepted line. Non-zero means the
    /// block is interrupted.
    pub interrupted: usize,
    pub continuable: bool,
    pub completable: bool,
    /// Never rendered (reference definitions).
    pub hidden: bool,
}

impl Block {
    pub(crate) fn new(variant: Variant, element: Element) -> Self {
        Self {
            variant,
            element,
            identified: false,
            interrupted: 0,
            continuable: false,
            completable: false,
            hidden: false,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self.variant {
            Variant::Paragraph => BlockKind::Paragraph,
            Variant::Header => BlockKind::Header,
            Variant::SetextHeader => BlockKind::SetextHeader,
            Variant::Rule => BlockKind::Rule,
            Variant::List(_) => BlockKind::List,
            Variant::Quote => BlockKind::Quote,
            Variant::Code => BlockKind::Code,
            Variant::FencedCode(_) => BlockKind::FencedCode,
            Variant::Table(_) => BlockKind::Table,
            Variant::Reference => BlockKind::Reference,
        }
    }

    #[inline]
    pub fn is_interrupted(&self) -> bool {
        self.interrupted > 0
    }

    /// An open paragraph that a following line may still join.
    #[inline]
    pub(crate) fn is_open_paragraph(&self) -> bool {
        self.variant == Variant::Paragraph && !self.is_interrupted()
    }

    /// Final cleanup when the block leaves the parser.
    pub(crate) fn finish(&mut self) {
        if matches!(self.variant, Variant::Paragraph | Variant::SetextHeader) {
            if let Some(Content::Inline(text)) = &mut self.element.content {
                let len = trim_end_ws(text).len();
                text.truncate(len);
            }
        }
    }
}
