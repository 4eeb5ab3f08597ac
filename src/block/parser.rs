//! Block parser implementation.

use std::borrow::Borrow;

use super::{Block, kinds, registry};
use crate::element::Content;
use crate::error::Error;
use crate::limits::MAX_BLOCK_NESTING;
use crate::line::LineRecord;
use crate::link_ref::ReferenceTable;

/// Block parser state.
///
/// Feeds lines one at a time through the open block's Continue step, then
/// the candidate constructors, then paragraph fallback. Reference
/// definitions found on the way are written into the shared table.
pub struct BlockParser<'r> {
    /// Reference definitions of the whole document.
    refs: &'r mut ReferenceTable,
    /// The block that may still absorb lines.
    current: Option<Block>,
    /// Closed blocks, in document order.
    blocks: Vec<Block>,
    /// Container nesting level (0 for the top-level document).
    depth: usize,
    /// Parse quote bodies and list items as their blocks close, so their
    /// reference definitions are known before anything is rendered.
    scan_nested: bool,
}

impl<'r> BlockParser<'r> {
    /// Create a parser for a top-level document.
    pub fn new(refs: &'r mut ReferenceTable) -> Self {
        Self {
            refs,
            current: None,
            blocks: Vec::new(),
            depth: 0,
            scan_nested: true,
        }
    }

    /// Create a parser for the body of a list item or block quote.
    pub fn nested(refs: &'r mut ReferenceTable, depth: usize) -> Result<Self, Error> {
        if depth > MAX_BLOCK_NESTING {
            return Err(Error::DepthExceeded {
                limit: MAX_BLOCK_NESTING,
            });
        }
        let mut parser = Self::new(refs);
        parser.depth = depth;
        Ok(parser)
    }

    /// Skip the definition scan of nested buffers.
    ///
    /// For re-parsing a buffer whose definitions were already collected.
    pub fn shallow(mut self) -> Self {
        self.scan_nested = false;
        self
    }

    /// Container nesting level of this parser.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Parse all lines and return the blocks.
    pub fn parse<I>(mut self, lines: I) -> Vec<Block>
    where
        I: IntoIterator,
        I::Item: Borrow<LineRecord>,
    {
        for line in lines {
            self.feed(line.borrow());
        }
        self.finish()
    }

    /// Process a single line.
    pub fn feed(&mut self, line: &LineRecord) {
        if line.is_blank() {
            if let Some(block) = &mut self.current {
                block.interrupted += 1;
            }
            return;
        }

        if let Some(block) = &mut self.current {
            if block.continuable {
                if kinds::continue_block(block, line, self.refs) {
                    return;
                }
                if block.completable {
                    kinds::complete(block);
                    block.completable = false;
                }
            }
        }

        let marked = line.marker().map_or(&[][..], registry::candidates);
        for &kind in registry::UNMARKED.iter().chain(marked) {
            if let Some(mut block) = kinds::start(kind, line, &mut self.current, self.refs) {
                block.identified = true;
                block.continuable = kind.is_continuable();
                block.completable = kind.is_completable();
                self.close_current();
                self.current = Some(block);
                return;
            }
        }

        // Lazy paragraph continuation.
        if let Some(block) = self.current.as_mut().filter(|b| b.is_open_paragraph()) {
            if let Some(text) = block.element.inline_text_mut() {
                text.push('\n');
                text.push_str(line.text());
            }
            return;
        }
        self.close_current();
        self.current = Some(kinds::paragraph(line));
    }

    /// Close the open block and return everything parsed.
    pub fn finish(mut self) -> Vec<Block> {
        if let Some(block) = &mut self.current {
            if block.completable {
                kinds::complete(block);
                block.completable = false;
            }
        }
        self.close_current();
        self.blocks
    }

    fn close_current(&mut self) {
        if let Some(mut block) = self.current.take() {
            block.finish();
            if self.scan_nested {
                self.collect_nested_references(&block);
            }
            self.blocks.push(block);
        }
    }

    /// Register the definitions inside a quote body or list items.
    fn collect_nested_references(&mut self, block: &Block) {
        match &block.element.content {
            Some(Content::Lines(lines)) => self.collect_references(lines),
            Some(Content::ListItems(items)) => {
                for item in items {
                    self.collect_references(item);
                }
            }
            _ => {}
        }
    }

    fn collect_references(&mut self, lines: &[LineRecord]) {
        // Too deep to structure: the renderer writes these lines as text.
        if let Ok(parser) = BlockParser::nested(self.refs, self.depth + 1) {
            parser.parse(lines);
        }
    }
}
