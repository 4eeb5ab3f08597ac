//! Block type dispatch tables.
//!
//! A line's first character selects an ordered list of candidate block
//! types. Order is priority: for `-`, a setext underline must be tried
//! before a table divider or a thematic break.

use super::BlockKind;

/// Types tried for every line, before the marker-specific ones.
pub const UNMARKED: &[BlockKind] = &[BlockKind::Code];

/// Candidate block types for a line starting with `marker`.
pub fn candidates(marker: u8) -> &'static [BlockKind] {
    use BlockKind::*;

    match marker {
        b'#' => &[Header],
        b'*' => &[Rule, List],
        b'+' => &[List],
        b'-' => &[SetextHeader, Table, Rule, List],
        b'0'..=b'9' => &[List],
        b':' => &[Table],
        b'=' => &[SetextHeader],
        b'>' => &[Quote],
        b'[' => &[Reference],
        b'_' => &[Rule],
        b'`' => &[FencedCode],
        b'|' => &[Table],
        b'~' => &[FencedCode],
        _ => &[],
    }
}
