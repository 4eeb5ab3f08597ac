//! DoS prevention constants.
//!
//! These limits bound recursion on pathological inputs such as
//! deeply nested lists, quotes, or emphasis runs.

/// Maximum nesting depth for re-parsed block containers (list items, quotes)
pub const MAX_BLOCK_NESTING: usize = 32;

/// Maximum nesting depth for inline elements (emphasis, links)
pub const MAX_INLINE_NESTING: usize = 32;

/// Maximum backtick run length for code spans (prevents O(n^2) matching)
/// Longer runs are treated as literal text
pub const MAX_CODE_SPAN_BACKTICKS: usize = 32;

/// Maximum digits in ordered list marker (prevents big-integer parsing)
pub const MAX_LIST_MARKER_DIGITS: usize = 9;

/// Tab stops for line indentation.
pub const TAB_WIDTH: usize = 4;

/// Indentation that turns a line into an indented code line.
pub const CODE_INDENT: usize = 4;
