//! Block constructors and their Continue/Complete steps.
//!
//! A constructor inspects one line (and, for setext headers, tables and
//! indented code, the open block) and either opens a block or declines.
//! Continue steps mutate the open block only when they accept the line.

use smallvec::SmallVec;

use super::{Alignment, Block, BlockKind, FenceState, ListState, TableState, Variant};
use crate::element::{Content, Element, heading_tag};
use crate::inline::closing_backticks;
use crate::limits::{CODE_INDENT, MAX_LIST_MARKER_DIGITS};
use crate::line::{LineRecord, trim_end_ws};
use crate::link_ref::{LinkRefDef, ReferenceTable};

/// Try to open a block of `kind` on `line`.
///
/// Setext headers and tables are built from the open paragraph and take it
/// out of `current` on success.
pub(super) fn start(
    kind: BlockKind,
    line: &LineRecord,
    current: &mut Option<Block>,
    refs: &mut ReferenceTable,
) -> Option<Block> {
    match kind {
        BlockKind::Paragraph => Some(paragraph(line)),
        BlockKind::Header => header(line),
        BlockKind::SetextHeader => setext_header(line, current),
        BlockKind::Rule => rule(line),
        BlockKind::List => list(line),
        BlockKind::Quote => quote(line),
        BlockKind::Code => code(line, current.as_ref()),
        BlockKind::FencedCode => fenced_code(line),
        BlockKind::Table => table(line, current),
        BlockKind::Reference => reference(line, refs),
    }
}

/// Offer `line` to the open block. Returns whether it was absorbed.
pub(super) fn continue_block(
    block: &mut Block,
    line: &LineRecord,
    refs: &mut ReferenceTable,
) -> bool {
    match block.kind() {
        BlockKind::Code => code_continue(block, line),
        BlockKind::FencedCode => fenced_code_continue(block, line),
        BlockKind::List => list_continue(block, line, refs),
        BlockKind::Quote => quote_continue(block, line),
        BlockKind::Table => table_continue(block, line),
        _ => false,
    }
}

/// Finalize a completable block once its continuation has ended.
pub(super) fn complete(block: &mut Block) {
    match block.kind() {
        BlockKind::Code => {
            if let Some(text) = code_text_mut(block) {
                let len = text.trim_end_matches('\n').len();
                text.truncate(len);
            }
        }
        BlockKind::FencedCode => {
            if let Some(text) = code_text_mut(block) {
                if text.starts_with('\n') {
                    text.remove(0);
                }
            }
        }
        _ => {}
    }
}

pub(super) fn paragraph(line: &LineRecord) -> Block {
    Block::new(
        Variant::Paragraph,
        Element::new("p", Content::Inline(line.text().to_owned())),
    )
}

// --- Headings and rules ---

fn header(line: &LineRecord) -> Option<Block> {
    let text = line.text();
    let level = text.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 || text.as_bytes().get(level) != Some(&b' ') {
        return None;
    }
    let content = text.trim_matches(|c| c == '#' || c == ' ');
    Some(Block::new(
        Variant::Header,
        Element::new(heading_tag(level), Content::Inline(content.to_owned())),
    ))
}

fn setext_header(line: &LineRecord, current: &mut Option<Block>) -> Option<Block> {
    if !current.as_ref().is_some_and(Block::is_open_paragraph) {
        return None;
    }
    let text = trim_end_ws(line.text());
    let underline = *text.as_bytes().first()?;
    let tag = match underline {
        b'=' => "h1",
        b'-' => "h2",
        _ => return None,
    };
    if !text.bytes().all(|b| b == underline) {
        return None;
    }
    let mut block = current.take()?;
    block.variant = Variant::SetextHeader;
    block.element.name = Some(tag);
    Some(block)
}

fn rule(line: &LineRecord) -> Option<Block> {
    let text = trim_end_ws(line.text());
    let marker = *text.as_bytes().first()?;
    if !matches!(marker, b'*' | b'-' | b'_') {
        return None;
    }
    let mut count = 0;
    for b in text.bytes() {
        if b == marker {
            count += 1;
        } else if b != b' ' {
            return None;
        }
    }
    (count >= 3).then(|| Block::new(Variant::Rule, Element::empty("hr")))
}

// --- Lists ---

/// Byte length of the list marker at the start of `text`.
fn marker_len(text: &str, ordered: bool) -> Option<usize> {
    let bytes = text.as_bytes();
    if ordered {
        let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
        (digits > 0 && digits <= MAX_LIST_MARKER_DIGITS && bytes.get(digits) == Some(&b'.'))
            .then_some(digits + 1)
    } else {
        matches!(bytes.first(), Some(b'*' | b'+' | b'-')).then_some(1)
    }
}

/// Content after a list marker followed by spaces, or after a bare marker.
fn item_content(text: &str, ordered: bool) -> Option<&str> {
    let rest = &text[marker_len(text, ordered)?..];
    if rest.is_empty() {
        return Some(rest);
    }
    let content = rest.trim_start_matches(' ');
    (content.len() < rest.len()).then_some(content)
}

fn list(line: &LineRecord) -> Option<Block> {
    let text = line.text();
    let ordered = text.as_bytes().first()?.is_ascii_digit();
    let marker = marker_len(text, ordered)?;
    // The opening marker needs at least one space after it.
    if text.as_bytes().get(marker) != Some(&b' ') {
        return None;
    }
    let content = text[marker..].trim_start_matches(' ');

    let tag = if ordered { "ol" } else { "ul" };
    let mut element = Element::new(
        tag,
        Content::ListItems(vec![vec![LineRecord::new(content)]]),
    );
    if ordered {
        let digits = text[..marker - 1].trim_start_matches('0');
        let start = if digits.is_empty() { "0" } else { digits };
        if start != "1" {
            element = element.with_attr("start", start);
        }
    }

    let state = ListState {
        indent: line.indent(),
        ordered,
    };
    Some(Block::new(Variant::List(state), element))
}

fn list_continue(block: &mut Block, line: &LineRecord, refs: &mut ReferenceTable) -> bool {
    let Variant::List(state) = &block.variant else {
        return false;
    };
    let (indent, ordered) = (state.indent, state.ordered);
    let interrupted = block.is_interrupted();
    let Some(Content::ListItems(items)) = &mut block.element.content else {
        return false;
    };

    if line.indent() == indent {
        if let Some(content) = item_content(line.text(), ordered) {
            if interrupted {
                if let Some(item) = items.last_mut() {
                    item.push(LineRecord::blank());
                }
            }
            items.push(vec![LineRecord::new(content)]);
            block.interrupted = 0;
            return true;
        }
    }

    if line.marker() == Some(b'[') && reference(line, refs).is_some() {
        return true;
    }

    let Some(item) = items.last_mut() else {
        return false;
    };
    if !interrupted {
        item.push(LineRecord::new(line.body_after_indent(CODE_INDENT)));
        return true;
    }
    if line.indent() > 0 {
        item.push(LineRecord::blank());
        item.push(LineRecord::new(line.body_after_indent(CODE_INDENT)));
        block.interrupted = 0;
        return true;
    }
    false
}

// --- Quotes ---

fn quote_content(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

fn quote(line: &LineRecord) -> Option<Block> {
    let content = quote_content(line.text())?;
    Some(Block::new(
        Variant::Quote,
        Element::new("blockquote", Content::Lines(vec![LineRecord::new(content)])),
    ))
}

fn quote_continue(block: &mut Block, line: &LineRecord) -> bool {
    let interrupted = block.is_interrupted();
    let Some(Content::Lines(lines)) = &mut block.element.content else {
        return false;
    };
    if let Some(content) = quote_content(line.text()) {
        if interrupted {
            lines.push(LineRecord::blank());
        }
        lines.push(LineRecord::new(content));
        block.interrupted = 0;
        return true;
    }
    if !interrupted {
        lines.push(LineRecord::new(line.text()));
        return true;
    }
    false
}

// --- Code ---

fn code_text_mut(block: &mut Block) -> Option<&mut String> {
    match &mut block.element.content {
        Some(Content::Element(code)) => match &mut code.content {
            Some(Content::Text(text)) => Some(text),
            _ => None,
        },
        _ => None,
    }
}

fn code(line: &LineRecord, current: Option<&Block>) -> Option<Block> {
    if current.is_some_and(Block::is_open_paragraph) || line.indent() < CODE_INDENT {
        return None;
    }
    let code = Element::new("code", Content::Text(line.body()[CODE_INDENT..].to_owned()));
    Some(Block::new(
        Variant::Code,
        Element::new("pre", Content::Element(Box::new(code))),
    ))
}

fn code_continue(block: &mut Block, line: &LineRecord) -> bool {
    if line.indent() < CODE_INDENT {
        return false;
    }
    let blank_lines = block.interrupted;
    let Some(text) = code_text_mut(block) else {
        return false;
    };
    for _ in 0..blank_lines {
        text.push('\n');
    }
    text.push('\n');
    text.push_str(&line.body()[CODE_INDENT..]);
    block.interrupted = 0;
    true
}

fn fenced_code(line: &LineRecord) -> Option<Block> {
    let text = line.text();
    let fence_char = *text.as_bytes().first()?;
    if !matches!(fence_char, b'`' | b'~') {
        return None;
    }
    let run = text.bytes().take_while(|&b| b == fence_char).count();
    if run < 3 {
        return None;
    }
    let info = &text[run..];
    if info.contains('`') {
        return None;
    }

    let mut code = Element::new("code", Content::Text(String::new()));
    if let Some(language) = info.split_ascii_whitespace().next() {
        code = code.with_attr("class", format!("language-{language}"));
    }
    let state = FenceState {
        fence_char,
        complete: false,
    };
    Some(Block::new(
        Variant::FencedCode(state),
        Element::new("pre", Content::Element(Box::new(code))),
    ))
}

fn is_closing_fence(text: &str, fence_char: u8) -> bool {
    let text = trim_end_ws(text);
    text.len() >= 3 && text.bytes().all(|b| b == fence_char)
}

fn fenced_code_continue(block: &mut Block, line: &LineRecord) -> bool {
    let blank_lines = block.interrupted;
    let Variant::FencedCode(state) = &mut block.variant else {
        return false;
    };
    if state.complete {
        return false;
    }
    let closing = is_closing_fence(line.text(), state.fence_char);
    if closing {
        state.complete = true;
    }

    let Some(text) = code_text_mut(block) else {
        return false;
    };
    for _ in 0..blank_lines {
        text.push('\n');
    }
    if !closing {
        text.push('\n');
        text.push_str(line.body());
    }
    block.interrupted = 0;
    true
}

// --- Tables ---

fn cell_alignment(cell: &str) -> Option<Alignment> {
    match (cell.starts_with(':'), cell.ends_with(':')) {
        (true, true) => Some(Alignment::Center),
        (true, false) => Some(Alignment::Left),
        (false, true) => Some(Alignment::Right),
        (false, false) => None,
    }
}

/// Split a table row on pipes that are neither escaped nor inside a code
/// span. One leading and one trailing pipe are dropped; cells are trimmed.
pub(crate) fn split_row(row: &str) -> Vec<&str> {
    let row = row.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = match row.strip_suffix('|') {
        Some(inner) if !inner.ends_with('\\') => inner,
        _ => row,
    };

    let bytes = row.as_bytes();
    let mut cells = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => {
                let run = bytes[i..].iter().take_while(|&&b| b == b'`').count();
                i = closing_backticks(bytes, i + run, run).unwrap_or(i + run);
            }
            b'|' => {
                cells.push(row[start..i].trim());
                start = i + 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    cells.push(row[start..].trim());
    cells
}

fn table_row(cells: Vec<&str>, alignments: &[Option<Alignment>], tag: &'static str) -> Element {
    let cells = cells
        .into_iter()
        .enumerate()
        .map(|(i, cell)| {
            let element = Element::new(tag, Content::Inline(cell.to_owned()));
            match alignments.get(i).copied().flatten() {
                Some(alignment) => {
                    element.with_attr("style", format!("text-align: {};", alignment.css()))
                }
                None => element,
            }
        })
        .collect();
    Element::new("tr", Content::Children(cells))
}

fn table(line: &LineRecord, current: &mut Option<Block>) -> Option<Block> {
    let header = match current.as_ref() {
        Some(block) if block.is_open_paragraph() => match &block.element.content {
            Some(Content::Inline(text)) => text,
            _ => return None,
        },
        _ => return None,
    };
    if !header.contains('|') || header.contains('\n') {
        return None;
    }

    let divider = trim_end_ws(line.text());
    if !divider.contains('-')
        || !divider
            .bytes()
            .all(|b| matches!(b, b' ' | b'-' | b':' | b'|'))
    {
        return None;
    }

    let column_alignments: SmallVec<[Option<Alignment>; 8]> = divider
        .trim()
        .trim_matches('|')
        .split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(cell_alignment)
        .collect();

    let header_row = table_row(split_row(header), &column_alignments, "th");
    let element = Element::new(
        "table",
        Content::Children(vec![
            Element::new("thead", Content::Children(vec![header_row])),
            Element::new("tbody", Content::Children(Vec::new())),
        ]),
    );
    current.take();
    Some(Block::new(
        Variant::Table(TableState { column_alignments }),
        element,
    ))
}

fn table_continue(block: &mut Block, line: &LineRecord) -> bool {
    if block.is_interrupted() || !line.text().contains('|') {
        return false;
    }
    let Variant::Table(state) = &block.variant else {
        return false;
    };
    let row = table_row(split_row(line.text()), &state.column_alignments, "td");
    let tbody = block
        .element
        .children_mut()
        .and_then(|sections| sections.get_mut(1))
        .and_then(Element::children_mut);
    match tbody {
        Some(rows) => {
            rows.push(row);
            true
        }
        None => false,
    }
}

// --- Reference definitions ---

fn parse_title(tail: &str) -> Option<&str> {
    let closer = match tail.as_bytes().first()? {
        b'"' => '"',
        b'\'' => '\'',
        b'(' => ')',
        _ => return None,
    };
    (tail.len() >= 3 && tail.ends_with(closer)).then(|| &tail[1..tail.len() - 1])
}

/// Parse `[label]: url "title"` into its label and definition.
pub(crate) fn parse_reference(text: &str) -> Option<(&str, LinkRefDef)> {
    let rest = text.strip_prefix('[')?;
    let close = rest.find("]:").filter(|&i| i > 0)?;
    let label = &rest[..close];

    let rest = trim_end_ws(rest[close + 2..].trim_start_matches(' '));
    let url_end = rest.find(' ').unwrap_or(rest.len());
    let url = &rest[..url_end];
    let url = url.strip_prefix('<').unwrap_or(url);
    let url = url.strip_suffix('>').unwrap_or(url);
    if url.is_empty() {
        return None;
    }

    let tail = rest[url_end..].trim_start_matches(' ');
    let title = if tail.is_empty() {
        None
    } else {
        Some(parse_title(tail)?.to_owned())
    };
    let def = LinkRefDef {
        url: url.to_owned(),
        title,
    };
    Some((label, def))
}

fn reference(line: &LineRecord, refs: &mut ReferenceTable) -> Option<Block> {
    let (label, def) = parse_reference(line.text())?;
    refs.insert(label, def);
    let mut block = Block::new(Variant::Reference, Element::text_node(String::new()));
    block.hidden = true;
    Some(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(s: &str) -> LineRecord {
        LineRecord::new(s)
    }

    fn open(kind: BlockKind, text: &str) -> Option<Block> {
        let mut refs = ReferenceTable::new();
        start(kind, &line(text), &mut None, &mut refs)
    }

    #[test]
    fn test_header_levels() {
        let block = open(BlockKind::Header, "### Title ###").unwrap();
        assert_eq!(block.element.name, Some("h3"));
        assert_eq!(block.element.content, Some(Content::Inline("Title".into())));
        assert!(open(BlockKind::Header, "####### seven").is_none());
        assert!(open(BlockKind::Header, "#nospace").is_none());
    }

    #[test]
    fn test_rule_variants() {
        for text in ["***", "- - -", "___", "*  *  *  ", "----------"] {
            assert!(open(BlockKind::Rule, text).is_some(), "{text}");
        }
        for text in ["**", "-*-", "--a", "==="] {
            assert!(open(BlockKind::Rule, text).is_none(), "{text}");
        }
    }

    #[test]
    fn test_list_markers() {
        assert_eq!(marker_len("- x", false), Some(1));
        assert_eq!(marker_len("12. x", true), Some(3));
        assert_eq!(marker_len("12) x", true), None);
        assert_eq!(marker_len("1234567890. x", true), None);
        assert_eq!(item_content("-", false), Some(""));
        assert_eq!(item_content("-   x", false), Some("x"));
        assert_eq!(item_content("-x", false), None);
    }

    #[test]
    fn test_ordered_list_start() {
        let block = open(BlockKind::List, "007. x").unwrap();
        assert_eq!(block.element.name, Some("ol"));
        assert_eq!(block.element.attr("start"), Some("7"));
        let block = open(BlockKind::List, "1. x").unwrap();
        assert_eq!(block.element.attr("start"), None);
        assert!(open(BlockKind::List, "1.x").is_none());
    }

    #[test]
    fn test_code_needs_indent() {
        assert!(open(BlockKind::Code, "   x").is_none());
        let block = open(BlockKind::Code, "      x").unwrap();
        assert_eq!(
            code_text_mut(&mut block.clone()).cloned(),
            Some("  x".to_owned())
        );
    }

    #[test]
    fn test_code_not_after_open_paragraph() {
        let mut refs = ReferenceTable::new();
        let indented = line("    x");
        let mut current = Some(paragraph(&line("para")));
        let started = start(BlockKind::Code, &indented, &mut current, &mut refs);
        assert!(started.is_none());
        current.as_mut().unwrap().interrupted = 1;
        let started = start(BlockKind::Code, &indented, &mut current, &mut refs);
        assert!(started.is_some());
    }

    #[test]
    fn test_fence_info_string() {
        let block = open(BlockKind::FencedCode, "```rust extra").unwrap();
        let Some(Content::Element(code)) = &block.element.content else {
            panic!("expected code child");
        };
        assert_eq!(code.attr("class"), Some("language-rust"));
        assert!(open(BlockKind::FencedCode, "``").is_none());
        assert!(open(BlockKind::FencedCode, "```a`b").is_none());
    }

    #[test]
    fn test_closing_fence() {
        assert!(is_closing_fence("```", b'`'));
        assert!(is_closing_fence("`````  ", b'`'));
        assert!(!is_closing_fence("~~~", b'`'));
        assert!(!is_closing_fence("``", b'`'));
    }

    #[test]
    fn test_split_row() {
        assert_eq!(split_row("| a | b |"), vec!["a", "b"]);
        assert_eq!(split_row("a|b"), vec!["a", "b"]);
        assert_eq!(split_row(r"a \| b | c"), vec![r"a \| b", "c"]);
        assert_eq!(split_row("`a|b` | c"), vec!["`a|b`", "c"]);
        assert_eq!(split_row("|a||b|"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_cell_alignment() {
        assert_eq!(cell_alignment(":--"), Some(Alignment::Left));
        assert_eq!(cell_alignment("--:"), Some(Alignment::Right));
        assert_eq!(cell_alignment(":-:"), Some(Alignment::Center));
        assert_eq!(cell_alignment("---"), None);
    }

    #[test]
    fn test_parse_reference() {
        let (label, def) = parse_reference("[Foo]: http://x.com \"T\"").unwrap();
        assert_eq!(label, "Foo");
        assert_eq!(def.url, "http://x.com");
        assert_eq!(def.title.as_deref(), Some("T"));

        let (_, def) = parse_reference("[a]: <http://x.com>").unwrap();
        assert_eq!(def.url, "http://x.com");
        assert_eq!(def.title, None);

        let (_, def) = parse_reference("[a]:/url   (paren title)  ").unwrap();
        assert_eq!(def.url, "/url");
        assert_eq!(def.title.as_deref(), Some("paren title"));

        assert!(parse_reference("[]: /url").is_none());
        assert!(parse_reference("[a]:").is_none());
        assert!(parse_reference("[a]: /url junk").is_none());
        assert!(parse_reference("[a] /url").is_none());
    }

    #[test]
    fn test_reference_registers_and_hides() {
        let mut refs = ReferenceTable::new();
        let block = start(BlockKind::Reference, &line("[x]: /y"), &mut None, &mut refs).unwrap();
        assert!(block.hidden);
        assert_eq!(refs.get("X").map(|d| d.url.as_str()), Some("/y"));
    }
}
