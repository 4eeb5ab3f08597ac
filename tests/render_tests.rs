//! End-to-end rendering tests.
//!
//! Each test renders a complete document through the public API and
//! compares the exact HTML.

use linemark::{Error, Options, limits, render, render_inline, render_with_options, try_render};

// === Headings ===

#[test]
fn atx_heading() {
    assert_eq!(render("# Header"), "<h1>Header</h1>");
    assert_eq!(render("## T ##"), "<h2>T</h2>");
    assert_eq!(render("###### six"), "<h6>six</h6>");
}

#[test]
fn atx_heading_needs_space() {
    assert_eq!(render("#NoSpace"), "<p>#NoSpace</p>");
    assert_eq!(render("####### seven"), "<p>####### seven</p>");
}

#[test]
fn heading_content_is_inline() {
    assert_eq!(render("# *x*"), "<h1><em>x</em></h1>");
}

#[test]
fn setext_headings() {
    assert_eq!(render("Title\n---"), "<h2>Title</h2>");
    assert_eq!(render("Title\n==="), "<h1>Title</h1>");
    assert_eq!(render("a\nb\n==="), "<h1>a\nb</h1>");
    assert_eq!(render("Title\n===\ntext"), "<h1>Title</h1>\n\n<p>text</p>");
}

// === Paragraphs and inline text ===

#[test]
fn paragraphs_joined_by_blank_line() {
    assert_eq!(render("a\nb\n\nc"), "<p>a\nb</p>\n\n<p>c</p>");
}

#[test]
fn emphasis_and_strong() {
    assert_eq!(
        render("**bold** and _em_"),
        "<p><strong>bold</strong> and <em>em</em></p>"
    );
}

#[test]
fn intraword_underscores_are_literal() {
    assert_eq!(render("snake_case_name"), "<p>snake_case_name</p>");
}

#[test]
fn strikethrough() {
    assert_eq!(render("~~x~~"), "<p><del>x</del></p>");
}

#[test]
fn unclosed_strikethrough_runs_are_literal() {
    let doc = "~~a ".repeat(20_000);
    assert_eq!(render(&doc), format!("<p>{}</p>", doc.trim_end()));
    assert_eq!(render("~~a ~~b\n~~c~~"), "<p>~~a ~~b\n<del>c</del></p>");
}

#[test]
fn code_span_escapes() {
    assert_eq!(render("`<div>`"), "<p><code>&lt;div&gt;</code></p>");
}

#[test]
fn backslash_escapes() {
    assert_eq!(render("\\# not heading"), "<p># not heading</p>");
    assert_eq!(render("\\*a\\*"), "<p>*a*</p>");
}

#[test]
fn raw_html_is_escaped() {
    assert_eq!(render("<div>hi</div>"), "<p>&lt;div&gt;hi&lt;/div&gt;</p>");
    assert_eq!(render("a <b> & c"), "<p>a &lt;b&gt; &amp; c</p>");
}

#[test]
fn escaped_markup_stays_escaped() {
    assert_eq!(render("&lt;b&gt;"), "<p>&lt;b&gt;</p>");
    let once = render_inline("<script>alert(\"x\")</script>");
    assert_eq!(once, "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;");
    assert_eq!(render_inline(&once), once);
}

#[test]
fn entities_pass_through() {
    assert_eq!(render("&copy; 2024"), "<p>&copy; 2024</p>");
}

#[test]
fn hard_breaks() {
    assert_eq!(render("a  \nb"), "<p>a<br />\nb</p>");
    assert_eq!(render("a\\\nb"), "<p>a<br />\nb</p>");
    assert_eq!(render("a \nb"), "<p>a\nb</p>");
}

#[test]
fn breaks_enabled_option() {
    let options = Options {
        breaks_enabled: true,
        ..Options::default()
    };
    assert_eq!(render_with_options("a\nb", &options), "<p>a<br />\nb</p>");
}

#[test]
fn line_endings_normalized() {
    assert_eq!(render("a\r\nb"), "<p>a\nb</p>");
    assert_eq!(render("a\rb"), "<p>a\nb</p>");
}

// === Links and images ===

#[test]
fn reference_link() {
    assert_eq!(
        render("[text][1]\n\n[1]: http://example.com \"Title\""),
        "<p><a href=\"http://example.com\" title=\"Title\">text</a></p>"
    );
}

#[test]
fn reference_first_definition_wins() {
    assert_eq!(
        render("[a]\n\n[a]: /one\n[a]: /two"),
        "<p><a href=\"/one\">a</a></p>"
    );
}

#[test]
fn reference_label_case_insensitive() {
    assert_eq!(
        render("[Foo][]\n\n[FOO]: /f"),
        "<p><a href=\"/f\">Foo</a></p>"
    );
}

#[test]
fn definition_in_later_quote_resolves() {
    assert_eq!(
        render("[x][a]\n\n> [a]: /u"),
        "<p><a href=\"/u\">x</a></p>\n\n<blockquote>\n</blockquote>"
    );
}

#[test]
fn definition_in_later_list_item_resolves() {
    let html = render("[y][b]\n\n- > [b]: /v");
    assert!(html.starts_with("<p><a href=\"/v\">y</a></p>"), "{html}");
}

#[test]
fn missing_reference_is_text() {
    assert_eq!(render("[nope]"), "<p>[nope]</p>");
}

#[test]
fn inline_link() {
    assert_eq!(
        render("[x](/path \"t\")"),
        "<p><a href=\"/path\" title=\"t\">x</a></p>"
    );
}

#[test]
fn javascript_url_neutralized() {
    let html = render("[x](javascript:alert(1))");
    assert!(
        html.contains("<a href=\"javascript%3Aalert(1)\">x</a>"),
        "{html}"
    );
}

#[test]
fn javascript_reference_url_neutralized() {
    assert_eq!(
        render("[a]\n\n[a]: javascript:x"),
        "<p><a href=\"javascript%3Ax\">a</a></p>"
    );
}

#[test]
fn angle_bracket_destination() {
    assert_eq!(render("[a](<b>)"), "<p><a href=\"b\">a</a></p>");
}

#[test]
fn image() {
    assert_eq!(
        render("![alt](/i.png \"T\")"),
        "<p><img src=\"/i.png\" alt=\"alt\" title=\"T\" /></p>"
    );
}

#[test]
fn autolinks() {
    assert_eq!(
        render("<http://x.com>"),
        "<p><a href=\"http://x.com\">http://x.com</a></p>"
    );
    assert_eq!(
        render("<me@x.org>"),
        "<p><a href=\"mailto:me@x.org\">me@x.org</a></p>"
    );
}

#[test]
fn bare_url_stops_at_punctuation() {
    assert_eq!(
        render("see http://x.com."),
        "<p>see <a href=\"http://x.com\">http://x.com</a>.</p>"
    );
}

#[test]
fn bare_url_disabled() {
    let options = Options {
        urls_linked: false,
        ..Options::default()
    };
    assert_eq!(
        render_with_options("see http://x.com", &options),
        "<p>see http://x.com</p>"
    );
}

// === Code ===

#[test]
fn fenced_code_with_language() {
    assert_eq!(
        render("```rust\nfn main() {}\n```"),
        "<pre><code class=\"language-rust\">fn main() {}</code></pre>"
    );
}

#[test]
fn fenced_code_keeps_blank_lines() {
    assert_eq!(render("```\na\n\nb\n```"), "<pre><code>a\n\nb</code></pre>");
}

#[test]
fn unclosed_fence_runs_to_end() {
    assert_eq!(render("```\ncode"), "<pre><code>code</code></pre>");
}

#[test]
fn indented_code() {
    assert_eq!(
        render("    a < b\n    c"),
        "<pre><code>a &lt; b\nc</code></pre>"
    );
    assert_eq!(render("\tcode"), "<pre><code>code</code></pre>");
}

// === Rules ===

#[test]
fn thematic_breaks() {
    assert_eq!(render("a\n\n***\n\nb"), "<p>a</p>\n\n<hr />\n\n<p>b</p>");
    assert_eq!(render("a\n***"), "<p>a</p>\n\n<hr />");
}

// === Quotes ===

#[test]
fn blockquote_lazy_line() {
    assert_eq!(render("> a\nb"), "<blockquote>\n<p>a\nb</p>\n</blockquote>");
}

#[test]
fn nested_blockquote() {
    assert_eq!(
        render("> a\n> > b"),
        "<blockquote>\n<p>a</p>\n<blockquote>\n<p>b</p>\n</blockquote>\n</blockquote>"
    );
}

// === Lists ===

#[test]
fn tight_list() {
    assert_eq!(render("- a\n- b"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>");
}

#[test]
fn ordered_list_start() {
    assert_eq!(
        render("3. a\n4. b"),
        "<ol start=\"3\">\n<li>a</li>\n<li>b</li>\n</ol>"
    );
    assert_eq!(render("1. a"), "<ol>\n<li>a</li>\n</ol>");
}

#[test]
fn loose_item_keeps_paragraph() {
    assert_eq!(
        render("- a\n\n- b"),
        "<ul>\n<li>\n<p>a</p>\n</li>\n<li>b</li>\n</ul>"
    );
}

#[test]
fn item_with_two_paragraphs() {
    assert_eq!(
        render("1. a\n\n   b"),
        "<ol>\n<li>\n<p>a</p>\n<p>b</p>\n</li>\n</ol>"
    );
}

#[test]
fn nested_list() {
    assert_eq!(
        render("- a\n  - b"),
        "<ul>\n<li>a\n<ul>\n<li>b</li>\n</ul></li>\n</ul>"
    );
}

#[test]
fn list_interrupts_paragraph() {
    assert_eq!(
        render("para\n- a"),
        "<p>para</p>\n\n<ul>\n<li>a</li>\n</ul>"
    );
}

// === Tables ===

#[test]
fn table_with_alignment() {
    assert_eq!(
        render("| a | b |\n|:--|--:|\n| 1 | 2 |"),
        "<table>\n<thead>\n<tr>\n<th style=\"text-align: left;\">a</th>\n\
         <th style=\"text-align: right;\">b</th>\n</tr>\n</thead>\n<tbody>\n<tr>\n\
         <td style=\"text-align: left;\">1</td>\n<td style=\"text-align: right;\">2</td>\n\
         </tr>\n</tbody>\n</table>"
    );
}

#[test]
fn table_cells_with_pipes() {
    assert_eq!(
        render("a | b\n--|--\n`x|y` | \\|"),
        "<table>\n<thead>\n<tr>\n<th>a</th>\n<th>b</th>\n</tr>\n</thead>\n<tbody>\n<tr>\n\
         <td><code>x|y</code></td>\n<td>|</td>\n</tr>\n</tbody>\n</table>"
    );
}

#[test]
fn table_ends_at_blank_line() {
    assert_eq!(
        render("a | b\n--|--\n\nafter"),
        "<table>\n<thead>\n<tr>\n<th>a</th>\n<th>b</th>\n</tr>\n</thead>\n\
         <tbody>\n</tbody>\n</table>\n\n<p>after</p>"
    );
}

// === Entry points ===

#[test]
fn empty_input() {
    assert_eq!(render(""), "");
    assert_eq!(render("[a]: /only-a-definition"), "");
}

#[test]
fn inline_only_rendering() {
    assert_eq!(render_inline("# *x*"), "# <em>x</em>");
    assert_eq!(render_inline("a\nb"), "a\nb");
}

#[test]
fn try_render_matches_render() {
    let doc = "# T\n\n- a\n- b\n\n> q";
    assert_eq!(try_render(doc, &Options::default()), Ok(render(doc)));
}

#[test]
fn deep_nesting_is_reported_and_degraded() {
    let doc = "> ".repeat(limits::MAX_BLOCK_NESTING + 8) + "deep";
    assert_eq!(
        try_render(&doc, &Options::default()),
        Err(Error::DepthExceeded {
            limit: limits::MAX_BLOCK_NESTING
        })
    );
    let html = render(&doc);
    assert!(html.starts_with("<blockquote>"));
    assert!(html.contains("&gt; &gt;"));
}

#[test]
fn deep_lists_do_not_overflow() {
    let doc: String = (0..200)
        .map(|i| format!("{}- x\n", "  ".repeat(i)))
        .collect();
    let html = render(&doc);
    assert!(html.starts_with("<ul>"));
}
