//! Markdown → HTML over a classified line representation.
//!
//! Lines are classified first, then rendered: runs of list items become a
//! single `<ul>`/`<ol>`, fenced blocks become `<pre><code>`, remaining
//! non-empty lines are wrapped in `<p>`. Working over classified lines
//! (rather than post-fixing a blanket paragraph wrap) is what keeps
//! headings and lists out of paragraph tags.

use crate::inline;

/// One classified Markdown line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Heading(usize, &'a str),
    Bullet(&'a str),
    Numbered(&'a str),
    Fence,
    Blank,
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim_end();
    if trimmed.trim().is_empty() {
        return Line::Blank;
    }
    if trimmed.trim_start().starts_with("```") {
        return Line::Fence;
    }
    if let Some(rest) = trimmed.strip_prefix('#') {
        let extra = rest.len() - rest.trim_start_matches('#').len();
        let level = 1 + extra;
        let body = rest.trim_start_matches('#');
        if level <= 6 {
            if let Some(text) = body.strip_prefix(' ') {
                return Line::Heading(level, text.trim());
            }
        }
    }
    if let Some(text) = trimmed.strip_prefix("- ") {
        return Line::Bullet(text);
    }
    if let Some(dot) = trimmed.find(". ") {
        if dot > 0 && trimmed[..dot].bytes().all(|b| b.is_ascii_digit()) {
            return Line::Numbered(&trimmed[dot + 2..]);
        }
    }
    Line::Text(trimmed)
}

/// Convert Markdown to an HTML fragment, best effort.
///
/// Blocks are emitted back to back without separating whitespace; the
/// result is intended for insertion into a document tree, not for human
/// reading.
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let lines: Vec<Line<'_>> = markdown.lines().map(classify).collect();
    let mut out = String::with_capacity(markdown.len());
    let mut index = 0;

    while index < lines.len() {
        match lines[index] {
            Line::Blank => index += 1,
            Line::Heading(level, text) => {
                out.push_str(&format!("<h{level}>{}</h{level}>", inline::rewrite(text)));
                index += 1;
            }
            Line::Bullet(_) => {
                out.push_str("<ul>");
                while let Some(Line::Bullet(text)) = lines.get(index) {
                    out.push_str(&format!("<li>{}</li>", inline::rewrite(text)));
                    index += 1;
                }
                out.push_str("</ul>");
            }
            Line::Numbered(_) => {
                out.push_str("<ol>");
                while let Some(Line::Numbered(text)) = lines.get(index) {
                    out.push_str(&format!("<li>{}</li>", inline::rewrite(text)));
                    index += 1;
                }
                out.push_str("</ol>");
            }
            Line::Fence => {
                index += 1;
                let start = index;
                while index < lines.len() && lines[index] != Line::Fence {
                    index += 1;
                }
                let body: Vec<&str> = markdown
                    .lines()
                    .skip(start)
                    .take(index - start)
                    .collect();
                out.push_str(&format!("<pre><code>{}</code></pre>", body.join("\n")));
                if index < lines.len() {
                    index += 1; // closing fence
                }
            }
            Line::Text(text) => {
                out.push_str(&format!("<p>{}</p>", inline::rewrite(text)));
                index += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::html_to_markdown;

    #[test]
    fn test_classify_lines() {
        assert_eq!(classify("# Title"), Line::Heading(1, "Title"));
        assert_eq!(classify("### Sub"), Line::Heading(3, "Sub"));
        assert_eq!(classify("####### too deep"), Line::Text("####### too deep"));
        assert_eq!(classify("#not-a-heading"), Line::Text("#not-a-heading"));
        assert_eq!(classify("- item"), Line::Bullet("item"));
        assert_eq!(classify("3. third"), Line::Numbered("third"));
        assert_eq!(classify("   "), Line::Blank);
        assert_eq!(classify("```rust"), Line::Fence);
        assert_eq!(classify("plain"), Line::Text("plain"));
    }

    #[test]
    fn test_heading_and_paragraph() {
        assert_eq!(
            markdown_to_html("# Title\n\nHello **world**"),
            "<h1>Title</h1><p>Hello <strong>world</strong></p>"
        );
    }

    #[test]
    fn test_headings_not_paragraph_wrapped() {
        let html = markdown_to_html("## Section");
        assert_eq!(html, "<h2>Section</h2>");
        assert!(!html.contains("<p>"));
    }

    #[test]
    fn test_bullet_run_becomes_single_list() {
        assert_eq!(
            markdown_to_html("- a\n- b\n- c"),
            "<ul><li>a</li><li>b</li><li>c</li></ul>"
        );
    }

    #[test]
    fn test_numbered_run_becomes_ordered_list() {
        assert_eq!(
            markdown_to_html("1. one\n2. two"),
            "<ol><li>one</li><li>two</li></ol>"
        );
    }

    #[test]
    fn test_separate_lists_stay_separate() {
        assert_eq!(
            markdown_to_html("- a\n\n- b"),
            "<ul><li>a</li></ul><ul><li>b</li></ul>"
        );
    }

    #[test]
    fn test_each_text_line_is_its_own_paragraph() {
        assert_eq!(markdown_to_html("one\ntwo"), "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_fenced_code_block() {
        assert_eq!(
            markdown_to_html("```\nlet a = 1;\n```"),
            "<pre><code>let a = 1;</code></pre>"
        );
    }

    #[test]
    fn test_unterminated_fence_consumes_rest() {
        assert_eq!(
            markdown_to_html("```\ncode"),
            "<pre><code>code</code></pre>"
        );
    }

    #[test]
    fn test_link_and_image() {
        assert_eq!(
            markdown_to_html("See [docs](/d) and ![logo](l.png)"),
            r#"<p>See <a href="/d">docs</a> and <img alt="logo" src="l.png" /></p>"#
        );
    }

    // Restricted-subset fixed point: converting the produced HTML back to
    // Markdown reproduces the input.
    #[test]
    fn test_round_trip_fixed_point() {
        for markdown in [
            "# Title\n\nHello **world**",
            "## Docs\n\n- one\n- two",
            "###### Deep\n\n*soft* text",
            "[link](https://example.com)",
        ] {
            let html = markdown_to_html(markdown);
            assert_eq!(html_to_markdown(&html), markdown, "via {html}");
        }
    }
}
