//! Inline Markdown → HTML substitutions.
//!
//! Applied per line by the block renderer. Image syntax is rewritten
//! before link syntax so `![alt](src)` never half-matches as a link.

use std::sync::LazyLock;

use regex::Regex;

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// Rewrite inline Markdown spans within one line of text.
pub(crate) fn rewrite(line: &str) -> String {
    let pass = IMAGE_RE.replace_all(line, r#"<img alt="$1" src="$2" />"#);
    let pass = LINK_RE.replace_all(&pass, r#"<a href="$2">$1</a>"#);
    let pass = BOLD_RE.replace_all(&pass, "<strong>$1</strong>");
    let pass = ITALIC_RE.replace_all(&pass, "<em>$1</em>");
    CODE_RE.replace_all(&pass, "<code>$1</code>").into_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_bold_then_italic() {
        assert_eq!(
            rewrite("**bold** and *italic*"),
            "<strong>bold</strong> and <em>italic</em>"
        );
    }

    #[test]
    fn test_multiple_bold_spans_do_not_merge() {
        assert_eq!(
            rewrite("**a** mid **b**"),
            "<strong>a</strong> mid <strong>b</strong>"
        );
    }

    #[test]
    fn test_image_before_link() {
        assert_eq!(
            rewrite("![alt](a.png) and [text](b)"),
            r#"<img alt="alt" src="a.png" /> and <a href="b">text</a>"#
        );
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(rewrite("run `weld insert`"), "run <code>weld insert</code>");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(rewrite("nothing special"), "nothing special");
    }
}
