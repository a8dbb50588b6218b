//! HTML → Markdown as an ordered stage pipeline.

use std::sync::LazyLock;

use regex::Regex;

use crate::stage::Stage;

/// The HTML→Markdown pipeline in application order.
///
/// Ordering matters: emphasis runs before `strip_tags`, lists before
/// `blocks` (so `<li>` content is rewritten before stray `<div>` handling),
/// and whitespace collapsing runs last.
#[must_use]
pub fn html_stages() -> &'static [Stage] {
    const STAGES: &[Stage] = &[
        Stage::new("headings", headings),
        Stage::new("emphasis", emphasis),
        Stage::new("links", links),
        Stage::new("images", images),
        Stage::new("lists", lists),
        Stage::new("blocks", blocks),
        Stage::new("code", code),
        Stage::new("blockquotes", blockquotes),
        Stage::new("strip_tags", strip_tags),
        Stage::new("collapse_whitespace", collapse_whitespace),
    ];
    STAGES
}

/// Convert an HTML fragment to Markdown, best effort.
#[must_use]
pub fn html_to_markdown(html: &str) -> String {
    html_stages()
        .iter()
        .fold(html.to_owned(), |text, stage| stage.apply(&text))
}

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h([1-6])[^>]*>(.*?)</h[1-6]>").unwrap());

fn headings(input: &str) -> String {
    HEADING_RE
        .replace_all(input, |caps: &regex::Captures<'_>| {
            let level: usize = caps[1].parse().expect("single digit");
            format!("{} {}\n\n", "#".repeat(level), caps[2].trim())
        })
        .into_owned()
}

// `(?:\s[^>]*)?` keeps `<b>` from matching `<blockquote>` and `<i>` from
// matching `<img>`.
static STRONG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:strong|b)(?:\s[^>]*)?>(.*?)</(?:strong|b)>").unwrap());
static EM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:em|i)(?:\s[^>]*)?>(.*?)</(?:em|i)>").unwrap());

fn emphasis(input: &str) -> String {
    let strong = STRONG_RE.replace_all(input, "**$1**");
    EM_RE.replace_all(&strong, "*$1*").into_owned()
}

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<a[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#).unwrap());

fn links(input: &str) -> String {
    LINK_RE.replace_all(input, "[$2]($1)").into_owned()
}

// Image tags come in three attribute orders; alt-before-src wins, then
// src-before-alt, then src-only.
static IMG_ALT_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img[^>]*alt="([^"]*)"[^>]*src="([^"]*)"[^>]*/?>"#).unwrap());
static IMG_SRC_ALT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img[^>]*src="([^"]*)"[^>]*alt="([^"]*)"[^>]*/?>"#).unwrap());
static IMG_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img[^>]*src="([^"]*)"[^>]*/?>"#).unwrap());

fn images(input: &str) -> String {
    let pass = IMG_ALT_SRC_RE.replace_all(input, "![$1]($2)");
    let pass = IMG_SRC_ALT_RE.replace_all(&pass, "![$2]($1)");
    IMG_SRC_RE.replace_all(&pass, "![]($1)").into_owned()
}

static LIST_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<[uo]l[^>]*>").unwrap());
static LIST_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</[uo]l>").unwrap());
static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li(?:\s[^>]*)?>(.*?)</li>").unwrap());

fn lists(input: &str) -> String {
    let pass = LIST_OPEN_RE.replace_all(input, "");
    let pass = LIST_CLOSE_RE.replace_all(&pass, "\n");
    LIST_ITEM_RE.replace_all(&pass, "- $1\n").into_owned()
}

// `<p(?:\s...)?>` so `<pre>` blocks survive for the code stage.
static P_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<p(?:\s[^>]*)?>").unwrap());
static P_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</p>").unwrap());
static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br[^>]*/?>").unwrap());
static DIV_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<div[^>]*>").unwrap());
static DIV_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</div>").unwrap());

fn blocks(input: &str) -> String {
    let pass = P_OPEN_RE.replace_all(input, "");
    let pass = P_CLOSE_RE.replace_all(&pass, "\n\n");
    let pass = BR_RE.replace_all(&pass, "\n");
    let pass = DIV_OPEN_RE.replace_all(&pass, "");
    DIV_CLOSE_RE.replace_all(&pass, "\n").into_owned()
}

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<code[^>]*>(.*?)</code>").unwrap());
static PRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<pre[^>]*>(.*?)</pre>").unwrap());

fn code(input: &str) -> String {
    let pass = PRE_RE.replace_all(input, "```\n$1\n```\n");
    CODE_RE.replace_all(&pass, "`$1`").into_owned()
}

static BLOCKQUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<blockquote[^>]*>(.*?)</blockquote>").unwrap());

fn blockquotes(input: &str) -> String {
    BLOCKQUOTE_RE
        .replace_all(input, |caps: &regex::Captures<'_>| {
            let quoted: Vec<String> = caps[1]
                .trim()
                .lines()
                .map(|line| format!("> {}", line.trim()))
                .collect();
            format!("{}\n\n", quoted.join("\n"))
        })
        .into_owned()
}

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

fn strip_tags(input: &str) -> String {
    TAG_RE.replace_all(input, "").into_owned()
}

static EXCESS_NEWLINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_whitespace(input: &str) -> String {
    EXCESS_NEWLINES_RE
        .replace_all(input, "\n\n")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_headings_all_levels() {
        assert_eq!(headings("<h1>A</h1>").trim(), "# A");
        assert_eq!(headings("<h3 id=\"x\">B</h3>").trim(), "### B");
        assert_eq!(headings("<h6>C</h6>").trim(), "###### C");
    }

    #[test]
    fn test_emphasis_stage() {
        assert_eq!(emphasis("<strong>a</strong> <b>b</b>"), "**a** **b**");
        assert_eq!(emphasis("<em>i</em> <i>j</i>"), "*i* *j*");
    }

    #[test]
    fn test_links_stage() {
        assert_eq!(
            links(r#"<a href="https://example.com">text</a>"#),
            "[text](https://example.com)"
        );
    }

    #[test]
    fn test_images_alt_before_src() {
        assert_eq!(images(r#"<img alt="A" src="a.png">"#), "![A](a.png)");
    }

    #[test]
    fn test_images_src_before_alt() {
        assert_eq!(images(r#"<img src="a.png" alt="A" />"#), "![A](a.png)");
    }

    #[test]
    fn test_images_src_only() {
        assert_eq!(images(r#"<img src="a.png">"#), "![](a.png)");
    }

    #[test]
    fn test_lists_stage() {
        assert_eq!(
            lists("<ul><li>one</li><li>two</li></ul>"),
            "- one\n- two\n\n"
        );
    }

    #[test]
    fn test_blocks_stage() {
        assert_eq!(blocks("<p>a</p><p>b</p>"), "a\n\nb\n\n");
        assert_eq!(blocks("a<br>b"), "a\nb");
        assert_eq!(blocks("<div>a</div>"), "a\n");
    }

    #[test]
    fn test_code_stage() {
        assert_eq!(code("<code>x</code>"), "`x`");
        assert_eq!(code("<pre>let a;</pre>"), "```\nlet a;\n```\n");
    }

    #[test]
    fn test_blockquotes_stage() {
        assert_eq!(
            blockquotes("<blockquote>one\ntwo</blockquote>"),
            "> one\n> two\n\n"
        );
    }

    #[test]
    fn test_strip_tags_stage() {
        assert_eq!(strip_tags("<span data-x=\"1\">keep</span>"), "keep");
    }

    #[test]
    fn test_collapse_whitespace_stage() {
        assert_eq!(collapse_whitespace("a\n\n\n\nb\n"), "a\n\nb");
    }

    #[test]
    fn test_full_pipeline() {
        let html = "<h1>Title</h1><p>Hello <strong>world</strong></p>";
        assert_eq!(html_to_markdown(html), "# Title\n\nHello **world**");
    }

    #[test]
    fn test_pre_blocks_survive_paragraph_stage() {
        assert_eq!(
            html_to_markdown("<p>intro</p><pre>let x;</pre>"),
            "intro\n\n```\nlet x;\n```"
        );
    }

    #[test]
    fn test_blockquote_not_mistaken_for_bold() {
        assert_eq!(
            html_to_markdown("<blockquote>quoted</blockquote>"),
            "> quoted"
        );
    }

    #[test]
    fn test_pipeline_mixed_document() {
        let html = concat!(
            "<h2>Docs</h2>",
            "<p>See <a href=\"/guide\">the guide</a>.</p>",
            "<ul><li>first</li><li><em>second</em></li></ul>",
        );
        assert_eq!(
            html_to_markdown(html),
            "## Docs\n\nSee [the guide](/guide).\n\n- first\n- *second*"
        );
    }

    #[test]
    fn test_stage_names_are_unique_and_ordered() {
        let names: Vec<&str> = html_stages().iter().map(|stage| stage.name).collect();
        assert_eq!(names.first(), Some(&"headings"));
        assert_eq!(names.last(), Some(&"collapse_whitespace"));
        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names, deduped);
    }

    #[test]
    fn test_unknown_tags_are_stripped_not_errors() {
        assert_eq!(html_to_markdown("<article>text</article>"), "text");
    }
}
