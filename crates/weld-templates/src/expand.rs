//! The recursive expansion pipeline.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};

use crate::cache::TemplateCache;
use crate::rules::RuleSet;
use crate::source::{TemplateError, TemplateSource};

/// Parameter values by placeholder name.
pub type Params = HashMap<String, String>;

/// Expansion failure.
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    /// A named template could not be fetched. Propagated — the engine
    /// never substitutes empty content for a missing template.
    #[error(transparent)]
    TemplateLoad(#[from] TemplateError),
    /// Recursion depth or rewrite budget exceeded, or a rule made no
    /// forward progress.
    #[error("expansion bound exceeded: {0}")]
    BoundExceeded(String),
}

/// Bounds on the expansion pipeline.
#[derive(Debug, Clone, Copy)]
pub struct ExpandOptions {
    /// Maximum template recursion depth.
    pub max_depth: usize,
    /// Total rewrite budget per top-level expansion.
    pub max_rewrites: usize,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_rewrites: 64,
        }
    }
}

static DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--\s*@(?:target|param).*?-->").unwrap());
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_-]*)\}").unwrap());

/// Strip `@target`/`@param` directive comments.
fn strip_directives(input: &str) -> String {
    DIRECTIVE_RE.replace_all(input, "").into_owned()
}

/// Substitute every `${name}` placeholder. Unsupplied names become the
/// empty string; values are inserted verbatim (no `$` expansion).
fn substitute_params(input: &str, params: &Params) -> String {
    PLACEHOLDER_RE
        .replace_all(input, |caps: &Captures<'_>| {
            params.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Expands component content into final markup.
///
/// The pipeline per [`expand`](Self::expand) call:
///
/// 1. strip directive comments
/// 2. substitute `${name}` placeholders
/// 3. for each rule in deterministic order, repeatedly replace the
///    leftmost match with its recursively-expanded template, binding the
///    capture group (or whole match) to `content` and `body`
///
/// Recursion depth and total rewrites are bounded by [`ExpandOptions`];
/// the engine validates strings only, never tree structure.
pub struct Expander {
    rules: RuleSet,
    source: Arc<dyn TemplateSource>,
    cache: TemplateCache,
    options: ExpandOptions,
}

impl Expander {
    /// Create an expander over a rule set and template source.
    #[must_use]
    pub fn new(rules: RuleSet, source: Arc<dyn TemplateSource>) -> Self {
        Self {
            rules,
            source,
            cache: TemplateCache::new(),
            options: ExpandOptions::default(),
        }
    }

    /// Override the expansion bounds.
    #[must_use]
    pub fn with_options(mut self, options: ExpandOptions) -> Self {
        self.options = options;
        self
    }

    /// Number of templates cached so far in this session.
    #[must_use]
    pub fn cached_templates(&self) -> usize {
        self.cache.len()
    }

    /// Run the full expansion pipeline over a content string.
    ///
    /// # Errors
    ///
    /// Returns [`ExpandError::TemplateLoad`] when a referenced template
    /// cannot be fetched and [`ExpandError::BoundExceeded`] when the
    /// depth/rewrite bounds are hit or a rule makes no forward progress.
    pub fn expand(&mut self, content: &str, params: &Params) -> Result<String, ExpandError> {
        let mut budget = self.options.max_rewrites;
        self.expand_bounded(content, params, 0, &mut budget)
    }

    /// Render a markdown body and expand it into a named wrapper template,
    /// binding the rendered HTML to `content` and `body`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`expand`](Self::expand).
    pub fn expand_markdown(
        &mut self,
        markdown: &str,
        template_name: &str,
    ) -> Result<String, ExpandError> {
        let html = weld_markdown::markdown_to_html(markdown);
        let template = self.load_template(template_name)?;
        let params = Params::from([
            ("content".to_owned(), html.clone()),
            ("body".to_owned(), html),
        ]);
        self.expand(&template, &params)
    }

    fn load_template(&mut self, name: &str) -> Result<String, ExpandError> {
        let source = Arc::clone(&self.source);
        Ok(self.cache.get_or_load(name, source.as_ref())?.to_owned())
    }

    fn expand_bounded(
        &mut self,
        content: &str,
        params: &Params,
        depth: usize,
        budget: &mut usize,
    ) -> Result<String, ExpandError> {
        if depth > self.options.max_depth {
            return Err(ExpandError::BoundExceeded(format!(
                "recursion depth {} exceeded",
                self.options.max_depth
            )));
        }

        let mut working = substitute_params(&strip_directives(content), params);

        for index in 0..self.rules.len() {
            loop {
                let matched = {
                    let rule = self.rules.get(index).expect("index in range");
                    rule.pattern().captures(&working).map(|caps| {
                        let whole = caps.get(0).expect("group 0 always present");
                        let inner = caps
                            .get(1)
                            .map_or(whole.as_str(), |group| group.as_str())
                            .to_owned();
                        (
                            whole.range(),
                            inner,
                            rule.template().to_owned(),
                            rule.name().to_owned(),
                        )
                    })
                };
                let Some((span, inner, template_name, rule_name)) = matched else {
                    break;
                };

                // An empty match can never make forward progress through
                // textual replacement.
                if span.is_empty() {
                    return Err(ExpandError::BoundExceeded(format!(
                        "rule {rule_name:?} matched an empty span; no forward progress"
                    )));
                }
                if *budget == 0 {
                    return Err(ExpandError::BoundExceeded(format!(
                        "rewrite budget {} exhausted at rule {rule_name:?}",
                        self.options.max_rewrites
                    )));
                }
                *budget -= 1;

                let template = self.load_template(&template_name)?;
                let child_params = Params::from([
                    ("content".to_owned(), inner.clone()),
                    ("body".to_owned(), inner),
                ]);
                let replacement =
                    self.expand_bounded(&template, &child_params, depth + 1, budget)?;

                let mut next =
                    String::with_capacity(working.len() - span.len() + replacement.len());
                next.push_str(&working[..span.start]);
                next.push_str(&replacement);
                next.push_str(&working[span.end..]);

                if next == working {
                    return Err(ExpandError::BoundExceeded(format!(
                        "rule {rule_name:?} made no forward progress"
                    )));
                }
                working = next;
            }
        }

        Ok(working)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::rules::RuleRecord;
    use crate::source::MemoryTemplates;

    fn rules(entries: &[(&str, &str, &str)]) -> RuleSet {
        let records = entries
            .iter()
            .map(|(name, pattern, template)| {
                (
                    (*name).to_owned(),
                    RuleRecord {
                        pattern: (*pattern).to_owned(),
                        template: (*template).to_owned(),
                    },
                )
            })
            .collect::<BTreeMap<_, _>>();
        RuleSet::from_records(records).unwrap()
    }

    fn expander(rule_entries: &[(&str, &str, &str)], templates: MemoryTemplates) -> Expander {
        Expander::new(rules(rule_entries), Arc::new(templates))
    }

    #[test]
    fn test_placeholder_substitution() {
        let mut expander = expander(&[], MemoryTemplates::new());
        let params = Params::from([("title".to_owned(), "Hello".to_owned())]);
        assert_eq!(
            expander.expand("<h1>${title}</h1>", &params).unwrap(),
            "<h1>Hello</h1>"
        );
    }

    #[test]
    fn test_unsupplied_placeholder_becomes_empty() {
        let mut expander = expander(&[], MemoryTemplates::new());
        assert_eq!(
            expander.expand("<p>${missing}</p>", &Params::new()).unwrap(),
            "<p></p>"
        );
    }

    #[test]
    fn test_declared_but_unused_param_is_accepted() {
        let mut expander = expander(&[], MemoryTemplates::new());
        let params = Params::from([("unused".to_owned(), "x".to_owned())]);
        assert_eq!(expander.expand("<p>static</p>", &params).unwrap(), "<p>static</p>");
    }

    #[test]
    fn test_param_value_with_dollar_inserted_verbatim() {
        let mut expander = expander(&[], MemoryTemplates::new());
        let params = Params::from([("price".to_owned(), "$1 ${nope}".to_owned())]);
        // The value itself is not re-scanned for placeholders.
        assert_eq!(
            expander.expand("<p>${price}</p>", &params).unwrap(),
            "<p>$1 ${nope}</p>"
        );
    }

    #[test]
    fn test_directive_comments_stripped() {
        let mut expander = expander(&[], MemoryTemplates::new());
        let content = "<!-- @target main:child --><!-- @param title --><div>${title}</div>";
        let params = Params::from([("title".to_owned(), "T".to_owned())]);
        assert_eq!(expander.expand(content, &params).unwrap(), "<div>T</div>");
    }

    #[test]
    fn test_ordinary_comments_survive() {
        let mut expander = expander(&[], MemoryTemplates::new());
        assert_eq!(
            expander.expand("<!-- keep me --><div></div>", &Params::new()).unwrap(),
            "<!-- keep me --><div></div>"
        );
    }

    #[test]
    fn test_box_rule_expansion() {
        let mut expander = expander(
            &[("box", "<!--box-->(.*?)<!--/box-->", "box")],
            MemoryTemplates::new().with_template("box", "<div>${content}</div>"),
        );
        assert_eq!(
            expander
                .expand("<!--box-->hi<!--/box-->", &Params::new())
                .unwrap(),
            "<div>hi</div>"
        );
    }

    #[test]
    fn test_multiple_matches_expand_left_to_right() {
        let mut expander = expander(
            &[("box", "<!--box-->(.*?)<!--/box-->", "box")],
            MemoryTemplates::new().with_template("box", "<div>${content}</div>"),
        );
        assert_eq!(
            expander
                .expand(
                    "<!--box-->a<!--/box--> mid <!--box-->b<!--/box-->",
                    &Params::new()
                )
                .unwrap(),
            "<div>a</div> mid <div>b</div>"
        );
    }

    #[test]
    fn test_whole_match_used_when_pattern_has_no_group() {
        let mut expander = expander(
            &[("badge", "@badge", "badge")],
            MemoryTemplates::new().with_template("badge", "<span>[${content}]</span>"),
        );
        assert_eq!(
            expander.expand("x @badge y", &Params::new()).unwrap(),
            "x <span>[@badge]</span> y"
        );
    }

    #[test]
    fn test_rule_with_no_matches_is_noop() {
        let mut expander = expander(
            &[("box", "<!--box-->(.*?)<!--/box-->", "box")],
            MemoryTemplates::new().with_template("box", "<div>${content}</div>"),
        );
        assert_eq!(
            expander.expand("<p>plain</p>", &Params::new()).unwrap(),
            "<p>plain</p>"
        );
    }

    #[test]
    fn test_nested_rules_expand_through_templates() {
        // The card template embeds a box shorthand around its content.
        let mut expander = expander(
            &[
                ("box", "<!--box-->(.*?)<!--/box-->", "box-tpl"),
                ("card", "<!--card-->(.*?)<!--/card-->", "card-tpl"),
            ],
            MemoryTemplates::new()
                .with_template("box-tpl", "<div class=\"box\">${content}</div>")
                .with_template("card-tpl", "<!--box--><section>${content}</section><!--/box-->"),
        );
        assert_eq!(
            expander
                .expand("<!--card-->inner<!--/card-->", &Params::new())
                .unwrap(),
            "<div class=\"box\"><section>inner</section></div>"
        );
    }

    #[test]
    fn test_template_load_failure_propagates() {
        let mut expander = expander(
            &[("box", "<!--box-->(.*?)<!--/box-->", "missing")],
            MemoryTemplates::new(),
        );
        let err = expander
            .expand("<!--box-->hi<!--/box-->", &Params::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ExpandError::TemplateLoad(TemplateError::NotFound(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_self_reproducing_template_hits_depth_bound() {
        let mut expander = expander(
            &[("box", "<!--box-->(.*?)<!--/box-->", "loop")],
            MemoryTemplates::new().with_template("loop", "<!--box-->${content}<!--/box-->"),
        );
        let err = expander
            .expand("<!--box-->hi<!--/box-->", &Params::new())
            .unwrap_err();
        assert!(matches!(err, ExpandError::BoundExceeded(_)));
    }

    #[test]
    fn test_rewrite_budget_exhausted() {
        let mut expander = expander(
            &[("box", "<!--box-->(.*?)<!--/box-->", "box")],
            MemoryTemplates::new().with_template("box", "<div>${content}</div>"),
        )
        .with_options(ExpandOptions {
            max_depth: 8,
            max_rewrites: 3,
        });
        let content = "<!--box-->a<!--/box--><!--box-->b<!--/box--><!--box-->c<!--/box--><!--box-->d<!--/box-->";
        let err = expander.expand(content, &Params::new()).unwrap_err();
        assert!(matches!(err, ExpandError::BoundExceeded(_)));
    }

    #[test]
    fn test_self_reproducing_rule_errors_instead_of_hanging() {
        // The template reproduces the matched text, so each pass re-matches.
        let mut expander = expander(
            &[("echo", "@echo", "echo")],
            MemoryTemplates::new().with_template("echo", "${content}"),
        );
        let err = expander.expand("x @echo y", &Params::new()).unwrap_err();
        assert!(matches!(err, ExpandError::BoundExceeded(_)));
    }

    #[test]
    fn test_zero_width_match_is_no_forward_progress() {
        let mut expander = expander(
            &[("empty", "q*", "tpl")],
            MemoryTemplates::new().with_template("tpl", "<hr>"),
        );
        let err = expander.expand("abc", &Params::new()).unwrap_err();
        assert!(matches!(err, ExpandError::BoundExceeded(detail) if detail.contains("progress")));
    }

    #[test]
    fn test_templates_cached_across_expansions() {
        let mut expander = expander(
            &[("box", "<!--box-->(.*?)<!--/box-->", "box")],
            MemoryTemplates::new().with_template("box", "<div>${content}</div>"),
        );
        expander
            .expand("<!--box-->a<!--/box-->", &Params::new())
            .unwrap();
        expander
            .expand("<!--box-->b<!--/box-->", &Params::new())
            .unwrap();
        assert_eq!(expander.cached_templates(), 1);
    }

    #[test]
    fn test_expand_markdown_wraps_rendered_body() {
        let mut expander = expander(
            &[],
            MemoryTemplates::new().with_template("page", "<article>${body}</article>"),
        );
        assert_eq!(
            expander.expand_markdown("# Hi\n\ntext", "page").unwrap(),
            "<article><h1>Hi</h1><p>text</p></article>"
        );
    }
}
