//! Custom-element rule set.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Deserialize;

/// Error compiling a custom-element rule set.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// A rule's pattern is not a valid regular expression.
    #[error("invalid pattern for rule {name:?}")]
    InvalidPattern {
        /// Rule name.
        name: String,
        /// Regex compile error.
        #[source]
        source: regex::Error,
    },
}

/// Custom-element rule as fetched from the rules endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleRecord {
    /// Regular-expression source with at most one capturing group for the
    /// inner content.
    pub pattern: String,
    /// Name of the template that replaces each match.
    pub template: String,
}

/// A compiled custom-element rule.
#[derive(Debug)]
pub struct CustomElementRule {
    name: String,
    pattern: Regex,
    template: String,
}

impl CustomElementRule {
    /// Rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiled match pattern.
    #[must_use]
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Name of the replacement template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }
}

/// Custom-element rules in a fixed, deterministic order.
///
/// Rules arrive as an unordered JSON map; iteration order here is
/// sorted-by-name, which makes expansion deterministic across loads.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<CustomElementRule>,
}

impl RuleSet {
    /// An empty rule set (expansion becomes placeholder substitution only).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile a rule set from wire records.
    ///
    /// The `BTreeMap` key order (sorted by rule name) becomes the rule
    /// iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidPattern`] for the first rule whose
    /// pattern fails to compile.
    pub fn from_records(records: BTreeMap<String, RuleRecord>) -> Result<Self, RuleError> {
        let mut rules = Vec::with_capacity(records.len());
        for (name, record) in records {
            let pattern =
                Regex::new(&record.pattern).map_err(|source| RuleError::InvalidPattern {
                    name: name.clone(),
                    source,
                })?;
            if pattern.captures_len() > 2 {
                tracing::warn!(
                    rule = %name,
                    groups = pattern.captures_len() - 1,
                    "rule pattern has more than one capturing group; only the first is used"
                );
            }
            rules.push(CustomElementRule {
                name,
                pattern,
                template: record.template,
            });
        }
        Ok(Self { rules })
    }

    /// Rules in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &CustomElementRule> {
        self.rules.iter()
    }

    /// Rule at a position in the deterministic order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CustomElementRule> {
        self.rules.get(index)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if no rules are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
