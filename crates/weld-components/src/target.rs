//! Target descriptor parsing.
//!
//! A target descriptor is the string form `"selector:position"` attached to
//! every component definition. The selector is a structural query resolved
//! against the live document; the position decides whether expanded markup
//! lands inside the matched element or immediately before it.

use std::fmt;

/// Error parsing a target descriptor string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TargetError {
    /// The descriptor has no colon or an empty selector.
    #[error("malformed target descriptor: {0:?}")]
    MalformedTarget(String),
}

/// Where expanded markup is inserted relative to the anchor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertPosition {
    /// Append as last children of the anchor.
    Child,
    /// Insert as immediate preceding siblings of the anchor.
    Before,
}

impl InsertPosition {
    /// Parse a position token. Only the literal `child` maps to [`Child`];
    /// every other token means [`Before`].
    ///
    /// [`Child`]: InsertPosition::Child
    /// [`Before`]: InsertPosition::Before
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token == "child" {
            Self::Child
        } else {
            Self::Before
        }
    }

    /// Canonical token for this position.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Child => "child",
            Self::Before => "before",
        }
    }
}

impl fmt::Display for InsertPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A parsed target descriptor: structural selector plus insert position.
///
/// Derived once per component definition and never mutated. The descriptor
/// splits on the *first* colon only — selectors must not contain colons.
/// This is a documented limitation of the descriptor grammar, not silently
/// worked around: everything after the first colon is the position token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    /// Structural query expression (e.g. `main#article`, `body footer`).
    pub selector: String,
    /// Insert position relative to matched anchors.
    pub position: InsertPosition,
}

impl TargetDescriptor {
    /// Parse a `"selector:position"` descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::MalformedTarget`] if the string contains no
    /// colon or the selector part is empty.
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let Some((selector, position)) = input.split_once(':') else {
            return Err(TargetError::MalformedTarget(input.to_owned()));
        };
        if selector.is_empty() {
            return Err(TargetError::MalformedTarget(input.to_owned()));
        }
        Ok(Self {
            selector: selector.to_owned(),
            position: InsertPosition::from_token(position),
        })
    }

    /// Canonical target key used for registry grouping.
    ///
    /// Equal to the source string when the position token was canonical
    /// (`child` or `before`).
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.selector, self.position)
    }
}

impl fmt::Display for TargetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.selector, self.position)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_child() {
        let target = TargetDescriptor::parse("main#article:child").unwrap();
        assert_eq!(target.selector, "main#article");
        assert_eq!(target.position, InsertPosition::Child);
    }

    #[test]
    fn test_parse_before() {
        let target = TargetDescriptor::parse("footer:before").unwrap();
        assert_eq!(target.selector, "footer");
        assert_eq!(target.position, InsertPosition::Before);
    }

    #[test]
    fn test_non_child_token_means_before() {
        let target = TargetDescriptor::parse("div.cards:append").unwrap();
        assert_eq!(target.position, InsertPosition::Before);
    }

    #[test]
    fn test_splits_on_first_colon_only() {
        // Everything after the first colon is the position token.
        let target = TargetDescriptor::parse("a:hover:child").unwrap();
        assert_eq!(target.selector, "a");
        assert_eq!(target.position, InsertPosition::Before);
    }

    #[test]
    fn test_no_colon_is_malformed() {
        let err = TargetDescriptor::parse("main#article").unwrap_err();
        assert_eq!(
            err,
            TargetError::MalformedTarget("main#article".to_owned())
        );
    }

    #[test]
    fn test_empty_selector_is_malformed() {
        assert!(TargetDescriptor::parse(":child").is_err());
    }

    #[test]
    fn test_display_round_trips_canonical_tokens() {
        for input in ["main#article:child", "footer:before", ".cards:child"] {
            let target = TargetDescriptor::parse(input).unwrap();
            assert_eq!(target.to_string(), input);
        }
    }

    #[test]
    fn test_key_matches_display() {
        let target = TargetDescriptor::parse("main:child").unwrap();
        assert_eq!(target.key(), target.to_string());
    }
}
