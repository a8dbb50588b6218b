//! Template source abstraction.

use std::collections::HashMap;

/// Error loading a named template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// No template with this name exists at the source.
    #[error("template {0:?} not found")]
    NotFound(String),
    /// The source failed while fetching the template.
    #[error("template {name:?} could not be loaded")]
    Load {
        /// Template name.
        name: String,
        /// Backend-specific cause.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TemplateError {
    /// Wrap a backend error as a load failure for `name`.
    #[must_use]
    pub fn load(name: &str, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Load {
            name: name.to_owned(),
            source: Box::new(source),
        }
    }
}

/// Source of named template texts.
///
/// Implemented by the persistence backends (filesystem, HTTP) and by
/// [`MemoryTemplates`] for tests. Templates are raw text with embedded
/// `${name}` placeholders; the expansion engine caches them per session,
/// so `load` is called at most once per name.
pub trait TemplateSource: Send + Sync {
    /// Fetch the raw text of a named template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the template does not exist or cannot
    /// be fetched.
    fn load(&self, name: &str) -> Result<String, TemplateError>;
}

/// In-memory template source.
///
/// Useful in tests and for embedding a fixed template set.
#[derive(Debug, Default)]
pub struct MemoryTemplates {
    templates: HashMap<String, String>,
}

impl MemoryTemplates {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template.
    #[must_use]
    pub fn with_template(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.templates.insert(name.into(), text.into());
        self
    }
}

impl TemplateSource for MemoryTemplates {
    fn load(&self, name: &str) -> Result<String, TemplateError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_templates_load() {
        let source = MemoryTemplates::new().with_template("card", "<div>${content}</div>");
        assert_eq!(source.load("card").unwrap(), "<div>${content}</div>");
    }

    #[test]
    fn test_memory_templates_missing() {
        let source = MemoryTemplates::new();
        assert!(matches!(
            source.load("nope").unwrap_err(),
            TemplateError::NotFound(name) if name == "nope"
        ));
    }
}
