//! Component definitions and their wire form.

use serde::Deserialize;

use crate::target::{TargetDescriptor, TargetError};

/// Component record as fetched from the catalog endpoint.
///
/// The `target` field is the raw `"selector:position"` string; it is parsed
/// into a [`TargetDescriptor`] when the record is promoted to a
/// [`ComponentDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComponentRecord {
    /// Human-readable component name, unique within a catalog.
    pub name: String,
    /// Raw target descriptor string.
    pub target: String,
    /// Markup template. May embed `@target`/`@param` directive comments
    /// and `${name}` placeholders.
    pub content: String,
    /// Declared placeholder names, in authoring order.
    #[serde(default)]
    pub params: Vec<String>,
}

/// A loaded component definition.
///
/// Immutable once constructed; owned by the registry for the lifetime of an
/// editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDefinition {
    /// Component name.
    pub name: String,
    /// Parsed target descriptor.
    pub target: TargetDescriptor,
    /// Canonical target key (`selector:position`), the grouping key.
    pub target_key: String,
    /// Markup template.
    pub content: String,
    /// Declared placeholder names, in authoring order.
    pub params: Vec<String>,
}

impl ComponentDefinition {
    /// Promote a wire record to a definition, parsing its target.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::MalformedTarget`] if the record's target
    /// string cannot be parsed.
    pub fn from_record(record: ComponentRecord) -> Result<Self, TargetError> {
        let target = TargetDescriptor::parse(&record.target)?;
        let target_key = target.key();
        Ok(Self {
            name: record.name,
            target,
            target_key,
            content: record.content,
            params: record.params,
        })
    }
}
