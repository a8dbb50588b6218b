//! Registry of component definitions grouped by target key.

use std::collections::HashMap;

use crate::definition::{ComponentDefinition, ComponentRecord};
use crate::target::TargetError;

/// Component definitions grouped by their canonical target key.
///
/// Grouping is order-preserving in both dimensions: definitions within a
/// group keep their registration order, and distinct target keys keep
/// first-seen order. Re-registration fully replaces prior contents — no
/// stale groups survive a reload.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    /// Groups in first-seen target-key order.
    groups: Vec<(String, Vec<ComponentDefinition>)>,
    /// Target key → index into `groups`.
    index: HashMap<String, usize>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registry contents with the given definitions.
    ///
    /// Definitions are grouped by [`ComponentDefinition::target_key`].
    pub fn register(&mut self, definitions: Vec<ComponentDefinition>) {
        self.groups.clear();
        self.index.clear();

        for definition in definitions {
            if let Some(existing) = self.find(&definition.name) {
                tracing::warn!(
                    name = %definition.name,
                    target1 = %existing.target_key,
                    target2 = %definition.target_key,
                    "Duplicate component name: lookups by name resolve to the first"
                );
            }
            let key = definition.target_key.clone();
            match self.index.get(&key) {
                Some(&slot) => self.groups[slot].1.push(definition),
                None => {
                    self.index.insert(key.clone(), self.groups.len());
                    self.groups.push((key, vec![definition]));
                }
            }
        }
    }

    /// Replace the registry contents from wire records.
    ///
    /// All records are validated before any registration takes place, so a
    /// single malformed target leaves the registry untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::MalformedTarget`] for the first record whose
    /// target string cannot be parsed.
    pub fn register_records(&mut self, records: Vec<ComponentRecord>) -> Result<(), TargetError> {
        let definitions = records
            .into_iter()
            .map(ComponentDefinition::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        self.register(definitions);
        Ok(())
    }

    /// Definitions registered for a target key, in registration order.
    ///
    /// Returns an empty slice for unknown keys.
    #[must_use]
    pub fn definitions_for(&self, target_key: &str) -> &[ComponentDefinition] {
        self.index
            .get(target_key)
            .map_or(&[], |&slot| &self.groups[slot].1)
    }

    /// Look up a definition by component name across all groups.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ComponentDefinition> {
        self.groups
            .iter()
            .flat_map(|(_, group)| group.iter())
            .find(|definition| definition.name == name)
    }

    /// Target keys in first-seen order.
    pub fn target_keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(key, _)| key.as_str())
    }

    /// Total number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, group)| group.len()).sum()
    }

    /// True if no definitions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
