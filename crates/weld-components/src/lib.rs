//! Component definitions, target descriptors and the component registry.
//!
//! A *component* is a reusable markup fragment an editor can insert into a
//! page. Each component declares a *target descriptor* — a structural query
//! plus an insert position — identifying where in the document its markup
//! is anchored. This crate provides:
//!
//! - [`TargetDescriptor`]: parsed `"selector:position"` descriptors
//! - [`ComponentDefinition`] and its wire form [`ComponentRecord`]
//! - [`ComponentRegistry`]: definitions grouped by target key, preserving
//!   load order
//!
//! # Example
//!
//! ```
//! use weld_components::{ComponentRegistry, ComponentDefinition, ComponentRecord};
//!
//! let record = ComponentRecord {
//!     name: "hero".to_owned(),
//!     target: "main#article:child".to_owned(),
//!     content: "<section class=\"hero\">${title}</section>".to_owned(),
//!     params: vec!["title".to_owned()],
//! };
//! let definition = ComponentDefinition::from_record(record).unwrap();
//!
//! let mut registry = ComponentRegistry::new();
//! registry.register(vec![definition]);
//! assert_eq!(registry.definitions_for("main#article:child").len(), 1);
//! ```

mod definition;
mod registry;
mod target;

pub use definition::{ComponentDefinition, ComponentRecord};
pub use registry::ComponentRegistry;
pub use target::{InsertPosition, TargetDescriptor, TargetError};
