//! Persistence gateway for the page editor.
//!
//! The core calls exactly two page operations — load and save of a whole
//! serialized page — plus catalog reads (component records, custom-element
//! rules) and template fetches. This crate defines the traits and the two
//! real backends:
//!
//! - [`FsStore`]: site directories on the local filesystem
//! - [`HttpStore`]: the REST endpoints of an editor backend
//!
//! plus [`MockStore`] (behind the `mock` feature) for tests. All backends
//! implement [`PageStore`], [`CatalogSource`] and
//! [`TemplateSource`](weld_templates::TemplateSource).
//!
//! Persistence failures are surfaced, never silently retried — callers may
//! re-invoke manually.

mod fs;
mod http;
#[cfg(feature = "mock")]
mod mock;
mod store;

pub use fs::FsStore;
pub use http::HttpStore;
#[cfg(feature = "mock")]
pub use mock::MockStore;
pub use store::{CatalogSource, ComponentsPayload, PageStore, StoreError};
