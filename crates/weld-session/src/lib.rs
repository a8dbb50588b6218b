//! Editing session for a single page.
//!
//! [`EditSession`] is the explicit per-session object owning everything an
//! editing surface needs: the component registry, the expansion engine
//! with its template cache, the live document tree and the save scheduler.
//! It is constructed per `(site, page)` pair and passed by reference —
//! there is no ambient global editor state.
//!
//! The session flow mirrors the editor lifecycle: open (load page,
//! register components, annotate anchors) → insert components / commit
//! inline edits → debounced, coalesced saves that never persist
//! editor-only affordances.

mod scheduler;
mod session;

pub use scheduler::SaveScheduler;
pub use session::{EditSession, SessionOptions};

use weld_components::TargetError;
use weld_dom::DomError;
use weld_store::StoreError;
use weld_templates::{ExpandError, RuleError};

/// Session-level failure, wrapping the error of whichever collaborator
/// failed.
///
/// Expansion and insertion failures abort only the attempt at hand;
/// already-committed tree state is never touched by a failed operation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Persistence gateway failure.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Malformed target descriptor in a loaded component.
    #[error(transparent)]
    Target(#[from] TargetError),
    /// Custom-element rule set failed to compile.
    #[error(transparent)]
    Rule(#[from] RuleError),
    /// Template expansion failure.
    #[error(transparent)]
    Expand(#[from] ExpandError),
    /// Document parse/query/insertion failure.
    #[error(transparent)]
    Dom(#[from] DomError),
    /// No component with the requested name is registered.
    #[error("unknown component {0:?}")]
    UnknownComponent(String),
}
