//! Deadline-based save scheduling.
//!
//! Mutations request a save; requests within the debounce window coalesce
//! into a single pending deadline. The session drives the scheduler
//! explicitly (`take_due` / `take_pending`) — there is no background
//! thread, matching the single-threaded cooperative model. Because saves
//! run synchronously and pending requests coalesce, saves for one session
//! never interleave: the newest serialized content wins, explicitly.

use std::time::{Duration, Instant};

/// Coalescing save scheduler for one page.
#[derive(Debug)]
pub struct SaveScheduler {
    debounce: Duration,
    deadline: Option<Instant>,
}

impl SaveScheduler {
    /// Create a scheduler with the given debounce window.
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            deadline: None,
        }
    }

    /// Request a save. A pending request is coalesced: the deadline is
    /// pushed out to `now + debounce`.
    pub fn schedule(&mut self) {
        self.deadline = Some(Instant::now() + self.debounce);
    }

    /// True if a save has been requested and not yet taken.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True if a pending save has passed its deadline.
    #[must_use]
    pub fn is_due(&self) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= Instant::now())
    }

    /// Consume a due save request. Returns `true` when the caller should
    /// save now.
    pub fn take_due(&mut self) -> bool {
        if self.is_due() {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Consume any pending request regardless of deadline (used by
    /// explicit save-now paths so the pending request coalesces into the
    /// immediate save).
    pub fn take_pending(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
