//! Unsaved-change tracking.
//!
//! Every effective mutation bumps a revision counter. The workspace is dirty
//! while the current revision differs from the last one known to be stored
//! on the backend, so a save that raced with further edits leaves the flag
//! set.

/// Revision-based dirty flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyTracker {
    revision: u64,
    persisted: u64,
}

impl DirtyTracker {
    /// Create a clean tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            revision: 0,
            persisted: 0,
        }
    }

    /// Record a mutation.
    pub fn mark(&mut self) {
        self.revision += 1;
    }

    /// Current revision, captured when a save starts.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Record that `revision` is now what the backend holds.
    pub fn persisted_at(&mut self, revision: u64) {
        self.persisted = self.persisted.max(revision);
    }

    /// Whether there are unsaved changes.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.revision != self.persisted
    }
}
