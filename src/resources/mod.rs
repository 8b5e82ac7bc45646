//! Idempotent file primitives: inspect the current state, then converge.
pub mod helpers;
pub mod tracked;

use crate::error::SyncError;

/// How a destination compares with what it should be.
#[derive(Debug)]
pub enum ResourceState {
    /// Destination does not exist yet.
    Missing,
    /// Destination already matches.
    Correct,
    /// Destination exists with other content; overwriting needs a backup.
    Differs {
        /// What differs.
        detail: String,
    },
    /// Cannot converge, e.g. a directory sits where a file should go.
    Invalid(SyncError),
}

/// Outcome of [`Resource::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceChange {
    /// Destination was written.
    Applied,
    /// Destination already matched; nothing was written.
    AlreadyCorrect,
}

/// A destination that can be inspected and brought into its desired state.
pub trait Resource {
    /// `from -> to` style description for log lines.
    fn description(&self) -> String;

    /// Inspect the destination without modifying anything.
    ///
    /// # Errors
    ///
    /// Returns an error if either side cannot be read.
    fn current_state(&self) -> Result<ResourceState, SyncError>;

    /// Write the destination. Does not back anything up; callers decide
    /// whether an existing destination may be replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination or its parent cannot be written.
    fn apply(&self) -> Result<ResourceChange, SyncError>;
}
