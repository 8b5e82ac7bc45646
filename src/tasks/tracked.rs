//! Task wrapping the file synchronizer.
use anyhow::{Result, bail};

use super::{Context, Task, TaskResult};
use crate::config::TrackedEntry;
use crate::sync::{SyncDirection, sync};

/// Synchronize a set of tracked entries in one direction.
#[derive(Debug, Clone)]
pub struct SyncTrackedFiles {
    direction: SyncDirection,
    entries: Vec<TrackedEntry>,
}

impl SyncTrackedFiles {
    /// Task syncing `entries` in `direction`.
    #[must_use]
    pub const fn new(direction: SyncDirection, entries: Vec<TrackedEntry>) -> Self {
        Self { direction, entries }
    }
}

impl Task for SyncTrackedFiles {
    fn name(&self) -> &str {
        match self.direction {
            SyncDirection::Install => "Install tracked files",
            SyncDirection::Update => "Update tracked files",
        }
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        !self.entries.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let report = sync(ctx, self.direction, &self.entries);
        ctx.log.info(&report.summary(ctx.dry_run));
        if !report.success() {
            bail!(
                "{} of {} entries failed",
                report.errored,
                self.entries.len()
            );
        }
        Ok(TaskResult::done(ctx))
    }
}
