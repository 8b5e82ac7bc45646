//! Core logging types: task entries, status, and the [`Log`] trait.
use std::path::Path;

/// Tracing target for stage headers.
pub const STAGE_TARGET: &str = "dotfiles::stage";
/// Tracing target for actions previewed in dry-run mode.
pub const DRY_RUN_TARGET: &str = "dotfiles::dry_run";
/// Tracing target for summary lines; carries a `status` field.
pub const SUMMARY_TARGET: &str = "dotfiles::summary";

/// Recorded outcome of one task, for the end-of-run summary.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Task name.
    pub name: String,
    /// How the task ended.
    pub status: TaskStatus,
    /// Skip reason or error text.
    pub message: Option<String>,
}

/// How a task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Completed.
    Ok,
    /// Had nothing to do.
    NotApplicable,
    /// Chose not to act, e.g. a snapshot with nothing to archive.
    Skipped,
    /// Previewed only.
    DryRun,
    /// Errored.
    Failed,
}

impl TaskStatus {
    /// Short label used in the summary and as the `status` event field.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotApplicable => "n/a",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }

    /// Summary icon.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::NotApplicable => "·",
            Self::Skipped => "○",
            Self::DryRun => "~",
            Self::Failed => "✗",
        }
    }

    /// Inverse of [`label`](Self::label).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        [
            Self::Ok,
            Self::NotApplicable,
            Self::Skipped,
            Self::DryRun,
            Self::Failed,
        ]
        .into_iter()
        .find(|s| s.label() == label)
    }
}

/// Logging sink used by tasks, the synchronizer, and the backup utility.
pub trait Log: Send + Sync {
    /// Section header.
    fn stage(&self, msg: &str);
    /// Progress message.
    fn info(&self, msg: &str);
    /// Detail, shown on the console only with `--verbose`.
    fn debug(&self, msg: &str);
    /// Recoverable problem, e.g. a missing tracked source.
    fn warn(&self, msg: &str);
    /// Failure of one entry or task.
    fn error(&self, msg: &str);
    /// Action that would be taken outside dry-run mode.
    fn dry_run(&self, msg: &str);
    /// Remember a task outcome for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
    /// Remember a backup written during this run (a `.bak.<ts>` file or an
    /// archive) so the summary can point at it.
    fn record_backup(&self, path: &Path);
}
