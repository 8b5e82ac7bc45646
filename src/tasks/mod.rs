//! Named tasks that orchestrate synchronization and backups.
pub mod archive;
mod context;
pub mod tracked;

pub use context::Context;

use anyhow::Result;

use crate::logging::TaskStatus;

/// How a task that ran ended, short of failing.
///
/// # Examples
///
/// ```
/// use dotfiles_sync::tasks::TaskResult;
///
/// let skipped = TaskResult::Skipped("nothing to snapshot".into());
/// assert!(matches!(skipped, TaskResult::Skipped(ref why) if why.contains("snapshot")));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Changes were written (or there was nothing to change).
    Ok,
    /// Deliberately did nothing; the reason goes into the summary.
    Skipped(String),
    /// Changes were only previewed.
    DryRun,
}

impl TaskResult {
    /// [`DryRun`](Self::DryRun) under `--dry-run`, [`Ok`](Self::Ok) otherwise.
    #[must_use]
    pub const fn done(ctx: &Context) -> Self {
        if ctx.dry_run { Self::DryRun } else { Self::Ok }
    }
}

/// A named unit of work run by a command.
pub trait Task: Send + Sync {
    /// Name shown in the stage header and the summary.
    fn name(&self) -> &str;

    /// `false` when there is nothing to do; the task is then recorded as
    /// not applicable without running.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Do the work.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails as a whole, e.g. when some entries
    /// could not be synchronized or no archive could be written.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Run `task` if it applies and record how it ended. Never fails; failures
/// are recorded for the summary.
pub fn execute(task: &dyn Task, ctx: &Context) {
    let name = task.name();
    if !task.should_run(ctx) {
        ctx.log.debug(&format!("{name}: nothing to do"));
        ctx.log.record_task(name, TaskStatus::NotApplicable, None);
        return;
    }

    ctx.log.stage(name);
    let (status, message) = match task.run(ctx) {
        Ok(TaskResult::Ok) => (TaskStatus::Ok, None),
        Ok(TaskResult::DryRun) => (TaskStatus::DryRun, None),
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            (TaskStatus::Skipped, Some(reason))
        }
        Err(e) => {
            let msg = format!("{e:#}");
            ctx.log.error(&format!("{name}: {msg}"));
            (TaskStatus::Failed, Some(msg))
        }
    };
    ctx.log.record_task(name, status, message.as_deref());
}

/// Shared helpers for task unit tests.
#[cfg(test)]
pub mod test_helpers {
    use std::sync::Arc;

    use crate::config::{Config, Settings, TrackedEntry};
    use crate::exec::test_helpers::MockExecutor;
    use crate::logging::{Log, Logger};
    use crate::prompt::FixedAnswer;

    use super::Context;

    /// Build a forced, non-dry-run [`Context`] over `entries` with a mock
    /// executor and a prompt that always declines. Also returns the
    /// [`Logger`] so tests can inspect recorded task state.
    #[must_use]
    pub fn context_for(settings: Settings, entries: Vec<TrackedEntry>) -> (Context, Arc<Logger>) {
        let log = Arc::new(Logger::new("test", &std::env::temp_dir()));
        let config = Config { settings, entries };
        let ctx = Context::new(config, Arc::clone(&log) as Arc<dyn Log>, false, true)
            .with_executor(Arc::new(MockExecutor::default()))
            .with_prompt(Arc::new(FixedAnswer(false)));
        (ctx, log)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::logging::{Logger, TaskEntry};
    use std::path::PathBuf;
    use std::sync::Arc;
    use test_helpers::context_for;

    /// Task whose behaviour is fixed up front.
    struct Scripted {
        applicable: bool,
        outcome: fn() -> Result<TaskResult>,
    }

    impl Task for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }
        fn should_run(&self, _ctx: &Context) -> bool {
            self.applicable
        }
        fn run(&self, _ctx: &Context) -> Result<TaskResult> {
            (self.outcome)()
        }
    }

    fn ctx() -> (Context, Arc<Logger>) {
        context_for(
            Settings::with_defaults(PathBuf::from("/tmp/dotfiles"), PathBuf::from("/tmp")),
            vec![],
        )
    }

    fn recorded(applicable: bool, outcome: fn() -> Result<TaskResult>) -> TaskEntry {
        let (ctx, log) = ctx();
        execute(&Scripted { applicable, outcome }, &ctx);
        let mut entries = log.task_entries();
        assert_eq!(entries.len(), 1);
        entries.remove(0)
    }

    #[test]
    fn inapplicable_task_is_not_run() {
        let entry = recorded(false, || anyhow::bail!("must not run"));
        assert_eq!(entry.status, TaskStatus::NotApplicable);
        assert_eq!(entry.message, None);
    }

    #[test]
    fn results_map_to_statuses() {
        assert_eq!(recorded(true, || Ok(TaskResult::Ok)).status, TaskStatus::Ok);
        assert_eq!(
            recorded(true, || Ok(TaskResult::DryRun)).status,
            TaskStatus::DryRun
        );
    }

    #[test]
    fn skip_reason_is_kept() {
        let entry = recorded(true, || Ok(TaskResult::Skipped("nothing to snapshot".into())));
        assert_eq!(entry.status, TaskStatus::Skipped);
        assert_eq!(entry.message.as_deref(), Some("nothing to snapshot"));
    }

    #[test]
    fn error_chain_is_kept() {
        let entry = recorded(true, || {
            Err(anyhow::anyhow!("disk full").context("archiving ~/.bashrc"))
        });
        assert_eq!(entry.status, TaskStatus::Failed);
        assert_eq!(entry.message.as_deref(), Some("archiving ~/.bashrc: disk full"));
    }

    #[test]
    fn done_follows_dry_run() {
        let (mut ctx, _log) = ctx();
        assert!(matches!(TaskResult::done(&ctx), TaskResult::Ok));
        ctx.dry_run = true;
        assert!(matches!(TaskResult::done(&ctx), TaskResult::DryRun));
    }
}
