//! Run logger: emits tracing events and collects the end-of-run summary.
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::types::{DRY_RUN_TARGET, Log, STAGE_TARGET, SUMMARY_TARGET, TaskEntry, TaskStatus};

/// Forward the message methods of [`Log`] to the inherent methods of the
/// same name.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Everything the summary reports.
#[derive(Debug, Default)]
struct RunRecord {
    tasks: Vec<TaskEntry>,
    backups: Vec<PathBuf>,
}

/// Logger for one command run.
///
/// Messages become [`tracing`] events; the subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber) sends them to the
/// console and to `<cache_dir>/<command>.log`. Task outcomes and backups
/// written are kept for [`print_summary`](Self::print_summary).
#[derive(Debug)]
pub struct Logger {
    record: Mutex<RunRecord>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Logger for `command`, whose log file lives in `cache_dir`.
    #[must_use]
    pub fn new(command: &str, cache_dir: &Path) -> Self {
        Self {
            record: Mutex::new(RunRecord::default()),
            log_file: log_file_path(cache_dir, command),
        }
    }

    /// Log file path, if the cache directory is usable.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Task outcomes recorded so far, in order.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.record
            .lock()
            .map_or_else(|_| Vec::new(), |r| r.tasks.clone())
    }

    /// Backups recorded so far, in order.
    #[must_use]
    pub fn backups(&self) -> Vec<PathBuf> {
        self.record
            .lock()
            .map_or_else(|_| Vec::new(), |r| r.backups.clone())
    }

    /// Log an error.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a section header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log a progress message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a detail; always reaches the log file.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a previewed action.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Remember a task outcome.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut record) = self.record.lock() {
            record.tasks.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Remember a backup written during this run.
    pub fn record_backup(&self, path: &Path) {
        if let Ok(mut record) = self.record.lock() {
            record.backups.push(path.to_path_buf());
        }
    }

    /// Whether any recorded task failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Number of failed tasks.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.record.lock().map_or(0, |r| {
            r.tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Failed)
                .count()
        })
    }

    /// Log one line per task, the totals, every backup written, and the log
    /// file location. Does nothing when no task was recorded.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }
        let backups = self.backups();

        self.stage("Summary");
        for task in &tasks {
            let suffix = task
                .message
                .as_deref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            tracing::info!(
                target: SUMMARY_TARGET,
                status = task.status.label(),
                "{}{suffix}",
                task.name
            );
        }
        self.info(&totals(&tasks));

        if !backups.is_empty() {
            self.info(&format!("{} backup(s) written:", backups.len()));
            for path in &backups {
                self.info(&format!("  {}", path.display()));
            }
        }
        if let Some(path) = &self.log_file {
            self.info(&format!("log: {}", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }

    fn record_backup(&self, path: &Path) {
        self.record_backup(path);
    }
}

/// `"3 task(s): 2 ok, 1 failed"`, omitting statuses that did not occur.
fn totals(tasks: &[TaskEntry]) -> String {
    let parts: Vec<String> = [
        TaskStatus::Ok,
        TaskStatus::NotApplicable,
        TaskStatus::Skipped,
        TaskStatus::DryRun,
        TaskStatus::Failed,
    ]
    .into_iter()
    .filter_map(|status| {
        let n = tasks.iter().filter(|t| t.status == status).count();
        (n > 0).then(|| format!("{n} {}", status.label()))
    })
    .collect();
    format!("{} task(s): {}", tasks.len(), parts.join(", "))
}

/// `<cache_dir>/<command>.log`, creating `cache_dir` if needed. `None` when
/// the directory cannot be created; logging is then console-only.
pub(super) fn log_file_path(cache_dir: &Path, command: &str) -> Option<PathBuf> {
    std::fs::create_dir_all(cache_dir).ok()?;
    Some(cache_dir.join(format!("{command}.log")))
}
