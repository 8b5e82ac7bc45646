//! Archive tasks: manual backups and pre-sync snapshots.
use anyhow::Result;
use std::path::{Path, PathBuf};

use super::{Context, Task, TaskResult};
use crate::backup::{BackupKind, backup};
use crate::config::TrackedEntry;
use crate::error::{BackupError, DotfilesError};
use crate::sync::SyncDirection;

/// Copy a set of paths into a timestamped archive directory.
#[derive(Debug, Clone)]
pub struct ArchiveTrackedFiles {
    name: &'static str,
    kind: BackupKind,
    paths: Vec<PathBuf>,
    compress: bool,
    required: bool,
}

impl ArchiveTrackedFiles {
    /// Archive every tracked source. Fails if none exists.
    #[must_use]
    pub fn manual(entries: &[TrackedEntry], compress: bool) -> Self {
        Self {
            name: "Back up tracked files",
            kind: BackupKind::Manual,
            paths: entries.iter().map(|e| e.source.clone()).collect(),
            compress,
            required: true,
        }
    }

    /// Archive the copies a sync in `direction` is about to overwrite.
    /// Skipped when none of them exists yet.
    #[must_use]
    pub fn snapshot(direction: SyncDirection, entries: &[TrackedEntry], files_dir: &Path) -> Self {
        let (name, kind) = match direction {
            SyncDirection::Install => ("Snapshot home copies", BackupKind::Install),
            SyncDirection::Update => ("Snapshot repository copies", BackupKind::Update),
        };
        Self {
            name,
            kind,
            paths: entries
                .iter()
                .map(|e| direction.endpoints(e, files_dir).1)
                .collect(),
            compress: false,
            required: false,
        }
    }
}

impl Task for ArchiveTrackedFiles {
    fn name(&self) -> &str {
        self.name
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        self.required || !self.paths.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        match backup(ctx, self.kind, &self.paths, self.compress) {
            Ok(path) if ctx.dry_run => {
                ctx.log.debug(&format!("planned archive: {}", path.display()));
                Ok(TaskResult::DryRun)
            }
            Ok(path) => {
                ctx.log.record_backup(&path);
                Ok(TaskResult::Ok)
            }
            Err(BackupError::NoInputs { .. }) if !self.required => {
                Ok(TaskResult::Skipped("nothing to snapshot".to_string()))
            }
            Err(e) => Err(DotfilesError::from(e).into()),
        }
    }
}
