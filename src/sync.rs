//! File synchronizer: copies tracked entries between home and the repository.
//!
//! Each entry is processed independently; a failing entry is logged and
//! counted but never stops the batch. Destinations that exist and differ are
//! backed up in place before being overwritten.
use std::fmt;
use std::path::{Path, PathBuf};

use crate::backup::{BackupRecord, backup_in_place};
use crate::config::TrackedEntry;
use crate::error::{DotfilesError, SyncError};
use crate::resources::helpers::fs::{kind_of, walk_tracked};
use crate::resources::tracked::FileCopyResource;
use crate::resources::{Resource as _, ResourceChange, ResourceState};
use crate::tasks::Context;

/// Which way content flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDirection {
    /// Repository → home.
    Install,
    /// Home → repository.
    Update,
}

impl SyncDirection {
    /// `(from, to)` paths of `entry` for this direction.
    #[must_use]
    pub fn endpoints(self, entry: &TrackedEntry, files_dir: &Path) -> (PathBuf, PathBuf) {
        let repo = entry.repo_location(files_dir);
        match self {
            Self::Install => (repo, entry.source.clone()),
            Self::Update => (entry.source.clone(), repo),
        }
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Install => "install",
            Self::Update => "update",
        })
    }
}

/// Outcome of one synchronization batch, counted per entry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries where something was (or, in dry-run, would be) written.
    pub synced: usize,
    /// Entries already identical at the destination.
    pub unchanged: usize,
    /// Entries whose source was missing or whose overwrite was declined.
    pub skipped: usize,
    /// Entries that failed.
    pub errored: usize,
    /// Backups created before overwriting.
    pub backups: Vec<BackupRecord>,
}

impl SyncReport {
    /// `true` when no entry errored.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.errored == 0
    }

    /// One-line summary, e.g. "2 synced, 5 unchanged, 1 skipped, 0 errored".
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would sync" } else { "synced" };
        let mut line = format!(
            "{} {verb}, {} unchanged, {} skipped, {} errored",
            self.synced, self.unchanged, self.skipped, self.errored
        );
        if !self.backups.is_empty() {
            line.push_str(&format!(", {} backed up", self.backups.len()));
        }
        line
    }

    fn count(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Synced => self.synced += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Errored => self.errored += 1,
        }
    }
}

/// Per-entry (and per-file) result. Ordered so that the maximum over a
/// directory's files is the directory's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Outcome {
    Unchanged,
    Skipped,
    Synced,
    Errored,
}

impl Outcome {
    const fn label(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Skipped => "skipped",
            Self::Synced => "synced",
            Self::Errored => "errored",
        }
    }
}

/// Synchronize `entries` in `direction`.
pub fn sync(ctx: &Context, direction: SyncDirection, entries: &[TrackedEntry]) -> SyncReport {
    let files_dir = ctx.files_dir();
    let mut report = SyncReport::default();

    for entry in entries {
        let (from, to) = direction.endpoints(entry, &files_dir);
        let outcome = sync_entry(ctx, &from, &to, &mut report.backups);
        ctx.log
            .debug(&format!("{}: {}", entry.source.display(), outcome.label()));
        report.count(outcome);
    }

    report
}

fn sync_entry(ctx: &Context, from: &Path, to: &Path, backups: &mut Vec<BackupRecord>) -> Outcome {
    if !from.exists() {
        ctx.log.warn(&format!(
            "skipping: {}",
            SyncError::MissingSource {
                path: from.to_path_buf()
            }
        ));
        return Outcome::Skipped;
    }

    if from.is_dir() {
        sync_dir(ctx, from, to, backups)
    } else {
        sync_file(ctx, &FileCopyResource::new(from.to_path_buf(), to.to_path_buf()), backups)
    }
}

/// Directories a walk of `from` must not descend into: the destination and
/// the tool's own directories, unless `from` already lies inside them.
fn nested_exclusions(ctx: &Context, from: &Path, to: &Path) -> Vec<PathBuf> {
    let settings = ctx.settings();
    [
        to,
        settings.root.as_path(),
        settings.backup_dir.as_path(),
        settings.cache_dir.as_path(),
    ]
    .into_iter()
    .filter(|dir| !from.starts_with(dir))
    .map(Path::to_path_buf)
    .collect()
}

/// Mirror the tree under `from` into `to`. Extra destination files are kept;
/// backup copies are neither mirrored nor overwritten.
fn sync_dir(ctx: &Context, from: &Path, to: &Path, backups: &mut Vec<BackupRecord>) -> Outcome {
    if to.exists() && !to.is_dir() {
        report_error(
            ctx,
            SyncError::TypeMismatch {
                path: to.to_path_buf(),
                expected: "directory",
                found: kind_of(to),
            },
        );
        return Outcome::Errored;
    }

    let excluded = nested_exclusions(ctx, from, to);
    let mut outcome = Outcome::Unchanged;
    for item in walk_tracked(from, &excluded) {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                let path = e.path().unwrap_or(from).to_path_buf();
                report_error(
                    ctx,
                    SyncError::Read {
                        path,
                        source: e.into(),
                    },
                );
                outcome = Outcome::Errored;
                continue;
            }
        };
        let rel = item.path().strip_prefix(from).unwrap_or(item.path());
        let dest = to.join(rel);

        let item_outcome = if item.file_type().is_dir() {
            ensure_dir(ctx, &dest)
        } else {
            sync_file(
                ctx,
                &FileCopyResource::new(item.path().to_path_buf(), dest),
                backups,
            )
        };
        outcome = outcome.max(item_outcome);
    }
    outcome
}

fn ensure_dir(ctx: &Context, dir: &Path) -> Outcome {
    if dir.is_dir() {
        return Outcome::Unchanged;
    }
    if dir.exists() {
        report_error(
            ctx,
            SyncError::TypeMismatch {
                path: dir.to_path_buf(),
                expected: "directory",
                found: kind_of(dir),
            },
        );
        return Outcome::Errored;
    }
    if ctx.dry_run {
        ctx.log
            .dry_run(&format!("would create directory {}", dir.display()));
        return Outcome::Synced;
    }
    match std::fs::create_dir_all(dir) {
        Ok(()) => Outcome::Synced,
        Err(source) => {
            report_error(
                ctx,
                SyncError::CreateParent {
                    path: dir.to_path_buf(),
                    source,
                },
            );
            Outcome::Errored
        }
    }
}

/// Check, confirm, back up, then copy a single file.
fn sync_file(ctx: &Context, file: &FileCopyResource, backups: &mut Vec<BackupRecord>) -> Outcome {
    let desc = file.description();
    let state = match file.current_state() {
        Ok(state) => state,
        Err(e) => {
            report_error(ctx, e);
            return Outcome::Errored;
        }
    };

    match state {
        ResourceState::Correct => {
            ctx.log.debug(&format!("ok: {desc}"));
            Outcome::Unchanged
        }
        ResourceState::Invalid(e) => {
            report_error(ctx, e);
            Outcome::Errored
        }
        ResourceState::Missing => {
            if ctx.dry_run {
                ctx.log.dry_run(&format!("would copy {desc}"));
                return Outcome::Synced;
            }
            apply(ctx, file)
        }
        ResourceState::Differs { detail } => {
            if ctx.dry_run {
                ctx.log.dry_run(&format!(
                    "would back up {} and copy {desc} ({detail})",
                    file.to.display()
                ));
                return Outcome::Synced;
            }
            if !ctx.force && !confirm_overwrite(ctx, &file.to) {
                ctx.log
                    .info(&format!("kept {} (overwrite declined)", file.to.display()));
                return Outcome::Skipped;
            }
            match backup_in_place(&file.to) {
                Ok(record) => {
                    ctx.log.info(&format!(
                        "backed up {} -> {}",
                        record.original.display(),
                        record.backup.display()
                    ));
                    ctx.log.record_backup(&record.backup);
                    backups.push(record);
                }
                Err(e) => {
                    report_error(ctx, e);
                    return Outcome::Errored;
                }
            }
            apply(ctx, file)
        }
    }
}

fn confirm_overwrite(ctx: &Context, path: &Path) -> bool {
    let question = format!("{} differs, overwrite?", path.display());
    match ctx.prompt.confirm(&question) {
        Ok(answer) => answer,
        Err(e) => {
            ctx.log.warn(&format!("{e:#}; treating as declined"));
            false
        }
    }
}

fn apply(ctx: &Context, file: &FileCopyResource) -> Outcome {
    match file.apply() {
        Ok(ResourceChange::Applied) => {
            ctx.log.info(&format!("copied {}", file.description()));
            Outcome::Synced
        }
        Ok(ResourceChange::AlreadyCorrect) => Outcome::Unchanged,
        Err(e) => {
            report_error(ctx, e);
            Outcome::Errored
        }
    }
}

fn report_error(ctx: &Context, err: SyncError) {
    ctx.log.error(&DotfilesError::from(err).to_string());
}
