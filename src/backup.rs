//! Backups: in-place `.bak` copies and timestamped archive directories.
//!
//! An archive lives at `<backup_dir>/<kind>/<YYYYmmdd-HHMMSS>[-N]/`. Paths
//! under home keep their home-relative layout inside it; other absolute paths
//! keep their full path minus the root (`/etc/hosts` → `<archive>/etc/hosts`).
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{BackupError, SyncError};
use crate::resources::helpers::fs::walk_tracked;
use crate::tasks::Context;

/// Archive timestamp layout.
const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Which operation an archive belongs to; the `<type>` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupKind {
    /// Requested by `dotfiles backup`.
    Manual,
    /// Snapshot of home copies before `install`.
    Install,
    /// Snapshot of repository copies before `update`.
    Update,
}

impl BackupKind {
    /// Directory name under the backup root.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Install => "install",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for BackupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A copy made immediately before an overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    /// The file that was about to be overwritten.
    pub original: PathBuf,
    /// Where its previous content was saved.
    pub backup: PathBuf,
    /// Unix seconds at backup time.
    pub timestamp: i64,
}

/// Copy `path` to `<path>.bak.<unix seconds>`, never replacing an existing
/// backup (`.1`, `.2`, ... are appended on collision).
///
/// # Errors
///
/// Returns [`SyncError::Backup`] if the copy fails.
pub fn backup_in_place(path: &Path) -> Result<BackupRecord, SyncError> {
    let timestamp = chrono::Utc::now().timestamp();
    let backup = free_backup_path(path, timestamp).map_err(|source| SyncError::Backup {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::copy(path, &backup).map_err(|source| SyncError::Backup {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BackupRecord {
        original: path.to_path_buf(),
        backup,
        timestamp,
    })
}

fn free_backup_path(path: &Path, timestamp: i64) -> io::Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?
        .to_string_lossy();
    let base = format!("{name}.bak.{timestamp}");
    let mut candidate = path.with_file_name(&base);
    let mut n = 0u32;
    while candidate.symlink_metadata().is_ok() {
        n += 1;
        candidate = path.with_file_name(format!("{base}.{n}"));
    }
    Ok(candidate)
}

/// Copy every existing, readable path in `paths` into a fresh archive
/// directory under `<backup_dir>/<kind>/`, optionally compressing it.
///
/// Returns the archive directory, or the `.tar.gz` file when compressed. In
/// dry-run mode nothing is written and the planned directory is returned.
///
/// # Errors
///
/// Returns [`BackupError::NoInputs`] if no path can be archived,
/// [`BackupError::Io`] if copying fails, and [`BackupError::Compress`] if
/// `tar` fails.
pub fn backup(
    ctx: &Context,
    kind: BackupKind,
    paths: &[PathBuf],
    compress: bool,
) -> Result<PathBuf, BackupError> {
    let inputs: Vec<&PathBuf> = paths
        .iter()
        .filter(|p| {
            let ok = is_readable(p);
            if !ok {
                ctx.log
                    .debug(&format!("not archiving {}: missing or unreadable", p.display()));
            }
            ok
        })
        .collect();
    if inputs.is_empty() {
        return Err(BackupError::NoInputs {
            requested: paths.len(),
        });
    }

    let base = ctx.settings().backup_dir.join(kind.as_str());
    let stamp = chrono::Local::now().format(STAMP_FORMAT).to_string();

    if ctx.dry_run {
        let planned = base.join(&stamp);
        ctx.log.dry_run(&format!(
            "would archive {} path(s) into {}",
            inputs.len(),
            planned.display()
        ));
        return Ok(planned);
    }

    let dir = fresh_archive_dir(&base, &stamp)?;
    if let Err(e) = copy_inputs(ctx, &inputs, &dir) {
        if let Err(cleanup) = std::fs::remove_dir_all(&dir) {
            ctx.log.warn(&format!(
                "cannot remove partial archive {}: {cleanup}",
                dir.display()
            ));
        }
        return Err(e);
    }
    ctx.log.info(&format!(
        "archived {} path(s) into {}",
        inputs.len(),
        dir.display()
    ));

    if compress {
        return compress_archive(ctx, &dir);
    }
    Ok(dir)
}

/// Copy each input into `dir`. Walks never enter the backup tree, so an
/// input containing it is not archived into itself.
fn copy_inputs(ctx: &Context, inputs: &[&PathBuf], dir: &Path) -> Result<(), BackupError> {
    let backup_dir = ctx.settings().backup_dir.as_path();
    for input in inputs {
        let excluded: Vec<PathBuf> = [dir, backup_dir]
            .into_iter()
            .filter(|d| !input.starts_with(d))
            .map(Path::to_path_buf)
            .collect();
        let target = dir.join(archive_relative(input, ctx.home()));
        copy_into_archive(input, &target, &excluded)?;
        ctx.log
            .debug(&format!("archived {} -> {}", input.display(), target.display()));
    }
    Ok(())
}

/// Whether `path` exists and can be opened for reading.
fn is_readable(path: &Path) -> bool {
    if path.is_dir() {
        std::fs::read_dir(path).is_ok()
    } else if path.is_file() {
        File::open(path).is_ok()
    } else {
        false
    }
}

/// Location of `path` inside an archive.
#[must_use]
pub fn archive_relative(path: &Path, home: &Path) -> PathBuf {
    let rel: PathBuf = match path.strip_prefix(home) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => path
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect(),
    };
    if rel.as_os_str().is_empty() {
        path.file_name()
            .map_or_else(|| PathBuf::from("root"), PathBuf::from)
    } else {
        rel
    }
}

/// Create `<base>/<stamp>`, or `<base>/<stamp>-N` if that name is taken by a
/// directory or a compressed archive.
fn fresh_archive_dir(base: &Path, stamp: &str) -> Result<PathBuf, BackupError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| BackupError::Io { path, source }
    };
    std::fs::create_dir_all(base).map_err(io_err(base))?;

    let mut n = 0u32;
    loop {
        let name = if n == 0 {
            stamp.to_string()
        } else {
            format!("{stamp}-{n}")
        };
        let candidate = base.join(&name);
        n += 1;
        if base.join(format!("{name}.tar.gz")).exists() {
            continue;
        }
        match std::fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(io_err(&candidate)(e)),
        }
    }
}

/// Copy a file, or a directory tree with symlinks followed, to `target`.
/// Backup copies and anything under `excluded` are left out of trees.
fn copy_into_archive(
    source: &Path,
    target: &Path,
    excluded: &[PathBuf],
) -> Result<(), BackupError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| BackupError::Io { path, source }
    };

    if source.is_file() {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
        std::fs::copy(source, target).map_err(io_err(source))?;
        return Ok(());
    }

    for entry in walk_tracked(source, excluded) {
        let entry = entry.map_err(|e| BackupError::Io {
            path: e.path().unwrap_or(source).to_path_buf(),
            source: e.into(),
        })?;
        let rel = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let dest = target.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest).map_err(io_err(&dest))?;
        } else if entry.file_type().is_file() {
            std::fs::copy(entry.path(), &dest).map_err(io_err(entry.path()))?;
        }
    }
    Ok(())
}

/// Replace `dir` with `<dir>.tar.gz`. Keeps the directory when `tar` is
/// unavailable.
fn compress_archive(ctx: &Context, dir: &Path) -> Result<PathBuf, BackupError> {
    if !ctx.executor.which("tar") {
        ctx.log
            .warn("tar not found on PATH, keeping uncompressed backup directory");
        return Ok(dir.to_path_buf());
    }

    let compress_err = |reason: String| BackupError::Compress {
        path: dir.to_path_buf(),
        reason,
    };
    let (Some(parent), Some(name)) = (dir.parent(), dir.file_name()) else {
        return Err(compress_err("archive directory has no parent".to_string()));
    };
    let name = name.to_string_lossy();
    let archive = parent.join(format!("{name}.tar.gz"));
    let archive_arg = archive.to_string_lossy();
    let parent_arg = parent.to_string_lossy();

    ctx.executor
        .run("tar", &["-czf", &*archive_arg, "-C", &*parent_arg, &*name])
        .map_err(|e| compress_err(format!("{e:#}")))?;

    std::fs::remove_dir_all(dir).map_err(|source| BackupError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    ctx.log
        .info(&format!("compressed backup to {}", archive.display()));
    Ok(archive)
}
