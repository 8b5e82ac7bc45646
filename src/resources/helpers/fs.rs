//! File-system resource helpers.
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::SyncError;

const CHUNK: usize = 8 * 1024;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns [`SyncError::CreateParent`] if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SyncError::CreateParent {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Copy the file `from` over `to`.
///
/// # Errors
///
/// Returns [`SyncError::Copy`] if the copy fails.
pub fn copy_file(from: &Path, to: &Path) -> Result<(), SyncError> {
    std::fs::copy(from, to)
        .map(|_| ())
        .map_err(|source| SyncError::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        })
}

/// Byte-compare two files. Sizes are checked first.
///
/// # Errors
///
/// Returns [`SyncError::Read`] if either file cannot be read.
pub fn files_identical(a: &Path, b: &Path) -> Result<bool, SyncError> {
    let read_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| SyncError::Read { path, source }
    };

    let len_a = std::fs::metadata(a).map_err(read_err(a))?.len();
    let len_b = std::fs::metadata(b).map_err(read_err(b))?.len();
    if len_a != len_b {
        return Ok(false);
    }

    let mut ra = BufReader::new(File::open(a).map_err(read_err(a))?);
    let mut rb = BufReader::new(File::open(b).map_err(read_err(b))?);
    let mut buf_a = [0u8; CHUNK];
    let mut buf_b = [0u8; CHUNK];
    loop {
        let n = read_full(&mut ra, &mut buf_a).map_err(read_err(a))?;
        let m = read_full(&mut rb, &mut buf_b).map_err(read_err(b))?;
        if n != m || buf_a.get(..n) != buf_b.get(..m) {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

/// Fill `buf` as far as possible; returns fewer bytes only at end of file.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let Some(rest) = buf.get_mut(filled..) else {
            break;
        };
        match reader.read(rest) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Compare two directory trees: the same relative file set with identical
/// content. Empty subdirectories are ignored.
///
/// # Errors
///
/// Returns [`SyncError::Read`] if either tree cannot be walked or read.
pub fn trees_identical(a: &Path, b: &Path) -> Result<bool, SyncError> {
    let files_a = relative_files(a)?;
    if files_a != relative_files(b)? {
        return Ok(false);
    }
    for rel in &files_a {
        if !files_identical(&a.join(rel), &b.join(rel))? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn relative_files(root: &Path) -> Result<BTreeSet<PathBuf>, SyncError> {
    let mut out = BTreeSet::new();
    for entry in walk_tracked(root, &[]) {
        let entry = entry.map_err(|e| SyncError::Read {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e.into(),
        })?;
        if entry.file_type().is_file()
            && let Ok(rel) = entry.path().strip_prefix(root)
        {
            out.insert(rel.to_path_buf());
        }
    }
    Ok(out)
}

/// Whether `path` is named like a copy written before an overwrite:
/// `<name>.bak.<unix seconds>` or `<name>.bak.<unix seconds>.<n>`.
#[must_use]
pub fn is_backup_copy(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let Some((stem, tail)) = name.rsplit_once(".bak.") else {
        return false;
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    !stem.is_empty()
        && match tail.split_once('.') {
            Some((stamp, n)) => digits(stamp) && digits(n),
            None => digits(tail),
        }
}

/// Walk `root` with symlinks followed, leaving out backup copies and
/// everything under the `excluded` directories.
///
/// `root` itself is always yielded. Walk errors, including symlink loops,
/// are passed through.
pub fn walk_tracked<'a>(
    root: &Path,
    excluded: &'a [PathBuf],
) -> impl Iterator<Item = walkdir::Result<DirEntry>> + use<'a> {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(move |entry| {
            entry.depth() == 0
                || !(is_backup_copy(entry.path())
                    || excluded.iter().any(|dir| entry.path().starts_with(dir)))
        })
}

/// "directory", "file" or "special file", following symlinks.
#[must_use]
pub fn kind_of(path: &Path) -> &'static str {
    if path.is_dir() {
        "directory"
    } else if path.is_file() {
        "file"
    } else {
        "special file"
    }
}
