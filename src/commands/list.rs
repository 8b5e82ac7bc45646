//! Command: show every tracked entry and whether its two copies agree.
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::load_config;
use crate::config::{Settings, TrackedEntry};
use crate::error::SyncError;
use crate::logging::Logger;
use crate::resources::helpers::fs::{files_identical, trees_identical};

/// Comparison of the system copy and the repository copy of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Both copies exist with identical content.
    InSync,
    /// Both copies exist and differ.
    Differs,
    /// Only the repository copy exists.
    NotInstalled,
    /// Only the system copy exists.
    NotInRepo,
    /// Neither copy exists.
    Missing,
}

impl EntryStatus {
    /// Column label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InSync => "in sync",
            Self::Differs => "differs",
            Self::NotInstalled => "not installed",
            Self::NotInRepo => "not in repo",
            Self::Missing => "missing",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare the two copies of `entry`.
///
/// A file on one side and a directory on the other differ.
///
/// # Errors
///
/// Returns [`SyncError::Read`] if either copy cannot be read.
pub fn status(entry: &TrackedEntry, files_dir: &Path) -> Result<EntryStatus, SyncError> {
    let system = &entry.source;
    let repo = entry.repo_location(files_dir);
    Ok(match (system.exists(), repo.exists()) {
        (false, false) => EntryStatus::Missing,
        (false, true) => EntryStatus::NotInstalled,
        (true, false) => EntryStatus::NotInRepo,
        (true, true) => {
            let same = if system.is_dir() && repo.is_dir() {
                trees_identical(system, &repo)?
            } else if system.is_file() && repo.is_file() {
                files_identical(system, &repo)?
            } else {
                false
            };
            if same {
                EntryStatus::InSync
            } else {
                EntryStatus::Differs
            }
        }
    })
}

/// Render one aligned line per entry: status, system path, repository path.
#[must_use]
pub fn render(rows: &[(&TrackedEntry, EntryStatus)], home: &Path) -> String {
    let sources: Vec<String> = rows
        .iter()
        .map(|(entry, _)| tilde(&entry.source, home))
        .collect();
    let width = sources.iter().map(String::len).max().unwrap_or(0);
    rows.iter()
        .zip(&sources)
        .map(|((entry, status), source)| {
            format!(
                "{:<13}  {source:<width$}  {}",
                status.as_str(),
                entry.repo_path.display()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn tilde(path: &Path, home: &Path) -> String {
    path.strip_prefix(home).map_or_else(
        |_| path.display().to_string(),
        |rel| PathBuf::from("~").join(rel).display().to_string(),
    )
}

/// Run the list command.
///
/// # Errors
///
/// Returns an error if configuration loading fails.
#[allow(clippy::print_stdout)]
pub fn run(settings: Settings, log: &Logger) -> Result<()> {
    let config = load_config(settings, log)?;
    let files_dir = config.settings.files_dir();

    let rows: Vec<(&TrackedEntry, EntryStatus)> = config
        .entries
        .iter()
        .map(|entry| {
            let state = status(entry, &files_dir).unwrap_or_else(|e| {
                log.warn(&format!("{e}"));
                EntryStatus::Differs
            });
            (entry, state)
        })
        .collect();

    if rows.is_empty() {
        log.info("no tracked entries");
        return Ok(());
    }
    println!("{}", render(&rows, &config.settings.home));

    let in_sync = rows
        .iter()
        .filter(|(_, s)| *s == EntryStatus::InSync)
        .count();
    log.info(&format!("{in_sync} of {} entries in sync", rows.len()));
    Ok(())
}
