//! Tracked-files manifest: the path registry.
//!
//! One `source:repo_path` pair per line. The source is a path in the home
//! directory (or anywhere on the system); the repository path is relative to
//! the repository's `files/` directory.
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::error::ConfigError;

/// Template written by `dotfiles init` when no manifest exists yet.
pub const TEMPLATE: &str = "\
# Tracked files: one `source:repository-path` pair per line.
#
# The source is a file or directory on this machine; `~` expands to $HOME.
# The repository path is relative to the `files/` directory of the
# dotfiles repository. When it is omitted, it is derived from the source
# (`~/.bashrc` is stored as `bashrc`, `~/.config/nvim` as `config/nvim`).
#
# ~/.bashrc:shell/bashrc
# ~/.config/nvim
# /etc/pacman.conf:system/pacman.conf
";

/// A (source, repository path) pair managed by the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEntry {
    /// Absolute path of the live copy (home or system).
    pub source: PathBuf,
    /// Path relative to the repository's `files/` directory.
    pub repo_path: PathBuf,
}

impl TrackedEntry {
    /// Location of the repository copy under `files_dir`.
    #[must_use]
    pub fn repo_location(&self, files_dir: &Path) -> PathBuf {
        files_dir.join(&self.repo_path)
    }

    /// `true` if `pattern` occurs in the source or the repository path.
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        self.source.to_string_lossy().contains(pattern)
            || self.repo_path.to_string_lossy().contains(pattern)
    }
}

/// Load and parse the manifest at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingManifest`] if the file does not exist,
/// [`ConfigError::Io`] if it cannot be read, and the errors of [`parse`].
pub fn load(path: &Path, home: &Path) -> Result<Vec<TrackedEntry>, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::MissingManifest {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content, home)
}

/// Parse manifest text.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEntry`] for a malformed line and
/// [`ConfigError::DuplicateSource`] when a source is listed twice.
pub fn parse(content: &str, home: &Path) -> Result<Vec<TrackedEntry>, ConfigError> {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let entry = parse_line(line, home).map_err(|message| ConfigError::InvalidEntry {
            line: line_no,
            message,
        })?;

        if !seen.insert(entry.source.clone()) {
            return Err(ConfigError::DuplicateSource {
                line: line_no,
                path: entry.source,
            });
        }
        entries.push(entry);
    }

    Ok(entries)
}

fn parse_line(line: &str, home: &Path) -> Result<TrackedEntry, String> {
    let (raw_source, raw_repo) = match line.rsplit_once(':') {
        Some((source, repo)) => (source.trim(), Some(repo.trim())),
        None => (line, None),
    };

    if raw_source.is_empty() {
        return Err("empty source path".to_string());
    }
    let source = expand_home(raw_source, home);
    if !source.is_absolute() {
        return Err(format!(
            "source must be absolute or start with ~: {raw_source}"
        ));
    }

    let repo_path = match raw_repo {
        Some(repo) => normalize_repo_path(repo)?,
        None => derive_repo_path(&source, home)?,
    };

    Ok(TrackedEntry { source, repo_path })
}

/// Expand a leading `~` or `$HOME` to `home`.
pub(crate) fn expand_home(raw: &str, home: &Path) -> PathBuf {
    for prefix in ["~", "$HOME"] {
        if raw == prefix {
            return home.to_path_buf();
        }
        if let Some(rest) = raw
            .strip_prefix(prefix)
            .and_then(|r| r.strip_prefix('/'))
        {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

/// Validate an explicit repository path: relative, non-empty, no `..`.
fn normalize_repo_path(raw: &str) -> Result<PathBuf, String> {
    if raw.is_empty() {
        return Err("empty repository path".to_string());
    }
    let path = Path::new(raw);
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(format!("repository path must not contain '..': {raw}"));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(format!("repository path must be relative: {raw}"));
            }
        }
    }
    if out.as_os_str().is_empty() {
        return Err(format!("empty repository path: {raw}"));
    }
    Ok(out)
}

/// Derive the repository path of a home source: the path relative to home
/// with the leading dot of its first component removed.
fn derive_repo_path(source: &Path, home: &Path) -> Result<PathBuf, String> {
    let rel = source.strip_prefix(home).map_err(|_| {
        format!(
            "repository path is required for sources outside home: {}",
            source.display()
        )
    })?;

    let mut components = rel.components();
    let Some(Component::Normal(first)) = components.next() else {
        return Err("cannot track the home directory itself".to_string());
    };
    let first = first.to_string_lossy();
    let name = first.strip_prefix('.').unwrap_or(&*first);
    if name.is_empty() {
        return Err(format!("cannot derive repository path for {}", source.display()));
    }

    let mut out = PathBuf::from(name);
    out.push(components.as_path());
    normalize_repo_path(&out.to_string_lossy())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn home() -> PathBuf {
        PathBuf::from("/home/user")
    }

    #[test]
    fn parses_explicit_pairs() {
        let entries = parse(
            "~/.bashrc:shell/bashrc\n/etc/pacman.conf:system/pacman.conf\n",
            &home(),
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].source, PathBuf::from("/home/user/.bashrc"));
        assert_eq!(entries[0].repo_path, PathBuf::from("shell/bashrc"));
        assert_eq!(entries[1].source, PathBuf::from("/etc/pacman.conf"));
        assert_eq!(entries[1].repo_path, PathBuf::from("system/pacman.conf"));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let entries = parse("# header\n\n   \n  ~/.vimrc:vimrc  \n", &home()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].repo_path, PathBuf::from("vimrc"));
    }

    #[test]
    fn template_parses_to_nothing() {
        assert!(parse(TEMPLATE, &home()).unwrap().is_empty());
    }

    #[test]
    fn expands_dollar_home() {
        let entries = parse("$HOME/.zshrc:zshrc\n", &home()).unwrap();
        assert_eq!(entries[0].source, PathBuf::from("/home/user/.zshrc"));
    }

    #[test]
    fn derives_repo_path_from_home_source() {
        let entries = parse("~/.gitconfig\n~/.config/nvim\n", &home()).unwrap();
        assert_eq!(entries[0].repo_path, PathBuf::from("gitconfig"));
        assert_eq!(entries[1].repo_path, PathBuf::from("config/nvim"));
    }

    #[test]
    fn derive_requires_home_source() {
        let err = parse("/etc/hosts\n", &home()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEntry { line: 1, .. }));
        assert!(err.to_string().contains("outside home"));
    }

    #[test]
    fn rejects_relative_source() {
        let err = parse("bashrc:bashrc\n", &home()).unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn rejects_absolute_repo_path() {
        let err = parse("~/.bashrc:/bashrc\n", &home()).unwrap_err();
        assert!(err.to_string().contains("relative"));
    }

    #[test]
    fn rejects_parent_components() {
        let err = parse("# c\n~/.bashrc:../escape\n", &home()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEntry { line: 2, .. }));
    }

    #[test]
    fn rejects_empty_repo_path() {
        let err = parse("~/.bashrc:\n", &home()).unwrap_err();
        assert!(err.to_string().contains("empty repository path"));
    }

    #[test]
    fn rejects_duplicate_source() {
        let err = parse("~/.bashrc:a\n~/.bashrc:b\n", &home()).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSource { line: 2, .. }));
    }

    #[test]
    fn strips_current_dir_components() {
        let entries = parse("~/.bashrc:./shell/./bashrc\n", &home()).unwrap();
        assert_eq!(entries[0].repo_path, PathBuf::from("shell/bashrc"));
    }

    #[test]
    fn load_missing_file_is_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("tracked-files"), &home()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingManifest { .. }));
    }

    #[test]
    fn entry_matches_source_or_repo_path() {
        let entry = TrackedEntry {
            source: PathBuf::from("/home/user/.config/nvim"),
            repo_path: PathBuf::from("editor/nvim"),
        };
        assert!(entry.matches("nvim"));
        assert!(entry.matches("editor"));
        assert!(!entry.matches("zsh"));
    }
}
