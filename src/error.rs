//! Domain-specific error types for the dotfiles engine.
//!
//! Library modules return these typed errors; command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DotfilesError
//! ├── Config(ConfigError)  manifest, settings, required directories
//! ├── Sync(SyncError)      per-entry copy and backup failures
//! └── Backup(BackupError)  archive creation
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the dotfiles engine.
///
/// Each variant renders the category followed by the inner message. The
/// inner error is embedded, not chained, so `{:#}` shows it once.
#[derive(Error, Debug)]
pub enum DotfilesError {
    /// Setup failure: configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(ConfigError),

    /// A single tracked entry could not be synchronized.
    #[error("Sync error: {0}")]
    Sync(SyncError),

    /// An archive backup could not be created.
    #[error("Backup error: {0}")]
    Backup(BackupError),
}

impl From<ConfigError> for DotfilesError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SyncError> for DotfilesError {
    fn from(e: SyncError) -> Self {
        Self::Sync(e)
    }
}

impl From<BackupError> for DotfilesError {
    fn from(e: BackupError) -> Self {
        Self::Backup(e)
    }
}

/// Setup failures. Any of these aborts the command immediately.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A directory the command depends on does not exist.
    #[error("Required directory does not exist: {}", .path.display())]
    MissingDirectory {
        /// The missing directory.
        path: PathBuf,
    },

    /// The tracked-files manifest does not exist.
    #[error("Tracked-files manifest not found: {} (run `dotfiles init`)", .path.display())]
    MissingManifest {
        /// Expected manifest location.
        path: PathBuf,
    },

    /// A manifest line could not be parsed.
    #[error("Invalid manifest entry on line {line}: {message}")]
    InvalidEntry {
        /// 1-based line number.
        line: usize,
        /// What is wrong with the entry.
        message: String,
    },

    /// The same source path is tracked twice.
    #[error("Duplicate source on line {line}: {} is already tracked", .path.display())]
    DuplicateSource {
        /// 1-based line number of the second occurrence.
        line: usize,
        /// The duplicated source path.
        path: PathBuf,
    },

    /// The home directory could not be determined.
    #[error("Cannot determine home directory (set HOME)")]
    NoHome,

    /// The settings file exists but is not valid TOML for the settings schema.
    #[error("Invalid settings file {}: {message}", .path.display())]
    InvalidSettings {
        /// Settings file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Failures of a single tracked entry. Logged and counted; never fatal.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The copy source does not exist.
    #[error("source does not exist: {}", .path.display())]
    MissingSource {
        /// The missing source.
        path: PathBuf,
    },

    /// The parent directory of a destination could not be created.
    #[error("cannot create parent directory {}: {source}", .path.display())]
    CreateParent {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Copying a file failed.
    #[error("cannot copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        /// Copy source.
        from: PathBuf,
        /// Copy destination.
        to: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Source and destination disagree on being a file or a directory.
    #[error("{} is a {found}, expected a {expected}", .path.display())]
    TypeMismatch {
        /// Destination path.
        path: PathBuf,
        /// Kind required by the source ("file" or "directory").
        expected: &'static str,
        /// Kind found at the destination.
        found: &'static str,
    },

    /// The destination could not be backed up before overwriting.
    #[error("cannot back up {}: {source}", .path.display())]
    Backup {
        /// Destination that was to be backed up.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Reading a file or directory for comparison failed.
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Failures while building an archive backup.
#[derive(Error, Debug)]
pub enum BackupError {
    /// None of the requested paths exists or is readable.
    #[error("nothing to back up: none of the {requested} path(s) exists or is readable")]
    NoInputs {
        /// Number of paths that were requested.
        requested: usize,
    },

    /// An I/O error while copying into the archive directory.
    #[error("backup I/O error at {}: {source}", .path.display())]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The archive directory could not be compressed.
    #[error("cannot compress {}: {reason}", .path.display())]
    Compress {
        /// Directory that was being compressed.
        path: PathBuf,
        /// Failure description.
        reason: String,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn missing_manifest_mentions_init() {
        let e = ConfigError::MissingManifest {
            path: PathBuf::from("/repo/conf/tracked-files"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/repo/conf/tracked-files"));
        assert!(msg.contains("dotfiles init"));
    }

    #[test]
    fn invalid_entry_display() {
        let e = ConfigError::InvalidEntry {
            line: 7,
            message: "repository path must be relative".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Invalid manifest entry on line 7: repository path must be relative"
        );
    }

    #[test]
    fn duplicate_source_display() {
        let e = ConfigError::DuplicateSource {
            line: 3,
            path: PathBuf::from("/home/u/.bashrc"),
        };
        assert_eq!(
            e.to_string(),
            "Duplicate source on line 3: /home/u/.bashrc is already tracked"
        );
    }

    #[test]
    fn config_io_has_source() {
        use std::error::Error as StdError;
        let e = ConfigError::Io {
            path: PathBuf::from("/repo/conf/tracked-files"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.source().is_some());
    }

    #[test]
    fn type_mismatch_display() {
        let e = SyncError::TypeMismatch {
            path: PathBuf::from("/home/u/.config/nvim"),
            expected: "directory",
            found: "file",
        };
        assert_eq!(
            e.to_string(),
            "/home/u/.config/nvim is a file, expected a directory"
        );
    }

    #[test]
    fn copy_error_names_both_paths() {
        let e = SyncError::Copy {
            from: PathBuf::from("/a"),
            to: PathBuf::from("/b"),
            source: io::Error::other("disk full"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/a"));
        assert!(msg.contains("/b"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn no_inputs_display() {
        let e = BackupError::NoInputs { requested: 2 };
        assert_eq!(
            e.to_string(),
            "nothing to back up: none of the 2 path(s) exists or is readable"
        );
    }

    #[test]
    fn dotfiles_error_wraps_each_category() {
        let e: DotfilesError = ConfigError::NoHome.into();
        assert!(e.to_string().starts_with("Configuration error"));
        let e: DotfilesError = SyncError::MissingSource {
            path: PathBuf::from("/x"),
        }
        .into();
        assert!(e.to_string().starts_with("Sync error"));
        let e: DotfilesError = BackupError::NoInputs { requested: 0 }.into();
        assert!(e.to_string().starts_with("Backup error"));
    }

    #[test]
    fn wrapped_message_appears_once_in_the_chain() {
        let e = anyhow::Error::from(DotfilesError::from(BackupError::NoInputs { requested: 1 }));
        assert_eq!(
            format!("{e:#}"),
            "Backup error: nothing to back up: none of the 1 path(s) exists or is readable"
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<DotfilesError>();
        assert_send_sync::<ConfigError>();
        assert_send_sync::<SyncError>();
        assert_send_sync::<BackupError>();
    }

    #[test]
    fn errors_convert_to_anyhow() {
        let _a: anyhow::Error = ConfigError::NoHome.into();
        let _b: anyhow::Error = BackupError::NoInputs { requested: 1 }.into();
    }
}
