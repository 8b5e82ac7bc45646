//! Startup settings: directories and defaults resolved once from the command
//! line, the environment, and the optional `conf/settings.toml`.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::manifest::expand_home;
use super::toml_loader;
use crate::cli::GlobalOpts;
use crate::error::ConfigError;

/// Manifest file name inside `conf/`.
pub const MANIFEST_FILE: &str = "tracked-files";

/// Settings file name inside `conf/`.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Resolved directories and defaults for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root of the dotfiles repository (`DOTFILES_DIR`).
    pub root: PathBuf,
    /// Home directory used for `~` expansion and archive layout.
    pub home: PathBuf,
    /// Root of the backups tree (`BACKUP_DIR`).
    pub backup_dir: PathBuf,
    /// Directory for log files (`CACHE_DIR`).
    pub cache_dir: PathBuf,
    /// Whether `backup` compresses archives by default.
    pub compress: bool,
}

/// Contents of `conf/settings.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    backup_dir: Option<String>,
    compress: Option<bool>,
}

impl Settings {
    /// Build settings with the default layout under `root`.
    #[must_use]
    pub fn with_defaults(root: PathBuf, home: PathBuf) -> Self {
        Self {
            backup_dir: root.join("backups"),
            cache_dir: default_cache_dir(&home),
            root,
            home,
            compress: false,
        }
    }

    /// Resolve settings for this run.
    ///
    /// Precedence per value: command-line flag, then environment variable
    /// (both handled by clap), then `conf/settings.toml`, then the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHome`] if the home directory is unknown and
    /// the errors of [`toml_loader::load_config`] for a malformed settings file.
    pub fn resolve(global: &GlobalOpts) -> Result<Self, ConfigError> {
        let home = home_dir()?;
        let root = global
            .root
            .clone()
            .unwrap_or_else(|| home.join(".dotfiles"));
        Self::resolve_with(
            root,
            home,
            global.backup_dir.clone(),
            global.cache_dir.clone(),
        )
    }

    /// Resolve settings from explicit values, reading `conf/settings.toml`
    /// under `root` for anything not given.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but is invalid.
    pub fn resolve_with(
        root: PathBuf,
        home: PathBuf,
        backup_dir: Option<PathBuf>,
        cache_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let file: SettingsFile =
            toml_loader::load_config(&root.join("conf").join(SETTINGS_FILE))?;

        let mut settings = Self::with_defaults(root, home);
        if let Some(dir) = file.backup_dir {
            let dir = expand_home(&dir, &settings.home);
            settings.backup_dir = if dir.is_absolute() {
                dir
            } else {
                settings.root.join(dir)
            };
        }
        if let Some(compress) = file.compress {
            settings.compress = compress;
        }
        if let Some(dir) = backup_dir {
            settings.backup_dir = dir;
        }
        if let Some(dir) = cache_dir {
            settings.cache_dir = dir;
        }
        Ok(settings)
    }

    /// The repository's `files/` directory.
    #[must_use]
    pub fn files_dir(&self) -> PathBuf {
        self.root.join("files")
    }

    /// The repository's `conf/` directory.
    #[must_use]
    pub fn conf_dir(&self) -> PathBuf {
        self.root.join("conf")
    }

    /// Location of the tracked-files manifest.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.conf_dir().join(MANIFEST_FILE)
    }
}

/// The user's home directory: `dirs::home_dir()`, else `$HOME`.
fn home_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
        .ok_or(ConfigError::NoHome)
}

/// `$XDG_CACHE_HOME/dotfiles`, else `<home>/.cache/dotfiles`.
fn default_cache_dir(home: &Path) -> PathBuf {
    std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map_or_else(|| home.join(".cache"), PathBuf::from)
        .join("dotfiles")
}
