//! Configuration: startup settings plus the tracked-files registry.
pub mod manifest;
pub mod settings;
pub mod toml_loader;
pub mod validation;

use std::path::Path;

pub use manifest::TrackedEntry;
pub use settings::Settings;

use crate::error::ConfigError;

/// All loaded configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Resolved directories and defaults.
    pub settings: Settings,
    /// Every tracked entry, in manifest order.
    pub entries: Vec<TrackedEntry>,
}

impl Config {
    /// Load the manifest for `settings` after checking that the repository
    /// layout exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDirectory`] if the dotfiles root or its
    /// `files/` directory is absent, and the errors of [`manifest::load`].
    pub fn load(settings: Settings) -> Result<Self, ConfigError> {
        require_dir(&settings.root)?;
        require_dir(&settings.files_dir())?;
        let entries = manifest::load(&settings.manifest_path(), &settings.home)?;
        Ok(Self { settings, entries })
    }

    /// Entries matching any of `patterns`; all entries when `patterns` is empty.
    #[must_use]
    pub fn select(&self, patterns: &[String]) -> Vec<TrackedEntry> {
        if patterns.is_empty() {
            return self.entries.clone();
        }
        self.entries
            .iter()
            .filter(|e| patterns.iter().any(|p| e.matches(p)))
            .cloned()
            .collect()
    }

    /// Run every validator over the loaded entries.
    #[must_use]
    pub fn validate(&self) -> Vec<validation::ValidationWarning> {
        validation::validate_all(self)
    }
}

fn require_dir(path: &Path) -> Result<(), ConfigError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ConfigError::MissingDirectory {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn layout(manifest: Option<&str>) -> (tempfile::TempDir, Settings) {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("dotfiles");
        std::fs::create_dir_all(root.join("files")).unwrap();
        std::fs::create_dir_all(root.join("conf")).unwrap();
        if let Some(content) = manifest {
            std::fs::write(root.join("conf/tracked-files"), content).unwrap();
        }
        let settings = Settings::with_defaults(root, tmp.path().join("home"));
        (tmp, settings)
    }

    #[test]
    fn load_reads_manifest() {
        let (_tmp, settings) = layout(Some("~/.bashrc:bashrc\n"));
        let config = Config::load(settings).unwrap();
        assert_eq!(config.entries.len(), 1);
        assert_eq!(config.entries[0].repo_path, PathBuf::from("bashrc"));
    }

    #[test]
    fn load_fails_without_root() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings::with_defaults(tmp.path().join("absent"), tmp.path().to_path_buf());
        let err = Config::load(settings).unwrap_err();
        assert!(matches!(err, ConfigError::MissingDirectory { .. }));
    }

    #[test]
    fn load_fails_without_files_dir() {
        let (_tmp, settings) = layout(Some(""));
        std::fs::remove_dir(settings.files_dir()).unwrap();
        let err = Config::load(settings).unwrap_err();
        assert!(matches!(err, ConfigError::MissingDirectory { path } if path.ends_with("files")));
    }

    #[test]
    fn load_fails_without_manifest() {
        let (_tmp, settings) = layout(None);
        let err = Config::load(settings).unwrap_err();
        assert!(matches!(err, ConfigError::MissingManifest { .. }));
    }

    #[test]
    fn select_filters_by_pattern() {
        let (_tmp, settings) = layout(Some("~/.bashrc:shell/bashrc\n~/.vimrc:vim/vimrc\n"));
        let config = Config::load(settings).unwrap();
        assert_eq!(config.select(&[]).len(), 2);
        let picked = config.select(&["vim".to_string()]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].repo_path, PathBuf::from("vim/vimrc"));
        assert!(config.select(&["zsh".to_string()]).is_empty());
    }
}
