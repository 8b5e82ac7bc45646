//! Command: create the repository layout.
use std::path::Path;

use anyhow::{Context as _, Result, bail};

use crate::cli::GlobalOpts;
use crate::config::Settings;
use crate::config::manifest::TEMPLATE;
use crate::logging::Logger;

/// Run the init command.
///
/// Creates the dotfiles root, `files/`, `conf/`, the backup directory and the
/// cache directory, then writes a template manifest unless one exists.
///
/// # Errors
///
/// Returns an error if a directory or the manifest cannot be created, or if a
/// required directory path is occupied by a file.
pub fn run(global: &GlobalOpts, settings: &Settings, log: &Logger) -> Result<()> {
    log.stage("Initializing repository");

    let dirs = [
        settings.root.clone(),
        settings.files_dir(),
        settings.conf_dir(),
        settings.backup_dir.clone(),
        settings.cache_dir.clone(),
    ];
    for dir in &dirs {
        create_dir(dir, global.dry_run, log)?;
    }

    let manifest = settings.manifest_path();
    if manifest.exists() {
        log.info(&format!("keeping existing manifest {}", manifest.display()));
    } else if global.dry_run {
        log.dry_run(&format!("would write manifest template {}", manifest.display()));
    } else {
        std::fs::write(&manifest, TEMPLATE)
            .with_context(|| format!("writing {}", manifest.display()))?;
        log.info(&format!("wrote manifest template {}", manifest.display()));
    }
    Ok(())
}

fn create_dir(dir: &Path, dry_run: bool, log: &Logger) -> Result<()> {
    if dir.is_dir() {
        log.debug(&format!("exists: {}", dir.display()));
        return Ok(());
    }
    if dir.exists() {
        bail!("{} exists and is not a directory", dir.display());
    }
    if dry_run {
        log.dry_run(&format!("would create {}", dir.display()));
        return Ok(());
    }
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    log.info(&format!("created {}", dir.display()));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn settings(tmp: &Path) -> Settings {
        let mut settings = Settings::with_defaults(tmp.join("dotfiles"), tmp.join("home"));
        settings.cache_dir = tmp.join("cache");
        settings
    }

    #[test]
    fn creates_layout_and_template() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path());
        let log = Logger::new("test", tmp.path());
        run(&GlobalOpts::default(), &settings, &log).unwrap();

        for dir in [
            settings.files_dir(),
            settings.conf_dir(),
            settings.backup_dir.clone(),
            settings.cache_dir.clone(),
        ] {
            assert!(dir.is_dir(), "{} missing", dir.display());
        }
        assert_eq!(
            std::fs::read_to_string(settings.manifest_path()).unwrap(),
            TEMPLATE
        );
    }

    #[test]
    fn never_overwrites_existing_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path());
        std::fs::create_dir_all(settings.conf_dir()).unwrap();
        std::fs::write(settings.manifest_path(), "~/.bashrc\n").unwrap();
        let log = Logger::new("test", tmp.path());
        run(&GlobalOpts::default(), &settings, &log).unwrap();
        assert_eq!(
            std::fs::read_to_string(settings.manifest_path()).unwrap(),
            "~/.bashrc\n"
        );
    }

    #[test]
    fn dry_run_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path());
        let log = Logger::new("test", tmp.path());
        let global = GlobalOpts {
            dry_run: true,
            ..GlobalOpts::default()
        };
        run(&global, &settings, &log).unwrap();
        assert!(!settings.root.exists());
    }

    #[test]
    fn file_in_place_of_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path());
        std::fs::write(&settings.root, "").unwrap();
        let log = Logger::new("test", tmp.path());
        let err = run(&GlobalOpts::default(), &settings, &log).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }
}
