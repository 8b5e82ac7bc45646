// Shared helpers for integration tests.
//
// Provides a temporary home directory plus dotfiles repository and a fluent
// builder so each integration test can set up an isolated environment without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dotfiles_sync::cli::GlobalOpts;
use dotfiles_sync::config::{Config, Settings};
use dotfiles_sync::logging::{Log, Logger};
use dotfiles_sync::prompt::FixedAnswer;
use dotfiles_sync::tasks::Context;

/// An isolated home directory and repository backed by a
/// [`tempfile::TempDir`], deleted when dropped.
pub struct TestRepo {
    /// Temporary directory holding `home/`, `dotfiles/` and `cache/`.
    pub tmp: tempfile::TempDir,
    /// Settings pointing into `tmp`.
    pub settings: Settings,
    manifest: Vec<String>,
}

impl TestRepo {
    /// Create an empty home and a repository with `files/` and `conf/`.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let mut settings =
            Settings::with_defaults(tmp.path().join("dotfiles"), tmp.path().join("home"));
        settings.cache_dir = tmp.path().join("cache");
        std::fs::create_dir_all(settings.files_dir()).expect("create files dir");
        std::fs::create_dir_all(settings.conf_dir()).expect("create conf dir");
        std::fs::create_dir_all(&settings.home).expect("create home dir");
        let repo = Self {
            tmp,
            settings,
            manifest: Vec::new(),
        };
        repo.write_manifest();
        repo
    }

    /// Track `line` (`source[:repo_path]`) in the manifest.
    pub fn track(mut self, line: &str) -> Self {
        self.manifest.push(line.to_string());
        self.write_manifest();
        self
    }

    /// Write `content` to `rel` under the home directory.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write(&self.home(rel), content);
        self
    }

    /// Write `content` to `rel` under the repository's `files/`.
    pub fn with_repo_file(self, rel: &str, content: &str) -> Self {
        write(&self.repo(rel), content);
        self
    }

    /// Path of `rel` under the home directory.
    pub fn home(&self, rel: &str) -> PathBuf {
        self.settings.home.join(rel)
    }

    /// Path of `rel` under the repository's `files/`.
    pub fn repo(&self, rel: &str) -> PathBuf {
        self.settings.files_dir().join(rel)
    }

    /// Fresh logger writing into the fixture's cache directory.
    pub fn logger(&self) -> Arc<Logger> {
        Arc::new(Logger::new("test", &self.settings.cache_dir))
    }

    /// Load config and build a context that answers every prompt with
    /// `answer`.
    pub fn context(&self, dry_run: bool, force: bool, answer: bool) -> (Context, Arc<Logger>) {
        let config = Config::load(self.settings.clone()).expect("load config");
        let log = self.logger();
        let ctx = Context::new(config, Arc::clone(&log) as Arc<dyn Log>, dry_run, force)
            .with_prompt(Arc::new(FixedAnswer(answer)));
        (ctx, log)
    }

    fn write_manifest(&self) {
        let mut content = self.manifest.join("\n");
        content.push('\n');
        std::fs::write(self.settings.manifest_path(), content).expect("write manifest");
    }
}

/// Global options with `force` set so commands never prompt.
pub fn forced() -> GlobalOpts {
    GlobalOpts {
        force: true,
        ..GlobalOpts::default()
    }
}

/// Write `content` to `path`, creating parent directories.
pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

/// Read `path` to a string.
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("read file")
}

/// Every `<name>.bak.*` sibling of `path`.
pub fn backups_of(path: &Path) -> Vec<PathBuf> {
    let name = path
        .file_name()
        .expect("file name")
        .to_string_lossy()
        .into_owned();
    let prefix = format!("{name}.bak.");
    let mut found: Vec<PathBuf> = std::fs::read_dir(path.parent().expect("parent"))
        .expect("read dir")
        .map(|e| e.expect("dir entry").path())
        .filter(|p| {
            p.file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with(&prefix))
        })
        .collect();
    found.sort();
    found
}
