use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Config, Settings};
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Log;
use crate::prompt::{Prompt, TerminalPrompt};

/// Shared context for task execution.
pub struct Context {
    /// Loaded settings and tracked entries.
    pub config: Arc<Config>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Overwrite differing destinations without asking.
    pub force: bool,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Confirmation prompt used before overwriting without `force`.
    pub prompt: Arc<dyn Prompt>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("force", &self.force)
            .field("executor", &self.executor)
            .field("prompt", &self.prompt)
            .finish()
    }
}

impl Context {
    /// Creates a context using the system executor and the terminal prompt.
    #[must_use]
    pub fn new(config: Config, log: Arc<dyn Log>, dry_run: bool, force: bool) -> Self {
        Self {
            config: Arc::new(config),
            log,
            dry_run,
            force,
            executor: Arc::new(SystemExecutor),
            prompt: Arc::new(TerminalPrompt),
        }
    }

    /// Replace the command executor.
    #[must_use]
    pub fn with_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = executor;
        self
    }

    /// Replace the confirmation prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: Arc<dyn Prompt>) -> Self {
        self.prompt = prompt;
        self
    }

    /// Resolved settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.config.settings
    }

    /// User's home directory.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.config.settings.home
    }

    /// The repository's `files/` directory.
    #[must_use]
    pub fn files_dir(&self) -> PathBuf {
        self.config.settings.files_dir()
    }
}
