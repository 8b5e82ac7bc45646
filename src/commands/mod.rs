//! Top-level subcommand orchestration.
pub mod backup;
pub mod init;
pub mod list;
pub mod sync;
pub mod version;

use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::{Config, Settings};
use crate::error::DotfilesError;
use crate::logging::{Log, Logger};
use crate::tasks::{self, Context, Task};

/// Configuration and task context produced by the common command setup
/// sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded configuration, shared with the context.
    pub config: Arc<Config>,
    /// Context handed to every task of the command.
    pub ctx: Context,
}

impl CommandSetup {
    /// Load the manifest, report validation warnings, and build the task
    /// context from the global flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository layout is missing or the manifest
    /// cannot be loaded.
    pub fn init(global: &GlobalOpts, settings: Settings, log: &Arc<Logger>) -> Result<Self> {
        let config = load_config(settings, log)?;
        let ctx = Context::new(
            config,
            Arc::clone(log) as Arc<dyn Log>,
            global.dry_run,
            global.force,
        );
        if ctx.dry_run {
            log.info("dry run: no files will be written");
        }
        Ok(Self {
            config: Arc::clone(&ctx.config),
            ctx,
        })
    }
}

/// Load configuration and print any validation warnings.
///
/// # Errors
///
/// Returns an error if the dotfiles root, its `files/` directory, or the
/// manifest is missing, or the manifest is malformed.
pub fn load_config(settings: Settings, log: &Logger) -> Result<Config> {
    log.stage("Loading configuration");
    log.debug(&format!("root: {}", settings.root.display()));
    log.debug(&format!("home: {}", settings.home.display()));
    log.debug(&format!("backups: {}", settings.backup_dir.display()));

    let config = Config::load(settings).map_err(DotfilesError::from)?;
    log.info(&format!("loaded {} tracked entries", config.entries.len()));

    let warnings = config.validate();
    if !warnings.is_empty() {
        log.warn(&format!(
            "found {} configuration warning(s):",
            warnings.len()
        ));
        for warning in &warnings {
            log.warn(&format!(
                "  {} [{}]: {}",
                warning.source, warning.item, warning.message
            ));
        }
    }
    Ok(config)
}

/// Execute every task in order, print the summary, and bail if any task failed.
///
/// # Errors
///
/// Returns an error if one or more tasks recorded a failure.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        tasks::execute(task, ctx);
    }

    log.print_summary();

    if log.has_failures() {
        anyhow::bail!("{} task(s) failed", log.failure_count());
    }
    Ok(())
}
