//! Commands: `install` and `update`.
use std::sync::Arc;

use anyhow::Result;

use super::{CommandSetup, run_tasks_to_completion};
use crate::cli::{GlobalOpts, SyncOpts};
use crate::config::Settings;
use crate::logging::Logger;
use crate::sync::SyncDirection;
use crate::tasks::Task;
use crate::tasks::archive::ArchiveTrackedFiles;
use crate::tasks::tracked::SyncTrackedFiles;

/// Run `install` (repository to system) or `update` (system to repository).
///
/// # Errors
///
/// Returns an error if configuration loading fails or any entry could not
/// be synchronized.
pub fn run(
    direction: SyncDirection,
    global: &GlobalOpts,
    opts: &SyncOpts,
    settings: Settings,
    log: &Arc<Logger>,
) -> Result<()> {
    log.info(&format!("dotfiles {}", super::version::version()));

    let setup = CommandSetup::init(global, settings, log)?;
    let entries = setup.config.select(&opts.only);
    if !opts.only.is_empty() {
        log.info(&format!(
            "{} of {} entries match --only",
            entries.len(),
            setup.config.entries.len()
        ));
    }

    let mut all_tasks: Vec<Box<dyn Task>> = Vec::new();
    if opts.snapshot {
        all_tasks.push(Box::new(ArchiveTrackedFiles::snapshot(
            direction,
            &entries,
            &setup.ctx.files_dir(),
        )));
    }
    all_tasks.push(Box::new(SyncTrackedFiles::new(direction, entries)));

    run_tasks_to_completion(
        all_tasks.iter().map(AsRef::as_ref),
        &setup.ctx,
        log,
    )
}
