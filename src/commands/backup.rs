//! Command: archive the current tracked files.
use std::sync::Arc;

use anyhow::Result;

use super::{CommandSetup, run_tasks_to_completion};
use crate::cli::{BackupOpts, GlobalOpts};
use crate::config::Settings;
use crate::logging::Logger;
use crate::tasks::Task;
use crate::tasks::archive::ArchiveTrackedFiles;

/// Run the backup command.
///
/// # Errors
///
/// Returns an error if configuration loading fails, no tracked source
/// exists, or the archive cannot be written.
pub fn run(
    global: &GlobalOpts,
    opts: &BackupOpts,
    settings: Settings,
    log: &Arc<Logger>,
) -> Result<()> {
    let compress = opts.compress(settings.compress);
    let setup = CommandSetup::init(global, settings, log)?;
    let entries = setup.config.select(&opts.only);
    let task = ArchiveTrackedFiles::manual(&entries, compress);
    run_tasks_to_completion([&task as &dyn Task], &setup.ctx, log)
}
