//! `dotfiles` binary entry point.
use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use dotfiles_sync::cli::{Cli, Command};
use dotfiles_sync::commands;
use dotfiles_sync::config::Settings;
use dotfiles_sync::error::DotfilesError;
use dotfiles_sync::logging::{Logger, init_subscriber};
use dotfiles_sync::sync::SyncDirection;

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    match &args.command {
        Command::Version => {
            commands::version::run();
            return Ok(());
        }
        Command::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "dotfiles", &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let settings = Settings::resolve(&args.global).map_err(DotfilesError::from)?;
    let name = args.command.name();
    init_subscriber(args.global.verbose, name, &settings.cache_dir);
    let log = Arc::new(Logger::new(name, &settings.cache_dir));

    match args.command {
        Command::Init => commands::init::run(&args.global, &settings, &log),
        Command::Install(opts) => {
            commands::sync::run(SyncDirection::Install, &args.global, &opts, settings, &log)
        }
        Command::Update(opts) => {
            commands::sync::run(SyncDirection::Update, &args.global, &opts, settings, &log)
        }
        Command::List => commands::list::run(settings, &log),
        Command::Backup(opts) => commands::backup::run(&args.global, &opts, settings, &log),
        Command::Version | Command::Completions { .. } => Ok(()),
    }
}
