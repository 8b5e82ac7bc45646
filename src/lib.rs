//! Copy-based dotfiles manager.
//!
//! Keeps a repository of dotfiles in sync with the live copies in the home
//! directory (or anywhere on the system). Files are copied, never symlinked,
//! and a differing destination is backed up next to itself before it is
//! overwritten. The set of tracked paths lives in `conf/tracked-files`.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: settings resolution and the tracked-files manifest
//! - **[`resources`]**: idempotent `check + apply` primitives for files
//! - **[`tasks`]**: named units of work wired to [`sync`] and [`backup`]
//! - **[`commands`]**: top-level subcommand orchestration (`init`, `install`,
//!   `update`, `list`, `backup`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod backup;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod prompt;
pub mod resources;
pub mod sync;
pub mod tasks;
