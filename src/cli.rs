//! Command-line interface definition.
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Top-level CLI entry point for the dotfiles manager.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles",
    about = "Copy-based dotfiles manager with backup-before-overwrite",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Overwrite differing files without asking
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Dotfiles repository root [default: ~/.dotfiles]
    #[arg(long, global = true, env = "DOTFILES_DIR")]
    pub root: Option<PathBuf>,

    /// Backup directory [default: <root>/backups]
    #[arg(long, global = true, env = "BACKUP_DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Directory for log files [default: ~/.cache/dotfiles]
    #[arg(long, global = true, env = "CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the repository layout and a template manifest
    Init,
    /// Copy tracked files from the repository into place
    Install(SyncOpts),
    /// Copy tracked files from the system into the repository
    Update(SyncOpts),
    /// Show every tracked entry and its status
    List,
    /// Archive the current tracked files
    Backup(BackupOpts),
    /// Print version information
    Version,
    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

impl Command {
    /// Short name, used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Install(_) => "install",
            Self::Update(_) => "update",
            Self::List => "list",
            Self::Backup(_) => "backup",
            Self::Version => "version",
            Self::Completions { .. } => "completions",
        }
    }
}

/// Options for the `install` and `update` subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct SyncOpts {
    /// Only process entries whose path contains one of these patterns
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Archive the destination copies before syncing
    #[arg(long)]
    pub snapshot: bool,
}

/// Options for the `backup` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct BackupOpts {
    /// Only archive entries whose path contains one of these patterns
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Compress the archive into a .tar.gz
    #[arg(long, conflicts_with = "no_compress")]
    pub compress: bool,

    /// Keep the archive as a plain directory
    #[arg(long)]
    pub no_compress: bool,
}

impl BackupOpts {
    /// Whether to compress, given the configured default.
    #[must_use]
    pub const fn compress(&self, default: bool) -> bool {
        if self.compress {
            true
        } else if self.no_compress {
            false
        } else {
            default
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::unreachable)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_install_dry_run() {
        let cli = Cli::parse_from(["dotfiles", "--dry-run", "install"]);
        assert!(cli.global.dry_run);
        assert!(matches!(cli.command, Command::Install(_)));
    }

    #[test]
    fn parse_install_dry_run_short() {
        let cli = Cli::parse_from(["dotfiles", "install", "-d"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_force_and_verbose() {
        let cli = Cli::parse_from(["dotfiles", "-f", "-v", "update"]);
        assert!(cli.global.force);
        assert!(cli.global.verbose);
        assert!(matches!(cli.command, Command::Update(_)));
    }

    #[test]
    fn parse_install_only_patterns() {
        let cli = Cli::parse_from(["dotfiles", "install", "--only", "nvim,bashrc", "--snapshot"]);
        let Command::Install(opts) = cli.command else {
            unreachable!("expected install");
        };
        assert_eq!(opts.only, vec!["nvim", "bashrc"]);
        assert!(opts.snapshot);
    }

    #[test]
    fn parse_directory_overrides() {
        let cli = Cli::parse_from([
            "dotfiles",
            "--root",
            "/tmp/dotfiles",
            "--backup-dir",
            "/tmp/bk",
            "--cache-dir",
            "/tmp/cache",
            "list",
        ]);
        assert_eq!(cli.global.root, Some(PathBuf::from("/tmp/dotfiles")));
        assert_eq!(cli.global.backup_dir, Some(PathBuf::from("/tmp/bk")));
        assert_eq!(cli.global.cache_dir, Some(PathBuf::from("/tmp/cache")));
    }

    #[test]
    fn parse_backup_compression_flags() {
        let cli = Cli::parse_from(["dotfiles", "backup", "--compress"]);
        let Command::Backup(opts) = cli.command else {
            unreachable!("expected backup");
        };
        assert!(opts.compress(false));

        let cli = Cli::parse_from(["dotfiles", "backup", "--no-compress"]);
        let Command::Backup(opts) = cli.command else {
            unreachable!("expected backup");
        };
        assert!(!opts.compress(true));

        let cli = Cli::parse_from(["dotfiles", "backup"]);
        let Command::Backup(opts) = cli.command else {
            unreachable!("expected backup");
        };
        assert!(opts.compress(true));
    }

    #[test]
    fn compress_flags_conflict() {
        let result = Cli::try_parse_from(["dotfiles", "backup", "--compress", "--no-compress"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["dotfiles", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Command::Completions { shell: Shell::Bash }
        ));
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["dotfiles", "frobnicate"]).is_err());
    }

    #[test]
    fn command_names() {
        let names: Vec<&str> = ["init", "list", "version"]
            .iter()
            .map(|c| Cli::parse_from(["dotfiles", *c]).command.name())
            .collect();
        assert_eq!(names, vec!["init", "list", "version"]);
    }
}
