//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `localize`: Rewrite hardcoded strings into lookups
//! - `scan`: List hardcoded strings that have a dictionary key
//! - `repair`: Fix imports and constness around existing lookups
//! - `restore`: Copy backed-up originals back
//! - `init`: Initialize l10nify configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        self.common().is_some_and(|common| common.verbose)
    }

    pub fn common(&self) -> Option<&CommonArgs> {
        match &self.command {
            Some(Command::Localize(cmd)) => Some(&cmd.args.common),
            Some(Command::Scan(cmd)) => Some(&cmd.args.common),
            Some(Command::Repair(cmd)) => Some(&cmd.args.common),
            Some(Command::Restore(cmd)) => Some(&cmd.args.common),
            Some(Command::Init) | None => None,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Flutter project root (default: current directory)
    #[arg(long)]
    pub project_root: Option<PathBuf>,

    /// Source code root directory, relative to the project root (overrides config file)
    #[arg(long)]
    pub source_root: Option<String>,

    /// ARB directory, relative to the project root (overrides config file)
    #[arg(long)]
    pub arb_dir: Option<String>,

    /// Template ARB file name inside the ARB directory (overrides config file)
    #[arg(long)]
    pub template_arb: Option<String>,

    /// Target-language ARB file name inside the ARB directory (overrides config file)
    #[arg(long)]
    pub target_arb: Option<String>,

    /// Process at most this many files (in sorted path order)
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct LocalizeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Show what would change without writing any source file
    #[arg(long)]
    pub dry_run: bool,

    /// Apply the syntax repair passes after rewriting (without it, needed repairs are reported)
    #[arg(long)]
    pub repair: bool,

    /// Copy each file to the backup directory before its first overwrite
    #[arg(long)]
    pub backup: bool,

    /// Do not write localization_changes.log and localized_strings.json
    #[arg(long)]
    pub no_report: bool,
}

#[derive(Debug, Args)]
pub struct LocalizeCommand {
    #[command(flatten)]
    pub args: LocalizeArgs,
}

#[derive(Debug, Parser)]
pub struct ScanArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct ScanCommand {
    #[command(flatten)]
    pub args: ScanArgs,
}

#[derive(Debug, Parser)]
pub struct RepairArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Show what would change without writing any source file
    #[arg(long)]
    pub dry_run: bool,

    /// Do not add missing localization imports
    #[arg(long)]
    pub no_imports: bool,

    /// Skip the default-parameter, const-declaration and const-constructor passes
    #[arg(long)]
    pub no_const: bool,

    /// Skip the static-context pass
    #[arg(long)]
    pub no_context: bool,

    /// Copy each file to the backup directory before its first overwrite
    #[arg(long)]
    pub backup: bool,
}

#[derive(Debug, Args)]
pub struct RepairCommand {
    #[command(flatten)]
    pub args: RepairArgs,
}

#[derive(Debug, Parser)]
pub struct RestoreArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct RestoreCommand {
    #[command(flatten)]
    pub args: RestoreArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rewrite hardcoded strings that have an ARB key into AppLocalizations lookups
    Localize(LocalizeCommand),
    /// List hardcoded strings that have an ARB key (exit 1 if any)
    Scan(ScanCommand),
    /// Add missing imports and fix const/context errors around existing lookups
    Repair(RepairCommand),
    /// Copy backed-up originals back into the project
    Restore(RestoreCommand),
    /// Initialize a new .l10nifyrc.json configuration file
    Init,
}
