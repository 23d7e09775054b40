use crate::{
    cli::exit_status::ExitStatus,
    core::data::FileChangeRecord,
    issues::Issue,
    report::{ReportPaths, Summary},
};

#[derive(Debug)]
pub enum CommandSummary {
    Localize(LocalizeSummary),
    Scan,
    Repair(RepairSummary),
    Restore(RestoreSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct LocalizeSummary {
    pub is_dry_run: bool,
    pub totals: Summary,
    /// Records of modified files, in path order.
    pub records: Vec<FileChangeRecord>,
    pub backup_count: usize,
    pub report_paths: Option<ReportPaths>,
}

#[derive(Debug)]
pub struct RepairSummary {
    pub is_dry_run: bool,
    /// Records of modified files, in path order.
    pub records: Vec<FileChangeRecord>,
    pub backup_count: usize,
}

#[derive(Debug)]
pub struct RestoreSummary {
    pub backup_dir: String,
    pub restored: Vec<String>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running l10nify commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Review items, sorted.
    pub issues: Vec<Issue>,
    /// Number of source files processed.
    pub source_files_checked: usize,
    /// Paths that could not be read while collecting files.
    pub skipped_count: usize,
    pub exit_status: ExitStatus,
}
