use std::fs;

use anyhow::Result;

use super::{CommandResult, CommandSummary};
use crate::{
    cli::exit_status::ExitStatus,
    core::{RunContext, backup::Backup, rewriter::write_atomic},
    issues::{FileErrorIssue, Issue},
};

/// Reads a project file; a failure becomes a `file-error` review item.
pub fn read_source(ctx: &RunContext, file: &str, issues: &mut Vec<Issue>) -> Option<String> {
    match fs::read_to_string(ctx.path(file)) {
        Ok(content) => Some(content),
        Err(err) => {
            issues.push(file_error(file, format!("cannot read file: {}", err)));
            None
        }
    }
}

/// Backs the file up if requested, then writes it atomically. Returns
/// whether a backup copy was made.
pub fn write_source(
    ctx: &RunContext,
    backup: Option<&Backup>,
    file: &str,
    content: &str,
) -> Result<bool> {
    let backed_up = match backup {
        Some(backup) => backup.save(file)?,
        None => false,
    };
    write_atomic(&ctx.path(file), content)?;
    tracing::debug!("{}: written", file);
    Ok(backed_up)
}

pub fn file_error(file: &str, error: impl Into<String>) -> Issue {
    FileErrorIssue {
        file_path: file.to_string(),
        error: error.into(),
    }
    .into()
}

pub fn finish(
    summary: CommandSummary,
    mut issues: Vec<Issue>,
    ctx: &RunContext,
    exit_status: ExitStatus,
) -> CommandResult {
    issues.sort();
    CommandResult {
        summary,
        issues,
        source_files_checked: ctx.files.len(),
        skipped_count: ctx.skipped_count,
        exit_status,
    }
}
