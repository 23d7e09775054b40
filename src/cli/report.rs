//! Report formatting and printing utilities.
//!
//! Review items are printed cargo-style; command summaries follow them.
//! Separate from core logic to allow l10nify to be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CommandResult, CommandSummary, InitSummary, LocalizeSummary, RepairSummary, RestoreSummary,
};
use crate::{
    config::CONFIG_FILE_NAME,
    core::data::FileChangeRecord,
    issues::{Issue, Report, ReportLocation, Severity},
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to stdout.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
///
/// Useful for testing or redirecting output.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    // Calculate max line number width for alignment
    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

/// Print a success message.
fn print_success_to<W: Write>(message: &str, writer: &mut W) {
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), message.green());
}

/// Print a warning about paths that could not be read while scanning.
fn print_skipped_warning_to<W: Write>(count: usize, writer: &mut W) {
    if count > 0 {
        let _ = writeln!(
            writer,
            "{} {} path(s) could not be read (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

pub fn print(result: &CommandResult) {
    print_to(result, &mut io::stdout().lock());
    print_skipped_warning_to(result.skipped_count, &mut io::stderr().lock());
}

fn print_to<W: Write>(result: &CommandResult, writer: &mut W) {
    match &result.summary {
        CommandSummary::Localize(summary) => {
            report_to(&result.issues, writer);
            print_localize(summary, result.source_files_checked, writer);
        }
        CommandSummary::Scan => {
            report_to(&result.issues, writer);
            if !result
                .issues
                .iter()
                .any(|issue| matches!(issue, Issue::Localizable(_)))
            {
                print_success_to(
                    &format!(
                        "Checked {} - no localizable strings found",
                        files(result.source_files_checked)
                    ),
                    writer,
                );
            }
        }
        CommandSummary::Repair(summary) => {
            report_to(&result.issues, writer);
            print_repair(summary, result.source_files_checked, writer);
        }
        CommandSummary::Restore(summary) => print_restore(summary, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let loc = issue.location();
    let (file_path, line, col, source_line) = extract_location_info(&loc);

    // Print severity and message (cargo-style)
    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    // Print clickable location: --> path:line:col
    if line > 0 {
        let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), file_path, line, col);
    } else {
        let _ = writeln!(writer, "  {} {}", "-->".blue(), file_path);
    }

    // Print source context if available
    if let Some(source_line) = source_line {
        let caret_char = match severity {
            Severity::Error => "^".red(),
            Severity::Warning => "^".yellow(),
        };

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // Caret pointing to the column (col is 1-based)
        let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret_char,
            width = max_line_width,
            padding = caret_padding
        );
    }

    // Print details if present (cargo-style note)
    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    // Print hint if present
    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})\n",
        FAILURE_MARK.red(),
        issues.len(),
        total_errors,
        if total_errors == 1 { "error" } else { "errors" }.red(),
        total_warnings,
        if total_warnings == 1 {
            "warning"
        } else {
            "warnings"
        }
        .yellow()
    );
}

fn extract_location_info<'a>(
    loc: &'a ReportLocation<'a>,
) -> (&'a str, usize, usize, Option<&'a str>) {
    match loc {
        ReportLocation::Source(ctx) => (
            ctx.file_path(),
            ctx.line(),
            ctx.col(),
            Some(&ctx.source_line),
        ),
        ReportLocation::File { path } => (path, 0, 0, None),
    }
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(ctx) => Some(ctx.line()),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

fn files(count: usize) -> String {
    format!(
        "{} source {}",
        count,
        if count == 1 { "file" } else { "files" }
    )
}

/// `2 string(s), import, 1 repair(s)`
fn describe_record(record: &FileChangeRecord) -> String {
    let mut parts = Vec::new();
    if !record.replacements.is_empty() {
        parts.push(format!("{} string(s)", record.replacements.len()));
    }
    if record.import_added.is_some() {
        parts.push("import".to_string());
    }
    if !record.repairs.is_empty() {
        parts.push(format!("{} repair(s)", record.repairs.len()));
    }
    parts.join(", ")
}

fn print_records<W: Write>(records: &[FileChangeRecord], writer: &mut W) {
    for record in records {
        let _ = writeln!(
            writer,
            "  - {}: {}",
            record.file_path,
            describe_record(record)
        );
    }
}

fn print_localize<W: Write>(summary: &LocalizeSummary, files_checked: usize, writer: &mut W) {
    let totals = &summary.totals;
    if summary.records.is_empty() {
        print_success_to(
            &format!("Checked {} - nothing to localize", files(files_checked)),
            writer,
        );
    } else {
        let verb = if summary.is_dry_run {
            "Would localize".yellow().bold()
        } else {
            "Localized".green().bold()
        };
        let _ = writeln!(
            writer,
            "{} {} string(s) in {} file(s):",
            verb, totals.strings_localized, totals.files_modified
        );
        print_records(&summary.records, writer);
        if summary.backup_count > 0 {
            let _ = writeln!(writer, "Backed up {} file(s).", summary.backup_count);
        }
        if summary.is_dry_run {
            let _ = writeln!(
                writer,
                "Run without {} to apply these changes.",
                "--dry-run".cyan()
            );
        }
    }

    if let Some(paths) = &summary.report_paths {
        let _ = writeln!(
            writer,
            "Report written to {} and {}",
            paths.change_log.display(),
            paths.audit.display()
        );
    }
}

fn print_repair<W: Write>(summary: &RepairSummary, files_checked: usize, writer: &mut W) {
    if summary.records.is_empty() {
        print_success_to(
            &format!("Checked {} - nothing to repair", files(files_checked)),
            writer,
        );
        return;
    }

    let verb = if summary.is_dry_run {
        "Would repair".yellow().bold()
    } else {
        "Repaired".green().bold()
    };
    let _ = writeln!(writer, "{} {} file(s):", verb, summary.records.len());
    print_records(&summary.records, writer);
    if summary.backup_count > 0 {
        let _ = writeln!(writer, "Backed up {} file(s).", summary.backup_count);
    }
    if summary.is_dry_run {
        let _ = writeln!(
            writer,
            "Run without {} to apply these changes.",
            "--dry-run".cyan()
        );
    }
}

fn print_restore<W: Write>(summary: &RestoreSummary, writer: &mut W) {
    if summary.restored.is_empty() {
        let _ = writeln!(writer, "No backups found in {}", summary.backup_dir);
        return;
    }
    print_success_to(
        &format!(
            "Restored {} file(s) from {}",
            summary.restored.len(),
            summary.backup_dir
        ),
        writer,
    );
    for file in &summary.restored {
        let _ = writeln!(writer, "  - {}", file);
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        print_success_to(&format!("Created {}", CONFIG_FILE_NAME), writer);
    } else {
        let _ = writeln!(
            writer,
            "{} {} already exists",
            "error:".bold().red(),
            CONFIG_FILE_NAME
        );
    }
}

// ============================================================
// Tests
// ============================================================
