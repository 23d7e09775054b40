//! Report generator: the change log and the machine-readable audit list.
//!
//! Built once at the end of a run from the per-file change records and the
//! review items. Never touches source files.

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{
    core::data::FileChangeRecord,
    issues::{Issue, Report, Rule, Severity},
};

pub const CHANGE_LOG_FILE: &str = "localization_changes.log";
pub const AUDIT_FILE: &str = "localized_strings.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub files_scanned: usize,
    pub files_modified: usize,
    pub strings_localized: usize,
    pub imports_added: usize,
    pub repairs_applied: usize,
    /// Review items with error severity: literals or sites left broken or
    /// unconverted.
    pub failures: usize,
}

impl Summary {
    pub fn new(files_scanned: usize, records: &[FileChangeRecord], issues: &[Issue]) -> Self {
        Self {
            files_scanned,
            files_modified: records.iter().filter(|r| r.is_modified()).count(),
            strings_localized: records.iter().map(|r| r.replacements.len()).sum(),
            imports_added: records.iter().filter(|r| r.import_added.is_some()).count(),
            repairs_applied: records.iter().map(|r| r.repairs.len()).sum(),
            failures: issues
                .iter()
                .filter(|issue| issue.severity() == Severity::Error)
                .count(),
        }
    }
}

/// One rewritten literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedString {
    pub file: String,
    pub line: usize,
    pub key: String,
    pub text: String,
}

/// One review item, flattened for the audit file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    pub file: String,
    pub line: usize,
    pub rule: Rule,
    pub message: String,
}

/// Contents of `localized_strings.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub dry_run: bool,
    pub summary: Summary,
    pub localized: Vec<LocalizedString>,
    pub review: Vec<ReviewItem>,
    /// Localized keys absent from the target-language ARB file.
    pub missing_in_target: Vec<String>,
}

impl AuditReport {
    /// `records` and `issues` in any order; the report lists them sorted.
    pub fn new(
        dry_run: bool,
        files_scanned: usize,
        records: &[FileChangeRecord],
        issues: &[Issue],
    ) -> Self {
        let mut localized: Vec<LocalizedString> = records
            .iter()
            .flat_map(|record| &record.replacements)
            .map(|replacement| LocalizedString {
                file: replacement.context.file_path().to_string(),
                line: replacement.context.line(),
                key: replacement.key.clone(),
                text: replacement.original.clone(),
            })
            .collect();
        localized.sort_by(|a, b| a.file.cmp(&b.file).then_with(|| a.line.cmp(&b.line)));

        let mut sorted = issues.to_vec();
        sorted.sort();
        let missing_in_target = sorted
            .iter()
            .filter_map(|issue| match issue {
                Issue::MissingTranslation(missing) => Some(missing.key.clone()),
                _ => None,
            })
            .collect();
        let review = sorted
            .iter()
            .map(|issue| ReviewItem {
                file: issue.file_path().to_string(),
                line: issue.line(),
                rule: issue.rule(),
                message: issue.message(),
            })
            .collect();

        Self {
            dry_run,
            summary: Summary::new(files_scanned, records, issues),
            localized,
            review,
            missing_in_target,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        Ok(format!("{}\n", content))
    }
}

/// Human-readable log of every change, file by file.
pub fn change_log(report: &AuditReport, records: &[FileChangeRecord]) -> String {
    let mut out = String::new();
    let mode = if report.dry_run { "dry run" } else { "applied" };
    let _ = writeln!(out, "l10nify change log ({})", mode);

    let mut records: Vec<&FileChangeRecord> = records.iter().filter(|r| r.is_modified()).collect();
    records.sort_by(|a, b| a.file_path.cmp(&b.file_path));
    for record in records {
        let _ = writeln!(out, "\n{}", record.file_path);
        if let Some(import) = &record.import_added {
            let _ = writeln!(out, "  + {}", import);
        }
        for replacement in &record.replacements {
            let _ = writeln!(
                out,
                "  {}: {:?} -> {}",
                replacement.context.line(),
                replacement.original,
                replacement.key
            );
        }
        for repair in &record.repairs {
            let _ = writeln!(
                out,
                "  {}: [{}] {}",
                repair.context.line(),
                repair.pass,
                repair.action
            );
        }
    }

    if !report.review.is_empty() {
        let _ = writeln!(out, "\nreview:");
        for item in &report.review {
            let _ = writeln!(
                out,
                "  {}:{}: [{}] {}",
                item.file, item.line, item.rule, item.message
            );
        }
    }

    let s = &report.summary;
    let _ = writeln!(
        out,
        "\nsummary: {} file(s) scanned, {} modified, {} string(s) localized, {} import(s) added, {} repair(s), {} failure(s)",
        s.files_scanned,
        s.files_modified,
        s.strings_localized,
        s.imports_added,
        s.repairs_applied,
        s.failures
    );
    out
}

/// Paths of the written report files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub change_log: PathBuf,
    pub audit: PathBuf,
}

/// Writes both report files into `dir`, creating it if needed.
pub fn write_reports(
    dir: &Path,
    report: &AuditReport,
    records: &[FileChangeRecord],
) -> Result<ReportPaths> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let paths = ReportPaths {
        change_log: dir.join(CHANGE_LOG_FILE),
        audit: dir.join(AUDIT_FILE),
    };
    fs::write(&paths.change_log, change_log(report, records))
        .with_context(|| format!("Failed to write file: {}", paths.change_log.display()))?;
    fs::write(&paths.audit, report.to_json()?)
        .with_context(|| format!("Failed to write file: {}", paths.audit.display()))?;
    Ok(paths)
}
