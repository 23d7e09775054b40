//! Review items produced during a run.
//!
//! Every skip or failure that needs manual follow-up is an issue. Each issue
//! is self-contained with all information needed by:
//! - the CLI reporter, to print it cargo-style
//! - the report generator, to list it in `localized_strings.json`

use enum_dispatch::enum_dispatch;
use serde::Serialize;

use crate::core::data::{RepairPass, SourceContext, SourceLocation};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    Localizable,
    UnescapableLiteral,
    InvalidAccessor,
    AmbiguousKey,
    Unrepaired,
    Reverted,
    MissingTranslation,
    FileError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Localizable => write!(f, "localizable"),
            Rule::UnescapableLiteral => write!(f, "unescapable-literal"),
            Rule::InvalidAccessor => write!(f, "invalid-accessor"),
            Rule::AmbiguousKey => write!(f, "ambiguous-key"),
            Rule::Unrepaired => write!(f, "unrepaired"),
            Rule::Reverted => write!(f, "reverted"),
            Rule::MissingTranslation => write!(f, "missing-translation"),
            Rule::FileError => write!(f, "file-error"),
        }
    }
}

// ============================================================
// Issue Types - Source Code (SourceContext)
// ============================================================

/// Hardcoded literal that has a dictionary key (reported by `scan`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizableIssue {
    pub context: SourceContext,
    pub text: String,
    pub key: String,
}

impl LocalizableIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::Localizable
    }
}

/// Literal whose re-escaped fallback would not decode to the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnescapableLiteralIssue {
    pub context: SourceContext,
    pub text: String,
    pub key: String,
}

impl UnescapableLiteralIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::UnescapableLiteral
    }
}

/// Dictionary key that cannot be used as a Dart getter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAccessorIssue {
    pub context: SourceContext,
    pub key: String,
}

impl InvalidAccessorIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::InvalidAccessor
    }
}

/// Several keys share the literal's text; the first one was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousKeyIssue {
    pub context: SourceContext,
    /// The key written into the source.
    pub key: String,
    /// Other keys with the same value, in ARB file order.
    pub alternatives: Vec<String>,
}

impl AmbiguousKeyIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::AmbiguousKey
    }
}

/// Lookup left in a position a repair pass could not fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrepairedIssue {
    pub context: SourceContext,
    pub pass: RepairPass,
    pub reason: String,
}

impl UnrepairedIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::Unrepaired
    }
}

/// Lookup turned back into its fallback literal by a repair pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevertedIssue {
    pub context: SourceContext,
    pub pass: RepairPass,
    pub key: String,
}

impl RevertedIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::Reverted
    }
}

// ============================================================
// Issue Types - Files
// ============================================================

/// Localized key absent from the target-language ARB file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTranslationIssue {
    pub key: String,
    /// The target ARB file.
    pub file_path: String,
    /// Where the key was written into source files.
    pub usages: Vec<SourceLocation>,
}

impl MissingTranslationIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::MissingTranslation
    }
}

/// A single source file could not be read or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl FileErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::FileError
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// A review item recorded during a run.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    Localizable(LocalizableIssue),
    UnescapableLiteral(UnescapableLiteralIssue),
    InvalidAccessor(InvalidAccessorIssue),
    AmbiguousKey(AmbiguousKeyIssue),
    Unrepaired(UnrepairedIssue),
    Reverted(RevertedIssue),
    MissingTranslation(MissingTranslationIssue),
    FileError(FileErrorIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.report_severity()
    }

    pub fn rule(&self) -> Rule {
        self.report_rule()
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Source code location (has source_line for context display).
    Source(&'a SourceContext),
    /// File-level only.
    File { path: &'a str },
}

/// Trait for types that can be reported to the CLI and the audit file.
#[enum_dispatch]
pub trait Report {
    /// Get the location for this issue.
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    /// Severity level.
    fn report_severity(&self) -> Severity;

    /// Rule identifier.
    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<String> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for LocalizableIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!("\"{}\" can use key `{}`", self.text.trim(), self.key)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<String> {
        Some("run `l10nify localize` to rewrite it".to_string())
    }
}

impl Report for UnescapableLiteralIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!("\"{}\" cannot be re-escaped as a fallback", self.text.escape_debug())
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("matched key `{}`, literal left unchanged", self.key))
    }
}

impl Report for InvalidAccessorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!("key `{}` is not a valid Dart identifier", self.key)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<String> {
        Some("rename the ARB key to lowerCamelCase".to_string())
    }
}

impl Report for AmbiguousKeyIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!("used `{}` for a text shared by several keys", self.key)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("also matches: {}", self.alternatives.join(", ")))
    }
}

impl Report for UnrepairedIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.reason.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("left unchanged by {}", self.pass))
    }
}

impl Report for RevertedIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!("lookup of `{}` reverted to its fallback literal", self.key)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        let reason = match self.pass {
            RepairPass::DefaultParameter => "parameter defaults must be constant",
            _ => "no BuildContext in scope",
        };
        Some(format!("{} ({})", reason, self.pass))
    }
}

impl Report for MissingTranslationIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        format!("key `{}` has no translation", self.key)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        if self.usages.is_empty() {
            return None;
        }
        let usages: Vec<String> = self
            .usages
            .iter()
            .map(|loc| format!("{}:{}", loc.file_path, loc.line))
            .collect();
        Some(format!("used at {}", usages.join(", ")))
    }
}

impl Report for FileErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Issue {
    /// File path of the issue's location.
    pub fn file_path(&self) -> &str {
        match self.location() {
            ReportLocation::Source(ctx) => &ctx.location.file_path,
            ReportLocation::File { path } => path,
        }
    }

    /// 1-based line, or 0 for file-level issues.
    pub fn line(&self) -> usize {
        match self.location() {
            ReportLocation::Source(ctx) => ctx.location.line,
            ReportLocation::File { .. } => 0,
        }
    }

    fn sort_col(&self) -> usize {
        match self.location() {
            ReportLocation::Source(ctx) => ctx.location.col,
            ReportLocation::File { .. } => 0,
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: file_path, line, col, rule, message
        self.file_path()
            .cmp(other.file_path())
            .then_with(|| self.line().cmp(&other.line()))
            .then_with(|| self.sort_col().cmp(&other.sort_col()))
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================
// Tests
// ============================================================
