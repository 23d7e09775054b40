use serde::Serialize;

use super::source::{SourceContext, Span};

/// A located string literal considered for localization.
///
/// **Created by**: `Scanner`
/// **Consumed by**: `Resolver`, then dropped once matched or unmatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub context: SourceContext,
    /// Byte span of the whole literal, quotes included.
    pub span: Span,
    /// Decoded literal text (escapes resolved).
    pub text: String,
}

impl Candidate {
    pub fn file_path(&self) -> &str {
        self.context.file_path()
    }
}

/// One literal rewritten into a lookup expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub context: SourceContext,
    pub span: Span,
    pub key: String,
    /// Decoded text of the literal that was replaced.
    pub original: String,
    /// The lookup expression written at `span`.
    pub replacement: String,
}

/// Identifies a syntax repair pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepairPass {
    StaticContext,
    DefaultParameter,
    ConstDeclaration,
    ConstConstructor,
}

impl std::fmt::Display for RepairPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepairPass::StaticContext => write!(f, "static-context"),
            RepairPass::DefaultParameter => write!(f, "default-parameter"),
            RepairPass::ConstDeclaration => write!(f, "const-declaration"),
            RepairPass::ConstConstructor => write!(f, "const-constructor"),
        }
    }
}

/// What a repair pass did at one site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepairAction {
    /// `const` keyword removed from an enclosing expression.
    RemovedConst,
    /// Local `const` declaration turned into `final`.
    ConstToFinal,
    /// Lookup expression replaced by its fallback literal.
    RevertedToFallback,
}

impl std::fmt::Display for RepairAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepairAction::RemovedConst => write!(f, "removed const"),
            RepairAction::ConstToFinal => write!(f, "const -> final"),
            RepairAction::RevertedToFallback => write!(f, "reverted to fallback literal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRepair {
    pub pass: RepairPass,
    pub action: RepairAction,
    /// Location in the repaired buffer.
    pub context: SourceContext,
    /// Key of the lookup that was reverted, if any.
    pub key: Option<String>,
}

/// Everything applied to one file during a run.
///
/// The only input of the report generator besides the review items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileChangeRecord {
    pub file_path: String,
    pub replacements: Vec<Replacement>,
    /// The import line inserted, if any.
    pub import_added: Option<String>,
    pub repairs: Vec<AppliedRepair>,
}

impl FileChangeRecord {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Default::default()
        }
    }

    pub fn is_modified(&self) -> bool {
        !self.replacements.is_empty() || self.import_added.is_some() || !self.repairs.is_empty()
    }
}
