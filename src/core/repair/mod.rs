//! Syntax repair passes.
//!
//! Rewriting literals into lookups can break code that required a constant
//! expression or had no `BuildContext` in scope. Each pass fixes one such
//! outcome and nothing else.
//!
//! ## Architecture
//!
//! ```text
//! SourceFile (rewritten buffer)
//!     ↓
//! Fixer::attempt (one pass, fixed order)
//!     ↓
//! FixResult (new buffer + applied repairs + unrepaired sites)
//! ```
//!
//! ## Passes
//!
//! - [`StaticContextFixer`]: reverts lookups in top-level or field initializers
//! - [`DefaultParameterFixer`]: reverts lookups used as parameter defaults
//! - [`ConstDeclarationFixer`]: turns local `const` declarations into `final`
//! - [`ConstConstructorFixer`]: drops `const` from enclosing constructor calls
//!   and collection literals

mod const_constructor;
mod const_declaration;
mod default_parameter;
mod static_context;

use anyhow::Result;

pub use const_constructor::ConstConstructorFixer;
pub use const_declaration::ConstDeclarationFixer;
pub use default_parameter::DefaultParameterFixer;
pub use static_context::StaticContextFixer;

use crate::{
    core::{
        data::{AppliedRepair, LineIndex, RepairAction, RepairPass, SourceContext, Span},
        scanner::context_at,
        structure::{Lookup, LookupFinder, Outline},
    },
    issues::UnrepairedIssue,
};

/// A file buffer handed to a repair pass.
pub struct SourceFile<'a> {
    pub path: &'a str,
    pub content: &'a str,
}

impl<'a> SourceFile<'a> {
    pub fn new(path: &'a str, content: &'a str) -> Self {
        Self { path, content }
    }
}

/// Outcome of one pass over one file.
#[derive(Debug, Default)]
pub struct FixResult {
    /// The repaired buffer; `None` when nothing changed.
    pub content: Option<String>,
    pub fixes: Vec<AppliedRepair>,
    pub unrepaired: Vec<UnrepairedIssue>,
}

/// A narrow fixer for one known-bad rewrite outcome.
///
/// Passes must be idempotent: attempting a pass on its own output changes
/// nothing.
pub trait Fixer {
    fn pass(&self) -> RepairPass;

    fn attempt(&self, file: &SourceFile) -> FixResult;
}

/// Which groups of passes run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairGroups {
    /// default-parameter, const-declaration, const-constructor
    pub constness: bool,
    /// static-context
    pub context: bool,
}

impl Default for RepairGroups {
    fn default() -> Self {
        Self {
            constness: true,
            context: true,
        }
    }
}

/// The enabled passes in their fixed order.
pub fn default_fixers(accessor: &str, groups: RepairGroups) -> Result<Vec<Box<dyn Fixer>>> {
    let mut fixers: Vec<Box<dyn Fixer>> = Vec::new();
    if groups.context {
        fixers.push(Box::new(StaticContextFixer::new(LookupFinder::new(accessor)?)));
    }
    if groups.constness {
        fixers.push(Box::new(DefaultParameterFixer::new(LookupFinder::new(accessor)?)));
        fixers.push(Box::new(ConstDeclarationFixer::new(LookupFinder::new(accessor)?)));
        fixers.push(Box::new(ConstConstructorFixer::new(LookupFinder::new(accessor)?)));
    }
    Ok(fixers)
}

/// Combined outcome of running every pass over one file.
#[derive(Debug)]
pub struct RepairOutcome {
    pub content: String,
    pub fixes: Vec<AppliedRepair>,
    pub unrepaired: Vec<UnrepairedIssue>,
}

impl RepairOutcome {
    pub fn is_changed(&self) -> bool {
        !self.fixes.is_empty()
    }
}

/// Runs `fixers` in order, each on the output of the previous one.
pub fn run_fixers(fixers: &[Box<dyn Fixer>], path: &str, content: &str) -> RepairOutcome {
    let mut current = content.to_string();
    let mut fixes = Vec::new();
    let mut unrepaired = Vec::new();
    for fixer in fixers {
        let result = fixer.attempt(&SourceFile::new(path, &current));
        tracing::debug!(
            "{}: {} applied {} fix(es), {} unrepaired",
            path,
            fixer.pass(),
            result.fixes.len(),
            result.unrepaired.len()
        );
        fixes.extend(result.fixes);
        unrepaired.extend(result.unrepaired);
        if let Some(repaired) = result.content {
            current = repaired;
        }
    }
    RepairOutcome {
        content: current,
        fixes,
        unrepaired,
    }
}

/// A text edit over the buffer a pass received.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    span: Span,
    text: String,
}

/// Shared per-pass state: the analyzed buffer and the edits collected so far.
struct PassState<'a> {
    pass: RepairPass,
    file: &'a SourceFile<'a>,
    outline: Outline,
    index: LineIndex,
    edits: Vec<Edit>,
    result: FixResult,
}

impl<'a> PassState<'a> {
    fn new(pass: RepairPass, file: &'a SourceFile<'a>) -> Self {
        Self {
            pass,
            file,
            outline: Outline::new(file.content),
            index: LineIndex::new(file.content),
            edits: Vec::new(),
            result: FixResult::default(),
        }
    }

    fn lookups(&self, finder: &LookupFinder) -> Vec<Lookup> {
        finder.find_all(self.file.content, &self.outline)
    }

    fn context(&self, offset: usize) -> SourceContext {
        context_at(&self.index, self.file.path, self.file.content, offset)
    }

    /// Records an edit unless one already covers the same span.
    fn edit(&mut self, span: Span, text: impl Into<String>, action: RepairAction, key: Option<String>) {
        if self.edits.iter().any(|edit| edit.span == span) {
            return;
        }
        let context = self.context(span.start);
        self.edits.push(Edit {
            span,
            text: text.into(),
        });
        self.result.fixes.push(AppliedRepair {
            pass: self.pass,
            action,
            context,
            key,
        });
    }

    /// Reverts a lookup to its fallback literal.
    fn revert(&mut self, lookup: &Lookup) {
        let fallback = self.file.content[lookup.fallback.clone()].to_string();
        self.edit(
            lookup.span.clone(),
            fallback,
            RepairAction::RevertedToFallback,
            Some(lookup.key.clone()),
        );
    }

    fn unrepaired(&mut self, offset: usize, reason: impl Into<String>) {
        let context = self.context(offset);
        if self
            .result
            .unrepaired
            .iter()
            .any(|issue| issue.context.location == context.location)
        {
            return;
        }
        self.result.unrepaired.push(UnrepairedIssue {
            context,
            pass: self.pass,
            reason: reason.into(),
        });
    }

    fn finish(mut self) -> FixResult {
        if !self.edits.is_empty() {
            self.result.content = Some(apply_edits(self.file.content, self.edits));
        }
        self.result
    }
}

/// Applies non-overlapping edits; later edits overlapping earlier ones are
/// dropped.
fn apply_edits(content: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| edit.span.start);
    let mut output = String::with_capacity(content.len());
    let mut cursor = 0;
    for edit in edits {
        if edit.span.start < cursor {
            continue;
        }
        output.push_str(&content[cursor..edit.span.start]);
        output.push_str(&edit.text);
        cursor = edit.span.end;
    }
    output.push_str(&content[cursor..]);
    output
}
