use std::sync::LazyLock;

use regex::Regex;

use super::{FixResult, Fixer, PassState, SourceFile};
use crate::core::{
    data::{RepairAction, RepairPass},
    structure::{LookupFinder, Outline, Scope},
};

static CONST_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(static\s+)?const\b").unwrap());

/// Turns a local `const x = <lookup>` into `final x = <lookup>`.
///
/// Non-local constant declarations cannot hold a lookup at all and are
/// reported as unrepaired.
pub struct ConstDeclarationFixer {
    finder: LookupFinder,
}

impl ConstDeclarationFixer {
    pub fn new(finder: LookupFinder) -> Self {
        Self { finder }
    }
}

impl Fixer for ConstDeclarationFixer {
    fn pass(&self) -> RepairPass {
        RepairPass::ConstDeclaration
    }

    fn attempt(&self, file: &SourceFile) -> FixResult {
        let mut state = PassState::new(self.pass(), file);
        for lookup in state.lookups(&self.finder) {
            let pos = lookup.span.start;
            let start = state.outline.statement_start(pos);
            let flat = state.outline.flat_text(start, pos);
            let Some(keyword) = CONST_DECLARATION.find(&flat) else {
                continue;
            };
            if !Outline::has_assignment(&flat) {
                continue;
            }
            match state.outline.scope(pos) {
                Scope::Block if keyword.as_str() == "const" => {
                    state.edit(start..start + 5, "final", RepairAction::ConstToFinal, None);
                }
                _ => state.unrepaired(
                    start,
                    format!("lookup of `{}` in a constant declaration", lookup.key),
                ),
            }
        }
        state.finish()
    }
}
