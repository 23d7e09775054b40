use super::{FixResult, Fixer, PassState, SourceFile};
use crate::core::{
    data::RepairPass,
    structure::{BraceKind, FrameKind, LookupFinder, Outline},
};

/// Reverts lookups used as default values of optional parameters, which
/// must be constant.
pub struct DefaultParameterFixer {
    finder: LookupFinder,
}

impl DefaultParameterFixer {
    pub fn new(finder: LookupFinder) -> Self {
        Self { finder }
    }
}

impl Fixer for DefaultParameterFixer {
    fn pass(&self) -> RepairPass {
        RepairPass::DefaultParameter
    }

    fn attempt(&self, file: &SourceFile) -> FixResult {
        let mut state = PassState::new(self.pass(), file);
        for lookup in state.lookups(&self.finder) {
            if is_default_value(&state.outline, lookup.span.start) {
                state.revert(&lookup);
            }
        }
        state.finish()
    }
}

/// Whether `pos` sits in the default value of a `{named}` or `[positional]`
/// optional parameter.
fn is_default_value(outline: &Outline, pos: usize) -> bool {
    let frames = outline.enclosing(pos);
    for (i, frame) in frames.iter().enumerate() {
        match frame.kind {
            FrameKind::Brace(BraceKind::Group) | FrameKind::Bracket => {
                let in_parens = frames
                    .get(i + 1)
                    .is_some_and(|parent| parent.kind == FrameKind::Paren);
                if !in_parens {
                    continue;
                }
                let flat = outline.flat_text(frame.open + 1, pos);
                let parameter = flat.rsplit(',').next().unwrap_or_default();
                return Outline::has_assignment(parameter);
            }
            FrameKind::Brace(BraceKind::ClassBody | BraceKind::Block) => return false,
            _ => {}
        }
    }
    false
}
