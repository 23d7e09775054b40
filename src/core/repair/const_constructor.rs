use super::{FixResult, Fixer, PassState, SourceFile};
use crate::core::{
    data::{RepairAction, RepairPass},
    structure::LookupFinder,
};

/// Removes `const` from every constructor call or collection literal whose
/// arguments contain a lookup.
pub struct ConstConstructorFixer {
    finder: LookupFinder,
}

impl ConstConstructorFixer {
    pub fn new(finder: LookupFinder) -> Self {
        Self { finder }
    }
}

impl Fixer for ConstConstructorFixer {
    fn pass(&self) -> RepairPass {
        RepairPass::ConstConstructor
    }

    fn attempt(&self, file: &SourceFile) -> FixResult {
        let mut state = PassState::new(self.pass(), file);
        let skeleton = state.outline.skeleton().to_string();
        for lookup in state.lookups(&self.finder) {
            let frames = state.outline.enclosing(lookup.span.start);
            let keywords: Vec<usize> = frames
                .iter()
                .take_while(|frame| frame.kind.is_expression())
                .filter_map(|frame| state.outline.const_before(frame))
                .collect();
            for start in keywords {
                let rest = &skeleton[start + 5..];
                let end = start + 5 + (rest.len() - rest.trim_start_matches([' ', '\t']).len());
                state.edit(start..end, "", RepairAction::RemovedConst, None);
            }
        }
        state.finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::repair::tests::repair;

    fn fixer() -> ConstConstructorFixer {
        ConstConstructorFixer::new(LookupFinder::new("AppLocalizations.of(context)").unwrap())
    }

    #[test]
    fn test_const_text_loses_const() {
        let content = "Widget build(BuildContext context) {\n  return const Text(AppLocalizations.of(context)?.hello ?? 'Hello');\n}\n";
        let result = repair(&fixer(), content);
        assert_eq!(
            result.content.as_deref(),
            Some("Widget build(BuildContext context) {\n  return Text(AppLocalizations.of(context)?.hello ?? 'Hello');\n}\n")
        );
        assert_eq!(result.fixes[0].action, RepairAction::RemovedConst);
    }

    #[test]
    fn test_every_enclosing_const_removed() {
        let content = "Widget build(BuildContext context) {\n  return const Column(children: const [Text(AppLocalizations.of(context)?.a ?? 'A')]);\n}\n";
        let result = repair(&fixer(), content);
        assert_eq!(
            result.content.as_deref(),
            Some("Widget build(BuildContext context) {\n  return Column(children: [Text(AppLocalizations.of(context)?.a ?? 'A')]);\n}\n")
        );
        assert_eq!(result.fixes.len(), 2);
    }

    #[test]
    fn test_sibling_const_untouched() {
        let content = "Widget build(BuildContext context) {\n  return Row(children: [const Icon(Icons.add), Text(AppLocalizations.of(context)?.add ?? 'Add')]);\n}\n";
        assert!(repair(&fixer(), content).content.is_none());
    }

    #[test]
    fn test_shared_const_removed_once() {
        let content = "Widget build(BuildContext context) {\n  return const Row(children: [Text(AppLocalizations.of(context)?.a ?? 'A'), Text(AppLocalizations.of(context)?.b ?? 'B')]);\n}\n";
        let result = repair(&fixer(), content);
        assert_eq!(result.fixes.len(), 1);
        assert!(result.content.unwrap().contains("return Row("));
    }
}
