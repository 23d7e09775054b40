use std::sync::LazyLock;

use regex::Regex;

use super::{FixResult, Fixer, PassState, SourceFile};
use crate::core::{
    data::RepairPass,
    structure::{LookupFinder, Outline, Scope},
};

static LATE_FIELD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\blate\b").unwrap());

/// Reverts lookups in top-level or class-member initializers, where no
/// `BuildContext` is in scope.
pub struct StaticContextFixer {
    finder: LookupFinder,
}

impl StaticContextFixer {
    pub fn new(finder: LookupFinder) -> Self {
        Self { finder }
    }
}

impl Fixer for StaticContextFixer {
    fn pass(&self) -> RepairPass {
        RepairPass::StaticContext
    }

    fn attempt(&self, file: &SourceFile) -> FixResult {
        let mut state = PassState::new(self.pass(), file);
        for lookup in state.lookups(&self.finder) {
            if in_static_initializer(&state.outline, lookup.span.start) {
                state.revert(&lookup);
            }
        }
        state.finish()
    }
}

fn in_static_initializer(outline: &Outline, pos: usize) -> bool {
    let scope = outline.scope(pos);
    if scope == Scope::Block {
        return false;
    }
    let flat = outline.flat_text(outline.statement_start(pos), pos);
    if flat.contains("=>") || !Outline::has_assignment(&flat) {
        return false;
    }
    // `late` fields are initialized lazily, with `this` available.
    !(scope == Scope::ClassBody && LATE_FIELD.is_match(&flat))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::{
        data::RepairAction,
        repair::tests::repair,
    };

    fn fixer() -> StaticContextFixer {
        StaticContextFixer::new(LookupFinder::new("AppLocalizations.of(context)").unwrap())
    }

    #[test]
    fn test_top_level_initializer_reverted() {
        let result = repair(
            &fixer(),
            "const appName = AppLocalizations.of(context)?.appName ?? 'My App';\n",
        );
        assert_eq!(result.content.as_deref(), Some("const appName = 'My App';\n"));
        assert_eq!(result.fixes[0].action, RepairAction::RevertedToFallback);
        assert_eq!(result.fixes[0].key.as_deref(), Some("appName"));
        assert_eq!(result.fixes[0].context.line(), 1);
    }

    #[test]
    fn test_field_initializer_reverted() {
        let content = "class Labels {\n  static const save = AppLocalizations.of(context)?.save ?? 'Save';\n  final cancel = Text(AppLocalizations.of(context)?.cancel ?? 'Cancel');\n}\n";
        let result = repair(&fixer(), content);
        assert_eq!(
            result.content.as_deref(),
            Some("class Labels {\n  static const save = 'Save';\n  final cancel = Text('Cancel');\n}\n")
        );
        assert_eq!(result.fixes.len(), 2);
    }

    #[test]
    fn test_method_bodies_untouched() {
        let content = "class Home {\n  String get title => AppLocalizations.of(context)?.title ?? 'Title';\n  Widget build(BuildContext context) {\n    final t = AppLocalizations.of(context)?.title ?? 'Title';\n    return Text(t);\n  }\n}\n";
        let result = repair(&fixer(), content);
        assert!(result.content.is_none());
        assert!(result.fixes.is_empty());
    }

    #[test]
    fn test_late_field_untouched() {
        let content = "class S {\n  late final label = AppLocalizations.of(context)?.label ?? 'Label';\n}\n";
        assert!(repair(&fixer(), content).content.is_none());
    }

    #[test]
    fn test_closure_in_initializer_untouched() {
        let content = "final builder = (BuildContext context) {\n  return AppLocalizations.of(context)?.hi ?? 'Hi';\n};\n";
        assert!(repair(&fixer(), content).content.is_none());
    }
}
