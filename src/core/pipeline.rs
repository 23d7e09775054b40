//! Per-file orchestration of the rewrite stages.
//!
//! ```text
//! Scanner → Resolver → Rewriter → repair passes → ImportFixer
//! ```
//!
//! The import is inserted last so that lookups reverted by a repair pass
//! never leave an unused import behind, and so that every reported line
//! number is a line of the original file.

use std::{collections::BTreeMap, path::Path};

use anyhow::Result;

use crate::{
    config::Config,
    core::{
        data::{AppliedRepair, FileChangeRecord, RepairAction, Replacement, SourceLocation},
        dictionary::Dictionary,
        imports::ImportFixer,
        repair::{Fixer, RepairGroups, default_fixers, run_fixers},
        resolver::Resolver,
        rewriter::{Rewriter, apply_replacements},
        scanner::{ScanSettings, Scanner},
    },
    issues::{
        AmbiguousKeyIssue, Issue, LocalizableIssue, MissingTranslationIssue, RevertedIssue,
        UnrepairedIssue,
    },
};

/// What processing one file produced.
#[derive(Debug)]
pub struct FileOutcome {
    pub record: FileChangeRecord,
    /// The new buffer; `None` when the file is unchanged.
    pub content: Option<String>,
    pub issues: Vec<Issue>,
}

/// What happens to the repairs the passes find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairMode {
    /// Keep the repaired buffer.
    Apply,
    /// Keep the buffer as rewritten and report every repair it still needs.
    Report,
}

/// Import fixing plus the enabled repair passes.
struct PostProcess {
    imports: Option<ImportFixer>,
    fixers: Vec<Box<dyn Fixer>>,
    mode: RepairMode,
}

impl PostProcess {
    fn new(
        config: &Config,
        imports: bool,
        groups: Option<RepairGroups>,
        mode: RepairMode,
    ) -> Result<Self> {
        let imports = imports.then(|| {
            ImportFixer::new(
                &config.lookup_accessor,
                &config.source_root,
                &config.localizations_module,
            )
        });
        let fixers = match groups {
            Some(groups) => default_fixers(&config.lookup_accessor, groups)?,
            None => Vec::new(),
        };
        Ok(Self {
            imports,
            fixers,
            mode,
        })
    }

    /// Runs the repair passes and then the import fixer over `buffer`,
    /// updating `record` and `issues`.
    fn apply(
        &self,
        file_path: &str,
        buffer: String,
        record: &mut FileChangeRecord,
        issues: &mut Vec<Issue>,
    ) -> String {
        let mut buffer = buffer;
        if !self.fixers.is_empty() && self.mode == RepairMode::Report {
            let outcome = run_fixers(&self.fixers, file_path, &buffer);
            issues.extend(outcome.fixes.iter().map(|fix| {
                Issue::from(UnrepairedIssue {
                    context: fix.context.clone(),
                    pass: fix.pass,
                    reason: pending_reason(fix),
                })
            }));
            issues.extend(outcome.unrepaired.into_iter().map(Issue::from));
        } else if !self.fixers.is_empty() {
            let outcome = run_fixers(&self.fixers, file_path, &buffer);
            buffer = outcome.content;
            for fix in outcome.fixes {
                if let Some(key) = &fix.key {
                    let reverted = record
                        .replacements
                        .iter()
                        .position(|r| r.key == *key && r.context.line() == fix.context.line());
                    if let Some(index) = reverted {
                        record.replacements.remove(index);
                    }
                    issues.push(
                        RevertedIssue {
                            context: fix.context.clone(),
                            pass: fix.pass,
                            key: key.clone(),
                        }
                        .into(),
                    );
                }
                record.repairs.push(fix);
            }
            issues.extend(outcome.unrepaired.into_iter().map(Issue::from));
        }

        if let Some(imports) = &self.imports
            && let Some((with_import, line)) = imports.fix(Path::new(file_path), &buffer)
        {
            tracing::debug!("{}: added {}", file_path, line);
            buffer = with_import;
            record.import_added = Some(line);
        }
        buffer
    }
}

/// Why a repair the passes would have applied is still needed.
fn pending_reason(fix: &AppliedRepair) -> String {
    match (fix.action, &fix.key) {
        (RepairAction::RemovedConst, _) => "enclosing `const` must be removed".to_string(),
        (RepairAction::ConstToFinal, _) => "`const` declaration must become `final`".to_string(),
        (RepairAction::RevertedToFallback, Some(key)) => {
            format!("lookup of `{}` must be reverted to its fallback literal", key)
        }
        (RepairAction::RevertedToFallback, None) => {
            "lookup must be reverted to its fallback literal".to_string()
        }
    }
}

/// The full localize flow for one file at a time.
pub struct Localizer<'a> {
    settings: ScanSettings,
    resolver: Resolver<'a>,
    rewriter: Rewriter<'a>,
    post: PostProcess,
}

impl<'a> Localizer<'a> {
    /// Every repair pass runs after the rewrite. With `repair` its fixes are
    /// kept; without it each needed fix is reported as unrepaired.
    pub fn new(config: &'a Config, dictionary: &'a Dictionary, repair: bool) -> Result<Self> {
        let mode = if repair {
            RepairMode::Apply
        } else {
            RepairMode::Report
        };
        let settings = ScanSettings::new(
            &config.lookup_accessor,
            config.min_text_length,
            &config.ignore_texts,
        )?;
        Ok(Self {
            settings,
            resolver: Resolver::new(dictionary),
            rewriter: Rewriter::new(&config.lookup_accessor),
            post: PostProcess::new(config, true, Some(RepairGroups::default()), mode)?,
        })
    }

    /// Scans and resolves one file, returning the planned replacements and
    /// the review items for candidates that cannot be rewritten.
    pub fn plan(&self, file_path: &str, content: &str) -> (Vec<Replacement>, Vec<Issue>) {
        let mut replacements = Vec::new();
        let mut issues = Vec::new();
        for candidate in Scanner::new(file_path, content, &self.settings) {
            let Some(found) = self.resolver.resolve(&candidate) else {
                continue;
            };
            if found.is_ambiguous() {
                issues.push(
                    AmbiguousKeyIssue {
                        context: candidate.context.clone(),
                        key: found.key.to_string(),
                        alternatives: found.alternatives.to_vec(),
                    }
                    .into(),
                );
            }
            match self.rewriter.plan(&candidate, &found) {
                Ok(replacement) => replacements.push(replacement),
                Err(issue) => issues.push(issue),
            }
        }
        (replacements, issues)
    }

    /// Localizable literals of one file, for `scan`.
    pub fn localizable(&self, file_path: &str, content: &str) -> Vec<Issue> {
        let (replacements, mut issues) = self.plan(file_path, content);
        issues.extend(replacements.into_iter().map(|replacement| {
            Issue::from(LocalizableIssue {
                context: replacement.context,
                text: replacement.original,
                key: replacement.key,
            })
        }));
        issues
    }

    /// Rewrites one file in memory.
    pub fn process(&self, file_path: &str, content: &str) -> FileOutcome {
        let (planned, mut issues) = self.plan(file_path, content);
        let mut record = FileChangeRecord::new(file_path);
        let (buffer, applied) = apply_replacements(content, planned);
        record.replacements = applied;

        let buffer = self.post.apply(file_path, buffer, &mut record, &mut issues);
        FileOutcome {
            content: (buffer != content).then_some(buffer),
            record,
            issues,
        }
    }
}

/// Import fixing and repair passes over files that already use lookups.
pub struct Repairer {
    post: PostProcess,
}

impl Repairer {
    pub fn new(config: &Config, imports: bool, groups: RepairGroups) -> Result<Self> {
        Ok(Self {
            post: PostProcess::new(config, imports, Some(groups), RepairMode::Apply)?,
        })
    }

    pub fn process(&self, file_path: &str, content: &str) -> FileOutcome {
        let mut record = FileChangeRecord::new(file_path);
        let mut issues = Vec::new();
        let buffer = self
            .post
            .apply(file_path, content.to_string(), &mut record, &mut issues);
        FileOutcome {
            content: (buffer != content).then_some(buffer),
            record,
            issues,
        }
    }
}

/// Localized keys absent from the target-language dictionary, with the
/// places they were used.
pub fn missing_translations(records: &[FileChangeRecord], target: &Dictionary) -> Vec<Issue> {
    let mut missing: BTreeMap<&str, Vec<SourceLocation>> = BTreeMap::new();
    for replacement in records.iter().flat_map(|record| &record.replacements) {
        if !target.contains_key(&replacement.key) {
            missing
                .entry(&replacement.key)
                .or_default()
                .push(replacement.context.location.clone());
        }
    }
    missing
        .into_iter()
        .map(|(key, usages)| {
            MissingTranslationIssue {
                key: key.to_string(),
                file_path: target.file_path().to_string(),
                usages,
            }
            .into()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        core::dart::decode_literal,
        issues::{Report, Rule},
    };

    fn dictionary(json: &str) -> Dictionary {
        Dictionary::parse("lib/l10n/app_en.arb", json).unwrap()
    }

    fn rules(issues: &[Issue]) -> Vec<Rule> {
        issues.iter().map(|issue| issue.rule()).collect()
    }

    const HOME: &str = "\
import 'package:flutter/material.dart';

class Home extends StatelessWidget {
  @override
  Widget build(BuildContext context) {
    return const Text('Welcome');
  }
}
";

    #[test]
    fn test_welcome_scenario() {
        let config = Config::default();
        let dict = dictionary(r#"{"@@locale": "en", "welcome": "Welcome"}"#);
        let localizer = Localizer::new(&config, &dict, true).unwrap();

        let outcome = localizer.process("lib/home.dart", HOME);

        assert_eq!(
            outcome.content.as_deref(),
            Some(
                "\
import 'package:flutter/material.dart';
import 'l10n/app_localizations.dart';

class Home extends StatelessWidget {
  @override
  Widget build(BuildContext context) {
    return Text(AppLocalizations.of(context)?.welcome ?? 'Welcome');
  }
}
"
            )
        );
        assert_eq!(outcome.record.replacements.len(), 1);
        assert_eq!(outcome.record.replacements[0].context.line(), 6);
        assert_eq!(
            outcome.record.import_added.as_deref(),
            Some("import 'l10n/app_localizations.dart';")
        );
        assert_eq!(outcome.record.repairs.len(), 1);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_without_repair_const_is_left_in_place_and_reported() {
        let config = Config::default();
        let dict = dictionary(r#"{"welcome": "Welcome"}"#);
        let localizer = Localizer::new(&config, &dict, false).unwrap();

        let outcome = localizer.process("lib/home.dart", HOME);

        let content = outcome.content.unwrap();
        assert!(content.contains("return const Text(AppLocalizations.of(context)?.welcome ?? 'Welcome');"));
        assert!(outcome.record.repairs.is_empty());
        assert_eq!(outcome.record.replacements.len(), 1);
        assert_eq!(rules(&outcome.issues), vec![Rule::Unrepaired]);
        assert_eq!(outcome.issues[0].line(), 6);
        assert_eq!(outcome.issues[0].message(), "enclosing `const` must be removed");
    }

    #[test]
    fn test_without_repair_static_initializer_is_reported() {
        let config = Config::default();
        let dict = dictionary(r#"{"appTitle": "My App"}"#);
        let localizer = Localizer::new(&config, &dict, false).unwrap();

        let outcome = localizer.process("lib/app.dart", "final appTitle = 'My App';\n");

        assert_eq!(rules(&outcome.issues), vec![Rule::Unrepaired]);
        assert_eq!(
            outcome.issues[0].message(),
            "lookup of `appTitle` must be reverted to its fallback literal"
        );
    }

    #[test]
    fn test_constant_only_positions_left_alone() {
        let config = Config::default();
        let dict = dictionary(
            r#"{"home": "Home page", "deprecated": "Use newer API", "save": "Save draft"}"#,
        );
        let localizer = Localizer::new(&config, &dict, true).unwrap();
        let content = "\
enum Tab {
  home('Home page');

  const Tab(this.label);
  final String label;
}

@Deprecated('Use newer API')
void old() {}

int order(String action) {
  switch (action) {
    case 'Save draft':
      return 1;
  }
  return 0;
}
";

        let outcome = localizer.process("lib/tabs.dart", content);

        assert!(outcome.content.is_none());
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let config = Config::default();
        let dict = dictionary(r#"{"welcome": "Welcome"}"#);
        let localizer = Localizer::new(&config, &dict, true).unwrap();

        let once = localizer.process("lib/home.dart", HOME).content.unwrap();
        let twice = localizer.process("lib/home.dart", &once);

        assert!(twice.content.is_none());
        assert!(!twice.record.is_modified());
        assert_eq!(once.matches("import 'l10n/app_localizations.dart';").count(), 1);
    }

    #[test]
    fn test_url_and_blank_literals_untouched() {
        let config = Config::default();
        let dict = dictionary(r#"{"site": "https://example.com", "space": " "}"#);
        let localizer = Localizer::new(&config, &dict, true).unwrap();

        let content = "void f() {\n  launch('https://example.com');\n  print(' ');\n}\n";
        let outcome = localizer.process("lib/links.dart", content);

        assert!(outcome.content.is_none());
        assert!(outcome.record.replacements.is_empty());
    }

    #[test]
    fn test_fallback_round_trips_in_output() {
        let config = Config::default();
        let dict = dictionary(r#"{"price": "It's $5"}"#);
        let localizer = Localizer::new(&config, &dict, false).unwrap();

        let content = "Widget f(BuildContext context) => Text(\"It's \\$5\");\n";
        let outcome = localizer.process("lib/price.dart", content);

        let output = outcome.content.unwrap();
        let start = output.find("?? ").unwrap() + 3;
        let end = output.rfind(')').unwrap();
        assert_eq!(decode_literal(&output[start..end]).as_deref(), Some("It's $5"));
        assert_eq!(outcome.record.replacements[0].original, "It's $5");
    }

    #[test]
    fn test_ambiguous_key_uses_first_and_reports() {
        let config = Config::default();
        let dict = dictionary(r#"{"save": "Save", "saveButton": "Save"}"#);
        let localizer = Localizer::new(&config, &dict, false).unwrap();

        let outcome = localizer.process(
            "lib/form.dart",
            "Widget f(BuildContext context) => Text('Save');\n",
        );

        assert!(outcome.content.unwrap().contains("?.save ?? 'Save'"));
        assert_eq!(rules(&outcome.issues), vec![Rule::AmbiguousKey]);
    }

    #[test]
    fn test_invalid_key_is_left_for_review() {
        let config = Config::default();
        let dict = dictionary(r#"{"sign-in": "Sign in"}"#);
        let localizer = Localizer::new(&config, &dict, false).unwrap();

        let outcome = localizer.process(
            "lib/auth.dart",
            "Widget f(BuildContext context) => Text('Sign in');\n",
        );

        assert!(outcome.content.is_none());
        assert_eq!(rules(&outcome.issues), vec![Rule::InvalidAccessor]);
    }

    #[test]
    fn test_reverted_lookup_is_not_counted_as_localized() {
        let config = Config::default();
        let dict = dictionary(r#"{"appTitle": "My App"}"#);
        let localizer = Localizer::new(&config, &dict, true).unwrap();

        let content = "final appTitle = 'My App';\n";
        let outcome = localizer.process("lib/app.dart", content);

        assert!(outcome.content.is_none());
        assert!(outcome.record.replacements.is_empty());
        assert!(outcome.record.import_added.is_none());
        assert_eq!(rules(&outcome.issues), vec![Rule::Reverted]);
        assert_eq!(outcome.issues[0].line(), 1);
    }

    #[test]
    fn test_localizable_lists_candidates_with_keys() {
        let config = Config::default();
        let dict = dictionary(r#"{"welcome": "Welcome"}"#);
        let localizer = Localizer::new(&config, &dict, false).unwrap();

        let issues = localizer.localizable("lib/home.dart", HOME);

        assert_eq!(rules(&issues), vec![Rule::Localizable]);
        assert_eq!(issues[0].line(), 6);
    }

    #[test]
    fn test_repairer_fixes_imports_and_const() {
        let config = Config::default();
        let repairer = Repairer::new(&config, true, RepairGroups::default()).unwrap();
        let content = "\
import 'package:flutter/material.dart';

Widget f(BuildContext context) {
  return const Text(AppLocalizations.of(context)?.hi ?? 'Hi');
}
";
        let outcome = repairer.process("lib/hi.dart", content);

        assert_eq!(
            outcome.content.as_deref(),
            Some(
                "\
import 'package:flutter/material.dart';
import 'l10n/app_localizations.dart';

Widget f(BuildContext context) {
  return Text(AppLocalizations.of(context)?.hi ?? 'Hi');
}
"
            )
        );
        assert_eq!(outcome.record.repairs.len(), 1);
    }

    #[test]
    fn test_repairer_without_imports() {
        let config = Config::default();
        let repairer = Repairer::new(
            &config,
            false,
            RepairGroups {
                constness: true,
                context: false,
            },
        )
        .unwrap();
        let outcome = repairer.process("lib/hi.dart", "var x = AppLocalizations.of(context)?.hi ?? 'Hi';\n");

        assert!(outcome.content.is_none());
    }

    #[test]
    fn test_missing_translations_grouped_by_key() {
        let config = Config::default();
        let dict = dictionary(r#"{"welcome": "Welcome", "bye": "Goodbye"}"#);
        let target = Dictionary::parse("lib/l10n/app_es.arb", r#"{"bye": "Adiós"}"#).unwrap();
        let localizer = Localizer::new(&config, &dict, false).unwrap();

        let a = localizer.process("lib/a.dart", "f(c) => [Text('Welcome'), Text('Goodbye')];\n");
        let b = localizer.process("lib/b.dart", "f(c) => Text('Welcome');\n");
        let issues = missing_translations(&[a.record, b.record], &target);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].file_path(), "lib/l10n/app_es.arb");
        assert_eq!(
            issues[0].details().as_deref(),
            Some("used at lib/a.dart:1, lib/b.dart:1")
        );
    }
}
