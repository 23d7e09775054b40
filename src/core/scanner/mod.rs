//! String scanner: finds string literals in a Dart file and yields the ones
//! worth localizing.

pub mod lexer;
pub mod rules;

use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;

use crate::core::{
    data::{Candidate, LineIndex, SourceContext, SourceLocation},
    structure::Outline,
};
pub use lexer::{LiteralLexer, RawLiteral};
pub use rules::{DEFAULT_RULES, LiteralSite, SkipRule};

/// Scanner configuration derived once per run.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub min_text_length: usize,
    pub ignore_texts: HashSet<String>,
    /// Matches source text that ends right before a lookup's fallback operand.
    pub wrapped_fallback: Regex,
}

impl ScanSettings {
    pub fn new<I, S>(lookup_accessor: &str, min_text_length: usize, ignore_texts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pattern = format!(
            r"{}\s*\??\.\s*[A-Za-z_$][\w$]*\s*\?\?\s*$",
            regex::escape(lookup_accessor.trim())
        );
        let wrapped_fallback = Regex::new(&pattern)
            .with_context(|| format!("Invalid lookup accessor: \"{}\"", lookup_accessor))?;
        Ok(Self {
            min_text_length,
            ignore_texts: ignore_texts
                .into_iter()
                .map(|text| text.as_ref().trim().to_string())
                .collect(),
            wrapped_fallback,
        })
    }
}

/// Lazy per-file sequence of localization candidates.
///
/// Restartable: create a new `Scanner` over the same content to scan again.
pub struct Scanner<'a> {
    file_path: &'a str,
    content: &'a str,
    settings: &'a ScanSettings,
    rules: &'a [SkipRule],
    lexer: LiteralLexer<'a>,
    index: LineIndex,
    outline: Outline,
}

impl<'a> Scanner<'a> {
    pub fn new(file_path: &'a str, content: &'a str, settings: &'a ScanSettings) -> Self {
        Self::with_rules(file_path, content, settings, DEFAULT_RULES)
    }

    pub fn with_rules(
        file_path: &'a str,
        content: &'a str,
        settings: &'a ScanSettings,
        rules: &'a [SkipRule],
    ) -> Self {
        Self {
            file_path,
            content,
            settings,
            rules,
            lexer: LiteralLexer::new(content),
            index: LineIndex::new(content),
            outline: Outline::new(content),
        }
    }
}

/// Builds the located context of a byte offset.
pub fn context_at(index: &LineIndex, file_path: &str, content: &str, offset: usize) -> SourceContext {
    let (line, col) = index.location(content, offset);
    SourceContext::new(
        SourceLocation::new(file_path, line, col),
        index.line_text(content, line),
    )
}

impl Iterator for Scanner<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        for literal in self.lexer.by_ref() {
            if literal.multiline {
                tracing::trace!(
                    "{}:{}: skipped multi-line literal",
                    self.file_path,
                    self.index.line_of(literal.span.start)
                );
                continue;
            }

            let site = LiteralSite {
                literal: &literal,
                source: self.content,
                settings: self.settings,
                outline: &self.outline,
            };
            if let Some(rule) = SkipRule::first_match(self.rules, &site) {
                tracing::trace!(
                    "{}:{}: skipped {:?} ({})",
                    self.file_path,
                    self.index.line_of(literal.span.start),
                    literal.text,
                    rule
                );
                continue;
            }

            return Some(Candidate {
                context: context_at(&self.index, self.file_path, self.content, literal.span.start),
                span: literal.span,
                text: literal.text,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn settings() -> ScanSettings {
        ScanSettings::new("AppLocalizations.of(context)", 2, Vec::<String>::new()).unwrap()
    }

    fn scan(content: &str) -> Vec<Candidate> {
        let settings = settings();
        Scanner::new("lib/main.dart", content, &settings).collect()
    }

    #[test]
    fn test_candidate_location() {
        let content = "import 'package:flutter/material.dart';\n\nWidget build() => Text('Welcome');\n";
        let candidates = scan(content);

        assert_eq!(candidates.len(), 1);
        let candidate = &candidates[0];
        assert_eq!(candidate.text, "Welcome");
        assert_eq!(candidate.context.line(), 3);
        assert_eq!(candidate.context.col(), 24);
        assert_eq!(
            candidate.context.source_line,
            "Widget build() => Text('Welcome');"
        );
        assert_eq!(&content[candidate.span.clone()], "'Welcome'");
    }

    #[test]
    fn test_blank_literal_is_never_a_candidate() {
        assert!(scan("Text(''); Text('   '); Text(\"\");").is_empty());
    }

    #[test]
    fn test_url_is_not_a_candidate() {
        assert!(scan("launchUrl(Uri.parse(\"https://example.com\"));").is_empty());
    }

    #[test]
    fn test_multiline_literals_skipped() {
        let content = "Text('''Terms\nof service''');\nText('Accept');";
        let texts: Vec<String> = scan(content).into_iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["Accept"]);
    }

    #[test]
    fn test_already_wrapped_literal_skipped() {
        let content = "Text(AppLocalizations.of(context)?.welcome ?? 'Welcome');";
        assert!(scan(content).is_empty());
    }

    #[test]
    fn test_constant_only_positions_are_not_candidates() {
        let content = "\
enum Tab {
  home('Home');

  const Tab(this.label);
  final String label;
}

@Deprecated('Use newer API')
void old() {}

int order(String action) {
  switch (action) {
    case 'Save':
      return 1;
  }
  return 0;
}

Widget build() => Text('Welcome');
";
        let texts: Vec<String> = scan(content).into_iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["Welcome"]);
    }

    #[test]
    fn test_candidate_text_keeps_surrounding_whitespace() {
        let candidates = scan("Text('  Sign in  ');");
        assert_eq!(candidates[0].text, "  Sign in  ");
    }

    #[test]
    fn test_scanner_is_restartable() {
        let settings = settings();
        let content = "a('Save'); b('Cancel');";
        let first: Vec<Candidate> = Scanner::new("x.dart", content, &settings).collect();
        let second: Vec<Candidate> = Scanner::new("x.dart", content, &settings).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_custom_rule_list() {
        let settings = settings();
        let content = "Text('userId');";
        let all_rules: Vec<Candidate> = Scanner::new("x.dart", content, &settings).collect();
        assert!(all_rules.is_empty());

        let relaxed: Vec<Candidate> =
            Scanner::with_rules("x.dart", content, &settings, &[SkipRule::Blank]).collect();
        assert_eq!(relaxed.len(), 1);
    }

    #[test]
    fn test_accessor_is_matched_literally() {
        let settings = ScanSettings::new("S.of(context", 2, ["x"]).unwrap();
        assert!(settings.wrapped_fallback.is_match("S.of(context?.k ?? "));
    }
}
