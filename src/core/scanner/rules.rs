//! Heuristics that reject literals which must never be localized.
//!
//! Rules are tagged variants applied in a fixed order; the first rule that
//! matches names the reason a literal was skipped.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use super::{ScanSettings, lexer::RawLiteral};
use crate::{
    core::structure::Outline,
    utils::{contains_alphabetic, floor_char_boundary},
};

/// How far back the already-wrapped rule looks for a lookup expression.
const WRAP_LOOKBEHIND: usize = 256;

static URL_LIKE: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"^[A-Za-z][A-Za-z0-9+.\-]*://",
        r"^(mailto|tel|sms|package|dart|asset|data):",
        r"^www\.",
        r"^[\w.%+\-]+@[\w.\-]+\.[A-Za-z]{2,}$",
        r"^[^\s/]*/[^\s]*$",
        r"(?i)^[\w.\-]+\.(png|jpe?g|gif|svg|webp|ico|json|arb|dart|ttf|otf|mp3|mp4|wav|txt|pdf|html?|css|js|ya?ml|xml|csv)$",
    ])
    .unwrap()
});

static IDENTIFIER_LIKE: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        // camelCase with at least one hump
        r"^[a-z][a-z0-9]*[A-Z][A-Za-z0-9]*$",
        // snake_case
        r"^[a-z][a-z0-9]*(_[a-z0-9]+)+$",
        // SCREAMING_SNAKE_CASE
        r"^[A-Z][A-Z0-9]*(_[A-Z0-9]+)+$",
    ])
    .unwrap()
});

static DIRECTIVE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(import|export|part|library)\b").unwrap());

/// A literal together with what the rules need to judge it.
pub struct LiteralSite<'a> {
    pub literal: &'a RawLiteral,
    pub source: &'a str,
    pub settings: &'a ScanSettings,
    pub outline: &'a Outline,
}

impl LiteralSite<'_> {
    /// Source text of the line the literal starts on, up to the literal.
    fn line_prefix(&self) -> &str {
        let start = self.literal.span.start;
        let line_start = self.source[..start].rfind('\n').map_or(0, |i| i + 1);
        &self.source[line_start..start]
    }

    /// Source text shortly before the literal.
    fn lookbehind(&self) -> &str {
        let start = self.literal.span.start;
        let from = floor_char_boundary(self.source, start.saturating_sub(WRAP_LOOKBEHIND));
        &self.source[from..start]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipRule {
    /// Empty or whitespace-only text.
    Blank,
    /// Shorter than the configured minimum length.
    TooShort,
    /// Digits, punctuation, phone numbers: nothing alphabetic.
    Numeric,
    /// URLs, e-mail addresses, asset and package paths.
    Url,
    /// Nothing but interpolations and punctuation.
    InterpolationOnly,
    /// Text mixed with interpolations; cannot map to a static key.
    Interpolated,
    /// Already the fallback operand of a lookup expression.
    AlreadyWrapped,
    /// URI of an import/export/part directive.
    Directive,
    /// `case` patterns, annotation and enum value arguments: constant-only
    /// positions no repair pass can open up.
    ConstContext,
    /// camelCase / snake_case / SCREAMING_CASE identifiers.
    Identifier,
    /// Listed in the config `ignoreTexts`.
    IgnoredText,
}

/// Rules in the order they are applied.
pub const DEFAULT_RULES: &[SkipRule] = &[
    SkipRule::Blank,
    SkipRule::TooShort,
    SkipRule::Numeric,
    SkipRule::Url,
    SkipRule::InterpolationOnly,
    SkipRule::Interpolated,
    SkipRule::AlreadyWrapped,
    SkipRule::Directive,
    SkipRule::ConstContext,
    SkipRule::Identifier,
    SkipRule::IgnoredText,
];

impl SkipRule {
    pub fn tag(&self) -> &'static str {
        match self {
            SkipRule::Blank => "blank",
            SkipRule::TooShort => "too-short",
            SkipRule::Numeric => "numeric",
            SkipRule::Url => "url",
            SkipRule::InterpolationOnly => "interpolation-only",
            SkipRule::Interpolated => "interpolated",
            SkipRule::AlreadyWrapped => "already-wrapped",
            SkipRule::Directive => "directive",
            SkipRule::ConstContext => "const-context",
            SkipRule::Identifier => "identifier",
            SkipRule::IgnoredText => "ignored-text",
        }
    }

    pub fn matches(&self, site: &LiteralSite) -> bool {
        let literal = site.literal;
        let trimmed = literal.text.trim();
        match self {
            SkipRule::Blank => trimmed.is_empty(),
            SkipRule::TooShort => trimmed.chars().count() < site.settings.min_text_length,
            SkipRule::Numeric => literal.interpolations == 0 && !contains_alphabetic(trimmed),
            SkipRule::Url => literal.interpolations == 0 && URL_LIKE.is_match(trimmed),
            SkipRule::InterpolationOnly => {
                literal.interpolations > 0 && !contains_alphabetic(&literal.plain)
            }
            SkipRule::Interpolated => literal.interpolations > 0,
            SkipRule::AlreadyWrapped => site.settings.wrapped_fallback.is_match(site.lookbehind()),
            SkipRule::Directive => DIRECTIVE_LINE.is_match(site.line_prefix()),
            SkipRule::ConstContext => site.outline.constant_context(&literal.span).is_some(),
            SkipRule::Identifier => IDENTIFIER_LIKE.is_match(trimmed),
            SkipRule::IgnoredText => site.settings.ignore_texts.contains(trimmed),
        }
    }

    /// First rule in `rules` that rejects the literal.
    pub fn first_match(rules: &[SkipRule], site: &LiteralSite) -> Option<SkipRule> {
        rules.iter().copied().find(|rule| rule.matches(site))
    }
}

impl std::fmt::Display for SkipRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
