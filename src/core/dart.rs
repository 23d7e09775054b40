//! Small pieces of Dart lexical grammar used when generating code.

use crate::core::scanner::LiteralLexer;

const RESERVED_WORDS: &[&str] = &[
    "assert", "break", "case", "catch", "class", "const", "continue", "default", "do", "else",
    "enum", "extends", "false", "final", "finally", "for", "if", "in", "is", "new", "null",
    "rethrow", "return", "super", "switch", "this", "throw", "true", "try", "var", "void",
    "while", "with",
];

/// Escapes `text` for the body of a single-quoted, non-raw Dart literal.
pub fn escape_single_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '\'' => out.push_str(r"\'"),
            '$' => out.push_str(r"\$"),
            '\n' => out.push_str(r"\n"),
            '\r' => out.push_str(r"\r"),
            '\t' => out.push_str(r"\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Renders `text` as a single-quoted Dart literal.
pub fn single_quoted(text: &str) -> String {
    format!("'{}'", escape_single_quoted(text))
}

/// Decodes a complete Dart literal (quotes included) back to its text.
///
/// Returns `None` unless `literal` is exactly one terminated literal
/// without interpolation.
pub fn decode_literal(literal: &str) -> Option<String> {
    let mut lexer = LiteralLexer::new(literal);
    let decoded = lexer.next()?;
    if decoded.span != (0..literal.len())
        || decoded.multiline
        || decoded.interpolations > 0
        || lexer.next().is_some()
    {
        return None;
    }
    Some(decoded.text)
}

/// Whether `name` can follow `?.` as a getter name.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !RESERVED_WORDS.contains(&name)
}
