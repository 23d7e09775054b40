//! Lexical scan of Dart string literals.
//!
//! This is not a Dart parser. It only knows enough of the lexical grammar to
//! find string literals reliably: line comments, nested block comments,
//! single/double/triple quoted and raw strings, and `$name` / `${expr}`
//! interpolation (strings nested inside an interpolation belong to the
//! enclosing literal and are never yielded on their own).

use crate::core::data::Span;

/// A string literal exactly as found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLiteral {
    /// Byte span including the raw prefix and the quotes.
    pub span: Span,
    /// Decoded text. Interpolations are kept verbatim (`$name`, `${expr}`).
    pub text: String,
    /// Decoded text with interpolations removed.
    pub plain: String,
    pub interpolations: usize,
    pub raw: bool,
    pub triple: bool,
    /// Contains a line break, or runs to the end of line/file unterminated.
    pub multiline: bool,
}

/// Iterator over the top-level string literals of a source buffer.
pub struct LiteralLexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> LiteralLexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }
}

impl Iterator for LiteralLexer<'_> {
    type Item = RawLiteral;

    fn next(&mut self) -> Option<RawLiteral> {
        while self.pos < self.bytes.len() {
            if let Some(end) = skip_comment(self.bytes, self.pos) {
                self.pos = end;
                continue;
            }
            if let Some(raw) = literal_start(self.bytes, self.pos) {
                let literal = lex_string(self.src, self.pos, raw);
                self.pos = literal.span.end.max(self.pos + 1);
                return Some(literal);
            }
            self.pos += 1;
        }
        None
    }
}

/// Copy of `src` with comments and string literals blanked to spaces.
///
/// Byte offsets and line breaks are preserved, so structural searches over
/// the skeleton map 1:1 back onto the source.
pub fn code_skeleton(src: &str) -> String {
    let bytes = src.as_bytes();
    let mut out = bytes.to_vec();
    let mut pos = 0;
    while pos < bytes.len() {
        let end = if let Some(end) = skip_comment(bytes, pos) {
            end
        } else if let Some(raw) = literal_start(bytes, pos) {
            lex_string(src, pos, raw).span.end.max(pos + 1)
        } else {
            pos += 1;
            continue;
        };
        for b in &mut out[pos..end] {
            if *b != b'\n' {
                *b = b' ';
            }
        }
        pos = end;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Returns `Some(is_raw)` if a string literal starts at `pos`.
fn literal_start(bytes: &[u8], pos: usize) -> Option<bool> {
    match bytes[pos] {
        b'\'' | b'"' => Some(false),
        b'r' | b'R'
            if matches!(bytes.get(pos + 1), Some(b'\'' | b'"'))
                && !pos
                    .checked_sub(1)
                    .is_some_and(|prev| is_identifier_byte(bytes[prev])) =>
        {
            Some(true)
        }
        _ => None,
    }
}

/// Returns the position after a comment starting at `pos`, if any.
fn skip_comment(bytes: &[u8], pos: usize) -> Option<usize> {
    if bytes[pos] != b'/' {
        return None;
    }
    match bytes.get(pos + 1) {
        Some(b'/') => {
            let end = bytes[pos..]
                .iter()
                .position(|&b| b == b'\n')
                .map(|i| pos + i)
                .unwrap_or(bytes.len());
            Some(end)
        }
        Some(b'*') => {
            // Dart block comments nest.
            let mut depth = 1;
            let mut i = pos + 2;
            while i < bytes.len() && depth > 0 {
                if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
                    depth += 1;
                    i += 2;
                } else if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    depth -= 1;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            Some(i)
        }
        _ => None,
    }
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn lex_string(src: &str, start: usize, raw: bool) -> RawLiteral {
    let bytes = src.as_bytes();
    let mut p = if raw { start + 1 } else { start };
    let quote = bytes[p];
    let triple = bytes.get(p + 1) == Some(&quote) && bytes.get(p + 2) == Some(&quote);
    p += if triple { 3 } else { 1 };

    let mut text = String::new();
    let mut plain = String::new();
    let mut interpolations = 0;
    let mut multiline = false;

    loop {
        if p >= bytes.len() {
            multiline = true;
            break;
        }
        let b = bytes[p];
        if triple {
            if b == quote && bytes.get(p + 1) == Some(&quote) && bytes.get(p + 2) == Some(&quote) {
                p += 3;
                break;
            }
        } else if b == quote {
            p += 1;
            break;
        } else if b == b'\n' {
            // Unterminated single-line literal; leave the newline alone.
            multiline = true;
            break;
        }

        if b == b'\n' {
            multiline = true;
        }

        if !raw && b == b'\\' {
            let (decoded, next) = decode_escape(src, p);
            text.push_str(&decoded);
            plain.push_str(&decoded);
            p = next;
            continue;
        }

        if !raw && b == b'$' {
            match bytes.get(p + 1) {
                Some(b'{') => {
                    let end = skip_interpolation(src, p + 2);
                    text.push_str(&src[p..end]);
                    interpolations += 1;
                    p = end;
                    continue;
                }
                Some(&next) if next.is_ascii_alphabetic() || next == b'_' => {
                    let mut end = p + 2;
                    while end < bytes.len()
                        && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_')
                    {
                        end += 1;
                    }
                    text.push_str(&src[p..end]);
                    interpolations += 1;
                    p = end;
                    continue;
                }
                _ => {}
            }
        }

        let Some(c) = src[p..].chars().next() else {
            break;
        };
        text.push(c);
        plain.push(c);
        p += c.len_utf8();
    }

    RawLiteral {
        span: start..p,
        text,
        plain,
        interpolations,
        raw,
        triple,
        multiline,
    }
}

/// Skips a `${...}` body starting right after the `{`. Returns the position
/// after the matching `}`.
fn skip_interpolation(src: &str, mut p: usize) -> usize {
    let bytes = src.as_bytes();
    let mut depth = 1;
    while p < bytes.len() {
        if let Some(end) = skip_comment(bytes, p) {
            p = end;
            continue;
        }
        if let Some(raw) = literal_start(bytes, p) {
            p = lex_string(src, p, raw).span.end;
            continue;
        }
        match bytes[p] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return p + 1;
                }
            }
            _ => {}
        }
        p += 1;
    }
    bytes.len()
}

/// Decodes the escape sequence starting at `p` (which points at `\`).
fn decode_escape(src: &str, p: usize) -> (String, usize) {
    let rest = &src[p + 1..];
    let Some(c) = rest.chars().next() else {
        return ("\\".to_string(), p + 1);
    };
    let after = p + 1 + c.len_utf8();
    let simple = |ch: char| (ch.to_string(), after);
    match c {
        'n' => simple('\n'),
        'r' => simple('\r'),
        't' => simple('\t'),
        'b' => simple('\u{8}'),
        'f' => simple('\u{c}'),
        'v' => simple('\u{b}'),
        'x' => match parse_hex(&src[after..], 2, 2) {
            Some((ch, len)) => (ch.to_string(), after + len),
            None => simple('x'),
        },
        'u' => {
            if src[after..].starts_with('{') {
                let body_start = after + 1;
                if let Some(close) = src[body_start..].find('}')
                    && let Some((ch, len)) = parse_hex(&src[body_start..body_start + close], 1, 6)
                    && len == close
                {
                    return (ch.to_string(), body_start + close + 1);
                }
                simple('u')
            } else {
                match parse_hex(&src[after..], 4, 4) {
                    Some((ch, len)) => (ch.to_string(), after + len),
                    None => simple('u'),
                }
            }
        }
        other => simple(other),
    }
}

fn parse_hex(s: &str, min: usize, max: usize) -> Option<(char, usize)> {
    let len = s
        .bytes()
        .take(max)
        .take_while(|b| b.is_ascii_hexdigit())
        .count();
    if len < min {
        return None;
    }
    let value = u32::from_str_radix(&s[..len], 16).ok()?;
    char::from_u32(value).map(|ch| (ch, len))
}
