//! Bracket outline of a Dart file and the lookup expressions inside it.
//!
//! Works on the code skeleton (comments and literals blanked), so brackets
//! inside strings never count. Enough structure to tell class bodies from
//! function bodies, parameter lists from calls, and collection literals from
//! blocks; nothing more.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::{
    core::{
        data::Span,
        scanner::{LiteralLexer, RawLiteral, lexer::code_skeleton},
    },
    utils::floor_char_boundary,
};

/// How far back an annotation name is looked for before `(`.
const ANNOTATION_LOOKBEHIND: usize = 128;

static TYPE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(class|mixin|extension|enum)\b").unwrap());

static ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^=!<>])=($|[^=>])").unwrap());

static ENUM_KEYWORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\benum\b").unwrap());

static ANNOTATION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@[A-Za-z_$][\w$]*(\s*\.\s*[A-Za-z_$][\w$]*)*\s*$").unwrap()
});

/// `case` followed by a pattern that is not finished yet.
static CASE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bcase\b[^;:{}]*$").unwrap());

/// What a `{` opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BraceKind {
    /// Body of a class, mixin, extension or enum.
    ClassBody,
    /// Function body or statement block.
    Block,
    /// Set/map literal.
    Literal,
    /// `{` directly inside parentheses: named parameters or a map argument.
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Paren,
    Bracket,
    Brace(BraceKind),
}

impl FrameKind {
    /// Frames that do not change which scope an expression belongs to.
    pub fn is_expression(&self) -> bool {
        !matches!(
            self,
            FrameKind::Brace(BraceKind::ClassBody | BraceKind::Block)
        )
    }
}

/// One bracket pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub kind: FrameKind,
    /// Offset of the opening bracket.
    pub open: usize,
    /// Offset of the closing bracket, or the file length if unbalanced.
    pub close: usize,
}

impl Frame {
    pub fn contains(&self, pos: usize) -> bool {
        self.open < pos && pos <= self.close
    }
}

/// Scope an expression lives in, judged by its innermost statement frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    TopLevel,
    ClassBody,
    Block,
}

/// A position where Dart only accepts a compile-time constant and no
/// surrounding keyword can be dropped to make room for a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantContext {
    /// `case` pattern or switch-expression arm.
    CasePattern,
    /// Argument of an annotation such as `@Deprecated(...)`.
    Annotation,
    /// Constructor argument of an enum value.
    EnumValue,
}

pub struct Outline {
    skeleton: String,
    frames: Vec<Frame>,
}

impl Outline {
    pub fn new(content: &str) -> Self {
        let skeleton = code_skeleton(content);
        let frames = build_frames(&skeleton);
        Self { skeleton, frames }
    }

    pub fn skeleton(&self) -> &str {
        &self.skeleton
    }

    /// Frames containing `pos`, innermost first.
    pub fn enclosing(&self, pos: usize) -> Vec<Frame> {
        let mut frames: Vec<Frame> = self
            .frames
            .iter()
            .filter(|frame| frame.contains(pos))
            .copied()
            .collect();
        frames.sort_by(|a, b| b.open.cmp(&a.open));
        frames
    }

    /// The innermost class body or block around `pos`.
    pub fn statement_frame(&self, pos: usize) -> Option<Frame> {
        self.enclosing(pos)
            .into_iter()
            .find(|frame| !frame.kind.is_expression())
    }

    pub fn scope(&self, pos: usize) -> Scope {
        match self.statement_frame(pos).map(|frame| frame.kind) {
            Some(FrameKind::Brace(BraceKind::ClassBody)) => Scope::ClassBody,
            Some(_) => Scope::Block,
            None => Scope::TopLevel,
        }
    }

    /// Start of the declaration or statement containing `pos`: just after
    /// the previous `;`, block, or the opening brace of the statement frame.
    pub fn statement_start(&self, pos: usize) -> usize {
        let floor = self.statement_frame(pos).map_or(0, |frame| frame.open + 1);
        let bytes = self.skeleton.as_bytes();
        let mut i = pos;
        while i > floor {
            i -= 1;
            match bytes[i] {
                b';' => return self.skip_space(i + 1, pos),
                b'}' | b')' | b']' => {
                    let Some(frame) = self.frames.iter().find(|f| f.close == i) else {
                        continue;
                    };
                    if !frame.kind.is_expression() {
                        return self.skip_space(i + 1, pos);
                    }
                    i = frame.open;
                }
                _ => {}
            }
        }
        self.skip_space(floor, pos)
    }

    fn skip_space(&self, from: usize, limit: usize) -> usize {
        let rest = &self.skeleton[from..limit];
        from + (rest.len() - rest.trim_start().len())
    }

    /// Skeleton text between `start` and `end` with every nested bracket
    /// group removed, so only the tokens at that level remain.
    pub fn flat_text(&self, start: usize, end: usize) -> String {
        let mut text = String::new();
        let mut i = start;
        while i < end {
            if let Ok(idx) = self.frames.binary_search_by_key(&i, |f| f.open) {
                let close = self.frames[idx].close;
                if close >= end {
                    break;
                }
                text.push(' ');
                i = close + 1;
                continue;
            }
            let Some(c) = self.skeleton[i..].chars().next() else {
                break;
            };
            text.push(c);
            i += c.len_utf8();
        }
        text
    }

    /// Whether the flattened text contains an assignment `=` (not `==`,
    /// `=>`, `<=`, `>=` or `!=`).
    pub fn has_assignment(flat: &str) -> bool {
        ASSIGNMENT.is_match(flat)
    }

    /// Offset of a `const` keyword right before the frame's opening bracket,
    /// skipping a constructor name (`Text`, `EdgeInsets.all`) or type
    /// arguments (`<Widget>`).
    pub fn const_before(&self, frame: &Frame) -> Option<usize> {
        let bytes = self.skeleton.as_bytes();
        let mut i = frame.open;
        skip_back_space(bytes, &mut i);
        if i > 0 && bytes[i - 1] == b'>' {
            // type arguments
            let mut depth = 0;
            while i > 0 {
                i -= 1;
                match bytes[i] {
                    b'>' => depth += 1,
                    b'<' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
            }
            skip_back_space(bytes, &mut i);
        }
        if frame.kind == FrameKind::Paren {
            // constructor name, possibly qualified
            let name_end = i;
            while i > 0 && (is_word_byte(bytes[i - 1]) || bytes[i - 1] == b'.') {
                i -= 1;
            }
            if i == name_end {
                return None;
            }
            skip_back_space(bytes, &mut i);
        }
        let keyword_start = i.checked_sub(5)?;
        if self.skeleton.get(keyword_start..i) == Some("const")
            && (keyword_start == 0 || !is_word_byte(bytes[keyword_start - 1]))
        {
            return Some(keyword_start);
        }
        None
    }
}

impl Outline {
    /// The constant-only context `span` sits in, if any.
    pub fn constant_context(&self, span: &Span) -> Option<ConstantContext> {
        if self.is_case_pattern(span) {
            return Some(ConstantContext::CasePattern);
        }

        let frames = self.enclosing(span.start);
        let depth = frames
            .iter()
            .take_while(|frame| frame.kind.is_expression())
            .count();
        if frames[..depth]
            .iter()
            .any(|frame| frame.kind == FrameKind::Paren && self.is_annotation_call(frame))
        {
            return Some(ConstantContext::Annotation);
        }
        if depth > 0
            && let Some(body) = frames.get(depth)
            && body.kind == FrameKind::Brace(BraceKind::ClassBody)
            && ENUM_KEYWORD.is_match(header_before(&self.skeleton, body.open))
            && !self.flat_text(body.open + 1, span.start).contains(';')
        {
            return Some(ConstantContext::EnumValue);
        }
        None
    }

    fn is_case_pattern(&self, span: &Span) -> bool {
        let start = self.statement_start(span.start);
        if CASE_PATTERN.is_match(&self.skeleton[start..span.start]) {
            return true;
        }
        // `'Save' => ...` only occurs as a switch-expression arm.
        self.skeleton
            .get(span.end..)
            .is_some_and(|rest| rest.trim_start().starts_with("=>"))
    }

    fn is_annotation_call(&self, frame: &Frame) -> bool {
        let from = floor_char_boundary(
            &self.skeleton,
            frame.open.saturating_sub(ANNOTATION_LOOKBEHIND),
        );
        ANNOTATION_NAME.is_match(&self.skeleton[from..frame.open])
    }
}

/// Declaration header in front of the brace at `pos`, e.g. `enum Tab`.
fn header_before(skeleton: &str, pos: usize) -> &str {
    let before = skeleton[..pos].trim_end();
    let header_start = before.rfind([';', '{', '}']).map_or(0, |i| i + 1);
    &before[header_start..]
}

fn build_frames(skeleton: &str) -> Vec<Frame> {
    let bytes = skeleton.as_bytes();
    let mut frames: Vec<Frame> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    for (i, &b) in bytes.iter().enumerate() {
        let kind = match b {
            b'(' => Some(FrameKind::Paren),
            b'[' => Some(FrameKind::Bracket),
            b'{' => {
                let parent = open.last().map(|&idx| frames[idx].kind);
                Some(FrameKind::Brace(classify_brace(skeleton, i, parent)))
            }
            b')' | b']' | b'}' => {
                if let Some(idx) = open.pop() {
                    frames[idx].close = i;
                }
                None
            }
            _ => None,
        };
        if let Some(kind) = kind {
            open.push(frames.len());
            frames.push(Frame {
                kind,
                open: i,
                close: bytes.len(),
            });
        }
    }
    frames
}

fn classify_brace(skeleton: &str, pos: usize, parent: Option<FrameKind>) -> BraceKind {
    let before = skeleton[..pos].trim_end();
    let header = header_before(skeleton, pos);
    if TYPE_HEADER.is_match(header) && !header.contains('=') && !header.contains('(') {
        return BraceKind::ClassBody;
    }

    let Some(last) = before.chars().last() else {
        return BraceKind::Block;
    };
    match last {
        '(' | ',' if matches!(parent, Some(FrameKind::Paren)) => BraceKind::Group,
        ')' => BraceKind::Block,
        '=' | ':' | '[' | '(' | ',' | '?' | '>' | '{' => BraceKind::Literal,
        _ => {
            let word_start = before
                .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '*'))
                .map_or(0, |i| i + 1);
            match &before[word_start..] {
                "const" | "return" | "yield" | "in" => BraceKind::Literal,
                _ => BraceKind::Block,
            }
        }
    }
}

fn skip_back_space(bytes: &[u8], i: &mut usize) {
    while *i > 0 && bytes[*i - 1].is_ascii_whitespace() {
        *i -= 1;
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// A lookup expression `<accessor>?.<key> ?? '<fallback>'` in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    /// From the accessor to the end of the fallback literal.
    pub span: Span,
    pub key: String,
    /// Span of the fallback literal.
    pub fallback: Span,
}

/// Finds lookup expressions written with a given accessor.
pub struct LookupFinder {
    pattern: Regex,
}

impl LookupFinder {
    pub fn new(accessor: &str) -> Result<Self> {
        let pattern = format!(
            r"{}\s*\?\.\s*([A-Za-z_$][\w$]*)\s*\?\?",
            regex::escape(accessor.trim())
        );
        let pattern = Regex::new(&pattern)
            .with_context(|| format!("Invalid lookup accessor: \"{}\"", accessor))?;
        Ok(Self { pattern })
    }

    /// Lookups in source order. Matches inside comments or strings are
    /// ignored; the fallback must be a plain single-line literal.
    pub fn find_all(&self, content: &str, outline: &Outline) -> Vec<Lookup> {
        self.pattern
            .captures_iter(outline.skeleton())
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let key = caps.get(1)?.as_str().to_string();
                let rest = &content[whole.end()..];
                let start = whole.end() + (rest.len() - rest.trim_start().len());
                let literal = literal_at(content, start)?;
                Some(Lookup {
                    span: whole.start()..literal.span.end,
                    key,
                    fallback: literal.span,
                })
            })
            .collect()
    }
}

/// The literal starting exactly at `pos`, if any.
fn literal_at(content: &str, pos: usize) -> Option<RawLiteral> {
    let literal = LiteralLexer::new(content.get(pos..)?).next()?;
    if literal.span.start != 0 || literal.multiline {
        return None;
    }
    Some(RawLiteral {
        span: pos..pos + literal.span.end,
        ..literal
    })
}
