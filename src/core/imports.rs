//! Import fixer: makes sure files using the lookup accessor import the
//! generated localizations module.

use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

use crate::{
    core::scanner::{LiteralLexer, lexer::code_skeleton},
    utils::{relative_path, to_slash},
};

static DIRECTIVE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(library|import|export|part)\b").unwrap());

static PART_OF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^part\s+of\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectiveKind {
    Library,
    Import,
    Export,
    Part,
    PartOf,
}

/// A directive of the file's leading directive block.
#[derive(Debug, Clone)]
struct Directive {
    kind: DirectiveKind,
    /// Byte offset just past the closing `;`.
    end: usize,
    uri: Option<String>,
}

pub struct ImportFixer {
    accessor: String,
    /// Project-relative path of the localizations module.
    module_path: PathBuf,
    module_file_name: String,
}

impl ImportFixer {
    /// `source_root` and `localizations_module` as configured; the module
    /// lives at `<source_root>/<localizations_module>`.
    pub fn new(accessor: &str, source_root: &str, localizations_module: &str) -> Self {
        let module_path = Path::new(source_root).join(localizations_module);
        let module_file_name = module_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            accessor: accessor.trim().to_string(),
            module_path,
            module_file_name,
        }
    }

    /// Relative URI from the directory of `file_path` to the module.
    /// `file_path` is project-relative.
    pub fn import_uri(&self, file_path: &Path) -> String {
        let dir = file_path.parent().unwrap_or(Path::new(""));
        to_slash(&relative_path(dir, &self.module_path))
    }

    pub fn import_line(&self, file_path: &Path) -> String {
        format!("import '{}';", self.import_uri(file_path))
    }

    /// Whether any import already points at a file named like the module,
    /// through a relative or a `package:` URI.
    pub fn has_import(&self, content: &str) -> bool {
        leading_directives(content).iter().any(|directive| {
            directive.kind == DirectiveKind::Import
                && directive
                    .uri
                    .as_deref()
                    .and_then(|uri| uri.rsplit('/').next())
                    .is_some_and(|name| name == self.module_file_name)
        })
    }

    pub fn uses_accessor(&self, content: &str) -> bool {
        code_skeleton(content).contains(&self.accessor)
    }

    /// Returns the new content and the inserted line, or `None` when the
    /// file needs no import (or cannot take one).
    pub fn fix(&self, file_path: &Path, content: &str) -> Option<(String, String)> {
        if !self.uses_accessor(content) || self.has_import(content) {
            return None;
        }
        let directives = leading_directives(content);
        if directives.iter().any(|d| d.kind == DirectiveKind::PartOf) {
            tracing::warn!(
                "{}: uses {} but is a `part of` file; add the import to its library",
                file_path.display(),
                self.accessor
            );
            return None;
        }

        let import = self.import_line(file_path);
        let anchor = directives
            .iter()
            .rev()
            .find(|d| matches!(d.kind, DirectiveKind::Import | DirectiveKind::Export))
            .or_else(|| directives.iter().find(|d| d.kind == DirectiveKind::Library));

        let new_content = match anchor {
            Some(directive) => {
                let line_end = content[directive.end..]
                    .find('\n')
                    .map_or(content.len(), |i| directive.end + i);
                let (insert_at, newline) = if content[..line_end].ends_with('\r') {
                    (line_end - 1, "\r\n")
                } else {
                    (line_end, "\n")
                };
                format!(
                    "{}{}{}{}",
                    &content[..insert_at],
                    newline,
                    import,
                    &content[insert_at..]
                )
            }
            None => {
                let insert_at = first_code_line_start(content);
                format!(
                    "{}{}\n\n{}",
                    &content[..insert_at],
                    import,
                    &content[insert_at..]
                )
            }
        };
        Some((new_content, import))
    }
}

/// Directives at the top of the file, skipping comments and whitespace.
fn leading_directives(content: &str) -> Vec<Directive> {
    let skeleton = code_skeleton(content);
    let mut directives = Vec::new();
    let mut pos = 0;
    loop {
        let rest = &skeleton[pos..];
        let start = pos + (rest.len() - rest.trim_start().len());
        let head = &skeleton[start..];
        let Some(keyword) = DIRECTIVE_START.find(head) else {
            break;
        };
        let Some(semi) = head.find(';') else {
            break;
        };
        let end = start + semi + 1;
        let kind = match keyword.as_str() {
            "library" => DirectiveKind::Library,
            "import" => DirectiveKind::Import,
            "export" => DirectiveKind::Export,
            _ if PART_OF.is_match(head) => DirectiveKind::PartOf,
            _ => DirectiveKind::Part,
        };
        let uri = LiteralLexer::new(&content[start..end])
            .next()
            .map(|literal| literal.text);
        directives.push(Directive { kind, end, uri });
        pos = end;
    }
    directives
}

/// Start of the line holding the first code token, after leading comments.
fn first_code_line_start(content: &str) -> usize {
    let skeleton = code_skeleton(content);
    match skeleton.find(|c: char| !c.is_whitespace()) {
        Some(first) => skeleton[..first].rfind('\n').map_or(0, |i| i + 1),
        None => content.len(),
    }
}
