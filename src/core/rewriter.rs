//! Rewriter: turns matched literals into lookup expressions.

use std::{
    fs,
    io::Write,
    path::Path,
};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::{
    core::{
        dart::{decode_literal, is_identifier, single_quoted},
        data::{Candidate, Replacement},
        resolver::KeyMatch,
    },
    issues::{InvalidAccessorIssue, Issue, UnescapableLiteralIssue},
};

pub struct Rewriter<'a> {
    accessor: &'a str,
}

impl<'a> Rewriter<'a> {
    pub fn new(accessor: &'a str) -> Self {
        Self {
            accessor: accessor.trim(),
        }
    }

    /// `<accessor>?.<key> ?? '<fallback>'`
    pub fn lookup_expression(&self, key: &str, fallback: &str) -> String {
        format!("{}?.{} ?? {}", self.accessor, key, fallback)
    }

    /// Builds the replacement for one matched candidate, or the review item
    /// explaining why the literal stays as it is.
    pub fn plan(&self, candidate: &Candidate, found: &KeyMatch) -> Result<Replacement, Issue> {
        if !is_identifier(found.key) {
            return Err(InvalidAccessorIssue {
                context: candidate.context.clone(),
                key: found.key.to_string(),
            }
            .into());
        }

        let fallback = single_quoted(&candidate.text);
        if decode_literal(&fallback).as_deref() != Some(candidate.text.as_str()) {
            return Err(UnescapableLiteralIssue {
                context: candidate.context.clone(),
                text: candidate.text.clone(),
                key: found.key.to_string(),
            }
            .into());
        }

        Ok(Replacement {
            context: candidate.context.clone(),
            span: candidate.span.clone(),
            key: found.key.to_string(),
            original: candidate.text.clone(),
            replacement: self.lookup_expression(found.key, &fallback),
        })
    }
}

/// Applies replacements to a copy of `content`.
///
/// Overlapping spans keep the longest one. Returns the new buffer and the
/// replacements actually applied, in source order.
pub fn apply_replacements(content: &str, mut replacements: Vec<Replacement>) -> (String, Vec<Replacement>) {
    replacements.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then_with(|| b.span.len().cmp(&a.span.len()))
    });

    let mut kept: Vec<Replacement> = Vec::with_capacity(replacements.len());
    for replacement in replacements {
        match kept.last_mut() {
            Some(last) if replacement.span.start < last.span.end => {
                if replacement.span.len() > last.span.len() {
                    *last = replacement;
                }
            }
            _ => kept.push(replacement),
        }
    }

    let mut output = String::with_capacity(content.len() + kept.len() * 48);
    let mut cursor = 0;
    for replacement in &kept {
        output.push_str(&content[cursor..replacement.span.start]);
        output.push_str(&replacement.replacement);
        cursor = replacement.span.end;
    }
    output.push_str(&content[cursor..]);
    (output, kept)
}

/// Writes `content` to `path` through a temp file in the same directory,
/// then renames it over the original.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {:?}", dir))?;
    temp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write temp file for {:?}", path))?;
    if let Ok(metadata) = fs::metadata(path)
        && let Err(err) = fs::set_permissions(temp.path(), metadata.permissions())
    {
        tracing::warn!("Failed to keep the file mode of {:?}: {}", path, err);
    }
    temp.persist(path)
        .with_context(|| format!("Failed to replace {:?}", path))?;
    Ok(())
}
