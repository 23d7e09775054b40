//! Key resolver: maps candidate text to a dictionary key.

use crate::core::{data::Candidate, dictionary::Dictionary};

/// A dictionary key chosen for a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMatch<'d> {
    pub key: &'d str,
    /// Other keys with the same value, in file order. Non-empty means the
    /// choice was ambiguous.
    pub alternatives: &'d [String],
}

impl KeyMatch<'_> {
    pub fn is_ambiguous(&self) -> bool {
        !self.alternatives.is_empty()
    }
}

pub struct Resolver<'d> {
    dictionary: &'d Dictionary,
}

impl<'d> Resolver<'d> {
    pub fn new(dictionary: &'d Dictionary) -> Self {
        Self { dictionary }
    }

    /// Exact match of the candidate text against dictionary values.
    ///
    /// When several keys share the value, the first one in file order wins.
    pub fn resolve(&self, candidate: &Candidate) -> Option<KeyMatch<'d>> {
        let text = candidate.text.as_str();
        match self.dictionary.keys_for(text) {
            [] => {
                tracing::debug!(
                    "{}:{}: no key for {:?}",
                    candidate.file_path(),
                    candidate.context.line(),
                    text
                );
                None
            }
            [key, alternatives @ ..] => Some(KeyMatch {
                key: key.as_str(),
                alternatives,
            }),
        }
    }
}
