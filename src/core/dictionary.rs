//! ARB dictionary loading.
//!
//! An ARB file is a flat JSON object. Message keys map to strings; keys
//! starting with `@` hold metadata (`@@locale`, `@key` descriptions) and are
//! ignored.

use std::{
    collections::{HashMap, HashSet},
    fmt, fs,
    path::Path,
};

use anyhow::{Context, Result, bail};
use serde::{
    Deserialize, Deserializer,
    de::{self, MapAccess, Visitor},
};
use serde_json::Value;

use crate::core::data::LineIndex;

/// One message of the template ARB file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    pub key: String,
    pub value: String,
    /// 1-based line of the key in the ARB file.
    pub line: usize,
}

/// Immutable key→string table loaded once per run.
#[derive(Debug, Default)]
pub struct Dictionary {
    file_path: String,
    entries: Vec<TranslationEntry>,
    keys: HashSet<String>,
    /// Trimmed value → keys in file order.
    by_value: HashMap<String, Vec<String>>,
}

impl Dictionary {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read ARB file: {:?}", path))?;
        Self::parse(&path.to_string_lossy(), &content)
            .with_context(|| format!("Failed to parse ARB file: {:?}", path))
    }

    pub fn parse(file_path: &str, content: &str) -> Result<Self> {
        let ArbEntries(raw) = serde_json::from_str(content)?;
        let line_index = LineIndex::new(content);

        let mut dictionary = Dictionary {
            file_path: file_path.to_string(),
            ..Default::default()
        };
        for (key, value) in raw {
            if key.starts_with('@') {
                continue;
            }
            let Value::String(value) = value else {
                bail!("message \"{}\" is not a string", key);
            };
            let line = find_key_line(content, &key, &line_index);
            if !value.trim().is_empty() {
                dictionary
                    .by_value
                    .entry(value.clone())
                    .or_default()
                    .push(key.clone());
            }
            dictionary.keys.insert(key.clone());
            dictionary.entries.push(TranslationEntry { key, value, line });
        }
        Ok(dictionary)
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn entries(&self) -> &[TranslationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Keys whose value is exactly `text`, in file order.
    pub fn keys_for(&self, text: &str) -> &[String] {
        self.by_value.get(text).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Top-level ARB members in document order; rejects duplicate keys, which
/// `serde_json::Value` would silently collapse.
struct ArbEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for ArbEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = ArbEntries;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object of ARB messages")
            }

            fn visit_map<A>(self, mut map: A) -> Result<ArbEntries, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut seen = HashSet::new();
                let mut entries = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    if !seen.insert(key.clone()) {
                        return Err(de::Error::custom(format!("duplicate key \"{}\"", key)));
                    }
                    entries.push((key, value));
                }
                Ok(ArbEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Find the line where a top-level key is declared (a quoted key followed
/// by `:`). Defaults to line 1.
fn find_key_line(content: &str, key: &str, line_index: &LineIndex) -> usize {
    let pattern = format!("\"{}\"", key);
    let mut pos = 0;
    while let Some(rel) = content[pos..].find(&pattern) {
        let after = pos + rel + pattern.len();
        if content[after..].trim_start().starts_with(':') {
            return line_index.line_of(pos + rel);
        }
        pos = after;
    }
    1
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    const ARB: &str = r#"{
  "@@locale": "en",
  "welcome": "Welcome",
  "@welcome": { "description": "Greeting on the home screen" },
  "save": "Save",
  "saveButton": "Save",
  "padded": "  Sign in  ",
  "empty": ""
}"#;

    #[test]
    fn test_parse_skips_metadata() {
        let dictionary = Dictionary::parse("app_en.arb", ARB).unwrap();
        let keys: Vec<&str> = dictionary.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["welcome", "save", "saveButton", "padded", "empty"]);
        assert!(!dictionary.contains_key("@welcome"));
    }

    #[test]
    fn test_entry_lines() {
        let dictionary = Dictionary::parse("app_en.arb", ARB).unwrap();
        assert_eq!(dictionary.entries()[0].line, 3);
        assert_eq!(dictionary.entries()[1].line, 5);
    }

    #[test]
    fn test_keys_for_value_in_file_order() {
        let dictionary = Dictionary::parse("app_en.arb", ARB).unwrap();
        assert_eq!(dictionary.keys_for("Save"), ["save", "saveButton"]);
        assert_eq!(dictionary.keys_for("Welcome"), ["welcome"]);
        assert!(dictionary.keys_for("Missing").is_empty());
    }

    #[test]
    fn test_values_are_indexed_verbatim() {
        let dictionary = Dictionary::parse("app_en.arb", ARB).unwrap();
        assert_eq!(dictionary.keys_for("  Sign in  "), ["padded"]);
        assert!(dictionary.keys_for("Sign in").is_empty());
        assert!(dictionary.keys_for("").is_empty());
    }

    #[test]
    fn test_duplicate_key_is_an_error() {
        let err = Dictionary::parse("app_en.arb", r#"{"a": "A", "a": "B"}"#).unwrap_err();
        assert!(err.to_string().contains("duplicate key \"a\""));
    }

    #[test]
    fn test_non_string_message_is_an_error() {
        let err = Dictionary::parse("app_en.arb", r#"{"count": 3}"#).unwrap_err();
        assert!(err.to_string().contains("\"count\" is not a string"));
    }

    #[test]
    fn test_non_object_is_an_error() {
        assert!(Dictionary::parse("app_en.arb", "[1, 2]").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = Dictionary::load(&dir.path().join("app_en.arb")).unwrap_err();
        assert!(err.to_string().contains("Failed to read ARB file"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app_en.arb");
        fs::write(&path, ARB).unwrap();
        let dictionary = Dictionary::load(&path).unwrap();
        assert_eq!(dictionary.len(), 5);
        assert!(dictionary.file_path().ends_with("app_en.arb"));
    }
}
