use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::utils::to_slash;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
pub struct ScanResult {
    /// Project-relative, `/`-separated paths in sorted order.
    pub files: Vec<String>,
    pub skipped_count: usize,
}

/// Collects source files under `<root_dir>/<source_root>`.
///
/// `ignore_patterns` are matched against project-relative paths: globs with
/// `glob` semantics, anything else as a path prefix.
pub fn scan_files(
    root_dir: &Path,
    source_root: &str,
    extensions: &[String],
    ignore_patterns: &[String],
) -> ScanResult {
    let mut files: Vec<String> = Vec::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();
    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => tracing::warn!("Invalid ignore pattern '{}': {}", p, e),
            }
        } else {
            literal_ignore_paths.push(PathBuf::from(p));
        }
    }

    for entry in WalkDir::new(root_dir.join(source_root)) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                tracing::debug!("Cannot access path: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root_dir)
            .unwrap_or(entry.path());

        if literal_ignore_paths
            .iter()
            .any(|ignore_path| relative.starts_with(ignore_path))
        {
            continue;
        }
        let relative = to_slash(relative);
        if glob_patterns.iter().any(|p| p.matches(&relative)) {
            tracing::trace!("{}: ignored", relative);
            continue;
        }
        files.push(relative);
    }

    files.sort();
    files.dedup();
    ScanResult {
        files,
        skipped_count,
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted.trim_start_matches('.') == ext))
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn dart() -> Vec<String> {
        vec!["dart".to_string()]
    }

    #[test]
    fn test_scan_dart_files_sorted() {
        let dir = tempdir().unwrap();
        let lib = dir.path().join("lib");
        fs::create_dir_all(lib.join("widgets")).unwrap();
        File::create(lib.join("main.dart")).unwrap();
        File::create(lib.join("widgets").join("button.dart")).unwrap();
        File::create(lib.join("README.md")).unwrap();

        let result = scan_files(dir.path(), "lib", &dart(), &[]);

        assert_eq!(result.files, vec!["lib/main.dart", "lib/widgets/button.dart"]);
        assert_eq!(result.skipped_count, 0);
    }

    #[test]
    fn test_scan_ignores_generated_files() {
        let dir = tempdir().unwrap();
        let lib = dir.path().join("lib");
        fs::create_dir_all(lib.join("l10n")).unwrap();
        File::create(lib.join("main.dart")).unwrap();
        File::create(lib.join("model.g.dart")).unwrap();
        File::create(lib.join("l10n").join("app_localizations.dart")).unwrap();

        let result = scan_files(
            dir.path(),
            "lib",
            &dart(),
            &["**/*.g.dart".to_string(), "**/l10n/**".to_string()],
        );

        assert_eq!(result.files, vec!["lib/main.dart"]);
    }

    #[test]
    fn test_scan_ignores_literal_directory() {
        let dir = tempdir().unwrap();
        let lib = dir.path().join("lib");
        fs::create_dir_all(lib.join("legacy")).unwrap();
        File::create(lib.join("main.dart")).unwrap();
        File::create(lib.join("legacy").join("old.dart")).unwrap();

        let result = scan_files(dir.path(), "lib", &dart(), &["lib/legacy".to_string()]);

        assert_eq!(result.files, vec!["lib/main.dart"]);
    }

    #[test]
    fn test_extensions_accept_leading_dot() {
        assert!(has_extension(Path::new("a.dart"), &[".dart".to_string()]));
        assert!(!has_extension(Path::new("a.dart"), &["ts".to_string()]));
        assert!(!has_extension(Path::new("Makefile"), &dart()));
    }

    #[test]
    fn test_missing_source_root_counts_as_skipped() {
        let dir = tempdir().unwrap();
        let result = scan_files(dir.path(), "lib", &dart(), &[]);
        assert!(result.files.is_empty());
        assert_eq!(result.skipped_count, 1);
    }
}
