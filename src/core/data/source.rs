use std::ops::Range;

/// Pure position information in a Dart source file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    pub file_path: String,
    pub line: usize,
    pub col: usize,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }
}

/// Position with context information in a source file.
///
/// Carries the source line so the reporter can print a snippet with a caret
/// under the column without re-reading the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub location: SourceLocation,
    /// The source code line content for display.
    pub source_line: String,
}

impl SourceContext {
    pub fn new(location: SourceLocation, source_line: impl Into<String>) -> Self {
        Self {
            location,
            source_line: source_line.into(),
        }
    }

    // Convenience accessors
    pub fn file_path(&self) -> &str {
        &self.location.file_path
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn col(&self) -> usize {
        self.location.col
    }
}

/// Byte range of a literal (quotes and raw prefix included) in a file buffer.
pub type Span = Range<usize>;

#[cfg(test)]
mod tests {
    use crate::core::data::{SourceContext, SourceLocation};

    #[test]
    fn test_source_location_new() {
        let loc = SourceLocation::new("lib/main.dart", 10, 5);
        assert_eq!(loc.file_path, "lib/main.dart");
        assert_eq!(loc.line, 10);
        assert_eq!(loc.col, 5);
    }

    #[test]
    fn test_source_context_new() {
        let loc = SourceLocation::new("lib/main.dart", 10, 5);
        let ctx = SourceContext::new(loc, "  child: Text('Hello'),");
        assert_eq!(ctx.file_path(), "lib/main.dart");
        assert_eq!(ctx.line(), 10);
        assert_eq!(ctx.col(), 5);
        assert_eq!(ctx.source_line, "  child: Text('Hello'),");
    }

    #[test]
    fn test_source_location_ordering() {
        let a = SourceLocation::new("lib/a.dart", 5, 1);
        let b = SourceLocation::new("lib/a.dart", 10, 1);
        let c = SourceLocation::new("lib/b.dart", 1, 1);
        assert!(a < b);
        assert!(b < c);
    }
}
