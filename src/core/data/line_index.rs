/// Index of line start byte offsets for O(log n) line lookups.
///
/// Line 1 starts at offset 0, line 2 starts after the first '\n', etc.
#[derive(Debug, Clone)]
pub struct LineIndex {
    offsets: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let mut offsets = vec![0]; // Line 1 starts at offset 0
        for (i, c) in content.char_indices() {
            if c == '\n' {
                offsets.push(i + 1);
            }
        }
        Self { offsets }
    }

    /// Find line number for a byte offset using binary search.
    ///
    /// Returns 1-based line number.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.offsets.binary_search(&offset) {
            Ok(line) => line + 1, // Exact match at line start
            Err(line) => line,    // Falls within this line
        }
    }

    /// Returns 1-based `(line, col)`; `col` counts characters, not bytes.
    pub fn location(&self, content: &str, offset: usize) -> (usize, usize) {
        let line = self.line_of(offset);
        let start = self.offsets[line - 1];
        let col = content[start..offset].chars().count() + 1;
        (line, col)
    }

    /// Text of a 1-based line without its line terminator.
    pub fn line_text<'a>(&self, content: &'a str, line: usize) -> &'a str {
        let Some(&start) = self.offsets.get(line.saturating_sub(1)) else {
            return "";
        };
        let end = self
            .offsets
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(content.len());
        content[start..end].trim_end_matches('\r')
    }

    /// Byte offset where a 1-based line starts.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.offsets.get(line.checked_sub(1)?).copied()
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}
