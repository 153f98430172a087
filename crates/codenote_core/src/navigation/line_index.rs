//! Line/offset mapping for highlight ranges.

/// Half-open byte range `[start, end)` inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

/// Byte offsets of line starts in a document.
///
/// A trailing newline opens one more (empty) line, matching editor documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    text_len: usize,
    /// End offset of each line, excluding its terminator.
    line_ends: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut line_ends = Vec::new();
        let bytes = text.as_bytes();
        for (index, byte) in bytes.iter().enumerate() {
            if *byte == b'\n' {
                let end = if index > 0 && bytes[index - 1] == b'\r' {
                    index - 1
                } else {
                    index
                };
                line_ends.push(end.max(line_starts[line_starts.len() - 1]));
                line_starts.push(index + 1);
            }
        }
        line_ends.push(text.len());
        Self {
            line_starts,
            text_len: text.len(),
            line_ends,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn text_len(&self) -> usize {
        self.text_len
    }

    /// Start offset of 0-based `line`, clamped to the last line.
    pub fn line_start_offset(&self, line: usize) -> usize {
        self.line_starts[line.min(self.line_count() - 1)]
    }

    /// End offset (before the terminator) of 0-based `line`, clamped to the last line.
    pub fn line_end_offset(&self, line: usize) -> usize {
        self.line_ends[line.min(self.line_count() - 1)]
    }
}

/// 0-based caret line for a 1-based note start line.
pub fn caret_line(start_line: u32) -> usize {
    start_line.saturating_sub(1) as usize
}

/// Highlight range covering whole lines `start_line..=end_line` (1-based).
///
/// Returns `None` for single-line spans, where only the caret is placed.
pub fn highlight_range(index: &LineIndex, start_line: u32, end_line: u32) -> Option<TextRange> {
    if start_line == end_line {
        return None;
    }
    let start = index.line_start_offset(caret_line(start_line));
    let end_line0 = (end_line.saturating_sub(1) as usize).min(index.line_count() - 1);
    let end = index.line_end_offset(end_line0).max(start);
    Some(TextRange { start, end })
}
