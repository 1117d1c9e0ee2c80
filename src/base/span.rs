//! Byte offsets, ranges and line/column positions.

use std::fmt;

pub use text_size::{TextRange, TextSize};

/// Zero-based line and byte column. Displays one-based, `line:col`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct LineCol {
    pub line: u32,
    /// Counted in UTF-8 bytes.
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    #[inline]
    pub const fn line_one_indexed(self) -> u32 {
        self.line + 1
    }

    #[inline]
    pub const fn col_one_indexed(self) -> u32 {
        self.col + 1
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_one_indexed(), self.col_one_indexed())
    }
}

impl fmt::Debug for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Line starts of one source text, for offset → [`LineCol`] lookups.
///
/// Only `\n` ends a line; a `\r` before it counts as part of the line.
#[derive(Clone, Debug)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let line_starts = std::iter::once(TextSize::from(0))
            .chain(
                text.match_indices('\n')
                    .map(|(offset, _)| TextSize::from(offset as u32 + 1)),
            )
            .collect();
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Offsets past the end clamp to the end of the text.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        LineCol::new(line as u32, (offset - self.line_starts[line]).into())
    }

    /// Number of lines; empty text has one.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_display() {
        assert_eq!(LineCol::new(0, 0).to_string(), "1:1");
        assert_eq!(format!("{:?}", LineCol::new(5, 10)), "6:11");
    }

    #[test]
    fn test_line_index_single_line() {
        let index = LineIndex::new("class A {}");
        assert_eq!(index.line_col(TextSize::from(0)), LineCol::new(0, 0));
        assert_eq!(index.line_col(TextSize::from(6)), LineCol::new(0, 6));
    }

    #[test]
    fn test_line_index_multi_line() {
        let index = LineIndex::new("package p;\nclass A\n{}");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_col(TextSize::from(10)), LineCol::new(0, 10));
        assert_eq!(index.line_col(TextSize::from(11)), LineCol::new(1, 0));
        assert_eq!(index.line_col(TextSize::from(19)), LineCol::new(2, 0));
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.line_col(TextSize::from(99)), LineCol::new(1, 2));
    }
}
