use thiserror::Error;

use crate::base::{LineCol, TextSize};

/// A grammar violation. Fatal for the source unit being parsed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{position}: expected {expected}, found {found}")]
pub struct ParseError {
    pub offset: TextSize,
    pub position: LineCol,
    pub expected: String,
    pub found: String,
}

impl ParseError {
    /// 1-indexed line.
    pub fn line(&self) -> u32 {
        self.position.line_one_indexed()
    }

    /// 1-indexed column.
    pub fn column(&self) -> u32 {
        self.position.col_one_indexed()
    }
}
