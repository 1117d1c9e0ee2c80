//! Crate-wide error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::{LexicalError, ParseError};

/// Errors that abort building a single source unit.
///
/// None of these touch already-built units or the class library caches; a
/// host loading many files can log the error and carry on.
#[derive(Debug, Error)]
pub enum Error {
    #[error("lexical error: {0}")]
    Lexical(#[from] LexicalError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// 1-indexed line/column of the failure, when it has one.
    pub fn position(&self) -> Option<(u32, u32)> {
        match self {
            Error::Lexical(e) => Some((e.position.line_one_indexed(), e.position.col_one_indexed())),
            Error::Parse(e) => Some((e.line(), e.column())),
            Error::Io { .. } => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
