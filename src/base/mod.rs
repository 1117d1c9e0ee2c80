//! Foundation types for the jdox toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`SourceId`] - Handles for parsed source units
//! - [`TextRange`], [`TextSize`] - Source positions
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`names`] - Dotted-name helpers
//!
//! This module has NO dependencies on other jdox modules.

pub mod names;
mod source_id;
mod span;

pub use source_id::SourceId;
pub use span::{LineCol, LineIndex, TextRange, TextSize};

pub use text_size;
