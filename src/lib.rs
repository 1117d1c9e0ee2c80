//! # jdox-base
//!
//! Core library for extracting a structural model from Java-family source:
//! packages, imports, classes, members, and type references that resolve
//! to fully-qualified names on demand.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project  → Workspace sessions, options, diagnostics
//!   ↓
//! library  → Class library chain (parsed sources, registries, stubs)
//!   ↓
//! model    → Source units, class descriptors, lazy TypeRef resolution
//!   ↓
//! parser   → Lexer (logos) + declaration parser emitting builder events
//!   ↓
//! base     → Primitives (SourceId, text positions, dotted names)
//! ```
//!
//! ## Quick start
//!
//! ```
//! use jdox::Workspace;
//!
//! let ws = Workspace::default();
//! ws.add_source("p/C.java", "package p; import java.util.List; class C { List<String> names; }")
//!     .unwrap();
//! let class = ws.class("p.C").unwrap();
//! assert_eq!(ws.resolve(&class.fields[0].ty), "java.util.List");
//! ```

/// Foundation types: SourceId, text positions, dotted names
pub mod base;

/// Lexer and declaration parser
pub mod parser;

/// Class model and type resolution
pub mod model;

/// Fully-qualified name lookup across strategies
pub mod library;

/// Workspace sessions and diagnostics
pub mod project;

mod error;

pub use error::{Error, Result};

// Re-export commonly needed items
pub use base::{LineCol, LineIndex, SourceId, TextRange, TextSize};
pub use library::{ClassLibrary, ClassRegistry, ClassStructure, MemoryRegistry};
pub use model::{ClassDescriptor, ClassLookup, SourceSet, SourceUnit, TypeRef, parse_unit};
pub use project::{Diagnostic, Workspace, WorkspaceOptions};
