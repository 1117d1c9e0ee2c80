//! Sessions over many sources: loading, configuration and diagnostics.
//!
//! ```text
//! WorkspaceOptions ─▶ Workspace ─┬─▶ SourceSet     (parsed units)
//!                                └─▶ ClassLibrary  (name → class)
//! ```

mod diagnostics;
mod options;
mod workspace;

pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity, codes};
pub use options::WorkspaceOptions;
pub use workspace::{LoadReport, UnresolvedReference, Workspace};
