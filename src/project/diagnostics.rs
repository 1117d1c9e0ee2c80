//! Diagnostics: load failures and model warnings, with locations.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Error;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// The source the diagnostic is about.
    pub path: PathBuf,
    /// Line (1-indexed; 0 when unknown).
    pub line: u32,
    /// Column (1-indexed; 0 when unknown).
    pub col: u32,
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn error(path: impl Into<PathBuf>, line: u32, col: u32, message: impl Into<Arc<str>>) -> Self {
        Self {
            path: path.into(),
            line,
            col,
            severity: Severity::Error,
            code: None,
            message: message.into(),
        }
    }

    pub fn warning(path: impl Into<PathBuf>, line: u32, col: u32, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(path, line, col, message)
        }
    }

    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Describe a failure to load `path`.
    pub fn from_error(path: &Path, error: &Error) -> Self {
        let (line, col) = error.position().unwrap_or((0, 0));
        let code = match error {
            Error::Lexical(_) => codes::LEXICAL_ERROR,
            Error::Parse(_) => codes::PARSE_ERROR,
            Error::Io { .. } => codes::IO_ERROR,
        };
        Self::error(path, line, col, error.to_string()).with_code(code)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())?;
        if self.line > 0 {
            write!(f, ":{}", self.line)?;
            if self.col > 0 {
                write!(f, ":{}", self.col)?;
            }
        }
        write!(f, ": {}", self.severity)?;
        if let Some(code) = &self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

pub mod codes {
    /// Malformed token.
    pub const LEXICAL_ERROR: &str = "E0001";
    /// Grammar violation.
    pub const PARSE_ERROR: &str = "E0002";
    /// Source could not be read.
    pub const IO_ERROR: &str = "E0003";

    /// Class already declared by another source unit.
    pub const DUPLICATE_CLASS: &str = "W0001";
    /// Type reference that nothing resolves.
    pub const UNRESOLVED_TYPE: &str = "W0002";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn load_error(&mut self, path: &Path, error: &Error) {
        self.add(Diagnostic::from_error(path, error));
    }

    pub fn duplicate_class(&mut self, path: &Path, class: &str) {
        self.add(
            Diagnostic::warning(
                path,
                0,
                0,
                format!("duplicate class '{class}'; the first declaration is kept"),
            )
            .with_code(codes::DUPLICATE_CLASS),
        );
    }

    pub fn unresolved_type(&mut self, path: &Path, line: u32, name: &str, site: &str) {
        self.add(
            Diagnostic::warning(path, line, 0, format!("unresolved type '{name}' in {site}"))
                .with_code(codes::UNRESOLVED_TYPE),
        );
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn diagnostics_for_path(&self, path: &Path) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.path == path).collect()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning).count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_unit;
    use crate::base::SourceId;

    #[test]
    fn test_diagnostic_with_code() {
        let diag = Diagnostic::error("A.java", 3, 7, "boom").with_code(codes::PARSE_ERROR);
        assert_eq!(diag.code.as_deref(), Some("E0002"));
        assert_eq!(diag.to_string(), "A.java:3:7: error[E0002]: boom");
    }

    #[test]
    fn test_display_omits_unknown_column() {
        let mut collector = DiagnosticCollector::new();
        collector.unresolved_type(Path::new("C.java"), 5, "Unknown", "type of field 'u'");
        assert_eq!(
            collector.diagnostics()[0].to_string(),
            "C.java:5: warning[W0002]: unresolved type 'Unknown' in type of field 'u'"
        );
        assert_eq!(Diagnostic::error("A.java", 0, 0, "boom").to_string(), "A.java: error: boom");
    }

    #[test]
    fn test_from_parse_error() {
        let err = parse_unit(SourceId::new(0), "A.java", "class A {\n  int ;\n}").unwrap_err();
        let diag = Diagnostic::from_error(Path::new("A.java"), &err);
        assert_eq!(diag.code.as_deref(), Some(codes::PARSE_ERROR));
        assert_eq!((diag.line, diag.col), (2, 7));
    }

    #[test]
    fn test_from_lexical_error() {
        let err = parse_unit(SourceId::new(0), "A.java", "class A { char c = 'x").unwrap_err();
        let diag = Diagnostic::from_error(Path::new("A.java"), &err);
        assert_eq!(diag.code.as_deref(), Some(codes::LEXICAL_ERROR));
        assert_eq!(diag.line, 1);
    }

    #[test]
    fn test_collector_counts() {
        let mut collector = DiagnosticCollector::new();
        collector.add(Diagnostic::error("a", 0, 0, "error 1"));
        collector.duplicate_class(Path::new("b"), "p.A");
        collector.unresolved_type(Path::new("b"), 4, "Foo", "field 'x'");

        assert_eq!(collector.error_count(), 1);
        assert_eq!(collector.warning_count(), 2);
        assert!(collector.has_errors());
        assert_eq!(collector.diagnostics_for_path(Path::new("b")).len(), 2);
        assert_eq!(collector.take().len(), 3);
        assert!(collector.diagnostics().is_empty());
    }
}
