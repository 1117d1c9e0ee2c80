//! Workspace configuration.

use std::path::PathBuf;

use smol_str::SmolStr;

/// How a [`Workspace`](super::Workspace) loads sources and composes its
/// class library.
#[derive(Clone, Debug)]
pub struct WorkspaceOptions {
    /// Extension of source files picked up from directories.
    pub extension: String,
    /// Packages visible without an import.
    pub implicit_packages: Vec<SmolStr>,
    /// Parse the files of a source tree in parallel.
    pub parallel: bool,
    /// Keep loading a source tree after a file fails.
    pub continue_on_error: bool,
    /// Register the built-in `java.lang` structural registry.
    pub java_lang_registry: bool,
    /// Append the stub fallback to the class library.
    pub stub_fallback: bool,
    /// Directories searched on demand for classes not yet loaded.
    pub source_roots: Vec<PathBuf>,
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        Self {
            extension: "java".to_string(),
            implicit_packages: vec![SmolStr::new_static("java.lang")],
            parallel: true,
            continue_on_error: true,
            java_lang_registry: true,
            stub_fallback: false,
            source_roots: Vec::new(),
        }
    }
}

impl WorkspaceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_implicit_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.implicit_packages = packages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    pub fn with_java_lang_registry(mut self, enabled: bool) -> Self {
        self.java_lang_registry = enabled;
        self
    }

    pub fn with_stub_fallback(mut self, enabled: bool) -> Self {
        self.stub_fallback = enabled;
        self
    }

    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_roots.push(root.into());
        self
    }
}
