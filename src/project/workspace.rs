//! A parsing session: shared source set, class library and loaders.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use smol_str::SmolStr;
use tracing::{info, warn};
use walkdir::WalkDir;

use super::diagnostics::{Diagnostic, DiagnosticCollector};
use super::options::WorkspaceOptions;
use crate::error::{Error, Result};
use crate::library::{
    ClassLibrary, ClassLibraryBuilder, DirectoryLocator, MemoryRegistry, SourceLocator,
};
use crate::model::{
    ClassDescriptor, Registered, SourceSet, SourceUnit, TypeArgument, TypeRef, parse_reader,
    parse_unit,
};

/// What [`Workspace::add_source_tree`] loaded.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Source files found.
    pub files: usize,
    /// Units registered, in path order.
    pub units: Vec<Arc<SourceUnit>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// A type reference nothing in the library could resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub path: PathBuf,
    /// Fully-qualified name of the class the reference appears in.
    pub class: SmolStr,
    /// Human-readable description of where, e.g. "type of field 'x'".
    pub site: String,
    /// The name as written.
    pub name: SmolStr,
    pub line: u32,
}

/// Owns the session's [`SourceSet`] and the [`ClassLibrary`] built over it.
///
/// All operations take `&self`; a workspace can be shared across threads.
#[derive(Debug)]
pub struct Workspace {
    options: WorkspaceOptions,
    sources: Arc<SourceSet>,
    library: ClassLibrary,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(WorkspaceOptions::default())
    }
}

impl Workspace {
    /// Parsed sources, then the `java.lang` registry, then the source roots,
    /// then the stub fallback, each as enabled in `options`.
    pub fn new(options: WorkspaceOptions) -> Self {
        let java_lang = options.java_lang_registry;
        let stub = options.stub_fallback;
        let locators: Vec<Box<dyn SourceLocator>> = options
            .source_roots
            .iter()
            .map(|root| {
                Box::new(DirectoryLocator::new(root).with_extension(options.extension.clone()))
                    as Box<dyn SourceLocator>
            })
            .collect();

        Self::with_library(options, move |builder| {
            let mut builder = builder.append_parsed_sources();
            if java_lang {
                builder = builder.append_registry(MemoryRegistry::java_lang());
            }
            builder = builder.append_locators(locators);
            if stub {
                builder = builder.append_stub();
            }
            builder
        })
    }

    /// Compose the class library chain by hand. The builder comes preset
    /// with the session's source set and implicit packages.
    pub fn with_library(
        options: WorkspaceOptions,
        compose: impl FnOnce(ClassLibraryBuilder) -> ClassLibraryBuilder,
    ) -> Self {
        let sources = Arc::new(SourceSet::new());
        let builder = ClassLibrary::builder(sources.clone())
            .implicit_packages(options.implicit_packages.iter().cloned());
        Self {
            library: compose(builder).build(),
            options,
            sources,
        }
    }

    pub fn options(&self) -> &WorkspaceOptions {
        &self.options
    }

    pub fn sources(&self) -> &Arc<SourceSet> {
        &self.sources
    }

    pub fn library(&self) -> &ClassLibrary {
        &self.library
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Parse `text` and register it under `path`.
    pub fn add_source(&self, path: impl Into<PathBuf>, text: &str) -> Result<Registered> {
        let unit = parse_unit(self.sources.reserve_id(), path, text)?;
        Ok(self.sources.insert(unit))
    }

    pub fn add_source_reader(&self, path: impl Into<PathBuf>, reader: impl Read) -> Result<Registered> {
        let unit = parse_reader(self.sources.reserve_id(), path, reader)?;
        Ok(self.sources.insert(unit))
    }

    pub fn add_source_file(&self, path: impl AsRef<Path>) -> Result<Registered> {
        let unit = self.parse_file(path.as_ref())?;
        Ok(self.sources.insert(unit))
    }

    /// Load every source file under `dir`.
    ///
    /// Failures become diagnostics when `continue_on_error` is set; otherwise
    /// the first failure (in path order) is returned and later files are not
    /// registered.
    pub fn add_source_tree(&self, dir: impl AsRef<Path>) -> Result<LoadReport> {
        let dir = dir.as_ref();
        let mut collector = DiagnosticCollector::new();
        let files = self.collect_files(dir, &mut collector)?;

        let results: Vec<(PathBuf, Result<SourceUnit>)> = if self.options.parallel {
            files
                .into_par_iter()
                .map(|path| {
                    let unit = self.parse_file(&path);
                    (path, unit)
                })
                .collect()
        } else {
            files
                .into_iter()
                .map(|path| {
                    let unit = self.parse_file(&path);
                    (path, unit)
                })
                .collect()
        };

        let mut report = LoadReport {
            files: results.len(),
            ..LoadReport::default()
        };
        for (path, result) in results {
            match result {
                Ok(unit) => {
                    let registered = self.sources.insert(unit);
                    for duplicate in &registered.duplicates {
                        collector.duplicate_class(&path, duplicate);
                    }
                    report.units.push(registered.unit);
                }
                Err(err) if self.options.continue_on_error => {
                    warn!(path = %path.display(), error = %err, "skipping source file");
                    collector.load_error(&path, &err);
                }
                Err(err) => return Err(err),
            }
        }

        report.diagnostics = collector.take();
        info!(
            dir = %dir.display(),
            files = report.files,
            units = report.units.len(),
            diagnostics = report.diagnostics.len(),
            "loaded source tree"
        );
        Ok(report)
    }

    fn parse_file(&self, path: &Path) -> Result<SourceUnit> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        parse_unit(self.sources.reserve_id(), path, &text)
    }

    fn collect_files(&self, dir: &Path, collector: &mut DiagnosticCollector) -> Result<Vec<PathBuf>> {
        let extension = self.options.extension.as_str();
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if entry.file_type().is_file()
                        && path.extension().is_some_and(|ext| ext == extension)
                    {
                        files.push(path.to_path_buf());
                    }
                }
                Err(err) => {
                    let path = err.path().unwrap_or(dir).to_path_buf();
                    let err = Error::io(path.clone(), err.into());
                    if !self.options.continue_on_error {
                        return Err(err);
                    }
                    collector.load_error(&path, &err);
                }
            }
        }
        Ok(files)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Descriptor for a fully-qualified name, through the whole chain.
    pub fn class(&self, fqn: &str) -> Option<Arc<ClassDescriptor>> {
        self.library.class(fqn)
    }

    /// Every class parsed in this session, nested ones included.
    pub fn classes(&self) -> Vec<Arc<ClassDescriptor>> {
        self.sources.classes()
    }

    pub fn packages(&self) -> Vec<SmolStr> {
        self.sources.packages()
    }

    pub fn resolve<'t>(&self, ty: &'t TypeRef) -> &'t str {
        ty.resolve(&self.library)
    }

    /// Resolve every type reference in every parsed class and report the
    /// ones that stay unresolved, type arguments included.
    pub fn unresolved_references(&self) -> Vec<UnresolvedReference> {
        let mut unresolved = Vec::new();
        for unit in self.sources.units() {
            for class in unit.classes() {
                for (site, line, ty) in class.type_refs() {
                    let mut pending = vec![ty];
                    while let Some(ty) = pending.pop() {
                        ty.resolve(&self.library);
                        if !ty.is_resolved() {
                            unresolved.push(UnresolvedReference {
                                path: unit.path().to_path_buf(),
                                class: class.fqn.clone(),
                                site: site.to_string(),
                                name: SmolStr::new(ty.name()),
                                line,
                            });
                        }
                        for argument in ty.arguments() {
                            match argument {
                                TypeArgument::Type(inner) => pending.push(inner),
                                TypeArgument::Wildcard { bound: Some((_, inner)) } => pending.push(inner),
                                TypeArgument::Wildcard { bound: None } => {}
                            }
                        }
                    }
                }
            }
        }
        unresolved
    }

    /// [`Self::unresolved_references`] as warnings.
    pub fn check(&self) -> Vec<Diagnostic> {
        let mut collector = DiagnosticCollector::new();
        for reference in self.unresolved_references() {
            collector.unresolved_type(&reference.path, reference.line, &reference.name, &reference.site);
        }
        collector.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chain() {
        let ws = Workspace::default();
        assert_eq!(ws.library().strategies(), vec!["parsed-sources", "registry"]);
        let ws = Workspace::new(
            WorkspaceOptions::new()
                .with_stub_fallback(true)
                .with_source_root("/nonexistent"),
        );
        assert_eq!(ws.library().strategies(), vec!["parsed-sources", "registry", "source-roots", "stub"]);
    }

    #[test]
    fn test_add_source_and_query() {
        let ws = Workspace::default();
        ws.add_source("p/C.java", "package p; public class C { String name; }").unwrap();
        let class = ws.class("p.C").unwrap();
        assert_eq!(ws.resolve(&class.fields[0].ty), "java.lang.String");
        assert_eq!(ws.packages(), vec![SmolStr::new("p")]);
        assert_eq!(ws.classes().len(), 1);
    }

    #[test]
    fn test_failed_source_leaves_session_intact() {
        let ws = Workspace::default();
        ws.add_source("A.java", "package p; class A {}").unwrap();
        assert!(ws.add_source("B.java", "package p; class B { String s = \"oops; }").is_err());
        assert!(ws.class("p.A").is_some());
        assert!(ws.class("p.B").is_none());
        assert_eq!(ws.sources().len(), 1);
    }

    #[test]
    fn test_unresolved_references_include_type_arguments() {
        let ws = Workspace::default();
        ws.add_source("C.java", "class C { java.util.List<Missing> items; Integer count; }")
            .unwrap();
        let unresolved = ws.unresolved_references();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].name, "Missing");
        assert_eq!(unresolved[0].site, "type of field 'items'");
        assert_eq!(ws.check().len(), 1);
    }

    #[test]
    fn test_unresolved_references_point_at_member_line() {
        let ws = Workspace::default();
        ws.add_source("C.java", "package p;\nclass C {\n  int a;\n\n  Unknown u;\n}\n")
            .unwrap();
        let diagnostics = ws.check();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].to_string(),
            "C.java:5: warning[W0002]: unresolved type 'Unknown' in type of field 'u'"
        );
    }

    #[test]
    fn test_unresolved_references_cover_bounds_permits_and_annotations() {
        let ws = Workspace::default();
        ws.add_source(
            "S.java",
            "package p;\n@Audited\nsealed class S<T extends Missing> permits Gone {\n  @Override public String toString() { return \"\"; }\n  @Tracked\n  <U extends Comparable<U> & Absent> void m(@Checked U u) {}\n}\n",
        )
        .unwrap();
        let mut found: Vec<_> = ws
            .unresolved_references()
            .into_iter()
            .map(|r| (r.name.to_string(), r.site, r.line))
            .collect();
        found.sort();
        assert_eq!(
            found,
            vec![
                ("Absent".to_string(), "bound of type parameter 'U'".to_string(), 5),
                ("Audited".to_string(), "annotation on 'S'".to_string(), 2),
                ("Checked".to_string(), "annotation on 'u'".to_string(), 5),
                ("Gone".to_string(), "permitted subclass".to_string(), 2),
                ("Missing".to_string(), "bound of type parameter 'T'".to_string(), 2),
                ("Tracked".to_string(), "annotation on 'm'".to_string(), 5),
            ]
        );
    }
}
