//! Source units: one parsed input each.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use smol_str::SmolStr;

use super::class::ClassDescriptor;
use super::ids::ClassId;
use super::member::Annotation;
use super::resolve::{ClassLookup, ImportVisibility, Resolver};
use crate::base::SourceId;

/// An import declaration. The name excludes the trailing `.*`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub name: SmolStr,
    pub is_static: bool,
    pub is_wildcard: bool,
    pub line: u32,
}

/// One parsed input: package, imports and every class it declares.
///
/// The unit owns its descriptors in an arena indexed by
/// [`LocalClassId`](super::LocalClassId); nested classes live in the same
/// arena and point at each other by [`ClassId`].
#[derive(Debug)]
pub struct SourceUnit {
    id: SourceId,
    path: PathBuf,
    package: Option<SmolStr>,
    package_doc: Option<String>,
    package_annotations: Vec<Annotation>,
    imports: Vec<Import>,
    classes: Vec<Arc<ClassDescriptor>>,
    top_level: Vec<ClassId>,
    visibility: ImportVisibility,
}

/// Everything a [`SourceUnit`] is assembled from.
#[derive(Debug, Default)]
pub(crate) struct SourceUnitParts {
    pub package: Option<SmolStr>,
    pub package_doc: Option<String>,
    pub package_annotations: Vec<Annotation>,
    pub imports: Vec<Import>,
    pub classes: Vec<ClassDescriptor>,
    pub top_level: Vec<ClassId>,
}

impl SourceUnit {
    pub(crate) fn new(id: SourceId, path: PathBuf, parts: SourceUnitParts) -> Self {
        let visibility = ImportVisibility::from_imports(&parts.imports);
        Self {
            id,
            path,
            package: parts.package,
            package_doc: parts.package_doc,
            package_annotations: parts.package_annotations,
            imports: parts.imports,
            classes: parts.classes.into_iter().map(Arc::new).collect(),
            top_level: parts.top_level,
            visibility,
        }
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    /// Path or logical name the unit was loaded under.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn package_doc(&self) -> Option<&str> {
        self.package_doc.as_deref()
    }

    pub fn package_annotations(&self) -> &[Annotation] {
        &self.package_annotations
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub(crate) fn visibility(&self) -> &ImportVisibility {
        &self.visibility
    }

    /// Every class in the unit, nested ones included, in declaration order.
    pub fn classes(&self) -> &[Arc<ClassDescriptor>] {
        &self.classes
    }

    pub fn top_level_classes(&self) -> impl Iterator<Item = &Arc<ClassDescriptor>> {
        self.top_level.iter().filter_map(|id| self.class(*id))
    }

    pub fn class(&self, id: ClassId) -> Option<&Arc<ClassDescriptor>> {
        if id.source != self.id {
            return None;
        }
        self.classes.get(id.local.index() as usize)
    }

    pub fn class_named(&self, fqn: &str) -> Option<&Arc<ClassDescriptor>> {
        self.classes.iter().find(|c| c.fqn == fqn)
    }

    /// Resolve a name written in this unit to a fully-qualified name.
    ///
    /// `context` is the innermost class enclosing the use site; nested
    /// classes visible from there shadow imports.
    pub fn resolve_name(
        &self,
        name: &str,
        context: Option<ClassId>,
        lookup: &dyn ClassLookup,
    ) -> Option<SmolStr> {
        Resolver::new(self, lookup).with_context(context).resolve(name)
    }
}
