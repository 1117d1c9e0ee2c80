//! Name resolution: turning a name written in a source unit into a
//! fully-qualified class name.
//!
//! Resolution order, first match wins:
//!
//! 1. explicit single-type imports
//! 2. classes visible from the use site: the context class, its nested
//!    classes, then each enclosing class and its nested classes, then the
//!    unit's top-level classes
//! 3. classes in the unit's own package
//! 4. wildcard imports, in declaration order
//! 5. implicit packages (`java.lang`)
//!
//! Steps 3-5 ask the [`ClassLookup`] whether a candidate exists. A name that
//! matches nothing stays unresolved; that is a state, not an error.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::trace;

use super::ids::ClassId;
use super::source::{Import, SourceUnit};
use crate::base::{SourceId, names};

/// What resolution needs from its surroundings.
pub trait ClassLookup {
    /// The registered source unit with this id.
    fn source(&self, id: SourceId) -> Option<Arc<SourceUnit>>;

    /// Whether a class with this fully-qualified name is known to exist.
    fn has_class(&self, name: &str) -> bool;

    /// Packages visible everywhere without an import.
    fn implicit_packages(&self) -> &[SmolStr];
}

// ============================================================================
// IMPORT VISIBILITY (computed once per unit)
// ============================================================================

/// Per-unit view of its type imports. Static imports do not import types
/// here and are left out.
#[derive(Clone, Debug, Default)]
pub struct ImportVisibility {
    /// Simple name -> imported fully-qualified name.
    explicit: FxHashMap<SmolStr, SmolStr>,
    /// Wildcard-imported packages (or classes), in declaration order.
    wildcards: Vec<SmolStr>,
}

impl ImportVisibility {
    pub fn from_imports(imports: &[Import]) -> Self {
        let mut visibility = Self::default();
        for import in imports.iter().filter(|i| !i.is_static) {
            if import.is_wildcard {
                if !visibility.wildcards.contains(&import.name) {
                    visibility.wildcards.push(import.name.clone());
                }
            } else {
                let simple = SmolStr::new(names::simple_name(&import.name));
                visibility
                    .explicit
                    .entry(simple)
                    .or_insert_with(|| import.name.clone());
            }
        }
        visibility
    }

    pub fn lookup_explicit(&self, simple_name: &str) -> Option<&SmolStr> {
        self.explicit.get(simple_name)
    }

    pub fn wildcards(&self) -> &[SmolStr] {
        &self.wildcards
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Query-time resolution for names written in one source unit.
pub struct Resolver<'a> {
    unit: &'a SourceUnit,
    lookup: &'a dyn ClassLookup,
    context: Option<ClassId>,
}

impl<'a> Resolver<'a> {
    pub fn new(unit: &'a SourceUnit, lookup: &'a dyn ClassLookup) -> Self {
        Self {
            unit,
            lookup,
            context: None,
        }
    }

    /// Resolve from inside this class.
    pub fn with_context(mut self, context: Option<ClassId>) -> Self {
        self.context = context;
        self
    }

    pub fn resolve(&self, name: &str) -> Option<SmolStr> {
        let Some((head, rest)) = name.split_once('.') else {
            return self.resolve_simple(name);
        };

        // `Map.Entry`: resolve the outer type, keep the member path.
        if let Some(outer) = self.resolve_simple(head) {
            return Some(SmolStr::from(format!("{outer}.{rest}")));
        }
        if self.lookup.has_class(name) || head.starts_with(|c: char| c.is_lowercase()) {
            trace!(name, "taking dotted name as fully qualified");
            return Some(SmolStr::new(name));
        }
        None
    }

    fn resolve_simple(&self, name: &str) -> Option<SmolStr> {
        let visibility = self.unit.visibility();

        if let Some(fqn) = visibility.lookup_explicit(name) {
            trace!(name, %fqn, "resolved by explicit import");
            return Some(fqn.clone());
        }

        if let Some(fqn) = self.visible_class(name) {
            trace!(name, %fqn, "resolved by enclosing scope");
            return Some(fqn);
        }

        let same_package = names::join(self.unit.package(), name);
        if self.lookup.has_class(&same_package) {
            trace!(name, fqn = %same_package, "resolved in same package");
            return Some(same_package.into());
        }

        for package in visibility.wildcards() {
            let candidate = format!("{package}.{name}");
            if self.lookup.has_class(&candidate) {
                trace!(name, fqn = %candidate, "resolved by wildcard import");
                return Some(candidate.into());
            }
        }

        for package in self.lookup.implicit_packages() {
            let candidate = format!("{package}.{name}");
            if self.lookup.has_class(&candidate) {
                trace!(name, fqn = %candidate, "resolved in implicit package");
                return Some(candidate.into());
            }
        }

        trace!(name, source = %self.unit.id(), "unresolved");
        None
    }

    /// Walk outwards from the context class, then the unit's top level.
    fn visible_class(&self, name: &str) -> Option<SmolStr> {
        let mut current = self.context.and_then(|id| self.unit.class(id));
        while let Some(class) = current {
            if class.name == name {
                return Some(class.fqn.clone());
            }
            let nested = class
                .nested
                .iter()
                .filter_map(|id| self.unit.class(*id))
                .find(|nested| nested.name == name);
            if let Some(nested) = nested {
                return Some(nested.fqn.clone());
            }
            current = class.enclosing.and_then(|id| self.unit.class(id));
        }

        self.unit
            .top_level_classes()
            .find(|class| class.name == name)
            .map(|class| class.fqn.clone())
    }
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashSet;

    use super::*;
    use crate::model::{SourceSet, parse_unit};

    /// Parsed sources plus a fixed set of extra known names.
    struct Known {
        sources: SourceSet,
        extra: FxHashSet<&'static str>,
        implicit: Vec<SmolStr>,
    }

    impl Known {
        fn new(extra: &[&'static str]) -> Self {
            Self {
                sources: SourceSet::new(),
                extra: extra.iter().copied().collect(),
                implicit: vec![SmolStr::new_static("java.lang")],
            }
        }

        fn add(&self, path: &str, text: &str) -> Arc<SourceUnit> {
            let unit = parse_unit(self.sources.reserve_id(), path, text).unwrap();
            self.sources.insert(unit).unit
        }
    }

    impl ClassLookup for Known {
        fn source(&self, id: SourceId) -> Option<Arc<SourceUnit>> {
            self.sources.get(id)
        }

        fn has_class(&self, name: &str) -> bool {
            self.extra.contains(name) || self.sources.contains_class(name)
        }

        fn implicit_packages(&self) -> &[SmolStr] {
            &self.implicit
        }
    }

    fn resolve(known: &Known, unit: &SourceUnit, name: &str) -> Option<SmolStr> {
        let context = unit.classes().first().and_then(|c| c.id());
        unit.resolve_name(name, context, known)
    }

    #[test]
    fn test_explicit_import_beats_wildcard() {
        let known = Known::new(&["q.R", "w.R"]);
        let unit = known.add("C.java", "package p; import w.*; import q.R; class C {}");
        assert_eq!(resolve(&known, &unit, "R").as_deref(), Some("q.R"));
    }

    #[test]
    fn test_wildcards_in_declaration_order() {
        let known = Known::new(&["a.X", "b.X"]);
        let unit = known.add("C.java", "import b.*; import a.*; class C {}");
        assert_eq!(resolve(&known, &unit, "X").as_deref(), Some("b.X"));
    }

    #[test]
    fn test_nested_class_shadows_wildcard() {
        let known = Known::new(&["w.Entry"]);
        let unit = known.add(
            "Outer.java",
            "package p; import w.*; class Outer { class Entry {} class Inner { Entry e; } }",
        );
        let inner = unit.class_named("p.Outer.Inner").unwrap();
        let field = &inner.fields[0];
        assert_eq!(field.ty.resolve(&known), "p.Outer.Entry");
    }

    #[test]
    fn test_same_package_beats_wildcard_and_implicit() {
        let known = Known::new(&["w.String", "java.lang.String"]);
        known.add("String.java", "package p; public class String {}");
        let unit = known.add("C.java", "package p; import w.*; class C {}");
        assert_eq!(resolve(&known, &unit, "String").as_deref(), Some("p.String"));
    }

    #[test]
    fn test_implicit_package_is_last() {
        let known = Known::new(&["java.lang.Integer"]);
        let unit = known.add("C.java", "class C {}");
        assert_eq!(resolve(&known, &unit, "Integer").as_deref(), Some("java.lang.Integer"));
        assert_eq!(resolve(&known, &unit, "Nowhere"), None);
    }

    #[test]
    fn test_static_imports_do_not_import_types() {
        let known = Known::new(&[]);
        let unit = known.add("C.java", "import static q.Util.helper; class C {}");
        assert_eq!(resolve(&known, &unit, "helper"), None);
    }

    #[test]
    fn test_dotted_names() {
        let known = Known::new(&["java.util.Map", "x.Y.Z"]);
        let unit = known.add("C.java", "import java.util.Map; class C {}");
        assert_eq!(resolve(&known, &unit, "Map.Entry").as_deref(), Some("java.util.Map.Entry"));
        assert_eq!(resolve(&known, &unit, "java.io.File").as_deref(), Some("java.io.File"));
        assert_eq!(resolve(&known, &unit, "Unknown.Thing"), None);
    }
}
