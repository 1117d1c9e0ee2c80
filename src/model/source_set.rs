//! Session-wide registry of parsed source units.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::warn;

use super::class::ClassDescriptor;
use super::ids::ClassId;
use super::resolve::ClassLookup;
use super::source::SourceUnit;
use crate::base::SourceId;

/// Append-only set of source units plus an index of every class they
/// declare (nested ones included) by fully-qualified name.
///
/// Units are never replaced or removed. When two units declare the same
/// class the first registration wins and the clash is logged and reported
/// back to the caller.
#[derive(Debug, Default)]
pub struct SourceSet {
    inner: RwLock<SourceSetInner>,
}

#[derive(Debug, Default)]
struct SourceSetInner {
    units: IndexMap<SourceId, Arc<SourceUnit>>,
    /// Fully-qualified name -> declaring class.
    classes: FxHashMap<SmolStr, ClassId>,
    next_id: u32,
}

/// Outcome of [`SourceSet::insert`].
#[derive(Debug)]
pub struct Registered {
    pub unit: Arc<SourceUnit>,
    /// Classes in the unit whose name was already registered by another unit.
    pub duplicates: Vec<SmolStr>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a fresh id for a unit about to be parsed.
    pub fn reserve_id(&self) -> SourceId {
        let mut inner = self.inner.write();
        let id = SourceId::new(inner.next_id);
        inner.next_id += 1;
        id
    }

    /// Register a parsed unit.
    pub fn insert(&self, unit: SourceUnit) -> Registered {
        let unit = Arc::new(unit);
        let mut duplicates = Vec::new();

        let mut inner = self.inner.write();
        for class in unit.classes() {
            let Some(id) = class.id() else { continue };
            match inner.classes.get(&class.fqn) {
                Some(existing) if *existing != id => {
                    warn!(
                        class = %class.fqn,
                        path = %unit.path().display(),
                        "class already declared in another source unit; keeping the first"
                    );
                    duplicates.push(class.fqn.clone());
                }
                Some(_) => {}
                None => {
                    inner.classes.insert(class.fqn.clone(), id);
                }
            }
        }
        inner.units.insert(unit.id(), unit.clone());
        Registered { unit, duplicates }
    }

    pub fn get(&self, id: SourceId) -> Option<Arc<SourceUnit>> {
        self.inner.read().units.get(&id).cloned()
    }

    pub fn class_id(&self, fqn: &str) -> Option<ClassId> {
        self.inner.read().classes.get(fqn).copied()
    }

    pub fn contains_class(&self, fqn: &str) -> bool {
        self.inner.read().classes.contains_key(fqn)
    }

    /// The registered descriptor, shared rather than copied.
    pub fn class(&self, fqn: &str) -> Option<Arc<ClassDescriptor>> {
        let inner = self.inner.read();
        let id = inner.classes.get(fqn)?;
        inner.units.get(&id.source)?.class(*id).cloned()
    }

    /// Units in registration order.
    pub fn units(&self) -> Vec<Arc<SourceUnit>> {
        self.inner.read().units.values().cloned().collect()
    }

    /// Every registered class in registration order.
    pub fn classes(&self) -> Vec<Arc<ClassDescriptor>> {
        let inner = self.inner.read();
        inner
            .units
            .values()
            .flat_map(|unit| {
                unit.classes()
                    .iter()
                    .filter(|c| c.id().is_some_and(|id| inner.classes.get(&c.fqn) == Some(&id)))
                    .cloned()
            })
            .collect()
    }

    /// Distinct package names, sorted. The default package is left out.
    pub fn packages(&self) -> Vec<SmolStr> {
        let inner = self.inner.read();
        let mut packages: Vec<SmolStr> = inner
            .units
            .values()
            .filter_map(|unit| unit.package().map(SmolStr::new))
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        packages.sort();
        packages
    }

    pub fn len(&self) -> usize {
        self.inner.read().units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolution against parsed sources only, with no implicit packages.
impl ClassLookup for SourceSet {
    fn source(&self, id: SourceId) -> Option<Arc<SourceUnit>> {
        self.get(id)
    }

    fn has_class(&self, name: &str) -> bool {
        self.contains_class(name)
    }

    fn implicit_packages(&self) -> &[SmolStr] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_unit;

    fn add(set: &SourceSet, path: &str, text: &str) -> Registered {
        set.insert(parse_unit(set.reserve_id(), path, text).unwrap())
    }

    #[test]
    fn test_reserve_ids_are_unique() {
        let set = SourceSet::new();
        let a = set.reserve_id();
        let b = set.reserve_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_nested_classes_are_indexed() {
        let set = SourceSet::new();
        add(&set, "a/Outer.java", "package a; class Outer { static class Inner {} }");
        assert!(set.contains_class("a.Outer"));
        assert!(set.contains_class("a.Outer.Inner"));
        assert_eq!(set.class("a.Outer.Inner").unwrap().name, "Inner");
    }

    #[test]
    fn test_first_registration_wins() {
        let set = SourceSet::new();
        let first = add(&set, "one/A.java", "package p; class A { int one; }");
        let second = add(&set, "two/A.java", "package p; class A { int two; }");
        assert!(first.duplicates.is_empty());
        assert_eq!(second.duplicates, vec![SmolStr::new("p.A")]);
        assert!(set.class("p.A").unwrap().field("one").is_some());
        assert_eq!(set.classes().len(), 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_packages_are_distinct_and_sorted() {
        let set = SourceSet::new();
        add(&set, "B.java", "package z; class B {}");
        add(&set, "A.java", "package a; class A {}");
        add(&set, "C.java", "package z; class C {}");
        add(&set, "D.java", "class D {}");
        assert_eq!(set.packages(), vec![SmolStr::new("a"), SmolStr::new("z")]);
    }
}
