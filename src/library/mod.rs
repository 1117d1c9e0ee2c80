//! The class library chain: fully-qualified name -> class descriptor.
//!
//! Strategies are consulted in the order they were appended:
//!
//! ```text
//! parsed sources ─▶ registry ─▶ source roots ─▶ stub
//!   (no negative      (miss is      (parse on       (never misses a
//!    caching)          final)        demand)         valid name)
//! ```
//!
//! Each entry keeps its own positive and negative cache, so a miss in one
//! strategy never hides the name from the strategies after it. Caches sit
//! behind `RwLock`s and are never held while a strategy runs; two threads
//! racing on the same name may both run the strategy, and the first result
//! stored wins.

mod builder;
mod locator;
mod registry;
mod strategy;

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::trace;

use crate::base::SourceId;
use crate::model::{ClassDescriptor, ClassLookup, SourceSet, SourceUnit};

pub use builder::ClassLibraryBuilder;
pub use locator::{DirectoryLocator, MemoryLocator, SourceLocator, SourceRoots, candidate_paths};
pub use registry::{ClassRegistry, ClassStructure, FieldSignature, MemoryRegistry, MethodSignature};
pub use strategy::{ClassStrategy, Strategy};

/// Counters for cache behaviour across the whole chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from a positive cache.
    pub hits: u64,
    /// Lookups that had to run at least one strategy.
    pub misses: u64,
}

struct ChainEntry {
    strategy: Strategy,
    found: RwLock<FxHashMap<SmolStr, Arc<ClassDescriptor>>>,
    absent: RwLock<FxHashSet<SmolStr>>,
}

impl ChainEntry {
    fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            found: RwLock::new(FxHashMap::default()),
            absent: RwLock::new(FxHashSet::default()),
        }
    }
}

enum Cached {
    Found(Arc<ClassDescriptor>),
    Absent,
    Unknown,
}

pub struct ClassLibrary {
    sources: Arc<SourceSet>,
    chain: Vec<ChainEntry>,
    implicit_packages: Vec<SmolStr>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ClassLibrary {
    pub fn builder(sources: Arc<SourceSet>) -> ClassLibraryBuilder {
        ClassLibraryBuilder::new(sources)
    }

    pub(crate) fn new(sources: Arc<SourceSet>, strategies: Vec<Strategy>, implicit_packages: Vec<SmolStr>) -> Self {
        Self {
            sources,
            chain: strategies.into_iter().map(ChainEntry::new).collect(),
            implicit_packages,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn sources(&self) -> &Arc<SourceSet> {
        &self.sources
    }

    /// Strategy kinds in consultation order.
    pub fn strategies(&self) -> Vec<&'static str> {
        self.chain.iter().map(|e| e.strategy.kind()).collect()
    }

    /// Descriptor for a fully-qualified name.
    ///
    /// With the stub fallback present this never returns `None` for a
    /// syntactically valid name.
    pub fn class(&self, name: &str) -> Option<Arc<ClassDescriptor>> {
        self.find(name, false)
    }

    /// Whether some authoritative strategy knows the class. Stubs don't count.
    pub fn has_class(&self, name: &str) -> bool {
        self.find(name, true).is_some()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn find(&self, name: &str, authoritative_only: bool) -> Option<Arc<ClassDescriptor>> {
        let mut ran_strategy = false;
        let mut cached_absent = false;
        for entry in &self.chain {
            if authoritative_only && !entry.strategy.is_authoritative() {
                continue;
            }
            match Self::cached(entry, name) {
                Cached::Found(class) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(class);
                }
                Cached::Absent => {
                    cached_absent = true;
                    continue;
                }
                Cached::Unknown => {}
            }

            ran_strategy = true;
            match entry.strategy.lookup(name) {
                Some(class) => {
                    trace!(name, strategy = entry.strategy.kind(), "class found");
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    let class = entry
                        .found
                        .write()
                        .entry(SmolStr::new(name))
                        .or_insert(class)
                        .clone();
                    return Some(class);
                }
                None if entry.strategy.caches_misses() => {
                    entry.absent.write().insert(SmolStr::new(name));
                }
                None => {}
            }
        }
        if ran_strategy {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else if cached_absent {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        trace!(name, "class not found");
        None
    }

    fn cached(entry: &ChainEntry, name: &str) -> Cached {
        if let Some(class) = entry.found.read().get(name) {
            return Cached::Found(class.clone());
        }
        if entry.absent.read().contains(name) {
            return Cached::Absent;
        }
        Cached::Unknown
    }

    // ------------------------------------------------------------------
    // Inheritance navigation
    // ------------------------------------------------------------------

    /// The superclass descriptor, following the implicit root when none is
    /// written.
    pub fn superclass_of(&self, class: &ClassDescriptor) -> Option<Arc<ClassDescriptor>> {
        let name = class.effective_superclass(self)?;
        self.class(&name)
    }

    /// Descriptors of the directly implemented (or extended) interfaces
    /// that can be found.
    pub fn interfaces_of(&self, class: &ClassDescriptor) -> Vec<Arc<ClassDescriptor>> {
        class
            .interfaces
            .iter()
            .filter_map(|ty| self.class(ty.resolve(self)))
            .collect()
    }

    /// All supertypes, nearest first, each once.
    pub fn ancestors(&self, class: &ClassDescriptor) -> Vec<Arc<ClassDescriptor>> {
        let mut seen = FxHashSet::default();
        seen.insert(class.fqn.clone());
        let mut queue = VecDeque::new();
        let mut ancestors = Vec::new();

        let mut enqueue = |parents: Vec<Arc<ClassDescriptor>>, queue: &mut VecDeque<Arc<ClassDescriptor>>| {
            for parent in parents {
                if seen.insert(parent.fqn.clone()) {
                    queue.push_back(parent);
                }
            }
        };

        enqueue(self.direct_supertypes(class), &mut queue);
        while let Some(next) = queue.pop_front() {
            enqueue(self.direct_supertypes(&next), &mut queue);
            ancestors.push(next);
        }
        ancestors
    }

    /// Whether `class` is `name` or inherits from it. Safe on cyclic hierarchies.
    pub fn is_a(&self, class: &ClassDescriptor, name: &str) -> bool {
        class.fqn == name || self.ancestors(class).iter().any(|a| a.fqn == name)
    }

    fn direct_supertypes(&self, class: &ClassDescriptor) -> Vec<Arc<ClassDescriptor>> {
        let mut parents: Vec<_> = self.superclass_of(class).into_iter().collect();
        parents.extend(self.interfaces_of(class));
        parents
    }
}

impl ClassLookup for ClassLibrary {
    fn source(&self, id: SourceId) -> Option<Arc<SourceUnit>> {
        self.sources.get(id)
    }

    fn has_class(&self, name: &str) -> bool {
        ClassLibrary::has_class(self, name)
    }

    fn implicit_packages(&self) -> &[SmolStr] {
        &self.implicit_packages
    }
}

impl std::fmt::Debug for ClassLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassLibrary")
            .field("strategies", &self.strategies())
            .field("stats", &self.stats())
            .finish()
    }
}
