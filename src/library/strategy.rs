//! Class resolution strategies.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::locator::SourceRoots;
use super::registry::ClassRegistry;
use crate::base::names;
use crate::model::{ClassDescriptor, SourceSet};

/// One way of turning a fully-qualified name into a descriptor.
pub trait ClassStrategy: Send + Sync {
    fn lookup(&self, name: &str) -> Option<Arc<ClassDescriptor>>;

    /// Whether a miss stays a miss for the rest of the session.
    fn caches_misses(&self) -> bool {
        true
    }

    /// Whether a hit means the class really exists. Only the stub fallback
    /// answers `false`.
    fn is_authoritative(&self) -> bool {
        true
    }
}

/// The built-in strategies.
pub enum Strategy {
    /// Classes from source units already parsed in this session.
    ParsedSources(Arc<SourceSet>),
    /// Classes mirrored from a structural registry.
    Registry(Arc<dyn ClassRegistry>),
    /// Sources parsed on demand from locators.
    SourceRoots(SourceRoots),
    /// Empty stand-ins for any valid name.
    Stub,
}

impl Strategy {
    pub fn kind(&self) -> &'static str {
        match self {
            Strategy::ParsedSources(_) => "parsed-sources",
            Strategy::Registry(_) => "registry",
            Strategy::SourceRoots(_) => "source-roots",
            Strategy::Stub => "stub",
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Strategy({})", self.kind())
    }
}

impl ClassStrategy for Strategy {
    fn lookup(&self, name: &str) -> Option<Arc<ClassDescriptor>> {
        match self {
            Strategy::ParsedSources(sources) => sources.class(name),
            Strategy::Registry(registry) => registry
                .structure(name)
                .map(|structure| Arc::new(structure.to_descriptor())),
            Strategy::SourceRoots(roots) => roots.lookup(name),
            Strategy::Stub => {
                if !names::is_qualified_name(name) {
                    return None;
                }
                debug!(name, "synthesizing stub class");
                Some(Arc::new(ClassDescriptor::stub(name)))
            }
        }
    }

    fn caches_misses(&self) -> bool {
        // The source set grows as the session parses more files.
        !matches!(self, Strategy::ParsedSources(_))
    }

    fn is_authoritative(&self) -> bool {
        !matches!(self, Strategy::Stub)
    }
}
