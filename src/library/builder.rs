//! Composing a class library chain.

use std::path::PathBuf;
use std::sync::Arc;

use smol_str::SmolStr;

use super::ClassLibrary;
use super::locator::{DirectoryLocator, SourceLocator, SourceRoots};
use super::registry::ClassRegistry;
use super::strategy::Strategy;
use crate::model::SourceSet;

/// Builds a [`ClassLibrary`] from strategies appended in priority order.
///
/// The stub fallback, if requested, always ends up last.
pub struct ClassLibraryBuilder {
    sources: Arc<SourceSet>,
    strategies: Vec<Strategy>,
    stub: bool,
    implicit_packages: Vec<SmolStr>,
}

impl ClassLibraryBuilder {
    pub fn new(sources: Arc<SourceSet>) -> Self {
        Self {
            sources,
            strategies: Vec::new(),
            stub: false,
            implicit_packages: vec![SmolStr::new_static("java.lang")],
        }
    }

    /// Consult classes parsed in this session.
    pub fn append_parsed_sources(mut self) -> Self {
        self.strategies.push(Strategy::ParsedSources(self.sources.clone()));
        self
    }

    pub fn append_registry(mut self, registry: impl ClassRegistry + 'static) -> Self {
        self.strategies.push(Strategy::Registry(Arc::new(registry)));
        self
    }

    pub fn append_shared_registry(mut self, registry: Arc<dyn ClassRegistry>) -> Self {
        self.strategies.push(Strategy::Registry(registry));
        self
    }

    /// Parse matching files from these locators on demand.
    pub fn append_locators(mut self, locators: Vec<Box<dyn SourceLocator>>) -> Self {
        if !locators.is_empty() {
            let roots = SourceRoots::new(self.sources.clone(), locators);
            self.strategies.push(Strategy::SourceRoots(roots));
        }
        self
    }

    pub fn append_locator(self, locator: impl SourceLocator + 'static) -> Self {
        self.append_locators(vec![Box::new(locator)])
    }

    /// Parse matching files under these directories on demand.
    pub fn append_source_roots<I, P>(self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let locators = roots
            .into_iter()
            .map(|root| Box::new(DirectoryLocator::new(root)) as Box<dyn SourceLocator>)
            .collect();
        self.append_locators(locators)
    }

    /// Synthesize empty classes for names nothing else knows.
    pub fn append_stub(mut self) -> Self {
        self.stub = true;
        self
    }

    /// Packages visible without an import. Defaults to `java.lang`.
    pub fn implicit_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.implicit_packages = packages.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(mut self) -> ClassLibrary {
        if self.stub {
            self.strategies.push(Strategy::Stub);
        }
        ClassLibrary::new(self.sources, self.strategies, self.implicit_packages)
    }
}
