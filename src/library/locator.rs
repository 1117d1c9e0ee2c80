//! On-demand source loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::error::Error;
use crate::model::{ClassDescriptor, SourceSet, parse_unit};

/// Finds the source text that may declare a class.
pub trait SourceLocator: Send + Sync {
    /// Files that could declare `name`, most specific first.
    fn candidates(&self, name: &str) -> Vec<PathBuf>;

    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Relative paths a class may live in: `a.b.C.D` gives `a/b/C/D.java`,
/// `a/b/C.java`, `a/b.java`... down to the first segment.
pub fn candidate_paths(name: &str, extension: &str) -> Vec<PathBuf> {
    let segments: Vec<&str> = name.split('.').collect();
    (1..=segments.len())
        .rev()
        .map(|len| {
            let mut path: PathBuf = segments[..len].iter().collect();
            path.set_extension(extension);
            path
        })
        .collect()
}

/// Maps class names onto a directory tree of `.java` files.
#[derive(Clone, Debug)]
pub struct DirectoryLocator {
    root: PathBuf,
    extension: String,
}

impl DirectoryLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "java".to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceLocator for DirectoryLocator {
    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        candidate_paths(name, &self.extension)
            .into_iter()
            .map(|relative| self.root.join(relative))
            .filter(|path| path.is_file())
            .collect()
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// Source files held in memory, keyed by relative path.
#[derive(Clone, Debug, Default)]
pub struct MemoryLocator {
    files: IndexMap<PathBuf, String>,
}

impl MemoryLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.files.insert(path.into(), text.into());
        self
    }

    /// Store `text` where a class named `name` would be looked for.
    pub fn with_class(self, name: &str, text: impl Into<String>) -> Self {
        let path = candidate_paths(name, "java").swap_remove(0);
        self.with_file(path, text)
    }
}

impl SourceLocator for MemoryLocator {
    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        candidate_paths(name, "java")
            .into_iter()
            .filter(|path| self.files.contains_key(path))
            .collect()
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}

/// Parses candidate files the first time a class is asked for and adds the
/// resulting units to the session's source set.
pub struct SourceRoots {
    sources: Arc<SourceSet>,
    locators: Vec<Box<dyn SourceLocator>>,
    /// Files already tried. Held for the whole lookup so a file is parsed at
    /// most once even under concurrent lookups.
    attempted: Mutex<FxHashSet<PathBuf>>,
}

impl SourceRoots {
    pub fn new(sources: Arc<SourceSet>, locators: Vec<Box<dyn SourceLocator>>) -> Self {
        Self {
            sources,
            locators,
            attempted: Mutex::new(FxHashSet::default()),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<ClassDescriptor>> {
        let mut attempted = self.attempted.lock();
        for locator in &self.locators {
            for path in locator.candidates(name) {
                if !attempted.insert(path.clone()) {
                    continue;
                }
                let parsed = locator
                    .read(&path)
                    .map_err(|e| Error::io(&path, e))
                    .and_then(|text| parse_unit(self.sources.reserve_id(), &path, &text));
                match parsed {
                    Ok(unit) => {
                        debug!(name, path = %path.display(), "loaded source on demand");
                        self.sources.insert(unit);
                    }
                    Err(err) => {
                        warn!(name, path = %path.display(), error = %err, "skipping unreadable source");
                        continue;
                    }
                }
                if let Some(class) = self.sources.class(name) {
                    return Some(class);
                }
            }
        }
        self.sources.class(name)
    }
}
