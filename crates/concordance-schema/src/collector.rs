//! Type & group collector
//!
//! Builds the [`TypeRegistry`] for one version's document tree. Every `.xsd`
//! file under the version directory is loaded, and `xs:include` /
//! `xs:import` locations are followed relative to the including document.
//! Parsed documents are kept so the walker can reuse them.

use crate::loader::SchemaLoader;
use crate::model::SchemaDocument;
use crate::registry::TypeRegistry;
use crate::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Collects named definitions across a version's documents
#[derive(Debug, Default)]
pub struct TypeCollector {
    loader: SchemaLoader,
    documents: Vec<SchemaDocument>,
    index: HashMap<PathBuf, usize>,
    visited: HashSet<PathBuf>,
    registry: TypeRegistry,
}

impl TypeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom loader
    #[must_use]
    pub fn with_loader(mut self, loader: SchemaLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Collect from every `.xsd` file below `dir`, recursing into
    /// subdirectories in sorted order. Returns the number of documents held
    /// after collection.
    pub fn collect_directory(&mut self, dir: &Path) -> Result<usize> {
        for path in discover_xsd_files(dir)? {
            self.collect_file(&path);
        }
        debug!(
            "Collected {} documents from {:?}: {} types, {} groups",
            self.documents.len(),
            dir,
            self.registry.type_count(),
            self.registry.group_count()
        );
        Ok(self.documents.len())
    }

    /// Collect from one file and everything it includes or imports.
    /// Unreadable documents and missing references are skipped.
    pub fn collect_file(&mut self, path: &Path) {
        let mut pending = vec![path.to_path_buf()];

        while let Some(next) = pending.pop() {
            let canonical = match next.canonicalize() {
                Ok(p) => p,
                Err(e) => {
                    debug!("Skipping missing schema document {:?}: {}", next, e);
                    continue;
                }
            };
            if !self.visited.insert(canonical.clone()) {
                trace!("Already visited {:?}", canonical);
                continue;
            }

            let document = match self.loader.load_file(&canonical) {
                Ok(doc) => doc,
                Err(e) => {
                    debug!("Skipping unparseable schema document {:?}: {}", canonical, e);
                    continue;
                }
            };

            let base_dir = canonical.parent().unwrap_or(Path::new(".")).to_path_buf();
            // Reverse so includes are visited in declaration order
            for location in document.includes.iter().rev() {
                pending.push(base_dir.join(location));
            }

            self.registry.register_document(&document);
            self.index.insert(canonical, self.documents.len());
            self.documents.push(document);
        }
    }

    /// Parsed documents in collection order
    pub fn documents(&self) -> &[SchemaDocument] {
        &self.documents
    }

    /// Parsed document for `path`, if it was collected
    pub fn document(&self, path: &Path) -> Option<&SchemaDocument> {
        let canonical = path.canonicalize().ok()?;
        self.index.get(&canonical).map(|&i| &self.documents[i])
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }
}

/// Every `.xsd` file below `dir`, in sorted order
pub fn discover_xsd_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotFound(dir.display().to_string()));
    }
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if is_xsd(&path) {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

pub(crate) fn is_xsd(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xsd"))
}
