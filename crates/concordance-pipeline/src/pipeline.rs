//! Pipeline orchestration
//!
//! Runs discovery, per-version collection and walking, then the
//! cross-version build.

use std::path::Path;
use std::time::{Duration, Instant};

use concordance_ir::{SchemaElement, SchemaVersion};
use concordance_matching::{BuildOutput, BuilderConfig, ConcordanceBuilder};
use concordance_schema::{SchemaLoader, SchemaWalker, TypeCollector};
use tracing::{debug, info, trace};

use crate::discovery::{VersionSource, discover_versions, select_version};
use crate::{Error, Result};

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Walk versions on blocking worker tasks
    pub parallel: bool,
    /// Restrict the run to one version directory
    pub only_version: Option<String>,
    /// Maximum schema document size in bytes
    pub max_document_size: usize,
    /// Concordance builder settings
    pub builder: BuilderConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            only_version: None,
            max_document_size: 64 * 1024 * 1024, // 64MB
            builder: BuilderConfig::default(),
        }
    }
}

/// Elements and counters for one version
#[derive(Debug, Clone)]
pub struct VersionResult {
    pub version: SchemaVersion,
    /// Documents parsed during collection, includes and imports counted
    pub documents: usize,
    /// Documents that declare a top-level element and were walked
    pub form_documents: usize,
    /// Documents holding only type definitions
    pub type_libraries: usize,
    pub complex_types: usize,
    pub groups: usize,
    pub elements: Vec<SchemaElement>,
    pub duration: Duration,
}

/// Statistics for a pipeline run
#[derive(Debug, Default, Clone)]
pub struct PipelineStats {
    pub versions: usize,
    pub documents: usize,
    pub form_documents: usize,
    /// Leaf elements across all versions
    pub elements: usize,
    pub fields: usize,
    pub repeating_fields: usize,
    /// Time spent collecting and walking
    pub walk_time: Duration,
    /// Time spent in the cross-version build
    pub build_time: Duration,
}

/// Result of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub build: BuildOutput,
    pub stats: PipelineStats,
    /// Per-version results with elements drained
    pub versions: Vec<VersionResult>,
}

/// Main pipeline for building a concordance from a schema tree
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Create a pipeline with default configuration
    pub fn with_defaults() -> Self {
        Self::new(PipelineConfig::default())
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Versions this run will process
    pub fn sources(&self, schema_dir: &Path) -> Result<Vec<VersionSource>> {
        let sources = discover_versions(schema_dir)?;
        match &self.config.only_version {
            Some(name) => select_version(sources, name),
            None => Ok(sources),
        }
    }

    /// Discover, walk and build
    pub async fn run(&self, schema_dir: &Path) -> Result<PipelineOutput> {
        let sources = self.sources(schema_dir)?;
        info!("Found {} schema version(s)", sources.len());

        let walk_start = Instant::now();
        let results = if self.config.parallel {
            self.walk_parallel(sources).await?
        } else {
            self.walk_sequential(&sources)?
        };
        let walk_time = walk_start.elapsed();

        self.build(results, walk_time)
    }

    fn walk_sequential(&self, sources: &[VersionSource]) -> Result<Vec<VersionResult>> {
        let loader = self.loader();
        sources
            .iter()
            .map(|source| process_version(source, &loader))
            .collect()
    }

    async fn walk_parallel(&self, sources: Vec<VersionSource>) -> Result<Vec<VersionResult>> {
        let mut handles = Vec::with_capacity(sources.len());
        for source in sources {
            let loader = self.loader();
            let root = source.root.display().to_string();
            let handle = tokio::task::spawn_blocking(move || process_version(&source, &loader));
            handles.push((root, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (root, handle) in handles {
            let result = handle
                .await
                .map_err(|e| Error::pipeline("walk", root, e.to_string()))??;
            results.push(result);
        }
        Ok(results)
    }

    fn build(&self, mut results: Vec<VersionResult>, walk_time: Duration) -> Result<PipelineOutput> {
        results.sort_by(|a, b| a.version.cmp(&b.version));

        let mut stats = PipelineStats {
            versions: results.len(),
            walk_time,
            ..PipelineStats::default()
        };

        info!("Building cross-version concordance");
        let build_start = Instant::now();
        let mut builder = ConcordanceBuilder::with_config(self.config.builder.clone());
        for result in &mut results {
            stats.documents += result.documents;
            stats.form_documents += result.form_documents;
            stats.elements += result.elements.len();
            builder.add_version(result.version.clone(), std::mem::take(&mut result.elements));
        }
        let build = builder.build()?;
        stats.build_time = build_start.elapsed();
        stats.fields = build.concordance.len();
        stats.repeating_fields = build.concordance.repeating_count();

        info!(
            "{} canonical fields ({} in repeating groups, {} non-repeating)",
            stats.fields,
            stats.repeating_fields,
            stats.fields - stats.repeating_fields
        );

        Ok(PipelineOutput {
            build,
            stats,
            versions: results,
        })
    }

    fn loader(&self) -> SchemaLoader {
        SchemaLoader::new().with_max_document_size(self.config.max_document_size)
    }
}

/// Collect one version's definitions and walk every form document
pub fn process_version(source: &VersionSource, loader: &SchemaLoader) -> Result<VersionResult> {
    let start = Instant::now();
    info!("Parsing {}", source.version);

    let mut collector = TypeCollector::new().with_loader(loader.clone());
    let documents = collector.collect_directory(&source.root)?;
    let registry = collector.registry();
    debug!(
        "Collected {} complex types, {} groups from {:?}",
        registry.type_count(),
        registry.group_count(),
        source.root
    );

    let walker = SchemaWalker::new(registry, source.version.clone());
    let mut elements = Vec::new();
    let mut form_documents = 0;
    let mut type_libraries = 0;

    for path in &source.files {
        let found = match collector.document(path) {
            Some(document) if !document.has_top_level_element() => {
                trace!("{:?}: skipped (type definitions only)", path);
                type_libraries += 1;
                continue;
            }
            Some(document) => walker.walk_document(document),
            None => walker.walk_file(loader, path),
        };
        form_documents += 1;
        debug!("{:?}: {} elements", path, found.len());
        elements.extend(found);
    }

    info!("{}: {} elements extracted", source.version, elements.len());
    Ok(VersionResult {
        version: source.version.clone(),
        documents,
        form_documents,
        type_libraries,
        complex_types: registry.type_count(),
        groups: registry.group_count(),
        elements,
        duration: start.elapsed(),
    })
}
