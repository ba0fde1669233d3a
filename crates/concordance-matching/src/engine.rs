//! Cross-version concordance builder
//!
//! Folds the leaf elements of every processed version into canonical
//! fields in three steps:
//!
//! 1. **Exact grouping.** Elements sharing a structural path form one path
//!    group. Groups present in the most recent version of their schedule are
//!    anchored and become fields immediately.
//! 2. **Orphan reconciliation.** Every other group is offered to the
//!    strategy chain, newest first. The first strategy with a unique,
//!    version-disjoint candidate wins; otherwise the orphan becomes a field
//!    of its own and can itself be matched by later orphans.
//! 3. **Description consolidation.** Fields sharing schedule, group and
//!    documentation are clustered and folded into the most recent member
//!    whenever their version sets do not overlap.

use crate::naming::{
    NameAllocator, canonical_base_name, friendly_type, human_label, infer_description,
};
use crate::reporter::MergeReport;
use crate::rules::{
    DescriptionStrategy, LeafNameStrategy, MatchKind, MatchOutcome, MatchStrategy,
};
use crate::Result;
use chrono::Utc;
use concordance_ir::{
    CanonicalField, Concordance, RunMetadata, SchemaElement, SchemaVersion, StructuralPath,
};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, info, trace};

/// Builder configuration
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Run orphan reconciliation
    pub reconcile_orphans: bool,
    /// Run description consolidation
    pub consolidate_descriptions: bool,
    /// Generator identity stored in run metadata
    pub generated_by: String,
    /// Free-text description stored in run metadata
    pub description: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            reconcile_orphans: true,
            consolidate_descriptions: true,
            generated_by: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            description: "Cross-version concordance of XSD schema fields".to_string(),
        }
    }
}

/// Result of a build
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub concordance: Concordance,
    pub report: MergeReport,
}

/// Elements from several versions that share one structural path
struct PathGroup {
    path: StructuralPath,
    /// One element per version, chronological
    elements: Vec<SchemaElement>,
}

impl PathGroup {
    fn latest(&self) -> Option<&SchemaElement> {
        self.elements.last()
    }

    fn latest_version(&self) -> Option<&SchemaVersion> {
        self.latest().map(|e| &e.version)
    }

    fn schedule(&self) -> &str {
        self.latest().map_or("", |e| e.schedule.as_str())
    }

    /// Documentation of the most recent version carrying any
    fn documentation(&self) -> Option<&str> {
        self.elements
            .iter()
            .rev()
            .find_map(|e| e.documentation.as_deref())
    }

    /// Unnamed field carrying this group's paths and display metadata
    fn to_field(&self) -> CanonicalField {
        let mut field = CanonicalField::new(String::new(), self.schedule());
        for element in &self.elements {
            field.insert_path(element.version.clone(), element.path.clone());
        }
        if let Some(latest) = self.latest() {
            field.label = human_label(&latest.name);
            field.data_type = friendly_type(&latest.xsd_type);
            field.raw_type = latest.xsd_type.clone();
            field.group = latest.group.clone();
            field.is_repeating = latest.is_repeating;
        }
        field.documentation = self.documentation().map(str::to_string);
        field.description = field
            .documentation
            .clone()
            .unwrap_or_else(|| infer_description(&self.path));
        field
    }
}

/// Builds a [`Concordance`] from the elements of every version
pub struct ConcordanceBuilder {
    config: BuilderConfig,
    versions: BTreeSet<SchemaVersion>,
    by_path: BTreeMap<StructuralPath, Vec<SchemaElement>>,
}

impl ConcordanceBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            config,
            versions: BTreeSet::new(),
            by_path: BTreeMap::new(),
        }
    }

    /// Register every element of one version. Versions may be added in any
    /// order.
    pub fn add_version(&mut self, version: SchemaVersion, elements: Vec<SchemaElement>) {
        debug!("Adding version {} with {} elements", version, elements.len());
        self.versions.insert(version);
        for element in elements {
            self.versions.insert(element.version.clone());
            self.by_path
                .entry(element.path.clone())
                .or_default()
                .push(element);
        }
    }

    /// Versions registered so far, chronologically
    pub fn versions(&self) -> impl Iterator<Item = &SchemaVersion> {
        self.versions.iter()
    }

    /// Run all steps and assemble the concordance
    pub fn build(self) -> Result<BuildOutput> {
        let Self {
            config,
            versions,
            by_path,
        } = self;
        info!(
            "Building concordance from {} versions, {} distinct paths",
            versions.len(),
            by_path.len()
        );

        let groups = path_groups(by_path);
        let mut report = MergeReport::new();
        report.path_groups = groups.len();

        let mut state = BuildState::new();

        // Step 1
        let schedule_latest = latest_version_per_schedule(&groups);
        let mut orphans = Vec::new();
        for group in &groups {
            let anchored = match (group.latest_version(), schedule_latest.get(group.schedule())) {
                (Some(latest), Some(newest)) => latest == *newest,
                _ => false,
            };
            if anchored {
                state.push_field(group.to_field(), &group.path);
                report.exact_fields += 1;
            } else {
                orphans.push(group);
            }
        }
        debug!(
            "Exact grouping: {} anchored fields, {} orphans",
            report.exact_fields,
            orphans.len()
        );

        // Step 2
        orphans.sort_by(|a, b| {
            Reverse(a.latest_version())
                .cmp(&Reverse(b.latest_version()))
                .then_with(|| a.path.cmp(&b.path))
        });
        report.orphans = orphans.len();
        for group in orphans {
            let orphan = group.to_field();
            if config.reconcile_orphans && state.reconcile(&group.path, &orphan, &mut report) {
                continue;
            }
            state.push_field(orphan, &group.path);
            report.separate_orphans += 1;
        }

        // Step 3
        let mut fields = state.fields;
        if config.consolidate_descriptions {
            consolidate(&mut fields, &mut report);
        }

        let mut metadata = RunMetadata::new(config.generated_by, config.description);
        metadata.generated_at = Some(Utc::now());
        let concordance = Concordance::new(metadata, versions, fields)?;
        report.total_fields = concordance.len();

        info!(
            "Concordance built: {} fields, {} merges",
            report.total_fields,
            report.total_merges()
        );
        Ok(BuildOutput {
            concordance,
            report,
        })
    }
}

impl Default for ConcordanceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Field table plus the strategy chain indexing it
struct BuildState {
    fields: Vec<CanonicalField>,
    names: NameAllocator,
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl BuildState {
    fn new() -> Self {
        Self {
            fields: Vec::new(),
            names: NameAllocator::new(),
            strategies: vec![
                Box::new(LeafNameStrategy::new()),
                Box::new(DescriptionStrategy::new()),
            ],
        }
    }

    fn push_field(&mut self, mut field: CanonicalField, path: &StructuralPath) {
        field.canonical_name = self
            .names
            .allocate(&canonical_base_name(&field.schedule, path));
        trace!("New field {} for {}", field.canonical_name, path);
        let position = self.fields.len();
        for strategy in &mut self.strategies {
            strategy.index(position, &field);
        }
        self.fields.push(field);
    }

    /// Offer an orphan to each strategy in turn. Returns whether it merged.
    fn reconcile(
        &mut self,
        path: &StructuralPath,
        orphan: &CanonicalField,
        report: &mut MergeReport,
    ) -> bool {
        let mut ambiguous = false;
        let mut matched = None;
        for strategy in &self.strategies {
            match strategy.find(orphan, &self.fields) {
                MatchOutcome::Matched(position) => {
                    matched = Some((strategy.kind(), position));
                    break;
                }
                MatchOutcome::Ambiguous(count) => {
                    trace!("{} has {} {} candidates", path, count, strategy.kind());
                    ambiguous = true;
                }
                MatchOutcome::Rejected(_) | MatchOutcome::NoCandidate => {}
            }
        }

        let Some((kind, position)) = matched else {
            if ambiguous {
                report.ambiguous_orphans += 1;
            }
            return false;
        };

        let target = &mut self.fields[position];
        target.absorb(orphan);
        if target.documentation.is_none() && orphan.documentation.is_some() {
            target.documentation = orphan.documentation.clone();
            target.description = orphan.description.clone();
        }
        debug!("Merged {} into {} ({})", path, target.canonical_name, kind);
        report.record(kind, path.to_string(), target.canonical_name.clone());

        let target = &self.fields[position];
        for strategy in &mut self.strategies {
            strategy.index(position, target);
        }
        true
    }
}

fn path_groups(by_path: BTreeMap<StructuralPath, Vec<SchemaElement>>) -> Vec<PathGroup> {
    by_path
        .into_iter()
        .map(|(path, mut elements)| {
            elements.sort_by(|a, b| a.version.cmp(&b.version));
            elements.dedup_by(|later, earlier| later.version == earlier.version);
            PathGroup { path, elements }
        })
        .filter(|group| !group.elements.is_empty())
        .collect()
}

fn latest_version_per_schedule(groups: &[PathGroup]) -> HashMap<&str, &SchemaVersion> {
    let mut latest: HashMap<&str, &SchemaVersion> = HashMap::new();
    for group in groups {
        let Some(version) = group.latest_version() else {
            continue;
        };
        latest
            .entry(group.schedule())
            .and_modify(|current| {
                if version > *current {
                    *current = version;
                }
            })
            .or_insert(version);
    }
    latest
}

/// Fold identically documented fields with disjoint presence into the most
/// recent member of each cluster
fn consolidate(fields: &mut Vec<CanonicalField>, report: &mut MergeReport) {
    let mut clusters: BTreeMap<_, Vec<usize>> = BTreeMap::new();
    for (position, field) in fields.iter().enumerate() {
        if let Some(key) = DescriptionStrategy::key(field) {
            clusters.entry(key).or_default().push(position);
        }
    }

    let mut absorbed = HashSet::new();
    for mut members in clusters.into_values() {
        if members.len() < 2 {
            continue;
        }
        members.sort_by(|&a, &b| {
            let (fa, fb) = (&fields[a], &fields[b]);
            Reverse(fa.latest_version())
                .cmp(&Reverse(fb.latest_version()))
                .then_with(|| fa.earliest_version().cmp(&fb.earliest_version()))
                .then_with(|| fa.canonical_name.cmp(&fb.canonical_name))
        });

        let mut remaining = members;
        while remaining.len() >= 2 {
            let primary = remaining[0];
            let mut leftovers = Vec::new();
            for &member in &remaining[1..] {
                if fields[primary].is_disjoint_from(&fields[member]) {
                    let other = fields[member].clone();
                    fields[primary].absorb(&other);
                    absorbed.insert(member);
                    debug!(
                        "Consolidated {} into {}",
                        other.canonical_name, fields[primary].canonical_name
                    );
                    report.record(
                        MatchKind::Consolidation,
                        other.canonical_name,
                        fields[primary].canonical_name.clone(),
                    );
                } else {
                    leftovers.push(member);
                }
            }
            remaining = leftovers;
        }
    }

    if !absorbed.is_empty() {
        let mut position = 0;
        fields.retain(|_| {
            let keep = !absorbed.contains(&position);
            position += 1;
            keep
        });
    }
}
