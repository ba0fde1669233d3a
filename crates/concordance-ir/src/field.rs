//! Canonical fields
//!
//! A canonical field is the unit of identity in a concordance: one semantic
//! field and every structural path that identified it, keyed by version.
//! The set of versions a field is present in is always the key set of its
//! path map, so the two can never drift apart.

use crate::path::StructuralPath;
use crate::version::{SchemaVersion, resolve_fallback};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A version-independent field identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalField {
    /// Stable, registry-wide unique identifier
    pub canonical_name: String,
    pub schedule: String,
    /// Plain-English short name
    pub label: String,
    /// Schema documentation, or a synthesized description when none exists
    pub description: String,
    /// Schema documentation exactly as found; `None` when it was synthesized
    #[serde(default)]
    pub documentation: Option<String>,
    /// Friendly rendering of the declared type
    pub data_type: String,
    /// Declared type without namespace prefix
    pub raw_type: String,
    /// Name of the enclosing repeating group
    #[serde(default)]
    pub group: Option<String>,
    pub is_repeating: bool,
    paths: BTreeMap<SchemaVersion, StructuralPath>,
}

impl CanonicalField {
    /// Create a field with no recorded paths
    pub fn new(canonical_name: impl Into<String>, schedule: impl Into<String>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            schedule: schedule.into(),
            label: String::new(),
            description: String::new(),
            documentation: None,
            data_type: String::new(),
            raw_type: String::new(),
            group: None,
            is_repeating: false,
            paths: BTreeMap::new(),
        }
    }

    /// Record the path valid in `version`. An existing entry is never
    /// overwritten; returns whether the entry was added.
    pub fn insert_path(&mut self, version: SchemaVersion, path: StructuralPath) -> bool {
        if self.paths.contains_key(&version) {
            return false;
        }
        self.paths.insert(version, path);
        true
    }

    /// Version to path mapping in chronological order
    pub fn paths(&self) -> &BTreeMap<SchemaVersion, StructuralPath> {
        &self.paths
    }

    /// Path valid in exactly `version`
    pub fn path_for(&self, version: &SchemaVersion) -> Option<&StructuralPath> {
        self.paths.get(version)
    }

    /// Versions this field exists in, chronologically sorted
    pub fn versions_present(&self) -> Vec<&SchemaVersion> {
        self.paths.keys().collect()
    }

    pub fn earliest_version(&self) -> Option<&SchemaVersion> {
        self.paths.keys().next()
    }

    pub fn latest_version(&self) -> Option<&SchemaVersion> {
        self.paths.keys().next_back()
    }

    /// Path in the most recent version the field exists in
    pub fn latest_path(&self) -> Option<&StructuralPath> {
        self.paths.values().next_back()
    }

    /// Leaf element name of the most recent path
    pub fn leaf_name(&self) -> Option<&str> {
        self.latest_path().and_then(StructuralPath::leaf)
    }

    /// Distinct paths across all versions
    pub fn distinct_paths(&self) -> BTreeSet<&StructuralPath> {
        self.paths.values().collect()
    }

    /// Whether the field was known under more than one path
    pub fn path_changed(&self) -> bool {
        self.distinct_paths().len() > 1
    }

    /// Whether the two fields never exist in the same version
    pub fn is_disjoint_from(&self, other: &Self) -> bool {
        other
            .paths
            .keys()
            .all(|version| !self.paths.contains_key(version))
    }

    /// Attach every version→path entry of `other` that this field lacks.
    /// Returns the number of entries added.
    pub fn absorb(&mut self, other: &Self) -> usize {
        other
            .paths
            .iter()
            .filter(|(version, path)| self.insert_path((*version).clone(), (*path).clone()))
            .count()
    }

    /// Path to use for a document declaring `version`, following the
    /// exact → same year → nearest earlier → nearest later fallback order.
    pub fn resolve_path(
        &self,
        version: &SchemaVersion,
    ) -> Option<(&SchemaVersion, &StructuralPath)> {
        let chosen = resolve_fallback(self.paths.keys(), version)?;
        self.paths.get_key_value(chosen)
    }
}
