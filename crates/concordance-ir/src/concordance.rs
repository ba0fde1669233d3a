//! The built concordance
//!
//! Holds the canonical field table, the processed version set and run
//! metadata. The reverse index (any path in any version → canonical name) is
//! built once from the field table when the concordance is assembled.

use crate::field::CanonicalField;
use crate::path::StructuralPath;
use crate::version::SchemaVersion;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Information about the run that produced a concordance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Processed versions in chronological order
    pub versions: Vec<SchemaVersion>,
    pub total_fields: usize,
    /// Identity of the tool that generated the concordance
    pub generated_by: String,
    /// Free-text description of the concordance
    pub description: String,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
}

impl RunMetadata {
    pub fn new(generated_by: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            versions: Vec::new(),
            total_fields: 0,
            generated_by: generated_by.into(),
            description: description.into(),
            generated_at: None,
        }
    }
}

/// Canonical field registry for a set of schema versions
#[derive(Debug, Clone)]
pub struct Concordance {
    pub metadata: RunMetadata,
    fields: Vec<CanonicalField>,
    /// Canonical name → position in `fields`
    positions: HashMap<String, usize>,
    xpath_index: BTreeMap<String, String>,
}

impl Concordance {
    /// Assemble a concordance. Fields are sorted by (schedule, canonical
    /// name) and the metadata counts are refreshed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] when two fields share a canonical name.
    pub fn new(
        mut metadata: RunMetadata,
        versions: impl IntoIterator<Item = SchemaVersion>,
        mut fields: Vec<CanonicalField>,
    ) -> Result<Self> {
        fields.sort_by(|a, b| {
            a.schedule
                .cmp(&b.schedule)
                .then_with(|| a.canonical_name.cmp(&b.canonical_name))
        });

        let mut positions = HashMap::with_capacity(fields.len());
        let mut xpath_index = BTreeMap::new();
        for (position, field) in fields.iter().enumerate() {
            if positions
                .insert(field.canonical_name.clone(), position)
                .is_some()
            {
                return Err(Error::DuplicateName {
                    name: field.canonical_name.clone(),
                });
            }
            for path in field.paths().values() {
                xpath_index.insert(path.to_string(), field.canonical_name.clone());
            }
        }

        let versions: BTreeSet<SchemaVersion> = versions.into_iter().collect();
        metadata.versions = versions.into_iter().collect();
        metadata.total_fields = fields.len();

        Ok(Self {
            metadata,
            fields,
            positions,
            xpath_index,
        })
    }

    /// Canonical fields in (schedule, canonical name) order
    pub fn fields(&self) -> &[CanonicalField] {
        &self.fields
    }

    /// Processed versions in chronological order
    pub fn versions(&self) -> &[SchemaVersion] {
        &self.metadata.versions
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Find a field by canonical name
    pub fn get(&self, canonical_name: &str) -> Option<&CanonicalField> {
        self.positions
            .get(canonical_name)
            .map(|&position| &self.fields[position])
    }

    /// Distinct schedules in sorted order
    pub fn schedules(&self) -> Vec<&str> {
        let mut schedules: Vec<&str> = self.fields.iter().map(|f| f.schedule.as_str()).collect();
        schedules.dedup();
        schedules
    }

    /// Fields of one schedule, in canonical name order
    pub fn schedule_fields(&self, schedule: &str) -> &[CanonicalField] {
        let start = self.fields.partition_point(|f| f.schedule.as_str() < schedule);
        let end = self.fields.partition_point(|f| f.schedule.as_str() <= schedule);
        &self.fields[start..end]
    }

    /// Reverse index: every path observed in any version → canonical name
    pub fn xpath_index(&self) -> &BTreeMap<String, String> {
        &self.xpath_index
    }

    /// Field owning `path` in any version
    pub fn lookup_path(&self, path: &StructuralPath) -> Option<&CanonicalField> {
        self.xpath_index
            .get(&path.to_string())
            .and_then(|name| self.get(name))
    }

    /// Path to use for `canonical_name` in a document declaring `version`
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldNotFound`] for an unknown canonical name.
    pub fn resolve(
        &self,
        canonical_name: &str,
        version: &SchemaVersion,
    ) -> Result<Option<(&SchemaVersion, &StructuralPath)>> {
        let field = self
            .get(canonical_name)
            .ok_or_else(|| Error::field_not_found(canonical_name))?;
        Ok(field.resolve_path(version))
    }

    /// Number of fields inside repeating groups
    pub fn repeating_count(&self) -> usize {
        self.fields.iter().filter(|f| f.is_repeating).count()
    }
}
