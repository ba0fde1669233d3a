//! Serde layout of `field_lookup.json`

use concordance_ir::{CanonicalField, Concordance, RunMetadata, SchemaVersion, StructuralPath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level lookup file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupDocument {
    pub metadata: RunMetadata,
    pub fields: BTreeMap<String, FieldEntry>,
    /// Every path in any version → canonical name
    #[serde(default)]
    pub xpath_index: BTreeMap<String, String>,
}

/// One canonical field as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub schedule: String,
    pub label: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub raw_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub group: Option<String>,
    pub repeating: bool,
    pub xpaths: BTreeMap<SchemaVersion, StructuralPath>,
    pub version_start: Option<SchemaVersion>,
    pub version_end: Option<SchemaVersion>,
}

impl From<&CanonicalField> for FieldEntry {
    fn from(field: &CanonicalField) -> Self {
        Self {
            schedule: field.schedule.clone(),
            label: field.label.clone(),
            data_type: field.data_type.clone(),
            raw_type: field.raw_type.clone(),
            description: field.description.clone(),
            documentation: field.documentation.clone(),
            group: field.group.clone(),
            repeating: field.is_repeating,
            xpaths: field.paths().clone(),
            version_start: field.earliest_version().cloned(),
            version_end: field.latest_version().cloned(),
        }
    }
}

impl FieldEntry {
    /// Rebuild the canonical field named `canonical_name`
    pub fn into_field(self, canonical_name: impl Into<String>) -> CanonicalField {
        let mut field = CanonicalField::new(canonical_name, self.schedule);
        field.label = self.label;
        field.data_type = self.data_type;
        field.raw_type = self.raw_type;
        field.description = self.description;
        field.documentation = self.documentation;
        field.group = self.group;
        field.is_repeating = self.repeating;
        for (version, path) in self.xpaths {
            field.insert_path(version, path);
        }
        field
    }
}

impl From<&Concordance> for LookupDocument {
    fn from(concordance: &Concordance) -> Self {
        Self {
            metadata: concordance.metadata.clone(),
            fields: concordance
                .fields()
                .iter()
                .map(|f| (f.canonical_name.clone(), FieldEntry::from(f)))
                .collect(),
            xpath_index: concordance.xpath_index().clone(),
        }
    }
}
