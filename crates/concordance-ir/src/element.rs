//! Leaf field records produced by a schema walk
#![allow(clippy::must_use_candidate)]

use crate::path::StructuralPath;
use crate::version::SchemaVersion;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper occurrence bound of an element declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaxOccurs {
    Bounded(u32),
    Unbounded,
}

impl MaxOccurs {
    /// Parse a `maxOccurs` attribute value
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw == "unbounded" {
            return Some(Self::Unbounded);
        }
        raw.parse::<u32>().ok().map(Self::Bounded)
    }
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(n) => write!(f, "{n}"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Declared occurrence bounds. Absent attributes stay `None`; the XSD
/// default of 1 is applied only when asking whether the element repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurs {
    pub min: Option<u32>,
    pub max: Option<MaxOccurs>,
}

impl Occurs {
    /// Build bounds from raw `minOccurs` / `maxOccurs` attribute values
    pub fn from_attributes(min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            min: min.and_then(|m| m.trim().parse::<u32>().ok()),
            max: max.and_then(MaxOccurs::parse),
        }
    }

    /// Whether the bounds permit more than one instance
    pub fn permits_many(&self) -> bool {
        match self.max {
            Some(MaxOccurs::Unbounded) => true,
            Some(MaxOccurs::Bounded(n)) => n > 1,
            None => false,
        }
    }
}

/// One leaf field found while walking one document for one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaElement {
    /// Full path from the schedule root
    pub path: StructuralPath,
    /// Leaf element name
    pub name: String,
    /// Declared type with any namespace prefix removed
    pub xsd_type: String,
    /// `xs:documentation` text, trimmed; `None` when absent or blank
    pub documentation: Option<String>,
    /// Name of the nearest enclosing repeating element
    pub group: Option<String>,
    /// Whether this field or any ancestor may occur more than once
    pub is_repeating: bool,
    pub occurs: Occurs,
    /// Owning schedule (form or sub-form) identifier
    pub schedule: String,
    pub version: SchemaVersion,
}

impl SchemaElement {
    /// Create an element with empty optional metadata
    pub fn new(
        path: StructuralPath,
        schedule: impl Into<String>,
        version: SchemaVersion,
    ) -> Self {
        let name = path.leaf().unwrap_or_default().to_string();
        Self {
            path,
            name,
            xsd_type: String::new(),
            documentation: None,
            group: None,
            is_repeating: false,
            occurs: Occurs::default(),
            schedule: schedule.into(),
            version,
        }
    }

    /// Set the declared type
    #[must_use]
    pub fn with_type(mut self, xsd_type: impl Into<String>) -> Self {
        self.xsd_type = xsd_type.into();
        self
    }

    /// Set documentation; blank text is treated as absent
    #[must_use]
    pub fn with_documentation(mut self, documentation: Option<String>) -> Self {
        self.documentation = documentation
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }

    /// Mark the element as part of a repeating structure
    #[must_use]
    pub fn repeating(mut self, group: Option<String>) -> Self {
        self.is_repeating = true;
        self.group = group;
        self
    }

    #[must_use]
    pub fn with_occurs(mut self, occurs: Occurs) -> Self {
        self.occurs = occurs;
        self
    }
}
