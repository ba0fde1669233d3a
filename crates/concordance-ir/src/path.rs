//! Structural paths
//!
//! A path is the ordered list of element names from a document's schedule
//! root down to a leaf. Paths are the primary cross-version matching key and
//! are always compared verbatim.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered element names from a document's logical root to a field
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StructuralPath {
    segments: Vec<String>,
}

impl StructuralPath {
    /// Create a path from its segments
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a single-segment path
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Return a new path with `name` appended
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Path segments in root-to-leaf order
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// First segment, normally the schedule name
    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Last segment (the field's element name)
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Segment directly above the leaf
    pub fn context(&self) -> Option<&str> {
        if self.segments.len() < 2 {
            return None;
        }
        self.segments
            .get(self.segments.len() - 2)
            .map(String::as_str)
    }

    /// Whether any segment equals `name`
    pub fn contains_segment(&self, name: &str) -> bool {
        self.segments.iter().any(|s| s == name)
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for StructuralPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let Some(body) = trimmed.strip_prefix('/') else {
            return Err(Error::invalid_path(s, "path must start with '/'"));
        };
        if body.is_empty() {
            return Err(Error::invalid_path(s, "path has no segments"));
        }
        let segments: Vec<&str> = body.split('/').collect();
        if segments.iter().any(|seg| seg.is_empty()) {
            return Err(Error::invalid_path(s, "empty path segment"));
        }
        Ok(Self::new(segments))
    }
}

impl TryFrom<String> for StructuralPath {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<StructuralPath> for String {
    fn from(path: StructuralPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let path = StructuralPath::new(["IRS990", "Grp", "Amt"]);
        assert_eq!(path.to_string(), "/IRS990/Grp/Amt");

        let parsed: StructuralPath = "/IRS990/Grp/Amt".parse().unwrap();
        assert_eq!(parsed, path);
    }

    #[test]
    fn test_leaf_and_context() {
        let path = StructuralPath::root("IRS990").child("Grp").child("Amt");
        assert_eq!(path.leaf(), Some("Amt"));
        assert_eq!(path.context(), Some("Grp"));
        assert_eq!(path.first(), Some("IRS990"));
        assert_eq!(path.depth(), 3);
        assert!(path.contains_segment("Grp"));
    }

    #[test]
    fn test_single_segment_has_no_context() {
        let path = StructuralPath::root("IRS990");
        assert_eq!(path.context(), None);
        assert_eq!(path.leaf(), Some("IRS990"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("IRS990/Amt".parse::<StructuralPath>().is_err());
        assert!("/".parse::<StructuralPath>().is_err());
        assert!("/IRS990//Amt".parse::<StructuralPath>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let path = StructuralPath::new(["IRS990", "EIN"]);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"/IRS990/EIN\"");
        let back: StructuralPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
