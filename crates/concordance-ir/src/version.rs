//! Schema version identifiers
//!
//! Version directories are named like `2013v3.0` or `2020v4.2`. The string is
//! opaque to everything except ordering: all "latest", "earliest" and
//! "nearest" comparisons go through the `(year, major, minor)` key parsed here.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})v?(\d+)?\.?(\d+)?").expect("static regex must compile")
});

/// A schema version with a total chronological order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SchemaVersion {
    raw: String,
    key: (u32, u32, u32),
}

impl SchemaVersion {
    /// Parse a version identifier. Never fails: strings that do not follow
    /// the `YYYYvMAJOR.MINOR` pattern sort before every parseable version.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let key = sort_key(&raw);
        Self { raw, key }
    }

    /// The identifier exactly as it was given
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Four-digit year, or 0 when the identifier is not parseable
    pub fn year(&self) -> u32 {
        self.key.0
    }

    /// Major revision within the year
    pub fn major(&self) -> u32 {
        self.key.1
    }

    /// Minor revision within the major revision
    pub fn minor(&self) -> u32 {
        self.key.2
    }

    /// Whether the identifier followed the expected pattern
    pub fn is_recognized(&self) -> bool {
        self.key != (0, 0, 0)
    }
}

fn sort_key(raw: &str) -> (u32, u32, u32) {
    let Some(caps) = VERSION_RE.captures(raw) else {
        return (0, 0, 0);
    };
    let component = |idx: usize| {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    };
    (component(1), component(2), component(3))
}

impl PartialEq for SchemaVersion {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for SchemaVersion {}

impl std::hash::Hash for SchemaVersion {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl Ord for SchemaVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for SchemaVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<String> for SchemaVersion {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for SchemaVersion {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<SchemaVersion> for String {
    fn from(version: SchemaVersion) -> Self {
        version.raw
    }
}

/// Pick the best available version for `target`.
///
/// Fallback order: the exact version, then the latest revision published in
/// the same year, then the nearest earlier version, then the nearest later
/// version. `available` need not be sorted.
pub fn resolve_fallback<'a, I>(available: I, target: &SchemaVersion) -> Option<&'a SchemaVersion>
where
    I: IntoIterator<Item = &'a SchemaVersion>,
{
    let mut sorted: Vec<&SchemaVersion> = available.into_iter().collect();
    sorted.sort();
    sorted.dedup();

    if let Some(exact) = sorted.iter().copied().find(|v| *v == target) {
        return Some(exact);
    }

    if let Some(same_year) = sorted
        .iter()
        .copied()
        .rev()
        .find(|v| v.year() == target.year())
    {
        return Some(same_year);
    }

    if let Some(prior) = sorted.iter().copied().rev().find(|v| *v < target) {
        return Some(prior);
    }

    sorted.into_iter().find(|v| *v > target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(raw: &[&str]) -> Vec<SchemaVersion> {
        raw.iter().map(|v| SchemaVersion::new(*v)).collect()
    }

    #[test]
    fn test_parse_components() {
        let v = SchemaVersion::new("2016v3.0");
        assert_eq!(v.year(), 2016);
        assert_eq!(v.major(), 3);
        assert_eq!(v.minor(), 0);
        assert!(v.is_recognized());
    }

    #[test]
    fn test_parse_partial_version() {
        let v = SchemaVersion::new("2019v5");
        assert_eq!((v.year(), v.major(), v.minor()), (2019, 5, 0));
    }

    #[test]
    fn test_unrecognized_sorts_first() {
        let unknown = SchemaVersion::new("unknown");
        let known = SchemaVersion::new("2013v3.0");
        assert!(!unknown.is_recognized());
        assert!(unknown < known);
    }

    #[test]
    fn test_chronological_order_is_numeric() {
        let mut list = versions(&["2014v10.0", "2014v5.0", "2013v3.1", "2013v3.0"]);
        list.sort();
        let ordered: Vec<&str> = list.iter().map(SchemaVersion::as_str).collect();
        assert_eq!(ordered, vec!["2013v3.0", "2013v3.1", "2014v5.0", "2014v10.0"]);
    }

    #[test]
    fn test_serde_as_plain_string() {
        let v = SchemaVersion::new("2020v4.2");
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"2020v4.2\"");
        let back: SchemaVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
        assert_eq!(back.year(), 2020);
    }

    #[test]
    fn test_fallback_exact() {
        let available = versions(&["2015v2.1", "2016v3.0"]);
        let target = SchemaVersion::new("2016v3.0");
        assert_eq!(
            resolve_fallback(&available, &target).map(SchemaVersion::as_str),
            Some("2016v3.0")
        );
    }

    #[test]
    fn test_fallback_same_year_latest_minor() {
        let available = versions(&["2016v3.0", "2016v3.1", "2017v2.2"]);
        let target = SchemaVersion::new("2016v3.5");
        assert_eq!(
            resolve_fallback(&available, &target).map(SchemaVersion::as_str),
            Some("2016v3.1")
        );
    }

    #[test]
    fn test_fallback_nearest_earlier_then_later() {
        let available = versions(&["2013v3.0", "2015v2.1", "2019v5.0"]);
        let target = SchemaVersion::new("2017v2.2");
        assert_eq!(
            resolve_fallback(&available, &target).map(SchemaVersion::as_str),
            Some("2015v2.1")
        );

        let target = SchemaVersion::new("2010v1.0");
        assert_eq!(
            resolve_fallback(&available, &target).map(SchemaVersion::as_str),
            Some("2013v3.0")
        );
    }

    #[test]
    fn test_fallback_empty() {
        let available: Vec<SchemaVersion> = Vec::new();
        assert!(resolve_fallback(&available, &SchemaVersion::new("2016v3.0")).is_none());
    }
}
