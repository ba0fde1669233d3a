//! Orphan matching strategies
//!
//! Each strategy keeps its own index over the builder's field table and
//! proposes at most one target for an orphan. The builder runs them in
//! priority order and stops at the first unique match.

use crate::index::FieldIndex;
use concordance_ir::CanonicalField;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Which rule attributed a path to an existing field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Same schedule, same leaf element name
    LeafName,
    /// Same schedule, same group, same documentation
    Description,
    /// Post-pass clustering of identically documented fields
    Consolidation,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeafName => f.write_str("leaf_name"),
            Self::Description => f.write_str("description"),
            Self::Consolidation => f.write_str("consolidation"),
        }
    }
}

/// Result of asking a strategy about one orphan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Exactly one acceptable field; merge into it
    Matched(usize),
    /// More than one field shares the key
    Ambiguous(usize),
    /// The only candidate overlaps the orphan's versions or group
    Rejected(usize),
    NoCandidate,
}

/// A reconciliation rule over the builder's field table
pub trait MatchStrategy {
    fn kind(&self) -> MatchKind;

    /// Make the field at `position` findable; safe to call again after the
    /// field gains documentation
    fn index(&mut self, position: usize, field: &CanonicalField);

    /// Propose a target for `orphan`
    fn find(&self, orphan: &CanonicalField, fields: &[CanonicalField]) -> MatchOutcome;
}

/// Lower-cased, trimmed documentation used as a matching key
pub fn normalize_documentation(text: &str) -> String {
    text.trim().to_lowercase()
}

fn single_disjoint(
    candidates: &[usize],
    orphan: &CanonicalField,
    fields: &[CanonicalField],
    accept: impl Fn(&CanonicalField) -> bool,
) -> MatchOutcome {
    match candidates {
        [] => MatchOutcome::NoCandidate,
        [position] => {
            let target = &fields[*position];
            if accept(target) && target.is_disjoint_from(orphan) {
                MatchOutcome::Matched(*position)
            } else {
                MatchOutcome::Rejected(*position)
            }
        }
        many => MatchOutcome::Ambiguous(many.len()),
    }
}

type LeafKey = (String, String);

/// Matches on (schedule, leaf element name). The single candidate must sit
/// in the same repeating group and never coexist with the orphan.
#[derive(Debug, Default)]
pub struct LeafNameStrategy {
    index: FieldIndex<LeafKey>,
}

impl LeafNameStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(field: &CanonicalField) -> Option<LeafKey> {
        field
            .leaf_name()
            .map(|leaf| (field.schedule.clone(), leaf.to_string()))
    }
}

impl MatchStrategy for LeafNameStrategy {
    fn kind(&self) -> MatchKind {
        MatchKind::LeafName
    }

    fn index(&mut self, position: usize, field: &CanonicalField) {
        if let Some(key) = Self::key(field) {
            self.index.insert(key, position);
        }
    }

    fn find(&self, orphan: &CanonicalField, fields: &[CanonicalField]) -> MatchOutcome {
        let Some(key) = Self::key(orphan) else {
            return MatchOutcome::NoCandidate;
        };
        let outcome = single_disjoint(self.index.candidates(&key), orphan, fields, |target| {
            target.group == orphan.group
        });
        trace!("Leaf-name lookup for {:?}: {:?}", key, outcome);
        outcome
    }
}

type DescriptionKey = (String, Option<String>, String);

/// Matches on (schedule, group, normalized documentation). Only documentation
/// found in the schema takes part; synthesized descriptions never match.
#[derive(Debug, Default)]
pub struct DescriptionStrategy {
    index: FieldIndex<DescriptionKey>,
}

impl DescriptionStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matching key of a field, if it carries real documentation
    pub fn key(field: &CanonicalField) -> Option<DescriptionKey> {
        let text = normalize_documentation(field.documentation.as_deref()?);
        if text.is_empty() {
            return None;
        }
        Some((field.schedule.clone(), field.group.clone(), text))
    }
}

impl MatchStrategy for DescriptionStrategy {
    fn kind(&self) -> MatchKind {
        MatchKind::Description
    }

    fn index(&mut self, position: usize, field: &CanonicalField) {
        if let Some(key) = Self::key(field) {
            self.index.insert(key, position);
        }
    }

    fn find(&self, orphan: &CanonicalField, fields: &[CanonicalField]) -> MatchOutcome {
        let Some(key) = Self::key(orphan) else {
            return MatchOutcome::NoCandidate;
        };
        let outcome = single_disjoint(self.index.candidates(&key), orphan, fields, |_| true);
        trace!("Description lookup for {:?}: {:?}", key, outcome);
        outcome
    }
}
