//! Merge reporting

use crate::rules::MatchKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One path group or field folded into another field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeEvent {
    pub kind: MatchKind,
    /// Path of the absorbed orphan, or name of the absorbed field
    pub absorbed: String,
    /// Canonical name of the surviving field
    pub target: String,
}

/// Counts and events recorded while building a concordance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Path groups processed
    pub path_groups: usize,
    /// Fields created directly from anchored path groups
    pub exact_fields: usize,
    /// Orphans considered by reconciliation
    pub orphans: usize,
    pub leaf_name_merges: usize,
    pub description_merges: usize,
    /// Orphans that became their own field
    pub separate_orphans: usize,
    /// Orphans for which some strategy found more than one candidate
    pub ambiguous_orphans: usize,
    pub consolidation_merges: usize,
    /// Fields in the finished concordance
    pub total_fields: usize,
    pub events: Vec<MergeEvent>,
}

impl MergeReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a merge and bump the matching counter
    pub fn record(&mut self, kind: MatchKind, absorbed: impl Into<String>, target: impl Into<String>) {
        match kind {
            MatchKind::LeafName => self.leaf_name_merges += 1,
            MatchKind::Description => self.description_merges += 1,
            MatchKind::Consolidation => self.consolidation_merges += 1,
        }
        self.events.push(MergeEvent {
            kind,
            absorbed: absorbed.into(),
            target: target.into(),
        });
    }

    /// Merges of any kind
    pub fn total_merges(&self) -> usize {
        self.leaf_name_merges + self.description_merges + self.consolidation_merges
    }

    /// Events of one kind
    pub fn events_of(&self, kind: MatchKind) -> impl Iterator<Item = &MergeEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Path groups:            {}", self.path_groups)?;
        writeln!(f, "Exact-path fields:      {}", self.exact_fields)?;
        writeln!(f, "Orphans:                {}", self.orphans)?;
        writeln!(f, "  merged by leaf name:  {}", self.leaf_name_merges)?;
        writeln!(f, "  merged by docs:       {}", self.description_merges)?;
        writeln!(f, "  kept separate:        {}", self.separate_orphans)?;
        writeln!(f, "  ambiguous:            {}", self.ambiguous_orphans)?;
        writeln!(f, "Consolidation merges:   {}", self.consolidation_merges)?;
        write!(f, "Total fields:           {}", self.total_fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_by_kind() {
        let mut report = MergeReport::new();
        report.record(MatchKind::LeafName, "/IRS990/EIN", "IRS990_Grp_EIN");
        report.record(MatchKind::Consolidation, "IRS990_A", "IRS990_B");
        report.record(MatchKind::Consolidation, "IRS990_C", "IRS990_B");

        assert_eq!(report.leaf_name_merges, 1);
        assert_eq!(report.consolidation_merges, 2);
        assert_eq!(report.total_merges(), 3);
        assert_eq!(report.events_of(MatchKind::Consolidation).count(), 2);
        assert!(report.to_string().contains("Consolidation merges:   2"));
    }
}
