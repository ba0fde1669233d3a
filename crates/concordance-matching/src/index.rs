//! Key → field position index used during orphan reconciliation

use std::collections::HashMap;
use std::hash::Hash;

/// Multimap from a matching key to positions in the builder's field table
#[derive(Debug, Clone)]
pub struct FieldIndex<K> {
    entries: HashMap<K, Vec<usize>>,
}

impl<K: Eq + Hash> FieldIndex<K> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Record `position` under `key`; recording the same pair twice is a no-op
    pub fn insert(&mut self, key: K, position: usize) {
        let positions = self.entries.entry(key).or_default();
        if !positions.contains(&position) {
            positions.push(position);
        }
    }

    /// Positions recorded under `key`
    pub fn candidates(&self, key: &K) -> &[usize] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash> Default for FieldIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}
