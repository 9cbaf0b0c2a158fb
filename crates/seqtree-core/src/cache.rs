use std::collections::{HashMap, hash_map::Entry};

use crate::{oracle::OracleOutcome, space::CompleteAssignment};

/// What the oracle reported for a complete assignment, together with the
/// latency of the call that produced it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CachedResult {
    pub outcome: OracleOutcome,
    pub elapsed_secs: f64,
}

/// Write-once memo of oracle results keyed by complete assignment.
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    entries: HashMap<CompleteAssignment, CachedResult>,
    hits: u64,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a previous result, counting the hit.
    pub fn lookup(&mut self, assignment: &CompleteAssignment) -> Option<CachedResult> {
        let cached = self.entries.get(assignment).copied();
        if cached.is_some() {
            self.hits += 1;
        }
        cached
    }

    /// Check for a result without touching the hit counter.
    pub fn contains(&self, assignment: &CompleteAssignment) -> bool {
        self.entries.contains_key(assignment)
    }

    /// Store a result unless one is already present.
    /// Returns `true` if the entry was written.
    pub fn store(&mut self, assignment: CompleteAssignment, result: CachedResult) -> bool {
        match self.entries.entry(assignment) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(result);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Drop every entry, keeping the hit counter.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
