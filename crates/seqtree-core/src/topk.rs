use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::space::CompleteAssignment;

/// One evaluated sequence kept in a result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub reward: f64,
    pub command: String,
    pub assignment: CompleteAssignment,
}

/// Bounded list of the best candidates seen by one engine run, sorted by
/// descending reward. Duplicates are not collapsed here; see [`merge_top_k`].
#[derive(Debug, Clone)]
pub struct TopK {
    capacity: usize,
    entries: Vec<Candidate>,
}

impl TopK {
    /// Create a table holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        TopK {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowest reward currently retained.
    pub fn min_reward(&self) -> Option<f64> {
        self.entries.last().map(|candidate| candidate.reward)
    }

    /// Offer a candidate. Below capacity it is always inserted; at capacity it
    /// replaces the current minimum only if its reward is strictly greater.
    /// Returns `true` if the table changed.
    pub fn offer(&mut self, candidate: Candidate) -> bool {
        if self.entries.len() < self.capacity {
            self.entries.push(candidate);
        } else {
            match self.entries.last_mut() {
                Some(worst) if candidate.reward > worst.reward => *worst = candidate,
                _ => return false,
            }
        }
        sort_descending(&mut self.entries);
        true
    }

    pub fn entries(&self) -> &[Candidate] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Candidate> {
        self.entries
    }
}

/// Merge result lists from several episodes: keep the best reward per rendered
/// command, sort by descending reward, truncate to `k`.
pub fn merge_top_k<I>(lists: I, k: usize) -> Vec<Candidate>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = Candidate>,
{
    let mut order: Vec<String> = Vec::new();
    let mut best: HashMap<String, Candidate> = HashMap::new();

    for candidate in lists.into_iter().flatten() {
        match best.get_mut(&candidate.command) {
            Some(existing) => {
                if candidate.reward > existing.reward {
                    *existing = candidate;
                }
            }
            None => {
                order.push(candidate.command.clone());
                best.insert(candidate.command.clone(), candidate);
            }
        }
    }

    let mut merged: Vec<Candidate> = order
        .iter()
        .filter_map(|command| best.remove(command))
        .collect();
    sort_descending(&mut merged);
    merged.truncate(k);
    merged
}

// Stable, so equal rewards keep first-seen order.
fn sort_descending(entries: &mut [Candidate]) {
    entries.sort_by(|a, b| b.reward.total_cmp(&a.reward));
}
