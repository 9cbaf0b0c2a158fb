//! Decision slots, candidate moves, and (partial) assignments over them.

use serde::{Deserialize, Serialize};

use crate::tree::error::{ConfigError, TreeError};

/// One discrete choice: pick `choice` for decision slot `slot`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    slot: usize,
    choice: usize,
}

impl Move {
    pub fn new(slot: usize, choice: usize) -> Self {
        Move { slot, choice }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn choice(&self) -> usize {
        self.choice
    }
}

/// An ordered, possibly partial, mapping from slot index to chosen move.
/// Slots are filled in increasing index order during tree descent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    slots: Vec<Option<usize>>,
}

impl Assignment {
    /// Create an assignment of `sequence_len` slots with nothing chosen yet.
    pub fn unset(sequence_len: usize) -> Self {
        Assignment {
            slots: vec![None; sequence_len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Return the chosen index for a slot, `None` if unset or out of range.
    pub fn get(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<usize>] {
        &self.slots
    }

    /// Index of the first slot that has no choice yet.
    pub fn first_unset(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Number of slots that already carry a choice.
    pub fn assigned_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// True iff every slot is set.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Return a copy of this assignment with `mov` applied.
    pub fn with_move(&self, mov: Move) -> Result<Assignment, TreeError> {
        let mut next = self.clone();
        let sequence_len = next.len();
        let slot = next
            .slots
            .get_mut(mov.slot())
            .ok_or(TreeError::SlotOutOfRange {
                slot: mov.slot(),
                sequence_len,
            })?;
        *slot = Some(mov.choice());
        Ok(next)
    }

    /// Canonicalize into a complete assignment, failing on the first unset slot.
    pub fn to_complete(&self) -> Result<CompleteAssignment, TreeError> {
        self.slots
            .iter()
            .enumerate()
            .map(|(slot, choice)| choice.ok_or(TreeError::IncompleteAssignment { slot }))
            .collect::<Result<Vec<_>, _>>()
            .map(CompleteAssignment)
    }
}

/// An assignment with every slot set; the unit submitted to the oracle and
/// the key of the result cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompleteAssignment(Vec<usize>);

impl CompleteAssignment {
    pub fn choices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<usize>> for CompleteAssignment {
    fn from(value: Vec<usize>) -> Self {
        CompleteAssignment(value)
    }
}

/// How decision slots draw their candidate moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Slot `i` has its own private move set; the sequence length is the slot count.
    Positional,
    /// Every slot draws from one shared pool; the sequence length is configured separately.
    UniformPool,
}

#[derive(Debug, Clone)]
enum Slots {
    Positional(Vec<Vec<String>>),
    UniformPool {
        pool: Vec<String>,
        sequence_len: usize,
    },
}

/// The sequence of decision slots and, per slot, the candidate snippets.
///
/// Rendering is a pure function of the space and a complete assignment:
/// `prefix + join(snippets, separator) + suffix`.
#[derive(Debug, Clone)]
pub struct ActionSpace {
    slots: Slots,
    prefix: String,
    separator: String,
    suffix: String,
}

impl ActionSpace {
    /// Build a positional space where slot `i` offers `slots[i]`.
    pub fn positional(slots: Vec<Vec<String>>) -> Result<Self, ConfigError> {
        if slots.is_empty() {
            return Err(ConfigError::EmptySpace);
        }
        if let Some(slot) = slots.iter().position(Vec::is_empty) {
            return Err(ConfigError::EmptySlot { slot });
        }
        Ok(Self::from_slots(Slots::Positional(slots)))
    }

    /// Build a uniform-pool space of `sequence_len` slots that all draw from `pool`.
    pub fn uniform_pool(pool: Vec<String>, sequence_len: usize) -> Result<Self, ConfigError> {
        if sequence_len == 0 {
            return Err(ConfigError::EmptySpace);
        }
        if pool.is_empty() {
            return Err(ConfigError::EmptySlot { slot: 0 });
        }
        Ok(Self::from_slots(Slots::UniformPool { pool, sequence_len }))
    }

    fn from_slots(slots: Slots) -> Self {
        ActionSpace {
            slots,
            prefix: String::new(),
            separator: String::new(),
            suffix: String::new(),
        }
    }

    /// Text placed before the first rendered snippet.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Text placed between consecutive rendered snippets.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Text placed after the last rendered snippet.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn topology(&self) -> Topology {
        match self.slots {
            Slots::Positional(_) => Topology::Positional,
            Slots::UniformPool { .. } => Topology::UniformPool,
        }
    }

    pub fn sequence_len(&self) -> usize {
        match &self.slots {
            Slots::Positional(slots) => slots.len(),
            Slots::UniformPool { sequence_len, .. } => *sequence_len,
        }
    }

    fn snippets_at(&self, slot: usize) -> &[String] {
        match &self.slots {
            Slots::Positional(slots) => slots.get(slot).map(Vec::as_slice).unwrap_or(&[]),
            Slots::UniformPool { pool, sequence_len } if slot < *sequence_len => pool,
            Slots::UniformPool { .. } => &[],
        }
    }

    /// Number of candidate choices at `slot`; zero past the sequence length.
    pub fn num_choices(&self, slot: usize) -> usize {
        self.snippets_at(slot).len()
    }

    /// Candidate moves at `slot` in choice order.
    pub fn moves_at_slot(&self, slot: usize) -> Vec<Move> {
        (0..self.num_choices(slot))
            .map(|choice| Move::new(slot, choice))
            .collect()
    }

    /// The snippet a move contributes to the rendered command.
    pub fn snippet(&self, mov: Move) -> Option<&str> {
        self.snippets_at(mov.slot())
            .get(mov.choice())
            .map(String::as_str)
    }

    /// Total number of distinct complete assignments, saturating at `u128::MAX`.
    pub fn combinations(&self) -> u128 {
        (0..self.sequence_len()).fold(1u128, |acc, slot| {
            acc.saturating_mul(self.num_choices(slot) as u128)
        })
    }

    /// Render a complete assignment into the external command string.
    pub fn render(&self, assignment: &CompleteAssignment) -> Result<String, TreeError> {
        let sequence_len = self.sequence_len();
        if assignment.len() != sequence_len {
            return Err(TreeError::SlotOutOfRange {
                slot: assignment.len().min(sequence_len),
                sequence_len,
            });
        }

        let snippets = assignment
            .choices()
            .iter()
            .enumerate()
            .map(|(slot, &choice)| {
                self.snippet(Move::new(slot, choice))
                    .ok_or(TreeError::ChoiceOutOfRange {
                        slot,
                        choice,
                        num_choices: self.num_choices(slot),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(format!(
            "{}{}{}",
            self.prefix,
            snippets.join(&self.separator),
            self.suffix
        ))
    }
}
