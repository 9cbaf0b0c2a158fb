use thiserror::Error;

use crate::tree::ids::NodeId;

/// Error type for tree bookkeeping and assignment handling during a search.
///
/// None of these should surface from a correctly constructed tree; they mark
/// broken invariants rather than recoverable conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Attempted to access a node id that does not exist in the arena.
    #[error("missing node with id {}", node_id.index())]
    MissingNode { node_id: NodeId },

    /// Tree policy could not select a child of a fully expanded node.
    #[error("failed to select a child on node {}", node_id.index())]
    SelectionFailed { node_id: NodeId },

    /// Rollout policy returned a choice outside `[0, num_choices)`.
    #[error("rollout policy selected invalid choice {choice} for slot {slot} with {num_choices} choices")]
    InvalidRolloutChoice {
        slot: usize,
        choice: usize,
        num_choices: usize,
    },

    /// A complete assignment was required but a slot is still unset.
    #[error("assignment is incomplete: slot {slot} is unset")]
    IncompleteAssignment { slot: usize },

    /// An assignment refers to a choice a slot does not offer.
    #[error("choice {choice} is out of range for slot {slot} with {num_choices} choices")]
    ChoiceOutOfRange {
        slot: usize,
        choice: usize,
        num_choices: usize,
    },

    /// An assignment or move refers to a slot past the sequence length.
    #[error("slot {slot} is out of range for sequence length {sequence_len}")]
    SlotOutOfRange { slot: usize, sequence_len: usize },
}

/// Error type for building action spaces and loading or validating `SearchConfig`.
///
/// Raised at construction time only, never in the middle of a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid search config: {0}")]
    Invalid(String),

    #[error("action space must have a sequence length of at least 1")]
    EmptySpace,

    #[error("slot {slot} has no candidate moves")]
    EmptySlot { slot: usize },

    #[error("at least one of iteration_budget or time_budget_secs must be set")]
    NoBudget,

    #[error("top_k must be greater than 0")]
    ZeroTopK,
}
