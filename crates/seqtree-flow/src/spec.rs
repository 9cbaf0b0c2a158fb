use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use seqtree_core::{ActionSpace, CompleteAssignment, Move, Topology};

use crate::FlowError;

/// Highest flow schema version this crate understands.
pub const FLOW_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Serializable description of a synthesis flow's action space.
pub struct SpaceSpec {
    /// Schema version for future compatibility checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    pub topology: Topology,
    /// Text rendered before the first snippet.
    #[serde(default)]
    pub prefix: String,
    /// Text rendered between snippets.
    #[serde(default)]
    pub separator: String,
    /// Text rendered after the last snippet.
    #[serde(default)]
    pub suffix: String,
    /// Number of slots; only meaningful for `uniform_pool`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_len: Option<usize>,
    pub operations: Vec<OperationSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One tool operation and the option variants it can be invoked with.
pub struct OperationSpec {
    pub id: String,
    pub options: Vec<String>,
}

impl SpaceSpec {
    /// Validate ids, option lists, and the topology/length pairing.
    pub fn validate(&self) -> Result<(), FlowError> {
        if let Some(version) = self.version {
            if version == 0 || version > FLOW_SCHEMA_VERSION {
                return Err(FlowError::UnsupportedVersion { version });
            }
        }

        if self.operations.is_empty() {
            return Err(FlowError::NoOperations);
        }

        let mut ids = HashSet::with_capacity(self.operations.len());
        for (index, operation) in self.operations.iter().enumerate() {
            if operation.id.trim().is_empty() {
                return Err(FlowError::EmptyOperationId { index });
            }
            if !ids.insert(operation.id.as_str()) {
                return Err(FlowError::DuplicateOperationId {
                    id: operation.id.clone(),
                });
            }
            if operation.options.is_empty() {
                return Err(FlowError::EmptyOptions {
                    operation: operation.id.clone(),
                });
            }
        }

        match (self.topology, self.sequence_len) {
            (Topology::UniformPool, None | Some(0)) => Err(FlowError::MissingSequenceLen),
            (Topology::Positional, Some(_)) => Err(FlowError::UnexpectedSequenceLen),
            _ => Ok(()),
        }
    }

    /// Validate and compile into the engine's action space.
    ///
    /// Positional flows get one slot per operation, in declaration order.
    /// Uniform-pool flows share one pool holding every (operation, option)
    /// pair in declaration order.
    pub fn compile(&self) -> Result<ActionSpace, FlowError> {
        self.validate()?;

        let space = match self.topology {
            Topology::Positional => ActionSpace::positional(
                self.operations
                    .iter()
                    .map(|operation| operation.options.clone())
                    .collect(),
            )?,
            Topology::UniformPool => ActionSpace::uniform_pool(
                self.operations
                    .iter()
                    .flat_map(|operation| operation.options.iter().cloned())
                    .collect(),
                self.sequence_len.unwrap_or_default(),
            )?,
        };

        Ok(space
            .with_prefix(self.prefix.as_str())
            .with_separator(self.separator.as_str())
            .with_suffix(self.suffix.as_str()))
    }

    /// Human-readable label of every choice per slot, `operation[option]`,
    /// laid out like the compiled space.
    pub fn labels(&self) -> Vec<Vec<String>> {
        let label_op = |operation: &OperationSpec| -> Vec<String> {
            (0..operation.options.len())
                .map(|option| format!("{}[{option}]", operation.id))
                .collect()
        };

        match self.topology {
            Topology::Positional => self.operations.iter().map(label_op).collect(),
            Topology::UniformPool => {
                let pool: Vec<String> = self.operations.iter().flat_map(label_op).collect();
                vec![pool; self.sequence_len.unwrap_or_default()]
            }
        }
    }

    /// Label of a single move, `None` when it lies outside the space.
    pub fn move_label(&self, mov: Move) -> Option<String> {
        self.labels().get(mov.slot())?.get(mov.choice()).cloned()
    }

    /// Labels of every slot of a complete assignment, in slot order.
    pub fn assignment_labels(&self, assignment: &CompleteAssignment) -> Option<Vec<String>> {
        let labels = self.labels();
        if assignment.len() != labels.len() {
            return None;
        }
        assignment
            .choices()
            .iter()
            .zip(&labels)
            .map(|(choice, slot_labels)| slot_labels.get(*choice).cloned())
            .collect()
    }
}
