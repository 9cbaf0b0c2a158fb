use seqtree_core::{ActionSpace, Topology};

use crate::{FlowError, OperationSpec, SpaceSpec, spec::FLOW_SCHEMA_VERSION};

#[derive(Debug, Clone)]
/// Incremental construction of a flow space spec.
pub struct SpaceBuilder {
    topology: Topology,
    prefix: String,
    separator: String,
    suffix: String,
    sequence_len: Option<usize>,
    operations: Vec<OperationSpec>,
}

impl SpaceBuilder {
    /// Start a positional flow, one slot per operation.
    pub fn positional() -> Self {
        Self::with_topology(Topology::Positional, None)
    }

    /// Start a uniform-pool flow of `sequence_len` slots.
    pub fn uniform_pool(sequence_len: usize) -> Self {
        Self::with_topology(Topology::UniformPool, Some(sequence_len))
    }

    fn with_topology(topology: Topology, sequence_len: Option<usize>) -> Self {
        SpaceBuilder {
            topology,
            prefix: String::new(),
            separator: String::new(),
            suffix: String::new(),
            sequence_len,
            operations: Vec::new(),
        }
    }

    pub fn prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.prefix = prefix.into();
        self
    }

    pub fn separator(&mut self, separator: impl Into<String>) -> &mut Self {
        self.separator = separator.into();
        self
    }

    pub fn suffix(&mut self, suffix: impl Into<String>) -> &mut Self {
        self.suffix = suffix.into();
        self
    }

    /// Add an operation with no options yet.
    pub fn add_operation(&mut self, id: impl Into<String>) -> &mut Self {
        self.operations.push(OperationSpec {
            id: id.into(),
            options: Vec::new(),
        });
        self
    }

    /// Append one option variant to an existing operation.
    pub fn add_option(
        &mut self,
        operation_id: impl AsRef<str>,
        option: impl Into<String>,
    ) -> Result<&mut Self, FlowError> {
        let operation_id = operation_id.as_ref();
        let operation = self
            .operations
            .iter_mut()
            .find(|operation| operation.id == operation_id)
            .ok_or_else(|| FlowError::BuilderUnknownOperation {
                operation: operation_id.to_string(),
            })?;

        operation.options.push(option.into());
        Ok(self)
    }

    pub fn build_spec(self) -> Result<SpaceSpec, FlowError> {
        let spec = SpaceSpec {
            version: Some(FLOW_SCHEMA_VERSION),
            topology: self.topology,
            prefix: self.prefix,
            separator: self.separator,
            suffix: self.suffix,
            sequence_len: self.sequence_len,
            operations: self.operations,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn compile(self) -> Result<ActionSpace, FlowError> {
        let spec = self.build_spec()?;
        spec.compile()
    }
}
