use seqtree_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for flow loading, validation, compilation, and builder operations.
pub enum FlowError {
    #[error("failed to read YAML file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unsupported flow schema version {version}")]
    UnsupportedVersion { version: u32 },

    #[error("flow declares no operations")]
    NoOperations,

    #[error("operation id must not be empty (operation {index})")]
    EmptyOperationId { index: usize },

    #[error("duplicate operation id '{id}'")]
    DuplicateOperationId { id: String },

    #[error("operation '{operation}' must declare at least one option")]
    EmptyOptions { operation: String },

    #[error("uniform_pool topology requires a positive sequence_len")]
    MissingSequenceLen,

    #[error("positional topology derives its length from the operations; sequence_len must be omitted")]
    UnexpectedSequenceLen,

    #[error("unknown preset '{name}'")]
    UnknownPreset { name: String },

    #[error("oracle program must not be empty")]
    EmptyProgram,

    #[error("oracle must list at least one case directory")]
    NoCases,

    #[error("oracle timeout must be positive and representable as a duration, got {value}")]
    InvalidTimeout { value: f64 },

    #[error("run must request at least one episode")]
    NoEpisodes,

    #[error("final_top_k must be positive")]
    ZeroFinalTopK,

    #[error("builder referenced unknown operation '{operation}'")]
    BuilderUnknownOperation { operation: String },
}
