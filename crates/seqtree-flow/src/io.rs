use std::{fs, path::Path};

use seqtree_core::ActionSpace;

use crate::{FlowError, SpaceSpec};

/// Load a flow space spec from YAML on disk.
pub fn load_yaml(path: impl AsRef<Path>) -> Result<SpaceSpec, FlowError> {
    let yaml = fs::read_to_string(path)?;
    let spec: SpaceSpec = serde_yaml::from_str(&yaml)?;
    Ok(spec)
}

/// Load and compile a flow space from a YAML file.
pub fn compile_yaml(path: impl AsRef<Path>) -> Result<ActionSpace, FlowError> {
    let spec = load_yaml(path)?;
    spec.compile()
}

/// Serialize and write a flow space spec to YAML.
pub fn save_yaml(path: impl AsRef<Path>, spec: &SpaceSpec) -> Result<(), FlowError> {
    let yaml = serde_yaml::to_string(spec)?;
    fs::write(path, yaml)?;
    Ok(())
}
