use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use seqtree_core::{ActionSpace, SearchConfig};

use crate::{CommandOracle, FlowError, OracleSpec, SpaceSpec, io::load_yaml, presets::preset};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// Where a run takes its action space from.
pub enum SpaceSource {
    /// A built-in flow, see [`crate::preset`].
    Preset { preset: String },
    /// A flow space YAML file.
    Path { path: PathBuf },
    /// A flow space spec written inline.
    Inline(SpaceSpec),
}

fn default_episodes() -> usize {
    1
}

fn default_final_top_k() -> usize {
    5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Everything a complete multi-episode search run needs.
pub struct RunSpec {
    pub space: SpaceSource,
    #[serde(default)]
    pub search: SearchConfig,
    pub oracle: OracleSpec,
    #[serde(default = "default_episodes")]
    pub episodes: usize,
    /// Size of the merged result list across all episodes.
    #[serde(default = "default_final_top_k")]
    pub final_top_k: usize,
    /// Where to write the last episode's tree snapshot, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
}

impl RunSpec {
    /// Parse a run spec; relative paths are kept as written.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, FlowError> {
        let spec: RunSpec = serde_yaml::from_str(yaml)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Load a run spec from disk. Relative space, case and snapshot paths,
    /// and an oracle program given as a relative path with a directory
    /// component, are resolved against the directory holding the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlowError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)?;
        let mut spec = Self::from_yaml_str(&yaml)?;

        let base = path.parent().unwrap_or(Path::new(""));
        let base = if base.is_absolute() {
            base.to_path_buf()
        } else {
            std::env::current_dir()?.join(base)
        };
        spec.resolve_relative_to(&base);
        Ok(spec)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        if let SpaceSource::Path { path } = &mut self.space {
            resolve(path);
        }
        self.oracle.cases.iter_mut().for_each(resolve);

        let program = Path::new(&self.oracle.program);
        let has_dir = program
            .parent()
            .is_some_and(|parent| !parent.as_os_str().is_empty());
        if has_dir && program.is_relative() {
            self.oracle.program = base.join(program).to_string_lossy().into_owned();
        }
        if let Some(path) = &mut self.snapshot_path {
            resolve(path);
        }
    }

    pub fn validate(&self) -> Result<(), FlowError> {
        self.search.validate()?;
        self.oracle.validate()?;
        if self.episodes == 0 {
            return Err(FlowError::NoEpisodes);
        }
        if self.final_top_k == 0 {
            return Err(FlowError::ZeroFinalTopK);
        }
        Ok(())
    }

    /// Resolve the space source into a flow spec.
    pub fn space_spec(&self) -> Result<SpaceSpec, FlowError> {
        match &self.space {
            SpaceSource::Preset { preset: name } => preset(name),
            SpaceSource::Path { path } => load_yaml(path),
            SpaceSource::Inline(spec) => Ok(spec.clone()),
        }
    }

    pub fn compile_space(&self) -> Result<ActionSpace, FlowError> {
        self.space_spec()?.compile()
    }

    pub fn command_oracle(&self) -> Result<CommandOracle, FlowError> {
        CommandOracle::new(self.oracle.clone())
    }
}
