mod builder;
mod error;
mod io;
mod oracle;
mod presets;
mod run;
mod spec;

pub use builder::SpaceBuilder;
pub use error::FlowError;
pub use io::{compile_yaml, load_yaml, save_yaml};
pub use oracle::{COMMAND_ENV, CommandOracle, EPISODE_ENV, OracleSpec};
pub use presets::{preset, vivado, yosys};
pub use run::{RunSpec, SpaceSource};
pub use spec::{OperationSpec, SpaceSpec};
