mod cache;
mod oracle;
mod reward;
mod space;
mod topk;
mod tree;

pub use cache::{CachedResult, ResultCache};
pub use oracle::{FnOracle, Oracle, OracleError, OracleOutcome, from_fn};
pub use reward::{BASELINE_EPSILON, Rewarder};
pub use space::{ActionSpace, Assignment, CompleteAssignment, Move, Topology};
pub use topk::{Candidate, TopK, merge_top_k};
pub use tree::error::{ConfigError, TreeError};
pub use tree::ids::NodeId;
pub use tree::mcts::{
    Engine, EpisodeReport, IterationMetrics, RunError, RunMetrics, SearchConfig,
};
pub use tree::node::Node;
pub use tree::rollout::rollout;
pub use tree::search_tree::{Tree, TreePolicyResult};
pub use tree::snapshot::{NodeSnapshot, SNAPSHOT_SCHEMA_VERSION, TreeSnapshot};
pub use tree::stats::NodeStats;

#[cfg(test)]
mod tests;
