use std::{
    fs,
    path::Path,
    time::{Duration, Instant},
};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cache::{CachedResult, ResultCache},
    oracle::{Oracle, OracleError, OracleOutcome},
    reward::Rewarder,
    space::{ActionSpace, CompleteAssignment},
    topk::{Candidate, TopK},
    tree::{
        error::{ConfigError, TreeError},
        ids::NodeId,
        rollout::rollout,
        search_tree::Tree,
    },
};

const DEFAULT_SEARCH_CONFIG_YAML: &str = include_str!("../../config/search.default.yaml");

/// Search configuration for one engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// UCT exploration constant `c`.
    pub exploration: f64,
    pub iteration_budget: Option<usize>,
    pub time_budget_secs: Option<f64>,
    pub top_k: usize,
    pub ema_beta: f64,
    pub reward_theta: f64,
    pub reward_lambda: f64,
    pub seed: Option<u64>,
    /// Keep cached oracle results across episodes of the same engine.
    pub reuse_cache: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            exploration: 1.414,
            iteration_budget: Some(200),
            time_budget_secs: None,
            top_k: 5,
            ema_beta: 0.9,
            reward_theta: 0.7,
            reward_lambda: 0.2,
            seed: None,
            reuse_cache: true,
        }
    }
}

impl SearchConfig {
    /// Parse a search config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a search config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SEARCH_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, ConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    /// Wall-clock budget as a `Duration`, if one is set.
    /// Values that `validate` rejects map to `None`.
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iteration_budget.is_none() && self.time_budget_secs.is_none() {
            return Err(ConfigError::NoBudget);
        }
        if self.iteration_budget == Some(0) {
            return Err(ConfigError::Invalid(
                "iteration_budget must be greater than 0".to_string(),
            ));
        }
        if let Some(secs) = self.time_budget_secs {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ConfigError::Invalid(
                    "time_budget_secs must be finite and > 0".to_string(),
                ));
            }
            if Duration::try_from_secs_f64(secs).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "time_budget_secs {secs} exceeds the largest representable duration"
                )));
            }
        }
        if self.top_k == 0 {
            return Err(ConfigError::ZeroTopK);
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(ConfigError::Invalid(
                "exploration must be finite and >= 0".to_string(),
            ));
        }
        if !(self.ema_beta > 0.0 && self.ema_beta < 1.0) {
            return Err(ConfigError::Invalid(
                "ema_beta must be within (0, 1)".to_string(),
            ));
        }
        if !(self.reward_theta > 0.0 && self.reward_theta < 1.0) {
            return Err(ConfigError::Invalid(
                "reward_theta must be within (0, 1)".to_string(),
            ));
        }
        if !self.reward_lambda.is_finite() || self.reward_lambda < 0.0 {
            return Err(ConfigError::Invalid(
                "reward_lambda must be finite and >= 0".to_string(),
            ));
        }
        Ok(())
    }

    fn rewarder(&self) -> Rewarder {
        Rewarder::new(self.reward_theta, self.reward_lambda, self.ema_beta)
    }
}

/// Runtime failure that aborts a search run. No iteration is retried.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("oracle failed during episode {episode}: {source}")]
    Oracle {
        episode: u64,
        #[source]
        source: OracleError,
    },
}

/// Per-iteration metrics emitted by the engine.
#[derive(Debug, Clone)]
pub struct IterationMetrics {
    pub iteration: usize,
    pub leaf: NodeId,
    pub path_len: usize,
    pub leaf_is_new: bool,
    pub assignment: CompleteAssignment,
    pub outcome: OracleOutcome,
    pub cache_hit: bool,
    pub elapsed_secs: f64,
    pub reward: f64,
}

/// Aggregate metrics for one episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub iterations_requested: Option<usize>,
    pub iterations_completed: usize,
    pub oracle_calls: usize,
    pub cache_hits: usize,
    pub reward_sum: f64,
    pub average_reward: f64,
    pub best_reward: Option<f64>,
    pub wall_time_secs: f64,
}

impl RunMetrics {
    fn new(iterations_requested: Option<usize>) -> Self {
        RunMetrics {
            iterations_requested,
            ..RunMetrics::default()
        }
    }

    fn record(&mut self, metrics: &IterationMetrics) {
        self.iterations_completed += 1;
        if metrics.cache_hit {
            self.cache_hits += 1;
        } else {
            self.oracle_calls += 1;
        }
        self.reward_sum += metrics.reward;
        self.average_reward = self.reward_sum / self.iterations_completed as f64;
        self.best_reward = Some(match self.best_reward {
            Some(best) => best.max(metrics.reward),
            None => metrics.reward,
        });
    }
}

/// Result of one episode: the retained best candidates and run metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub episode: u64,
    pub top: Vec<Candidate>,
    pub metrics: RunMetrics,
}

struct Evaluation {
    command: String,
    outcome: OracleOutcome,
    elapsed_secs: f64,
    cache_hit: bool,
}

/// Monte-Carlo tree search over an action space.
///
/// The engine owns the rewarder baseline and the result cache for its whole
/// lifetime; every call to [`Engine::search`] builds a fresh tree.
#[derive(Debug)]
pub struct Engine {
    space: ActionSpace,
    config: SearchConfig,
    rewarder: Rewarder,
    cache: ResultCache,
    rng: ChaCha8Rng,
    oracle_calls: usize,
    last_tree: Option<Tree>,
}

impl Engine {
    /// Validate `config` and create an engine over `space`.
    pub fn new(space: ActionSpace, config: SearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if space.sequence_len() == 0 {
            return Err(ConfigError::EmptySpace);
        }
        if let Some(slot) = (0..space.sequence_len()).find(|slot| space.num_choices(*slot) == 0) {
            return Err(ConfigError::EmptySlot { slot });
        }

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Engine {
            rewarder: config.rewarder(),
            space,
            config,
            cache: ResultCache::new(),
            rng,
            oracle_calls: 0,
            last_tree: None,
        })
    }

    pub fn space(&self) -> &ActionSpace {
        &self.space
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn rewarder(&self) -> &Rewarder {
        &self.rewarder
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Total oracle invocations over the engine lifetime.
    pub fn oracle_calls(&self) -> usize {
        self.oracle_calls
    }

    /// Tree built by the most recent episode.
    pub fn last_tree(&self) -> Option<&Tree> {
        self.last_tree.as_ref()
    }

    /// Run one episode until the configured budget is exhausted.
    pub fn search<O: Oracle>(
        &mut self,
        oracle: &mut O,
        episode: u64,
    ) -> Result<EpisodeReport, RunError> {
        self.search_with_hook(oracle, episode, |_| {})
    }

    /// Run one episode and invoke a callback after each completed iteration.
    pub fn search_with_hook<O, FHook>(
        &mut self,
        oracle: &mut O,
        episode: u64,
        mut on_iteration: FHook,
    ) -> Result<EpisodeReport, RunError>
    where
        O: Oracle,
        FHook: FnMut(&IterationMetrics),
    {
        if !self.config.reuse_cache {
            self.cache.clear();
        }

        info!(
            episode,
            sequence_len = self.space.sequence_len(),
            combinations = self.space.combinations() as f64,
            "starting episode"
        );

        let mut tree = Tree::new(&self.space);
        let mut top = TopK::new(self.config.top_k);
        let mut metrics = RunMetrics::new(self.config.iteration_budget);
        let time_budget = self.config.time_budget();
        let started = Instant::now();

        loop {
            if let Some(budget) = self.config.iteration_budget {
                if metrics.iterations_completed >= budget {
                    break;
                }
            }
            if let Some(budget) = time_budget {
                if started.elapsed() >= budget {
                    break;
                }
            }

            let iteration = self.iterate(
                &mut tree,
                oracle,
                episode,
                &mut top,
                metrics.iterations_completed,
            )?;
            on_iteration(&iteration);
            metrics.record(&iteration);
        }

        metrics.wall_time_secs = started.elapsed().as_secs_f64();
        info!(
            episode,
            iterations = metrics.iterations_completed,
            oracle_calls = metrics.oracle_calls,
            cache_hits = metrics.cache_hits,
            best_reward = metrics.best_reward.unwrap_or(f64::NAN),
            "finished episode"
        );

        self.last_tree = Some(tree);
        Ok(EpisodeReport {
            episode,
            top: top.into_entries(),
            metrics,
        })
    }

    /// Run `episodes` consecutive episodes, numbered from 1.
    pub fn run_episodes<O: Oracle>(
        &mut self,
        oracle: &mut O,
        episodes: usize,
    ) -> Result<Vec<EpisodeReport>, RunError> {
        (1..=episodes as u64)
            .map(|episode| self.search(&mut *oracle, episode))
            .collect()
    }

    /// Execute one complete iteration: select, expand, rollout, evaluate,
    /// reward, backpropagate, and offer the result to `top`.
    fn iterate<O: Oracle>(
        &mut self,
        tree: &mut Tree,
        oracle: &mut O,
        episode: u64,
        top: &mut TopK,
        iteration: usize,
    ) -> Result<IterationMetrics, RunError> {
        let policy = tree.tree_policy(self.config.exploration, &self.space, &mut self.rng)?;

        let rng = &mut self.rng;
        let complete = rollout(&policy.assignment, &self.space, |_slot, num_choices| {
            rng.gen_range(0..num_choices)
        })?;

        let evaluation = self.evaluate(oracle, episode, &complete)?;
        let reward = self.rewarder.reward(
            evaluation.outcome.faults,
            evaluation.outcome.timeouts,
            evaluation.elapsed_secs,
        );

        tree.backpropagate(policy.leaf, reward)?;

        debug!(
            episode,
            iteration,
            depth = policy.path.len().saturating_sub(1),
            cache_hit = evaluation.cache_hit,
            faults = evaluation.outcome.faults,
            timeouts = evaluation.outcome.timeouts,
            reward,
            "iteration complete"
        );

        top.offer(Candidate {
            reward,
            command: evaluation.command,
            assignment: complete.clone(),
        });

        Ok(IterationMetrics {
            iteration,
            leaf: policy.leaf,
            path_len: policy.path.len(),
            leaf_is_new: policy.leaf_is_new,
            assignment: complete,
            outcome: evaluation.outcome,
            cache_hit: evaluation.cache_hit,
            elapsed_secs: evaluation.elapsed_secs,
            reward,
        })
    }

    /// Answer from the cache when possible, otherwise time one oracle call,
    /// store its result and feed the latency to the rewarder.
    /// Cache hits replay the latency of the call that populated the entry.
    fn evaluate<O: Oracle>(
        &mut self,
        oracle: &mut O,
        episode: u64,
        complete: &CompleteAssignment,
    ) -> Result<Evaluation, RunError> {
        let command = self.space.render(complete)?;

        if let Some(cached) = self.cache.lookup(complete) {
            return Ok(Evaluation {
                command,
                outcome: cached.outcome,
                elapsed_secs: cached.elapsed_secs,
                cache_hit: true,
            });
        }

        let started = Instant::now();
        let outcome = oracle
            .evaluate(episode, &command)
            .map_err(|source| RunError::Oracle { episode, source })?;
        let elapsed_secs = started.elapsed().as_secs_f64();
        self.oracle_calls += 1;

        debug!(
            episode,
            faults = outcome.faults,
            timeouts = outcome.timeouts,
            elapsed_secs,
            "oracle call"
        );

        self.cache.store(
            complete.clone(),
            CachedResult {
                outcome,
                elapsed_secs,
            },
        );
        self.rewarder.observe(elapsed_secs);

        Ok(Evaluation {
            command,
            outcome,
            elapsed_secs,
            cache_hit: false,
        })
    }
}
