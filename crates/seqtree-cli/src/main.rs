use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use serde_json::json;
use seqtree_core::{Engine, RunError, TreeError, merge_top_k};
use seqtree_flow::{FlowError, RunSpec};
use thiserror::Error;
use tracing_subscriber::filter::EnvFilter;

const LOG_ENV: &str = "SEQTREE_LOG";

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Config(#[from] seqtree_core::ConfigError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("failed to encode results: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),
}

fn main() {
    // stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var(LOG_ENV)
                .unwrap_or_else(|_| "info".to_string())
                .parse()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let Some(arg) = std::env::args().nth(1) else {
        eprintln!("usage: seqtree <run.yaml> | seqtree --default-config");
        process::exit(2);
    };

    if arg == "--default-config" {
        print!("{}", seqtree_core::SearchConfig::default_yaml());
        return;
    }

    if let Err(err) = run(&PathBuf::from(arg)) {
        tracing::error!("{err}");
        process::exit(1);
    }
}

fn run(path: &Path) -> Result<(), CliError> {
    let spec = RunSpec::load(path)?;
    let space_spec = spec.space_spec()?;
    let space = space_spec.compile()?;
    let mut oracle = spec.command_oracle()?;
    tracing::info!(
        run = %path.display(),
        episodes = spec.episodes,
        sequence_len = space.sequence_len(),
        cases = spec.oracle.cases.len(),
        "loaded run"
    );

    let mut engine = Engine::new(space, spec.search.clone())?;
    let reports = engine.run_episodes(&mut oracle, spec.episodes)?;
    let best = merge_top_k(reports.iter().map(|report| report.top.clone()), spec.final_top_k);

    let recommended_first_move = match engine.last_tree() {
        Some(tree) => tree.best_root_move_by_visits()?,
        None => None,
    };

    if let (Some(snapshot_path), Some(tree)) = (&spec.snapshot_path, engine.last_tree()) {
        if let Some(parent) = snapshot_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(snapshot_path, tree.snapshot().to_json()?)?;
        tracing::info!(path = %snapshot_path.display(), "wrote tree snapshot");
    }

    let first_move_label = recommended_first_move.and_then(|mov| space_spec.move_label(mov));
    let best: Vec<_> = best
        .iter()
        .map(|candidate| {
            json!({
                "reward": candidate.reward,
                "command": candidate.command,
                "assignment": candidate.assignment,
                "labels": space_spec.assignment_labels(&candidate.assignment),
            })
        })
        .collect();

    let summary = json!({
        "best": best,
        "episodes": reports
            .iter()
            .map(|report| json!({ "episode": report.episode, "metrics": report.metrics }))
            .collect::<Vec<_>>(),
        "recommended_first_move": recommended_first_move,
        "recommended_first_move_label": first_move_label,
        "oracle_calls": engine.oracle_calls(),
        "latency_baseline_secs": engine.rewarder().baseline(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
