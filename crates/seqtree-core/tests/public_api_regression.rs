use seqtree_core::{
    ActionSpace, ConfigError, Engine, OracleOutcome, SearchConfig, TreeSnapshot, from_fn,
};

#[test]
fn public_single_slot_single_move_completes_budget() {
    let space = ActionSpace::uniform_pool(vec!["opt;".into()], 1).expect("space should build");
    let config = SearchConfig {
        iteration_budget: Some(25),
        seed: Some(1),
        ..SearchConfig::default()
    };
    let mut engine = Engine::new(space, config).expect("valid engine");
    let mut oracle = from_fn(|_episode: u64, _command: &str| Ok(OracleOutcome::new(1, 0)));

    let report = engine.search(&mut oracle, 1).expect("search should succeed");

    assert_eq!(report.metrics.iterations_completed, 25);
    assert_eq!(report.metrics.oracle_calls, 1);
    assert_eq!(report.metrics.cache_hits, 24);

    let snapshot: TreeSnapshot = engine.last_tree().expect("tree kept").snapshot();
    assert_eq!(snapshot.node_count, 2);
    assert!(snapshot.nodes[1].is_terminal);
    assert_eq!(snapshot.nodes[0].visits, 25);
    assert_eq!(snapshot.nodes[1].visits, 25);
}

#[test]
fn public_degenerate_inputs_fail_at_construction() {
    assert!(matches!(
        ActionSpace::positional(vec![Vec::new()]),
        Err(ConfigError::EmptySlot { slot: 0 })
    ));

    let space = ActionSpace::positional(vec![vec!["a".into()]]).expect("space should build");
    let config = SearchConfig {
        iteration_budget: None,
        ..SearchConfig::default()
    };
    assert!(matches!(
        Engine::new(space, config),
        Err(ConfigError::NoBudget)
    ));
}

#[test]
fn public_default_yaml_config_parses() {
    let config = SearchConfig::from_default_yaml().expect("default yaml should parse");
    assert_eq!(config.top_k, 5);
    assert_eq!(config.iteration_budget, Some(200));
    assert!((config.exploration - 1.414).abs() < f64::EPSILON);
}
