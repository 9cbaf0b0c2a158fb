use seqtree_core::{
    ActionSpace, Engine, Move, OracleOutcome, SearchConfig, Topology, from_fn, merge_top_k,
};

fn vivado_like_space() -> ActionSpace {
    ActionSpace::positional(vec![
        vec![
            "synth_design -top top\n".into(),
            "synth_design -top top -flatten_hierarchy full\n".into(),
        ],
        vec!["opt_design\n".into(), "opt_design -directive Explore\n".into()],
        vec!["place_design\n".into(), "place_design -directive Explore\n".into()],
    ])
    .expect("space should build")
}

#[test]
fn public_search_finds_the_most_faulting_flow() {
    let space = vivado_like_space();
    assert_eq!(space.topology(), Topology::Positional);

    let config = SearchConfig {
        iteration_budget: Some(120),
        top_k: 3,
        reward_lambda: 0.0,
        seed: Some(2024),
        ..SearchConfig::default()
    };
    let mut engine = Engine::new(space, config).expect("valid engine");

    // every "Explore" directive breaks one more test case
    let mut oracle = from_fn(|_episode: u64, command: &str| {
        Ok(OracleOutcome::new(command.matches("Explore").count() as u32, 0))
    });

    let report = engine.search(&mut oracle, 1).expect("search should succeed");

    assert_eq!(report.top.len(), 3);
    assert_eq!(report.top[0].assignment.choices()[1..], [1, 1]);
    assert!((report.top[0].reward - 0.7 * 2.0 / 3.0).abs() < 1e-12);
    assert!(
        report
            .top
            .windows(2)
            .all(|pair| pair[0].reward >= pair[1].reward)
    );
    assert_eq!(engine.oracle_calls(), 8);
}

#[test]
fn public_episode_merge_dedupes_commands() {
    let space = ActionSpace::uniform_pool(vec!["abc -fast; ".into(), "opt_clean; ".into()], 2)
        .expect("space should build")
        .with_prefix("hierarchy; proc; ");
    let config = SearchConfig {
        iteration_budget: Some(30),
        top_k: 4,
        reward_lambda: 0.0,
        seed: Some(3),
        ..SearchConfig::default()
    };
    let mut engine = Engine::new(space, config).expect("valid engine");
    let mut oracle = from_fn(|_episode: u64, command: &str| {
        Ok(OracleOutcome::new(command.matches("abc").count() as u32, 0))
    });

    let reports = engine
        .run_episodes(&mut oracle, 3)
        .expect("episodes should succeed");
    assert_eq!(reports.len(), 3);

    let merged = merge_top_k(reports.into_iter().map(|r| r.top), 4);
    assert_eq!(merged.len(), 4);
    assert_eq!(merged[0].command, "hierarchy; proc; abc -fast; abc -fast; ");

    let mut commands: Vec<&str> = merged.iter().map(|c| c.command.as_str()).collect();
    commands.sort();
    commands.dedup();
    assert_eq!(commands.len(), 4);

    let tree = engine.last_tree().expect("tree kept");
    assert_eq!(
        tree.best_root_move_by_value().expect("root exists"),
        Some(Move::new(0, 0))
    );
}
