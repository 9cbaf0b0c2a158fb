use crate::{BASELINE_EPSILON, CachedResult, CompleteAssignment, OracleOutcome, ResultCache, Rewarder};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn first_sample_sets_baseline_without_smoothing() {
    let mut rewarder = Rewarder::new(0.7, 0.2, 0.9);
    assert_eq!(rewarder.samples(), 0);

    rewarder.observe(2.0);
    assert_eq!(rewarder.baseline(), 2.0);
    assert_eq!(rewarder.samples(), 1);

    rewarder.observe(4.0);
    assert!(approx(rewarder.baseline(), 0.9 * 2.0 + 0.1 * 4.0));
}

#[test]
fn first_sample_is_floored_at_epsilon() {
    let mut rewarder = Rewarder::default();
    rewarder.observe(0.0);
    assert_eq!(rewarder.baseline(), BASELINE_EPSILON);
    assert!(rewarder.penalty(1.0).is_finite());
}

#[test]
fn penalty_is_one_sided() {
    let mut rewarder = Rewarder::default();
    rewarder.observe(2.0);

    assert_eq!(rewarder.penalty(0.5), 0.0);
    assert_eq!(rewarder.penalty(2.0), 0.0);
    assert!(approx(rewarder.penalty(4.0), 1.0));
    assert!(approx(rewarder.penalty(6.0), 2.0));
}

#[test]
fn reward_saturates_counts_and_subtracts_penalty() {
    let mut rewarder = Rewarder::new(0.7, 0.2, 0.9);
    rewarder.observe(1.0);

    assert!(approx(rewarder.reward(1, 0, 1.0), 0.35));
    assert!(approx(rewarder.reward(0, 1, 1.0), -0.15));
    assert!(approx(rewarder.reward(0, 0, 1.0), 0.0));
    assert!(approx(rewarder.reward(0, 0, 3.0), -0.4));
    assert!(rewarder.reward(1_000_000, 0, 1.0) < 0.7);
}

#[test]
fn cache_is_write_once() {
    let mut cache = ResultCache::new();
    let key = CompleteAssignment::from(vec![1, 0, 2]);
    let first = CachedResult {
        outcome: OracleOutcome::new(2, 0),
        elapsed_secs: 1.5,
    };
    let second = CachedResult {
        outcome: OracleOutcome::new(0, 0),
        elapsed_secs: 0.1,
    };

    assert!(cache.lookup(&key).is_none());
    assert!(cache.store(key.clone(), first));
    assert!(!cache.store(key.clone(), second));

    assert_eq!(cache.lookup(&key), Some(first));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.hits(), 1);
    assert!(cache.contains(&key));

    cache.clear();
    assert!(cache.is_empty());
    assert!(!cache.contains(&key));
}
