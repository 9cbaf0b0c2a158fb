use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{ActionSpace, Candidate, CompleteAssignment, Move, Rewarder, TopK, Tree};

proptest! {
    #[test]
    fn reward_is_monotone_in_counts(
        faults in 0u32..10_000,
        timeouts in 0u32..10_000,
        elapsed in 0.0f64..50.0,
        sample in 0.001f64..20.0,
    ) {
        let mut rewarder = Rewarder::new(0.7, 0.2, 0.9);
        rewarder.observe(sample);

        let base = rewarder.reward(faults, timeouts, elapsed);
        prop_assert!(rewarder.reward(faults + 1, timeouts, elapsed) >= base);
        prop_assert!(rewarder.reward(faults, timeouts + 1, elapsed) <= base);
    }

    #[test]
    fn penalty_is_zero_below_baseline_and_increasing_above(
        sample in 0.01f64..100.0,
        below in 0.0f64..1.0,
        above in 0.0f64..10.0,
        delta in 0.01f64..10.0,
    ) {
        let mut rewarder = Rewarder::default();
        rewarder.observe(sample);
        prop_assert_eq!(rewarder.baseline(), sample);

        prop_assert_eq!(rewarder.penalty(sample * below), 0.0);

        let t1 = sample + above;
        let t2 = t1 + delta;
        prop_assert!(rewarder.penalty(t2) > rewarder.penalty(t1));
    }

    #[test]
    fn top_k_stays_bounded_and_sorted(
        capacity in 1usize..8,
        rewards in proptest::collection::vec(-1.0f64..1.0, 0..64),
    ) {
        let mut top = TopK::new(capacity);
        for (idx, reward) in rewards.iter().enumerate() {
            top.offer(Candidate {
                reward: *reward,
                command: format!("cmd{idx}"),
                assignment: CompleteAssignment::from(vec![idx]),
            });
            prop_assert!(top.len() <= capacity);
            prop_assert!(top.entries().windows(2).all(|w| w[0].reward >= w[1].reward));
        }

        prop_assert_eq!(top.len(), rewards.len().min(capacity));
        if let Some(max) = rewards.iter().copied().reduce(f64::max) {
            prop_assert_eq!(top.entries()[0].reward, max);
        }
    }

    #[test]
    fn expansion_respects_first_unset_slot(
        sizes in proptest::collection::vec(1usize..4, 1..5),
        seed in any::<u64>(),
        steps in 1usize..40,
    ) {
        let slots = sizes
            .iter()
            .map(|size| (0..*size).map(|choice| choice.to_string()).collect())
            .collect();
        let space = ActionSpace::positional(slots).expect("sizes are non-zero");
        let mut tree = Tree::new(&space);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for _ in 0..steps {
            let policy = tree.tree_policy(1.0, &space, &mut rng).expect("policy should succeed");
            tree.backpropagate(policy.leaf, 0.0).expect("backprop should succeed");
        }

        for idx in 0..tree.node_count() {
            let node = tree.node(idx.into()).expect("node exists");
            let mut moves: Vec<Move> = node.untried().to_vec();
            moves.extend(node.children().iter().map(|(mov, _)| *mov));
            moves.sort();

            let expected = node
                .assignment()
                .first_unset()
                .map(|slot| space.moves_at_slot(slot))
                .unwrap_or_default();
            prop_assert_eq!(moves, expected);

            for (mov, child) in node.children() {
                let child = tree.node(*child).expect("child exists");
                prop_assert_eq!(child.assignment().get(mov.slot()), Some(mov.choice()));
                prop_assert_eq!(child.assignment().assigned_count(), node.assignment().assigned_count() + 1);
            }
        }
    }
}
