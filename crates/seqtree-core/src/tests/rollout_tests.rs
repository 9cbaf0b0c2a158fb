use crate::{ActionSpace, Assignment, Move, TreeError, rollout};

fn space() -> ActionSpace {
    ActionSpace::positional(vec![
        vec!["a0".into(), "a1".into()],
        vec!["b0".into(), "b1".into(), "b2".into()],
        vec!["c0".into()],
    ])
    .expect("space should build")
}

#[test]
fn rollout_fills_only_unset_slots() {
    let space = space();
    let partial = Assignment::unset(3)
        .with_move(Move::new(0, 1))
        .expect("move is in range");

    let mut asked = Vec::new();
    let complete = rollout(&partial, &space, |slot, num_choices| {
        asked.push((slot, num_choices));
        num_choices - 1
    })
    .expect("rollout should succeed");

    assert_eq!(complete.choices(), &[1, 2, 0]);
    assert_eq!(asked, vec![(1, 3), (2, 1)]);
}

#[test]
fn rollout_of_complete_assignment_is_identity() {
    let space = space();
    let complete = Assignment::unset(3)
        .with_move(Move::new(0, 0))
        .and_then(|a| a.with_move(Move::new(1, 1)))
        .and_then(|a| a.with_move(Move::new(2, 0)))
        .expect("moves are in range");

    let result = rollout(&complete, &space, |_, _| unreachable!("nothing left to fill"))
        .expect("rollout should succeed");
    assert_eq!(result.choices(), &[0, 1, 0]);
}

#[test]
fn invalid_rollout_choice_returns_error() {
    let space = space();
    let err = rollout(&Assignment::unset(3), &space, |_, _| 99)
        .expect_err("invalid rollout choice should error");

    assert_eq!(
        err,
        TreeError::InvalidRolloutChoice {
            slot: 0,
            choice: 99,
            num_choices: 2
        }
    );
}

#[test]
fn rollout_rejects_mismatched_assignment_length() {
    let space = space();
    let err = rollout(&Assignment::unset(2), &space, |_, _| 0)
        .expect_err("length mismatch should error");
    assert!(matches!(err, TreeError::SlotOutOfRange { .. }));
}
