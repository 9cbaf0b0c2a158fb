use crate::{ActionSpace, Assignment, CompleteAssignment, ConfigError, Move, Topology, TreeError};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[test]
fn positional_space_renders_with_prefix_and_separator() {
    let space = ActionSpace::positional(vec![
        strings(&["opt_design", "opt_design -directive Explore"]),
        strings(&["place_design"]),
    ])
    .expect("space should build")
    .with_prefix("read_verilog rtl.v\n")
    .with_separator("\n")
    .with_suffix("\n");

    assert_eq!(space.topology(), Topology::Positional);
    assert_eq!(space.sequence_len(), 2);
    assert_eq!(space.num_choices(0), 2);
    assert_eq!(space.num_choices(1), 1);
    assert_eq!(space.num_choices(2), 0);
    assert_eq!(space.combinations(), 2);

    let rendered = space
        .render(&CompleteAssignment::from(vec![1, 0]))
        .expect("render should succeed");
    assert_eq!(
        rendered,
        "read_verilog rtl.v\nopt_design -directive Explore\nplace_design\n"
    );
}

#[test]
fn uniform_pool_length_is_independent_of_pool_size() {
    let space = ActionSpace::uniform_pool(strings(&["abc;", "opt_clean;"]), 5)
        .expect("space should build")
        .with_prefix("hierarchy; proc; ")
        .with_separator(" ");

    assert_eq!(space.topology(), Topology::UniformPool);
    assert_eq!(space.sequence_len(), 5);
    for slot in 0..5 {
        assert_eq!(space.moves_at_slot(slot), vec![Move::new(slot, 0), Move::new(slot, 1)]);
    }
    assert!(space.moves_at_slot(5).is_empty());

    let rendered = space
        .render(&CompleteAssignment::from(vec![0, 1, 1, 0, 0]))
        .expect("render should succeed");
    assert_eq!(rendered, "hierarchy; proc; abc; opt_clean; opt_clean; abc; abc;");
}

#[test]
fn degenerate_spaces_are_rejected() {
    assert!(matches!(
        ActionSpace::positional(Vec::new()),
        Err(ConfigError::EmptySpace)
    ));
    assert!(matches!(
        ActionSpace::positional(vec![strings(&["a"]), Vec::new()]),
        Err(ConfigError::EmptySlot { slot: 1 })
    ));
    assert!(matches!(
        ActionSpace::uniform_pool(Vec::new(), 3),
        Err(ConfigError::EmptySlot { slot: 0 })
    ));
    assert!(matches!(
        ActionSpace::uniform_pool(strings(&["a"]), 0),
        Err(ConfigError::EmptySpace)
    ));
}

#[test]
fn render_rejects_out_of_range_choices_and_wrong_lengths() {
    let space = ActionSpace::positional(vec![strings(&["a", "b"]), strings(&["c"])])
        .expect("space should build");

    let err = space
        .render(&CompleteAssignment::from(vec![0, 3]))
        .expect_err("choice 3 does not exist");
    assert_eq!(
        err,
        TreeError::ChoiceOutOfRange {
            slot: 1,
            choice: 3,
            num_choices: 1
        }
    );

    let err = space
        .render(&CompleteAssignment::from(vec![0]))
        .expect_err("too short");
    assert!(matches!(err, TreeError::SlotOutOfRange { .. }));
}

#[test]
fn assignments_fill_and_canonicalize() {
    let empty = Assignment::unset(3);
    assert_eq!(empty.first_unset(), Some(0));
    assert!(!empty.is_complete());
    assert_eq!(
        empty.to_complete(),
        Err(TreeError::IncompleteAssignment { slot: 0 })
    );

    let partial = empty
        .with_move(Move::new(0, 2))
        .and_then(|a| a.with_move(Move::new(1, 1)))
        .expect("moves are in range");
    assert_eq!(partial.first_unset(), Some(2));
    assert_eq!(partial.assigned_count(), 2);
    assert_eq!(partial.get(0), Some(2));
    assert_eq!(partial.get(2), None);

    let complete = partial
        .with_move(Move::new(2, 0))
        .expect("move is in range");
    assert!(complete.is_complete());
    assert_eq!(
        complete.to_complete().expect("assignment is complete").choices(),
        &[2, 1, 0]
    );

    assert_eq!(
        empty.with_move(Move::new(3, 0)),
        Err(TreeError::SlotOutOfRange {
            slot: 3,
            sequence_len: 3
        })
    );
}
