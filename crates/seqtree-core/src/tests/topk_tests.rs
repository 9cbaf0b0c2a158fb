use crate::{Candidate, CompleteAssignment, TopK, merge_top_k};

fn candidate(reward: f64, command: &str) -> Candidate {
    Candidate {
        reward,
        command: command.to_string(),
        assignment: CompleteAssignment::from(vec![0]),
    }
}

fn rewards(entries: &[Candidate]) -> Vec<f64> {
    entries.iter().map(|c| c.reward).collect()
}

#[test]
fn table_keeps_best_entries_sorted() {
    let mut top = TopK::new(2);
    assert!(top.offer(candidate(0.1, "a")));
    assert!(top.offer(candidate(0.5, "b")));
    assert_eq!(rewards(top.entries()), vec![0.5, 0.1]);

    assert!(top.offer(candidate(0.3, "c")));
    assert_eq!(rewards(top.entries()), vec![0.5, 0.3]);
    assert_eq!(top.min_reward(), Some(0.3));

    // ties with the current minimum do not replace it
    assert!(!top.offer(candidate(0.3, "d")));
    assert!(!top.offer(candidate(-1.0, "e")));
    assert_eq!(top.entries()[1].command, "c");
    assert_eq!(top.len(), top.capacity());
}

#[test]
fn table_does_not_collapse_duplicate_commands() {
    let mut top = TopK::new(3);
    top.offer(candidate(0.2, "same"));
    top.offer(candidate(0.2, "same"));
    assert_eq!(top.len(), 2);
}

#[test]
fn merge_dedupes_by_command_keeping_max_reward() {
    let episode_one = vec![candidate(0.4, "x"), candidate(0.1, "y")];
    let episode_two = vec![candidate(0.6, "y"), candidate(0.2, "x"), candidate(0.05, "z")];

    let merged = merge_top_k(vec![episode_one, episode_two], 2);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].command, "y");
    assert_eq!(merged[0].reward, 0.6);
    assert_eq!(merged[1].command, "x");
    assert_eq!(merged[1].reward, 0.4);
}

#[test]
fn merge_of_nothing_is_empty() {
    let merged = merge_top_k(Vec::<Vec<Candidate>>::new(), 5);
    assert!(merged.is_empty());
}
