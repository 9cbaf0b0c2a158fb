use crate::{
    space::{ActionSpace, Assignment, CompleteAssignment},
    tree::error::TreeError,
};

/// Complete a partial assignment by filling every unset slot with a choice
/// picked by `policy(slot, num_choices)`.
///
/// Already-set slots are kept as they are. The engine passes a uniform random
/// policy; any policy must return a choice in `[0, num_choices)`.
pub fn rollout<FPolicy>(
    assignment: &Assignment,
    space: &ActionSpace,
    mut policy: FPolicy,
) -> Result<CompleteAssignment, TreeError>
where
    FPolicy: FnMut(usize, usize) -> usize,
{
    let sequence_len = space.sequence_len();
    if assignment.len() != sequence_len {
        return Err(TreeError::SlotOutOfRange {
            slot: assignment.len().min(sequence_len),
            sequence_len,
        });
    }

    let mut filled = Vec::with_capacity(sequence_len);
    for (slot, current) in assignment.slots().iter().enumerate() {
        let num_choices = space.num_choices(slot);
        let choice = match current {
            Some(choice) => *choice,
            None => policy(slot, num_choices),
        };

        if choice >= num_choices {
            let err = match current {
                Some(_) => TreeError::ChoiceOutOfRange {
                    slot,
                    choice,
                    num_choices,
                },
                None => TreeError::InvalidRolloutChoice {
                    slot,
                    choice,
                    num_choices,
                },
            };
            return Err(err);
        }
        filled.push(choice);
    }

    Ok(CompleteAssignment::from(filled))
}
