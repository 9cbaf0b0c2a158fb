use crate::{
    space::{ActionSpace, Assignment, Move},
    tree::{ids::NodeId, stats::NodeStats},
};

#[derive(Debug, Clone)]
/// Represents a partial assignment in the search tree.
/// Children are kept in insertion order, which is also the UCT tie-break order.
pub struct Node {
    assignment: Assignment,
    depth: usize,
    parent: Option<(NodeId, Move)>,
    children: Vec<(Move, NodeId)>,
    untried: Vec<Move>,
    stats: NodeStats,
}

impl Node {
    /// Create a node for `assignment`.
    /// Untried moves are the moves of the first unset slot, empty when complete.
    pub fn new(assignment: Assignment, parent: Option<(NodeId, Move)>, space: &ActionSpace) -> Self {
        let untried = assignment
            .first_unset()
            .map(|slot| space.moves_at_slot(slot))
            .unwrap_or_default();
        let depth = assignment.assigned_count();

        Node {
            assignment,
            depth,
            parent,
            children: Vec::new(),
            untried,
            stats: NodeStats::new(),
        }
    }

    /// Remove and return the untried move at `index` (swap-remove, order is not preserved).
    pub(crate) fn take_untried(&mut self, index: usize) -> Option<Move> {
        if index < self.untried.len() {
            Some(self.untried.swap_remove(index))
        } else {
            None
        }
    }

    /// Register an expanded child.
    pub(crate) fn push_child(&mut self, mov: Move, child_id: NodeId) {
        self.children.push((mov, child_id));
    }

    /// Look up the child reached through `mov`.
    pub fn child(&self, mov: Move) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(child_move, _)| *child_move == mov)
            .map(|(_, child_id)| *child_id)
    }

    pub fn children(&self) -> &[(Move, NodeId)] {
        &self.children
    }

    pub fn untried(&self) -> &[Move] {
        &self.untried
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Number of slots fixed along the path from the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// True iff every slot of the assignment is set.
    pub fn is_terminal(&self) -> bool {
        self.assignment.is_complete()
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// Return the parent of a given node with the move that led here
    pub fn parent(&self) -> Option<(NodeId, Move)> {
        self.parent
    }

    pub fn stats(&self) -> NodeStats {
        self.stats
    }

    pub(crate) fn record(&mut self, reward: f64) {
        self.stats.record(reward);
    }
}
