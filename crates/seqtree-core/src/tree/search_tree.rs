use rand::Rng;

use crate::{
    space::{ActionSpace, Assignment, Move},
    tree::{arena::Arena, error::TreeError, ids::NodeId, node::Node},
};

#[derive(Debug, Clone)]
/// Result of one selection + expansion descent.
pub struct TreePolicyResult {
    pub path: Vec<NodeId>,      // nodes visited from root to leaf, inclusive
    pub leaf: NodeId,           // node the rollout starts from (often newly created)
    pub leaf_is_new: bool,      // whether we just created this node
    pub assignment: Assignment, // partial assignment held by the leaf
}

#[derive(Debug, Clone)]
/// Owns the arena (root is always at index 0)
/// and provides the tree operations of one episode.
pub struct Tree {
    arena: Arena<Node>,
}

impl Tree {
    /// Create a tree whose root holds the all-unset assignment of `space`.
    pub fn new(space: &ActionSpace) -> Self {
        let mut arena = Arena::new();
        let root = Node::new(Assignment::unset(space.sequence_len()), None, space);
        let _ = arena.allocate(root);
        Tree { arena }
    }

    /// Return the root node id.
    pub fn root_id(&self) -> NodeId {
        NodeId::from(0)
    }

    /// Return how many nodes exist in the tree arena.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Return an immutable node handle.
    pub fn node(&self, node_id: NodeId) -> Result<&Node, TreeError> {
        self.arena
            .get(node_id)
            .ok_or(TreeError::MissingNode { node_id })
    }

    /// Return a mutable node handle.
    pub(crate) fn node_mut(&mut self, node_id: NodeId) -> Result<&mut Node, TreeError> {
        self.arena
            .get_mut(node_id)
            .ok_or(TreeError::MissingNode { node_id })
    }

    pub(crate) fn nodes(&self) -> &Arena<Node> {
        &self.arena
    }

    /// Pick the child of `node_id` with the highest UCT score.
    /// Unvisited children score `+inf`; ties go to the first child in insertion order.
    pub fn select_child(&self, node_id: NodeId, c: f64) -> Result<Option<NodeId>, TreeError> {
        let node = self.node(node_id)?;
        let n_parent = node.stats().visits();
        let mut best: Option<(NodeId, f64)> = None;

        for (_, child_id) in node.children() {
            let score = self.node(*child_id)?.stats().uct_score(n_parent, c);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((*child_id, score)),
            }
        }

        Ok(best.map(|(child_id, _)| child_id))
    }

    /// Descend from the root while the current node is non-terminal and fully expanded.
    /// Returns the visited path, root first.
    pub fn select(&self, c: f64) -> Result<Vec<NodeId>, TreeError> {
        let mut current = self.root_id();
        let mut path = vec![current];

        loop {
            let node = self.node(current)?;
            if node.is_terminal() || !node.is_fully_expanded() {
                return Ok(path);
            }

            current = self
                .select_child(current, c)?
                .ok_or(TreeError::SelectionFailed { node_id: current })?;
            path.push(current);
        }
    }

    /// Expand one untried move of `node_id`, chosen uniformly at random and
    /// removed from the untried set. Returns the new child.
    pub fn expand<R: Rng + ?Sized>(
        &mut self,
        node_id: NodeId,
        space: &ActionSpace,
        rng: &mut R,
    ) -> Result<NodeId, TreeError> {
        let (mov, assignment) = {
            let node = self.node_mut(node_id)?;
            let remaining = node.untried().len();
            if node.is_terminal() || remaining == 0 {
                return Err(TreeError::SelectionFailed { node_id });
            }

            let mov = node
                .take_untried(rng.gen_range(0..remaining))
                .ok_or(TreeError::SelectionFailed { node_id })?;
            (mov, node.assignment().with_move(mov)?)
        };

        let child_id = self
            .arena
            .allocate(Node::new(assignment, Some((node_id, mov)), space));
        self.node_mut(node_id)?.push_child(mov, child_id);
        Ok(child_id)
    }

    /// Selection followed by expansion when the reached node still has untried moves.
    /// A terminal node reached by selection is returned as the leaf unchanged.
    pub fn tree_policy<R: Rng + ?Sized>(
        &mut self,
        c: f64,
        space: &ActionSpace,
        rng: &mut R,
    ) -> Result<TreePolicyResult, TreeError> {
        let mut path = self.select(c)?;
        let selected = *path.last().ok_or(TreeError::MissingNode {
            node_id: self.root_id(),
        })?;

        let expandable = {
            let node = self.node(selected)?;
            !node.is_terminal() && !node.is_fully_expanded()
        };

        let (leaf, leaf_is_new) = if expandable {
            let child = self.expand(selected, space, rng)?;
            path.push(child);
            (child, true)
        } else {
            (selected, false)
        };

        Ok(TreePolicyResult {
            path,
            leaf,
            leaf_is_new,
            assignment: self.node(leaf)?.assignment().clone(),
        })
    }

    /// Record `reward` on `leaf` and every ancestor up to the root inclusive.
    /// Returns the number of nodes updated.
    pub fn backpropagate(&mut self, leaf: NodeId, reward: f64) -> Result<usize, TreeError> {
        let mut current = Some(leaf);
        let mut updated = 0;

        while let Some(node_id) = current {
            let node = self.node_mut(node_id)?;
            node.record(reward);
            current = node.parent().map(|(parent_id, _)| parent_id);
            updated += 1;
        }

        Ok(updated)
    }

    /// Pick the root move with the highest visit count.
    pub fn best_root_move_by_visits(&self) -> Result<Option<Move>, TreeError> {
        let root = self.node(self.root_id())?;
        let mut best: Option<(Move, u64)> = None;

        for (mov, child_id) in root.children() {
            let visits = self.node(*child_id)?.stats().visits();
            best = match best {
                Some((best_move, best_visits))
                    if best_visits > visits || (best_visits == visits && best_move < *mov) =>
                {
                    Some((best_move, best_visits))
                }
                _ => Some((*mov, visits)),
            };
        }

        Ok(best.map(|(mov, _)| mov))
    }

    /// Pick the root move with the highest mean value estimate.
    pub fn best_root_move_by_value(&self) -> Result<Option<Move>, TreeError> {
        let root = self.node(self.root_id())?;
        let mut best: Option<(Move, f64)> = None;

        for (mov, child_id) in root.children() {
            let q = self.node(*child_id)?.stats().q();
            best = match best {
                Some((best_move, best_q))
                    if best_q > q || (best_q == q && best_move < *mov) =>
                {
                    Some((best_move, best_q))
                }
                _ => Some((*mov, q)),
            };
        }

        Ok(best.map(|(mov, _)| mov))
    }
}
