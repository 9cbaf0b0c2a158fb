use serde::Serialize;

use crate::{space::Move, tree::search_tree::Tree};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct TreeSnapshot {
    pub schema_version: u32,
    pub root_node_id: usize,
    pub node_count: usize,
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub node_id: usize,
    pub depth: usize,
    pub is_terminal: bool,
    pub parent_node_id: Option<usize>,
    pub incoming_move: Option<Move>,
    pub assignment: Vec<Option<usize>>,
    pub visits: u64,
    pub value_sum: f64,
    pub q: f64,
    pub untried_moves: usize,
    pub children: Vec<usize>,
}

impl TreeSnapshot {
    /// Serialize the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Tree {
    /// Capture every node of the tree in allocation order.
    pub fn snapshot(&self) -> TreeSnapshot {
        let nodes: Vec<NodeSnapshot> = self
            .nodes()
            .into_iter()
            .enumerate()
            .map(|(node_id, node)| {
                let stats = node.stats();
                NodeSnapshot {
                    node_id,
                    depth: node.depth(),
                    is_terminal: node.is_terminal(),
                    parent_node_id: node.parent().map(|(parent_id, _)| parent_id.index()),
                    incoming_move: node.parent().map(|(_, mov)| mov),
                    assignment: node.assignment().slots().to_vec(),
                    visits: stats.visits(),
                    value_sum: stats.value_sum(),
                    q: stats.q(),
                    untried_moves: node.untried().len(),
                    children: node
                        .children()
                        .iter()
                        .map(|(_, child_id)| child_id.index())
                        .collect(),
                }
            })
            .collect();

        TreeSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            root_node_id: self.root_id().index(),
            node_count: nodes.len(),
            nodes,
        }
    }
}
