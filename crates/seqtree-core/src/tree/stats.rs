/// Stores the numbers MCTS updates constantly
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeStats {
    visits: u64,
    value_sum: f64,
}

impl NodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve the number of backpropagations through this node
    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Retrieve the accumulated reward of this node.
    pub fn value_sum(&self) -> f64 {
        self.value_sum
    }

    /// Function to be used for backpropagation.
    /// Immediately records the reward and increments the visits.
    pub fn record(&mut self, reward: f64) {
        self.visits += 1;
        self.value_sum += reward;
    }

    /// Helper function just to check if the node has been visited or not
    pub fn is_unvisited(&self) -> bool {
        self.visits == 0
    }

    /// Mean reward, 0 when unvisited
    pub fn q(&self) -> f64 {
        if self.is_unvisited() {
            0.0
        } else {
            self.value_sum / self.visits as f64
        }
    }

    /// UCT score of this node as a child of a parent with `parent_visits`.
    /// Unvisited nodes score `+inf` so they are always tried first.
    pub fn uct_score(&self, parent_visits: u64, c: f64) -> f64 {
        if self.is_unvisited() {
            f64::INFINITY
        } else {
            let n_parent = parent_visits.max(1) as f64;
            self.q() + c * f64::sqrt(f64::ln(n_parent) / self.visits as f64)
        }
    }
}
