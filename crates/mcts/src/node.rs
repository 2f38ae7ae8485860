//! Nodes of the search tree and their running statistics.

use arena_core::{Outcome, Reward, Side};

/// Index into the node arena.
///
/// This is a lightweight handle that references a node in the tree.
/// Parent links are plain indices, so the tree never forms an ownership cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// Statistics for a single MCTS node.
#[derive(Clone, Debug, Default)]
pub struct NodeStats {
    /// Number of times this node was visited during search.
    pub visit_count: u32,

    /// Sum of rollout rewards, seen from the side to move at this node.
    pub total_reward: f32,
}

impl NodeStats {
    /// Count one visit that ended in `reward`.
    pub fn record(&mut self, reward: Reward) {
        self.visit_count += 1;
        self.total_reward += reward.get();
    }

    /// Mean reward for this node, a draw if it was never visited.
    pub fn mean_reward(&self) -> Reward {
        if self.visit_count == 0 {
            Reward::DRAW
        } else {
            Reward::clamped(self.total_reward / self.visit_count as f32)
        }
    }
}

/// A node in the MCTS tree.
///
/// Each node stands for the position reached by playing the move its parent
/// lists it under. The position itself is not stored; it is rebuilt by
/// replaying moves from the root.
#[derive(Clone, Debug)]
pub struct Node<M> {
    /// Parent node (None for root). Non-owning back-reference.
    pub parent: Option<NodeId>,

    /// Side to move in this node's position.
    pub to_move: Side,

    /// Node statistics (visits, reward).
    pub stats: NodeStats,

    /// Expanded children in expansion order.
    pub children: Vec<(M, NodeId)>,

    /// Legal moves not expanded yet.
    pub untried: Vec<M>,

    /// Result of the position if it is terminal.
    pub terminal: Option<Outcome>,
}

impl<M> Node<M> {
    /// Create a new, unvisited node.
    pub fn new(
        parent: Option<NodeId>,
        to_move: Side,
        untried: Vec<M>,
        terminal: Option<Outcome>,
    ) -> Self {
        Self {
            parent,
            to_move,
            stats: NodeStats::default(),
            children: Vec::new(),
            untried,
            terminal,
        }
    }

    /// True once every legal move has a child node.
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }
}
