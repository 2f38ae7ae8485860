//! Search tree storage: one `Vec` of nodes, linked by index.

use crate::node::{Node, NodeId};

/// The tree built by one search.
///
/// Nodes are stored in a contiguous vector and referenced by index. The
/// whole tree is dropped after each search.
#[derive(Debug)]
pub struct Tree<M> {
    nodes: Vec<Node<M>>,
}

impl<M> Tree<M> {
    /// Create a tree holding only `root`.
    pub fn new(root: Node<M>) -> Self {
        Self { nodes: vec![root] }
    }

    /// The node at `id`.
    ///
    /// # Panics
    /// Panics if `id` was not handed out by this tree.
    pub fn get(&self, id: NodeId) -> &Node<M> {
        &self.nodes[id.0]
    }

    /// Mutable access to the node at `id`.
    ///
    /// # Panics
    /// Panics if `id` was not handed out by this tree.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<M> {
        &mut self.nodes[id.0]
    }

    /// Add a child under `parent`, returning its ID.
    pub fn add_child(&mut self, parent: NodeId, action: M, node: Node<M>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push((action, id));
        id
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Get the root node.
    pub fn root(&self) -> &Node<M> {
        self.get(NodeId::ROOT)
    }
}
