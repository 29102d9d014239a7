use crate::node::{clear_bit, rank, set_bit, test_bit, Node, NodeId};

/// Arena index of the root node. The root is allocated on construction and
/// is never freed, even when the trie holds no keys.
pub(crate) const ROOT: NodeId = NodeId(0);

/// Owns every trie node. Child links are arena indices, so the reachable
/// graph is a strict tree: each node is referenced from exactly one parent
/// slot. Freed nodes are recycled through a free list.
#[derive(Clone)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
}

impl NodeArena {
    pub(crate) fn new() -> Self {
        NodeArena {
            nodes: vec![Node::new()],
            free: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self) -> NodeId {
        if let Some(id) = self.free.pop() {
            return id;
        }
        self.nodes.push(Node::new());
        NodeId(self.nodes.len() - 1)
    }

    fn release(&mut self, id: NodeId) {
        debug_assert!(self.nodes[id.0].is_expendable());
        debug_assert_ne!(id, ROOT);
        self.free.push(id);
    }

    /// Looks up the child of `id` for byte `byte`.
    #[inline]
    pub(crate) fn child(&self, id: NodeId, byte: u8) -> Option<NodeId> {
        let node = self.node(id);
        if !test_bit(&node.present, byte) {
            return None;
        }
        Some(node.children[rank(&node.present, byte)])
    }

    /// Looks up the child of `id` for byte `byte`, which the caller has
    /// already checked is present in the bitmap.
    #[inline]
    pub(crate) fn child_unchecked(&self, id: NodeId, byte: u8) -> NodeId {
        let node = self.node(id);
        debug_assert!(test_bit(&node.present, byte));
        node.children[rank(&node.present, byte)]
    }

    /// Inserts a fresh child of `id` for byte `byte`, keeping the child slots
    /// in ascending byte order. The slot must currently be empty.
    pub(crate) fn add_child(&mut self, id: NodeId, byte: u8) -> NodeId {
        debug_assert!(!test_bit(&self.node(id).present, byte));
        let child = self.alloc();
        let node = self.node_mut(id);
        let pos = rank(&node.present, byte);
        node.children.insert(pos, child);
        set_bit(&mut node.present, byte);
        child
    }

    /// Unlinks the child of `id` for byte `byte` and returns it to the free
    /// list. The child must already be expendable (no value, no children).
    pub(crate) fn remove_child(&mut self, id: NodeId, byte: u8) {
        let node = self.node_mut(id);
        if !test_bit(&node.present, byte) {
            return;
        }
        let pos = rank(&node.present, byte);
        let child = node.children.remove(pos);
        clear_bit(&mut node.present, byte);
        self.release(child);
    }

    /// Walks the path spelled by `bytes` starting at `from`, returning the
    /// terminal node or `None` where the path breaks.
    pub(crate) fn walk(&self, from: NodeId, bytes: &[u8]) -> Option<NodeId> {
        let mut cur = from;
        for &byte in bytes {
            cur = self.child(cur, byte)?;
        }
        Some(cur)
    }

    /// Drops every node except the root and resets the root in place.
    pub(crate) fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::new());
        self.free.clear();
    }

    /// Number of nodes currently linked into the trie, root included.
    /// Used by tests to verify that deletion prunes exhaustively.
    #[cfg(test)]
    pub(crate) fn live_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }
}
