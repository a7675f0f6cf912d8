//! Node registry: the arena that owns every node of the aggregate.
//!
//! Parent and child links are `NodeId` indices into `Tree::nodes`. Nodes are
//! only ever appended, so an id stays valid for the life of the tree.

use crate::coords::GridPos;

/// Index of a node in [`Tree::nodes`].
pub type NodeId = usize;

/// Id of the seed node every tree starts from.
pub const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
pub struct Node {
    pub pos: GridPos,
    /// `None` only for the root.
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Nodes on the longest path down to a leaf, this node included.
    /// 0 until depths are computed.
    pub depth: u32,
}

impl Node {
    fn new(pos: GridPos, parent: Option<NodeId>) -> Self {
        Self { pos, parent, children: Vec::new(), depth: 0 }
    }
}

#[derive(Debug, Clone)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// A tree holding only the root at `root_pos`.
    pub fn new(root_pos: GridPos) -> Self {
        Self { nodes: vec![Node::new(root_pos, None)] }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    /// Append a leaf under `parent` and return its id.
    pub fn add_child(&mut self, parent: NodeId, pos: GridPos) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(pos, Some(parent)));
        self.nodes[parent].children.push(id);
        id
    }

    /// Append a node with no links yet. The caller wires it up.
    pub(crate) fn push_detached(&mut self, pos: GridPos) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(pos, None));
        id
    }

    /// Number of parent links from `id` up to the root.
    ///
    /// Returns `None` if the walk does not reach the root within `len()`
    /// steps, which only happens when the links contain a cycle.
    pub fn distance_to_root(&self, id: NodeId) -> Option<usize> {
        let mut cur = id;
        for steps in 0..=self.nodes.len() {
            match self.nodes[cur].parent {
                None => return (cur == ROOT).then_some(steps),
                Some(p) => cur = p,
            }
        }
        None
    }

    /// Ancestor `steps` parent links above `id`, if there is one.
    pub fn ancestor(&self, id: NodeId, steps: usize) -> Option<NodeId> {
        let mut cur = id;
        for _ in 0..steps {
            cur = self.nodes[cur].parent?;
        }
        Some(cur)
    }

    /// Ids of all nodes without children.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, n)| n.children.is_empty().then_some(id))
    }

    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}
