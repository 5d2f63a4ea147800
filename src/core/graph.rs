use crate::core::edge::{BranchId, Edge};
use crate::core::node::{CommitHash, Node, NodeId, NodeKind};

/// An ordered set of nodes active at one commit position
#[derive(Debug, Clone)]
pub struct Row {
    index: usize,
    nodes: Vec<NodeId>,
}

impl Row {
    /// Create a detached row. It joins the graph via [`Graph::attach_row`]
    /// once it has at least one node.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            nodes: Vec::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn push(&mut self, id: NodeId) {
        self.nodes.push(id);
    }

    pub(crate) fn set_nodes(&mut self, nodes: Vec<NodeId>) {
        self.nodes = nodes;
    }
}

/// The rendered commit graph: a node arena plus the ordered row list.
///
/// Rows grow only at the tail; the append path may detach the last row and
/// re-attach it within a single operation. Nodes are never destroyed,
/// removing one from a row only drops its id from that row's list.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    rows: Vec<Row>,
    next_branch: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            rows: Vec::new(),
            next_branch: 0,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn last_row(&self) -> Option<&Row> {
        self.rows.last()
    }

    pub(crate) fn last_row_mut(&mut self) -> Option<&mut Row> {
        self.rows.last_mut()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Allocate a node in the arena
    pub fn new_node(&mut self, hash: CommitHash, branch: BranchId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(hash, branch, kind));
        id
    }

    /// Mint a fresh lane identifier
    pub fn new_branch(&mut self) -> BranchId {
        let branch = BranchId(self.next_branch);
        self.next_branch += 1;
        branch
    }

    /// Attach a row at the tail. Its index must continue the row sequence.
    pub fn attach_row(&mut self, row: Row) {
        debug_assert_eq!(row.index(), self.rows.len());
        debug_assert!(!row.nodes().is_empty());
        self.rows.push(row);
    }

    pub(crate) fn detach_last_row(&mut self) -> Option<Row> {
        self.rows.pop()
    }

    /// Wire `child` to `parent`: the forward (parent-directed) edge lands on
    /// `child`, the backward (child-directed) edge on `parent`, both tagged
    /// with `branch`.
    pub fn create_usual_edge(&mut self, child: NodeId, parent: NodeId, branch: BranchId) {
        let edge = Edge {
            up: child,
            down: parent,
            branch,
        };
        self.nodes[child.0].push_down_edge(edge);
        self.nodes[parent.0].push_up_edge(edge);
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
