use std::fmt;

use smallvec::SmallVec;

use crate::core::edge::{BranchId, Edge};

/// Identity of a commit (SHA), opaque to the graph.
///
/// Equality on the hash is the sole way a node is matched across batches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitHash(String);

impl CommitHash {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CommitHash {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A commit as delivered by history traversal
#[derive(Debug, Clone)]
pub struct Commit {
    /// Commit id (SHA)
    pub hash: CommitHash,
    /// Parent ids, in traversal order
    pub parents: Vec<CommitHash>,
}

impl Commit {
    pub fn new(hash: CommitHash, parents: Vec<CommitHash>) -> Self {
        Self { hash, parents }
    }

    /// Check if this is a root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Check if this is a merge commit (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Index of a node in the graph's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

/// What a node stands for in its row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A real commit occupying its own row
    Commit,
    /// A pass-through point where a branch line crosses a row without a commit
    Edge,
    /// A commit referenced by an already-placed child but not yet expanded
    /// into its own row
    Boundary,
}

/// A single vertex of the rendered graph.
///
/// `up_edges` lead to nodes in earlier rows (children), `down_edges` to nodes
/// in later rows (parents). The hash never changes once set; the kind only
/// moves along the two transitions below.
#[derive(Debug, Clone)]
pub struct Node {
    hash: CommitHash,
    branch: BranchId,
    kind: NodeKind,
    up_edges: SmallVec<[Edge; 2]>,
    down_edges: SmallVec<[Edge; 2]>,
}

impl Node {
    pub(crate) fn new(hash: CommitHash, branch: BranchId, kind: NodeKind) -> Self {
        Self {
            hash,
            branch,
            kind,
            up_edges: SmallVec::new(),
            down_edges: SmallVec::new(),
        }
    }

    pub fn hash(&self) -> &CommitHash {
        &self.hash
    }

    pub fn branch(&self) -> BranchId {
        self.branch
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Edges to children in earlier rows
    pub fn up_edges(&self) -> &[Edge] {
        &self.up_edges
    }

    /// Edges to parents in later rows
    pub fn down_edges(&self) -> &[Edge] {
        &self.down_edges
    }

    /// Boundary -> Edge: the marker stays behind as a pass-through line.
    /// Only the boundary-fixup step of an append does this.
    pub(crate) fn retype_to_edge(&mut self) {
        debug_assert_eq!(self.kind, NodeKind::Boundary);
        self.kind = NodeKind::Edge;
    }

    /// Boundary -> Commit: a pending marker turns into the commit of the row
    /// under construction. Only the batch builder does this.
    pub(crate) fn promote_to_commit(&mut self) {
        debug_assert_eq!(self.kind, NodeKind::Boundary);
        self.kind = NodeKind::Commit;
    }

    pub(crate) fn push_up_edge(&mut self, edge: Edge) {
        self.up_edges.push(edge);
    }

    pub(crate) fn push_down_edge(&mut self, edge: Edge) {
        self.down_edges.push(edge);
    }
}
