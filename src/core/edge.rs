use crate::core::node::NodeId;

/// Identifier of a vertical continuity line (lane) in the rendered graph.
/// Minted by the graph, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BranchId(pub(crate) usize);

/// An edge connecting a child node to one of its parents.
///
/// `up` is the child (earlier row), `down` the parent (later row). The same
/// value is stored on both endpoints; edges reference nodes by id only and
/// never own them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub up: NodeId,
    pub down: NodeId,
    pub branch: BranchId,
}
