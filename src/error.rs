//! Error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Failures of the incremental append path.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Append was called with no commits; the graph is untouched.
    #[error("empty commit batch")]
    EmptyBatch,
    /// Append was called on a graph with no rows. Incremental append
    /// continues an existing graph, build one first.
    #[error("graph has no rows")]
    EmptyGraph,
    /// The last row is in a state incremental append cannot continue from.
    /// A previous operation broke the tail invariant; not recoverable.
    #[error("malformed last row: {0}")]
    MalformedTail(String),
}
