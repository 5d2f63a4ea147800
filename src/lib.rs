pub mod core;
pub mod append;
pub mod error;

pub use crate::core::{BranchId, Commit, CommitHash, Edge, Graph, Node, NodeId, NodeKind, Row};
pub use crate::append::{append_to_graph, build_graph, BatchBuilder, RowBatchBuilder};
pub use crate::error::{GraphError, Result};
