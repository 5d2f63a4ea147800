pub mod batch;

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::core::{Commit, CommitHash, Graph, NodeId, NodeKind, Row};
use crate::error::{GraphError, Result};

pub use batch::{BatchBuilder, RowBatchBuilder};

/// How the graph's last row ends
enum Tail {
    /// On a concrete commit; the next batch starts on a fresh row
    Closed,
    /// On unexpanded boundary markers that must seed the next batch
    Open,
}

/// Build a fresh graph from the first page of history.
///
/// Incremental append requires at least one attached row; this is the
/// initialization path that establishes it.
pub fn build_graph<B: BatchBuilder>(builder: &mut B, commits: &[Commit]) -> Result<Graph> {
    if commits.is_empty() {
        return Err(GraphError::EmptyBatch);
    }
    let mut graph = Graph::new();
    simple_append(&mut graph, builder, commits, Row::new(0), HashMap::new())?;
    Ok(graph)
}

/// Extend the graph with the next page of history.
///
/// A closed tail gets a fresh row with no carried-over state. An open tail
/// is resolved into seeds first: its row is detached, every boundary marker
/// becomes (or produces) the node the matching commit will continue from,
/// and the batch is built starting at the detached row's index. Nothing is
/// mutated on any error path.
pub fn append_to_graph<B: BatchBuilder>(
    graph: &mut Graph,
    builder: &mut B,
    commits: &[Commit],
) -> Result<()> {
    if commits.is_empty() {
        return Err(GraphError::EmptyBatch);
    }
    let (last_index, tail) = {
        let last = graph.last_row().ok_or(GraphError::EmptyGraph)?;
        (last.index(), classify_tail(graph, last)?)
    };
    match tail {
        Tail::Closed => {
            debug!(batch = commits.len(), row = last_index + 1, "append on closed tail");
            simple_append(graph, builder, commits, Row::new(last_index + 1), HashMap::new())
        }
        Tail::Open => {
            debug!(batch = commits.len(), row = last_index, "append on open tail");
            let seeds = fix_boundary_nodes(graph, &commits[0].hash)?;
            let row = graph.detach_last_row().ok_or(GraphError::EmptyGraph)?;
            simple_append(graph, builder, commits, row, seeds)
        }
    }
}

fn classify_tail(graph: &Graph, last: &Row) -> Result<Tail> {
    let has_commit = last
        .nodes()
        .iter()
        .any(|&id| graph.node(id).kind() == NodeKind::Commit);
    if has_commit {
        if last.nodes().len() == 1 {
            Ok(Tail::Closed)
        } else {
            Err(GraphError::MalformedTail(
                "commit node alongside other nodes".into(),
            ))
        }
    } else {
        Ok(Tail::Open)
    }
}

/// Resolve every boundary marker in the last row into a seed for the next
/// batch, keyed by commit hash.
///
/// Single-line continuations are reused as-is, as is a converged marker
/// whose hash is the batch's first commit. Any other converged marker stays
/// behind as a pass-through node while a fresh marker carries its line
/// forward; that keeps the convergence point intact and the hash still
/// matchable by later commits.
fn fix_boundary_nodes(
    graph: &mut Graph,
    first_hash: &CommitHash,
) -> Result<HashMap<CommitHash, NodeId>> {
    let row_nodes: Vec<NodeId> = match graph.last_row() {
        Some(row) => row.nodes().to_vec(),
        None => return Err(GraphError::EmptyGraph),
    };

    // validate the whole row before touching anything
    for &id in &row_nodes {
        let kind = graph.node(id).kind();
        if kind != NodeKind::Boundary {
            return Err(GraphError::MalformedTail(format!(
                "unexpected {kind:?} node in open tail"
            )));
        }
    }

    let mut seeds = HashMap::with_capacity(row_nodes.len());
    let mut retained = Vec::new();
    for &id in &row_nodes {
        let node = graph.node(id);
        let hash = node.hash().clone();
        if node.up_edges().len() > 1 && hash != *first_hash {
            // split: several placed lines converge here, but the commit is
            // not next in the batch
            trace!(%hash, "splitting converged boundary marker");
            let branch = node.branch();
            graph.node_mut(id).retype_to_edge();
            let fresh = graph.new_node(hash.clone(), branch, NodeKind::Boundary);
            graph.create_usual_edge(id, fresh, branch);
            retained.push(id);
            seeds.insert(hash, fresh);
        } else {
            // continuation, or convergence straight onto the first commit
            trace!(%hash, "reusing boundary marker as seed");
            seeds.insert(hash, id);
        }
    }

    if let Some(row) = graph.last_row_mut() {
        row.set_nodes(retained);
    }
    Ok(seeds)
}

/// Hand one batch to the builder: every commit gets the absolute row index
/// `first_row.index() + offset`.
fn simple_append<B: BatchBuilder>(
    graph: &mut Graph,
    builder: &mut B,
    commits: &[Commit],
    first_row: Row,
    seeds: HashMap<CommitHash, NodeId>,
) -> Result<()> {
    let start = first_row.index();
    let mut row_index_of = HashMap::with_capacity(commits.len());
    for (offset, commit) in commits.iter().enumerate() {
        row_index_of.insert(commit.hash.clone(), start + offset);
    }
    builder.construct_batch(
        start + commits.len() - 1,
        &row_index_of,
        graph,
        seeds,
        first_row,
        commits,
    )
}
