use std::collections::HashMap;

use tracing::trace;

use crate::core::{Commit, CommitHash, Graph, NodeId, NodeKind, Row};
use crate::error::Result;

/// Materializes rows, nodes and edges for one batch of commits.
///
/// Contract: exactly one commit node per input commit, placed in ascending
/// rows starting with `first_row`; parent links are created fresh or reused
/// from `seeds`, with new boundary markers for parents that do not resolve
/// within the batch; every seed ends up as the upward continuation of the
/// commit node carrying its hash. Whether the graph ends the batch with a
/// closed or an open tail is decided here, not by the caller.
pub trait BatchBuilder {
    fn construct_batch(
        &mut self,
        last_row_index: usize,
        row_index_of: &HashMap<CommitHash, usize>,
        graph: &mut Graph,
        seeds: HashMap<CommitHash, NodeId>,
        first_row: Row,
        commits: &[Commit],
    ) -> Result<()>;
}

/// Boundary markers whose commits have not been placed yet, kept in the
/// order their lines were opened.
struct PendingNodes {
    by_hash: HashMap<CommitHash, NodeId>,
    order: Vec<CommitHash>,
}

impl PendingNodes {
    fn new(seeds: HashMap<CommitHash, NodeId>) -> Self {
        // seeds arrive as a map; node creation order recovers the order the
        // lines were opened in
        let mut order: Vec<CommitHash> = seeds.keys().cloned().collect();
        order.sort_by_key(|hash| seeds[hash]);
        Self {
            by_hash: seeds,
            order,
        }
    }

    fn take(&mut self, hash: &CommitHash) -> Option<NodeId> {
        self.by_hash.remove(hash)
    }

    fn get(&self, hash: &CommitHash) -> Option<NodeId> {
        self.by_hash.get(hash).copied()
    }

    fn insert(&mut self, hash: CommitHash, id: NodeId) {
        self.by_hash.insert(hash.clone(), id);
        self.order.push(hash);
    }

    fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    fn drain(self) -> impl Iterator<Item = NodeId> {
        let PendingNodes { mut by_hash, order } = self;
        order.into_iter().filter_map(move |hash| by_hash.remove(&hash))
    }
}

/// Default row/edge builder: one row per commit, long edges between commit
/// rows, open lines closed off as a trailing row of boundary markers.
#[derive(Debug, Default)]
pub struct RowBatchBuilder;

impl BatchBuilder for RowBatchBuilder {
    fn construct_batch(
        &mut self,
        last_row_index: usize,
        row_index_of: &HashMap<CommitHash, usize>,
        graph: &mut Graph,
        seeds: HashMap<CommitHash, NodeId>,
        first_row: Row,
        commits: &[Commit],
    ) -> Result<()> {
        let mut pending = PendingNodes::new(seeds);
        let mut row = first_row;

        for commit in commits {
            debug_assert_eq!(row_index_of.get(&commit.hash), Some(&row.index()));

            let node = match pending.take(&commit.hash) {
                Some(id) => {
                    graph.node_mut(id).promote_to_commit();
                    id
                }
                None => {
                    let branch = graph.new_branch();
                    graph.new_node(commit.hash.clone(), branch, NodeKind::Commit)
                }
            };
            trace!(hash = %commit.hash, row = row.index(), merge = commit.is_merge(), "placing commit");
            row.push(node);
            let next_index = row.index() + 1;
            graph.attach_row(row);
            row = Row::new(next_index);

            for (i, parent) in commit.parents.iter().enumerate() {
                // the first parent continues the commit's line, later
                // parents open lines of their own
                let branch = if i == 0 {
                    graph.node(node).branch()
                } else {
                    graph.new_branch()
                };
                let parent_node = match pending.get(parent) {
                    Some(id) => id,
                    None => {
                        let within_batch = row_index_of.contains_key(parent);
                        trace!(parent = %parent, within_batch, "opening boundary line");
                        let id = graph.new_node(parent.clone(), branch, NodeKind::Boundary);
                        pending.insert(parent.clone(), id);
                        id
                    }
                };
                graph.create_usual_edge(node, parent_node, branch);
            }
        }

        // lines still open after the last commit close the batch as a row of
        // boundary markers
        if !pending.is_empty() {
            debug_assert_eq!(row.index(), last_row_index + 1);
            for id in pending.drain() {
                row.push(id);
            }
            graph.attach_row(row);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::append::build_graph;
    use crate::core::Node;

    fn commit(hash: &str, parents: &[&str]) -> Commit {
        Commit::new(hash.into(), parents.iter().map(|&p| p.into()).collect())
    }

    fn tail_nodes<'g>(graph: &'g Graph) -> Vec<&'g Node> {
        graph
            .last_row()
            .unwrap()
            .nodes()
            .iter()
            .map(|&id| graph.node(id))
            .collect()
    }

    #[test]
    fn linear_history_closes_the_tail() {
        let mut builder = RowBatchBuilder;
        let commits = vec![commit("ccc", &["bbb"]), commit("bbb", &["aaa"]), commit("aaa", &[])];
        let graph = build_graph(&mut builder, &commits).unwrap();

        assert_eq!(graph.row_count(), 3);
        for (i, row) in graph.rows().iter().enumerate() {
            assert_eq!(row.index(), i);
            assert_eq!(row.nodes().len(), 1);
        }
        let tail = tail_nodes(&graph);
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].kind(), NodeKind::Commit);
        assert_eq!(tail[0].hash().as_str(), "aaa");
    }

    #[test]
    fn truncated_history_leaves_an_open_tail() {
        let mut builder = RowBatchBuilder;
        let commits = vec![commit("ccc", &["bbb"]), commit("bbb", &["aaa"])];
        let graph = build_graph(&mut builder, &commits).unwrap();

        // two commit rows plus the trailing boundary row
        assert_eq!(graph.row_count(), 3);
        let tail = tail_nodes(&graph);
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].kind(), NodeKind::Boundary);
        assert_eq!(tail[0].hash().as_str(), "aaa");
    }

    #[test]
    fn merge_commit_opens_one_line_per_parent() {
        let mut builder = RowBatchBuilder;
        let commits = vec![commit("mmm", &["aaa", "bbb"])];
        let graph = build_graph(&mut builder, &commits).unwrap();

        assert_eq!(graph.row_count(), 2);
        let merge = graph.node(graph.rows()[0].nodes()[0]);
        assert_eq!(merge.down_edges().len(), 2);
        // first parent continues the merge's own line
        assert_eq!(merge.down_edges()[0].branch, merge.branch());
        assert_ne!(merge.down_edges()[1].branch, merge.branch());

        let tail = tail_nodes(&graph);
        let hashes: Vec<&str> = tail.iter().map(|n| n.hash().as_str()).collect();
        assert_eq!(hashes, ["aaa", "bbb"]);
    }

    #[test]
    fn pending_marker_is_promoted_in_place() {
        let mut builder = RowBatchBuilder;
        let commits = vec![commit("bbb", &["aaa"]), commit("aaa", &[])];
        let graph = build_graph(&mut builder, &commits).unwrap();

        // the boundary marker opened for "aaa" became its commit node, no
        // second node was allocated for the hash
        assert_eq!(graph.node_count(), 2);
        let child = graph.node(graph.rows()[0].nodes()[0]);
        let parent_id = child.down_edges()[0].down;
        assert_eq!(graph.rows()[1].nodes(), &[parent_id]);
        assert_eq!(graph.node(parent_id).kind(), NodeKind::Commit);
    }

    #[test]
    fn converging_lines_share_one_marker() {
        let mut builder = RowBatchBuilder;
        let commits = vec![commit("ccc", &["aaa"]), commit("bbb", &["aaa"])];
        let graph = build_graph(&mut builder, &commits).unwrap();

        let tail = tail_nodes(&graph);
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].hash().as_str(), "aaa");
        assert_eq!(tail[0].up_edges().len(), 2);
    }
}
