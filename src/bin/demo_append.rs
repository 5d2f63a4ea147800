use anyhow::Result;

use revgraph::{append_to_graph, build_graph, Commit, Graph, NodeKind, RowBatchBuilder};

fn commit(hash: &str, parents: &[&str]) -> Commit {
    Commit::new(hash.into(), parents.iter().map(|&p| p.into()).collect())
}

fn print_graph(graph: &Graph) {
    for row in graph.rows() {
        let cells: Vec<String> = row
            .nodes()
            .iter()
            .map(|&id| {
                let node = graph.node(id);
                let mark = match node.kind() {
                    NodeKind::Commit => '*',
                    NodeKind::Edge => '|',
                    NodeKind::Boundary => '?',
                };
                format!("{}{}", mark, node.hash())
            })
            .collect();
        println!("{:>3}  {}", row.index(), cells.join("  "));
    }
    println!();
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("revgraph append demo");
    println!("====================\n");

    // first page of a history with a merge near the top
    let page_one = vec![
        commit("e4f5a6", &["d3e4f5", "c2d3e4"]),
        commit("d3e4f5", &["b1c2d3"]),
    ];
    let mut builder = RowBatchBuilder;
    let mut graph = build_graph(&mut builder, &page_one)?;

    for c in &page_one {
        if c.is_merge() {
            println!("merge commit: {}", c.hash);
        }
    }
    println!("after the first page (open tail):");
    print_graph(&graph);

    // the rest of the history pages in
    let page_two = vec![
        commit("c2d3e4", &["b1c2d3"]),
        commit("b1c2d3", &["a0b1c2"]),
    ];
    append_to_graph(&mut graph, &mut builder, &page_two)?;
    println!("after the second page (still open):");
    print_graph(&graph);

    let page_three = vec![commit("a0b1c2", &[])];
    append_to_graph(&mut graph, &mut builder, &page_three)?;
    for c in &page_three {
        if c.is_root() {
            println!("root commit: {}", c.hash);
        }
    }
    println!("after the final page (closed):");
    print_graph(&graph);

    Ok(())
}
