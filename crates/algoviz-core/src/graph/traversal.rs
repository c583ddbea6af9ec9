//! Animated BFS and DFS with path reconstruction.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::{Graph, NodeTag};
use crate::context::RunContext;
use crate::error::Result;

/// The traversals on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalKind {
    Bfs,
    Dfs,
}

impl TraversalKind {
    /// Traverse `graph` from `source` looking for `destination`.
    pub async fn run(
        self,
        ctx: &RunContext,
        graph: &mut Graph,
        source: usize,
        destination: usize,
    ) -> Result<Traversal> {
        match self {
            TraversalKind::Bfs => bfs(ctx, graph, source, destination).await,
            TraversalKind::Dfs => dfs(ctx, graph, source, destination).await,
        }
    }
}

/// How a traversal ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PathOutcome {
    /// Destination reached; `path` runs from source to destination.
    Found { path: Vec<usize> },
    /// Frontier exhausted first.
    Unreachable,
}

impl PathOutcome {
    /// The path, if one was found.
    pub fn path(&self) -> Option<&[usize]> {
        match self {
            PathOutcome::Found { path } => Some(path),
            PathOutcome::Unreachable => None,
        }
    }

    /// True if a path was found.
    pub fn is_found(&self) -> bool {
        matches!(self, PathOutcome::Found { .. })
    }
}

/// Result of a traversal plus its bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traversal {
    pub outcome: PathOutcome,
    /// Nodes in the order they were expanded.
    pub visit_order: Vec<usize>,
    /// Clock value when each node was first expanded.
    pub discovery: Vec<Option<usize>>,
    /// Clock value when each node was finished.
    pub finish: Vec<Option<usize>>,
}

impl Traversal {
    fn new(node_count: usize) -> Self {
        Self {
            outcome: PathOutcome::Unreachable,
            visit_order: Vec::new(),
            discovery: vec![None; node_count],
            finish: vec![None; node_count],
        }
    }
}

/// Walk parent links back from `destination` to `source`.
pub fn reconstruct_path(parent: &[Option<usize>], source: usize, destination: usize) -> Vec<usize> {
    let mut path = Vec::new();
    let mut node = destination;
    while node != source {
        match parent.get(node).copied().flatten() {
            Some(previous) => {
                path.push(node);
                node = previous;
            }
            None => break,
        }
    }
    path.push(source);
    path.reverse();
    path
}

/// Reset tags, then mark the endpoints.
async fn prepare(ctx: &RunContext, graph: &mut Graph, source: usize, destination: usize) -> Result<()> {
    graph.reset_tags();
    ctx.show_graph(graph).await?;

    graph.set_tag(source, NodeTag::Source);
    if destination != source {
        graph.set_tag(destination, NodeTag::Destination);
    }
    ctx.show_graph(graph).await
}

/// Paint the path one node at a time and announce its length.
async fn reveal_path(ctx: &RunContext, graph: &mut Graph, path: &[usize]) -> Result<()> {
    for &node in path {
        graph.set_tag(node, NodeTag::Path);
        ctx.show_graph(graph).await?;
    }
    ctx.port()
        .render_message(&format!("Path found! Length: {}", path.len().saturating_sub(1)));
    Ok(())
}

fn report_unreachable(ctx: &RunContext, graph: &mut Graph) {
    graph.tag_all(NodeTag::Unreachable);
    ctx.port().render_graph(graph.nodes(), graph.edges());
    ctx.port().render_message("No path found!");
}

/// Breadth-first search. Nodes are marked visited when enqueued.
pub async fn bfs(
    ctx: &RunContext,
    graph: &mut Graph,
    source: usize,
    destination: usize,
) -> Result<Traversal> {
    graph.validate_node(source, "source")?;
    graph.validate_node(destination, "destination")?;

    let n = graph.node_count();
    let mut result = Traversal::new(n);
    let mut visited = vec![false; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut queue = VecDeque::from([source]);
    let mut clock = 0;
    visited[source] = true;

    prepare(ctx, graph, source, destination).await?;

    while let Some(current) = queue.pop_front() {
        ctx.check()?;
        result.discovery[current] = Some(clock);
        clock += 1;
        result.visit_order.push(current);

        graph.set_tag(current, NodeTag::Visiting);
        ctx.show_graph(graph).await?;

        if current == destination {
            let path = reconstruct_path(&parent, source, destination);
            reveal_path(ctx, graph, &path).await?;
            result.outcome = PathOutcome::Found { path };
            return Ok(result);
        }

        let neighbors = graph.neighbors(current).to_vec();
        for next in neighbors {
            if !visited[next] {
                visited[next] = true;
                parent[next] = Some(current);
                queue.push_back(next);

                graph.set_tag(next, NodeTag::Frontier);
                ctx.show_graph(graph).await?;
            }
        }

        result.finish[current] = Some(clock);
        clock += 1;
        if current != source {
            graph.set_tag(current, NodeTag::Finished);
            ctx.show_graph(graph).await?;
        }
    }

    report_unreachable(ctx, graph);
    Ok(result)
}

/// Depth-first search with an explicit stack.
///
/// A node counts as visited when it is first seen on top of the stack, not
/// when pushed. Neighbors go on in reverse adjacency order so the first
/// neighbor is explored first, as recursive DFS would.
pub async fn dfs(
    ctx: &RunContext,
    graph: &mut Graph,
    source: usize,
    destination: usize,
) -> Result<Traversal> {
    graph.validate_node(source, "source")?;
    graph.validate_node(destination, "destination")?;

    let n = graph.node_count();
    let mut result = Traversal::new(n);
    let mut visited = vec![false; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut stack = vec![source];
    let mut clock = 0;

    prepare(ctx, graph, source, destination).await?;

    while let Some(&current) = stack.last() {
        ctx.check()?;

        if visited[current] {
            if result.finish[current].is_none() {
                result.finish[current] = Some(clock);
                clock += 1;
                if current != source {
                    graph.set_tag(current, NodeTag::Finished);
                }
                ctx.show_graph(graph).await?;
            }
            stack.pop();
            continue;
        }

        visited[current] = true;
        result.discovery[current] = Some(clock);
        clock += 1;
        result.visit_order.push(current);

        graph.set_tag(current, NodeTag::Visiting);
        ctx.show_graph(graph).await?;

        if current == destination {
            let path = reconstruct_path(&parent, source, destination);
            reveal_path(ctx, graph, &path).await?;
            result.outcome = PathOutcome::Found { path };
            return Ok(result);
        }

        let neighbors: Vec<usize> = graph.neighbors(current).iter().rev().copied().collect();
        let mut pushed = false;
        for next in neighbors {
            if !visited[next] {
                stack.push(next);
                parent[next] = Some(current);
                pushed = true;

                graph.set_tag(next, NodeTag::Frontier);
                ctx.show_graph(graph).await?;
            }
        }

        if !pushed {
            result.finish[current] = Some(clock);
            clock += 1;
            if current != source {
                graph.set_tag(current, NodeTag::Finished);
            }
            ctx.show_graph(graph).await?;
            stack.pop();
        }
    }

    report_unreachable(ctx, graph);
    Ok(result)
}
