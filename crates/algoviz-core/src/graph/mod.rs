//! Undirected graphs laid out on a circle, and their traversals.
//!
//! # Generation
//!
//! A random graph has 6–8 nodes evenly spaced on a circle. Connectivity is
//! guaranteed by a spanning construction: starting from node 0, each round
//! scores every (visited, unvisited) pair with a fresh random weight and
//! attaches the cheapest one. Weights are drawn per candidate and never
//! stored. Afterwards ⌊n/2⌋ extra random edges are attempted; self-loops and
//! duplicates are skipped.

mod traversal;

pub use traversal::{bfs, dfs, reconstruct_path, PathOutcome, Traversal, TraversalKind};

use std::collections::VecDeque;
use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fewest nodes in a generated graph.
pub const MIN_NODES: usize = 6;

/// Most nodes in a generated graph.
pub const MAX_NODES: usize = 8;

/// Fraction of the surface's shorter side used as the layout radius.
const LAYOUT_RADIUS: f64 = 0.35;

/// Display state of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeTag {
    /// Untouched.
    #[default]
    Default,
    /// Traversal start.
    Source,
    /// Traversal goal.
    Destination,
    /// Discovered and waiting in the queue or stack.
    Frontier,
    /// Being expanded.
    Visiting,
    /// Fully expanded.
    Finished,
    /// On the reconstructed path.
    Path,
    /// Search ended without reaching the destination.
    Unreachable,
}

/// A node with its layout position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub tag: NodeTag,
}

/// An undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
}

/// A simple undirected graph with insertion-ordered adjacency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<usize>>,
}

impl Graph {
    /// `count` isolated nodes evenly spaced on a circle centred in a
    /// `width` × `height` surface.
    pub fn on_circle(count: usize, width: f64, height: f64) -> Self {
        let (cx, cy) = (width / 2.0, height / 2.0);
        let radius = width.min(height) * LAYOUT_RADIUS;

        let nodes = (0..count)
            .map(|id| {
                let angle = id as f64 * 2.0 * PI / count as f64;
                GraphNode {
                    id,
                    x: cx + radius * angle.cos(),
                    y: cy + radius * angle.sin(),
                    tag: NodeTag::Default,
                }
            })
            .collect();

        Self {
            nodes,
            edges: Vec::new(),
            adjacency: vec![Vec::new(); count],
        }
    }

    /// Build a graph from an explicit edge list.
    ///
    /// Rejects out-of-range endpoints and self-loops; duplicates are dropped.
    pub fn from_edges(count: usize, edges: &[(usize, usize)], width: f64, height: f64) -> Result<Self> {
        let mut graph = Self::on_circle(count, width, height);
        for &(from, to) in edges {
            if !graph.contains(from) || !graph.contains(to) {
                return Err(Error::invalid(format!(
                    "edge ({}, {}) outside nodes 0..{}",
                    from, to, count
                )));
            }
            if from == to {
                return Err(Error::invalid(format!("self-loop on node {}", from)));
            }
            graph.add_edge(from, to);
        }
        Ok(graph)
    }

    /// Random connected graph of [`MIN_NODES`]..=[`MAX_NODES`] nodes.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64) -> Self {
        let count = rng.gen_range(MIN_NODES..=MAX_NODES);
        Self::random_with(rng, count, width, height)
    }

    /// Random connected graph of exactly `count` nodes.
    pub fn random_with<R: Rng + ?Sized>(rng: &mut R, count: usize, width: f64, height: f64) -> Self {
        let mut graph = Self::on_circle(count, width, height);
        if count == 0 {
            return graph;
        }

        // Spanning construction.
        let mut visited = vec![0usize];
        let mut unvisited: Vec<usize> = (1..count).collect();
        while !unvisited.is_empty() {
            let mut best: Option<(usize, usize)> = None;
            let mut best_weight = f64::INFINITY;
            for &v in &visited {
                for slot in 0..unvisited.len() {
                    let weight: f64 = rng.gen();
                    if weight < best_weight {
                        best_weight = weight;
                        best = Some((v, slot));
                    }
                }
            }
            let Some((from, slot)) = best else { break };
            let to = unvisited.remove(slot);
            graph.add_edge(from, to);
            visited.push(to);
        }

        // Extra edges.
        for _ in 0..count / 2 {
            let from = rng.gen_range(0..count);
            let to = rng.gen_range(0..count);
            graph.add_edge(from, to);
        }

        graph
    }

    /// Add an undirected edge. Returns false for self-loops, duplicates and
    /// unknown endpoints.
    pub fn add_edge(&mut self, from: usize, to: usize) -> bool {
        if from == to || !self.contains(from) || !self.contains(to) {
            return false;
        }
        if self.adjacency[from].contains(&to) {
            return false;
        }
        self.edges.push(Edge { from, to });
        self.adjacency[from].push(to);
        self.adjacency[to].push(from);
        true
    }

    /// True if `id` names a node.
    pub fn contains(&self, id: usize) -> bool {
        id < self.nodes.len()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Neighbors of `id` in the order their edges were added.
    pub fn neighbors(&self, id: usize) -> &[usize] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Display tag of `id`.
    pub fn tag(&self, id: usize) -> Option<NodeTag> {
        self.nodes.get(id).map(|n| n.tag)
    }

    /// Set the display tag of `id`; unknown ids are ignored.
    pub fn set_tag(&mut self, id: usize, tag: NodeTag) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.tag = tag;
        }
    }

    /// Give every node the same tag.
    pub fn tag_all(&mut self, tag: NodeTag) {
        for node in &mut self.nodes {
            node.tag = tag;
        }
    }

    /// Return every node to [`NodeTag::Default`].
    pub fn reset_tags(&mut self) {
        self.tag_all(NodeTag::Default);
    }

    /// True if every node is reachable from node 0.
    pub fn is_connected(&self) -> bool {
        if self.nodes.is_empty() {
            return true;
        }
        let mut seen = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([0usize]);
        seen[0] = true;
        while let Some(current) = queue.pop_front() {
            for &next in self.neighbors(current) {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        seen.into_iter().all(|s| s)
    }

    /// Reject ids outside the graph.
    pub fn validate_node(&self, id: usize, role: &str) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else if self.nodes.is_empty() {
            Err(Error::invalid(format!("no graph to pick a {} node from", role)))
        } else {
            Err(Error::invalid(format!(
                "{} node must be between 0 and {}",
                role,
                self.nodes.len() - 1
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn circle_layout_is_centred() {
        let graph = Graph::on_circle(4, 800.0, 600.0);
        let radius = 600.0 * LAYOUT_RADIUS;

        let first = &graph.nodes()[0];
        assert!((first.x - (400.0 + radius)).abs() < 1e-9);
        assert!((first.y - 300.0).abs() < 1e-9);
        for node in graph.nodes() {
            let d = ((node.x - 400.0).powi(2) + (node.y - 300.0).powi(2)).sqrt();
            assert!((d - radius).abs() < 1e-9);
        }
    }

    #[test]
    fn add_edge_rejects_loops_and_duplicates() {
        let mut graph = Graph::on_circle(3, 100.0, 100.0);
        assert!(graph.add_edge(0, 1));
        assert!(!graph.add_edge(1, 0));
        assert!(!graph.add_edge(2, 2));
        assert!(!graph.add_edge(0, 9));
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0]);
    }

    #[test]
    fn from_edges_validates_endpoints() {
        assert!(Graph::from_edges(3, &[(0, 1), (1, 2)], 100.0, 100.0).is_ok());
        assert!(Graph::from_edges(3, &[(0, 3)], 100.0, 100.0).is_err());
        assert!(Graph::from_edges(3, &[(1, 1)], 100.0, 100.0).is_err());
    }

    #[test]
    fn random_graphs_are_connected_and_simple() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let graph = Graph::random(&mut rng, 800.0, 600.0);
            let n = graph.node_count();

            assert!((MIN_NODES..=MAX_NODES).contains(&n));
            assert!(graph.is_connected(), "seed {} disconnected", seed);
            // Spanning tree plus at most n/2 extras.
            assert!(graph.edges().len() >= n - 1);
            assert!(graph.edges().len() <= n - 1 + n / 2);

            for edge in graph.edges() {
                assert_ne!(edge.from, edge.to);
            }
            for id in 0..n {
                let mut seen = graph.neighbors(id).to_vec();
                seen.sort_unstable();
                seen.dedup();
                assert_eq!(seen.len(), graph.neighbors(id).len());
            }
        }
    }

    #[test]
    fn disconnected_graph_detected() {
        let graph = Graph::from_edges(4, &[(0, 1), (2, 3)], 100.0, 100.0).unwrap();
        assert!(!graph.is_connected());
    }

    #[test]
    fn tags_reset() {
        let mut graph = Graph::on_circle(3, 100.0, 100.0);
        graph.set_tag(1, NodeTag::Path);
        assert_eq!(graph.tag(1), Some(NodeTag::Path));
        graph.reset_tags();
        assert!(graph.nodes().iter().all(|n| n.tag == NodeTag::Default));
    }

    #[test]
    fn validate_node_range() {
        let graph = Graph::on_circle(6, 100.0, 100.0);
        assert!(graph.validate_node(5, "source").is_ok());
        let err = graph.validate_node(6, "destination").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: destination node must be between 0 and 5"
        );
    }
}
