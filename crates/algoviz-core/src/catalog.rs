//! Catalog of runnable algorithms and their complexity figures.

use serde::{Deserialize, Serialize};

use crate::graph::TraversalKind;
use crate::sequence::{SearchKind, SortKind};

/// Algorithm family. Decides which data a run operates on and how stop
/// resets the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Sorting and searching over the sequence.
    Sequence,
    /// Traversals over the graph.
    Graph,
    /// Huffman coding and fractional knapsack.
    Greedy,
}

/// Every kind of run the engine can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
    Linear,
    Binary,
    Jump,
    Bfs,
    Dfs,
    Huffman,
    Knapsack,
}

/// Asymptotic cost of an algorithm, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Complexity {
    pub name: &'static str,
    pub best: &'static str,
    pub average: &'static str,
    pub worst: &'static str,
    pub space: &'static str,
}

impl RunKind {
    /// All run kinds, in menu order.
    pub const ALL: [RunKind; 12] = [
        RunKind::Bubble,
        RunKind::Selection,
        RunKind::Insertion,
        RunKind::Merge,
        RunKind::Quick,
        RunKind::Linear,
        RunKind::Binary,
        RunKind::Jump,
        RunKind::Bfs,
        RunKind::Dfs,
        RunKind::Huffman,
        RunKind::Knapsack,
    ];

    /// The family this run belongs to.
    pub const fn family(self) -> Family {
        match self {
            RunKind::Bubble
            | RunKind::Selection
            | RunKind::Insertion
            | RunKind::Merge
            | RunKind::Quick
            | RunKind::Linear
            | RunKind::Binary
            | RunKind::Jump => Family::Sequence,
            RunKind::Bfs | RunKind::Dfs => Family::Graph,
            RunKind::Huffman | RunKind::Knapsack => Family::Greedy,
        }
    }

    /// Complexity figures shown next to the visualization.
    pub const fn complexity(self) -> Complexity {
        const fn c(
            name: &'static str,
            best: &'static str,
            average: &'static str,
            worst: &'static str,
            space: &'static str,
        ) -> Complexity {
            Complexity { name, best, average, worst, space }
        }

        match self {
            RunKind::Bubble => c("Bubble Sort", "O(n)", "O(n²)", "O(n²)", "O(1)"),
            RunKind::Selection => c("Selection Sort", "O(n²)", "O(n²)", "O(n²)", "O(1)"),
            RunKind::Insertion => c("Insertion Sort", "O(n)", "O(n²)", "O(n²)", "O(1)"),
            RunKind::Merge => c("Merge Sort", "O(n log n)", "O(n log n)", "O(n log n)", "O(n)"),
            RunKind::Quick => c("Quick Sort", "O(n log n)", "O(n log n)", "O(n²)", "O(log n)"),
            RunKind::Linear => c("Linear Search", "O(1)", "O(n)", "O(n)", "O(1)"),
            RunKind::Binary => c("Binary Search", "O(1)", "O(log n)", "O(log n)", "O(1)"),
            RunKind::Jump => c("Jump Search", "O(1)", "O(√n)", "O(√n)", "O(1)"),
            RunKind::Bfs => c("Breadth-First Search", "O(V + E)", "O(V + E)", "O(V + E)", "O(V)"),
            RunKind::Dfs => c("Depth-First Search", "O(V + E)", "O(V + E)", "O(V + E)", "O(V)"),
            RunKind::Huffman => c("Huffman Coding", "O(n log n)", "O(n log n)", "O(n log n)", "O(n)"),
            RunKind::Knapsack => {
                c("Fractional Knapsack", "O(n log n)", "O(n log n)", "O(n log n)", "O(n)")
            }
        }
    }
}

impl std::fmt::Display for RunKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.complexity().name)
    }
}

impl From<SortKind> for RunKind {
    fn from(kind: SortKind) -> Self {
        match kind {
            SortKind::Bubble => RunKind::Bubble,
            SortKind::Selection => RunKind::Selection,
            SortKind::Insertion => RunKind::Insertion,
            SortKind::Merge => RunKind::Merge,
            SortKind::Quick => RunKind::Quick,
        }
    }
}

impl From<SearchKind> for RunKind {
    fn from(kind: SearchKind) -> Self {
        match kind {
            SearchKind::Linear => RunKind::Linear,
            SearchKind::Binary => RunKind::Binary,
            SearchKind::Jump => RunKind::Jump,
        }
    }
}

impl From<TraversalKind> for RunKind {
    fn from(kind: TraversalKind) -> Self {
        match kind {
            TraversalKind::Bfs => RunKind::Bfs,
            TraversalKind::Dfs => RunKind::Dfs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_partition_the_catalog() {
        let count = |family| RunKind::ALL.iter().filter(|k| k.family() == family).count();
        assert_eq!(count(Family::Sequence), 8);
        assert_eq!(count(Family::Graph), 2);
        assert_eq!(count(Family::Greedy), 2);
    }

    #[test]
    fn display_uses_catalog_name() {
        assert_eq!(RunKind::Quick.to_string(), "Quick Sort");
        assert_eq!(RunKind::Bfs.to_string(), "Breadth-First Search");
    }

    #[test]
    fn kinds_serialize_snake_case() {
        let json = serde_json::to_string(&RunKind::Knapsack).unwrap();
        assert_eq!(json, "\"knapsack\"");
        let parsed: RunKind = serde_json::from_str("\"dfs\"").unwrap();
        assert_eq!(parsed, RunKind::Dfs);
    }

    #[test]
    fn narrow_kinds_widen() {
        assert_eq!(RunKind::from(SortKind::Merge), RunKind::Merge);
        assert_eq!(RunKind::from(SearchKind::Jump), RunKind::Jump);
        assert_eq!(RunKind::from(TraversalKind::Dfs), RunKind::Dfs);
    }
}
