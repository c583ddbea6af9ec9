//! Greedy algorithms: Huffman coding and the fractional knapsack.
//!
//! Both are batch computations. The result is built in one go, then replayed
//! as a short presentation that runs to completion once started.

mod huffman;
mod knapsack;

pub use huffman::{HuffmanNode, HuffmanTree, MergeStep};
pub use knapsack::{random_items, KnapsackItem, KnapsackSolution, Selection};
