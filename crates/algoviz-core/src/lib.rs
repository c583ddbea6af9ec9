//! Algoviz Core - Step-by-Step Algorithm Animation
//!
//! Runs classic algorithms one observable step at a time, pausing between
//! steps so a frontend can draw each state, while staying pausable,
//! resumable and stoppable mid-run.
//!
//! # Architecture
//!
//! - **Control**: Run state (running/paused/stopped), a generation id per run, and the live step delay
//! - **Pacer**: The only suspension point; polls the controller every 10ms
//! - **Port**: Algorithms emit [`Frame`]s; implementations draw or forward them
//! - **Sequence**: Bubble, selection, insertion, merge and quick sort; linear, binary and jump search
//! - **Graph**: Random connected graphs, BFS and DFS with path reconstruction
//! - **Greedy**: Huffman coding and fractional knapsack
//! - **Visualizer**: Session owning the data runs mutate; runs start from a [`RunRequest`]
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use algoviz_core::{FrameLog, SortKind, VisConfig, Visualizer};
//!
//! # async fn demo() -> algoviz_core::Result<()> {
//! let frames = Arc::new(FrameLog::new());
//! let mut vis = Visualizer::new(VisConfig::default(), frames.clone())?;
//! vis.run_sort(SortKind::Merge).await?;
//! println!("{} frames", frames.len());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod context;
pub mod control;
pub mod error;
pub mod graph;
pub mod greedy;
pub mod pacer;
pub mod port;
pub mod request;
pub mod sequence;
mod visualizer;

pub use catalog::{Complexity, Family, RunKind};
pub use config::VisConfig;
pub use context::RunContext;
pub use control::{ControlStatus, RunController, RunState, RunToken};
pub use error::{Cancelled, Error, Result};
pub use graph::{Edge, Graph, GraphNode, NodeTag, PathOutcome, Traversal, TraversalKind};
pub use greedy::{HuffmanNode, HuffmanTree, KnapsackItem, KnapsackSolution, Selection};
pub use port::{Emphasis, Frame, FrameLog, NullPort, RenderPort};
pub use request::RunRequest;
pub use sequence::{SearchKind, SortKind};
pub use visualizer::Visualizer;
