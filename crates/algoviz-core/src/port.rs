//! Rendering port: the narrow interface between algorithms and whatever
//! draws them.
//!
//! Algorithms never draw. They emit [`Frame`]s, each a complete description
//! of what the surface should show next. Implementations decide what to do
//! with them: a browser bridge, a terminal, or a log for tests.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::graph::{Edge, GraphNode};
use crate::greedy::{HuffmanNode, KnapsackItem, Selection};

/// How highlighted sequence elements should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    /// Nothing in particular.
    Neutral,
    /// Elements being compared or a range being considered.
    Compare,
    /// Elements just written or swapped.
    Write,
    /// The position a search is inspecting.
    Probe,
    /// The element a search found.
    Found,
    /// A search ended without a match.
    Missing,
    /// The run finished.
    Done,
}

/// One message to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Frame {
    /// Current sequence with some indices highlighted.
    Sequence {
        values: Vec<f64>,
        highlighted: Vec<usize>,
        emphasis: Emphasis,
    },

    /// Current graph, each node carrying its display tag.
    Graph {
        nodes: Vec<GraphNode>,
        edges: Vec<Edge>,
    },

    /// Transient status line.
    Message { text: String },

    /// Blank surface.
    Clear,

    /// Symbol frequencies counted from the Huffman input, in priority order.
    Frequencies { table: Vec<(char, usize)> },

    /// Two lowest-count nodes combined into a new internal node.
    Merge {
        left: usize,
        right: usize,
        combined: usize,
    },

    /// The finished Huffman tree; `path` highlights the nodes along a code.
    HuffmanTree {
        root: HuffmanNode,
        path: Option<String>,
    },

    /// Final code table, sorted by symbol.
    HuffmanCodes { codes: Vec<(char, String)> },

    /// Fractional knapsack result.
    Knapsack {
        items: Vec<KnapsackItem>,
        taken: Vec<Selection>,
        total_value: f64,
        capacity: f64,
        capacity_used: f64,
    },
}

/// Sink for frames.
///
/// Called from inside runs, so implementations must not block for long.
pub trait RenderPort: Send + Sync {
    /// Deliver one frame.
    fn emit(&self, frame: Frame);

    /// Draw the sequence.
    fn render_sequence(&self, values: &[f64], highlighted: &[usize], emphasis: Emphasis) {
        self.emit(Frame::Sequence {
            values: values.to_vec(),
            highlighted: highlighted.to_vec(),
            emphasis,
        });
    }

    /// Draw the graph.
    fn render_graph(&self, nodes: &[GraphNode], edges: &[Edge]) {
        self.emit(Frame::Graph {
            nodes: nodes.to_vec(),
            edges: edges.to_vec(),
        });
    }

    /// Show a status line.
    fn render_message(&self, text: &str) {
        self.emit(Frame::Message {
            text: text.to_string(),
        });
    }

    /// Blank the surface.
    fn clear(&self) {
        self.emit(Frame::Clear);
    }
}

/// Port that drops every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPort;

impl RenderPort for NullPort {
    fn emit(&self, _frame: Frame) {}
}

/// Port that records every frame in order.
#[derive(Debug, Default)]
pub struct FrameLog {
    frames: Mutex<Vec<Frame>>,
}

impl FrameLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every frame recorded so far.
    pub fn frames(&self) -> Vec<Frame> {
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of frames recorded so far.
    pub fn len(&self) -> usize {
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most recent frame, if any.
    pub fn last(&self) -> Option<Frame> {
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .last()
            .cloned()
    }

    /// Texts of every recorded message frame.
    pub fn messages(&self) -> Vec<String> {
        self.frames()
            .into_iter()
            .filter_map(|frame| match frame {
                Frame::Message { text } => Some(text),
                _ => None,
            })
            .collect()
    }
}

impl RenderPort for FrameLog {
    fn emit(&self, frame: Frame) {
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_records_in_order() {
        let log = FrameLog::new();
        log.render_sequence(&[3.0, 1.0], &[0, 1], Emphasis::Compare);
        log.render_message("hello");
        log.clear();

        let frames = log.frames();
        assert_eq!(frames.len(), 3);
        assert!(matches!(frames[0], Frame::Sequence { emphasis: Emphasis::Compare, .. }));
        assert_eq!(log.messages(), vec!["hello".to_string()]);
        assert_eq!(log.last(), Some(Frame::Clear));
    }

    #[test]
    fn frames_are_tagged_by_type() {
        let frame = Frame::Message {
            text: "No path found!".into(),
        };
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"type\":\"Message\""));

        let parsed: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn null_port_accepts_everything() {
        let port = NullPort;
        port.render_message("ignored");
        port.clear();
    }
}
