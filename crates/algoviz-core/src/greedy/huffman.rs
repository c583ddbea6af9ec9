//! Huffman tree construction and code assignment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::context::RunContext;
use crate::error::{Error, Result};
use crate::port::Frame;

/// A node of a Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HuffmanNode {
    Leaf {
        symbol: char,
        frequency: usize,
    },
    Internal {
        frequency: usize,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    /// Combined count of every symbol under this node.
    pub fn frequency(&self) -> usize {
        match self {
            HuffmanNode::Leaf { frequency, .. } | HuffmanNode::Internal { frequency, .. } => {
                *frequency
            }
        }
    }

    /// Height of the subtree; a lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 0,
            HuffmanNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn assign(&self, prefix: &mut String, codes: &mut BTreeMap<char, String>) {
        match self {
            HuffmanNode::Leaf { symbol, .. } => {
                let code = if prefix.is_empty() { "0".to_string() } else { prefix.clone() };
                codes.insert(*symbol, code);
            }
            HuffmanNode::Internal { left, right, .. } => {
                prefix.push('0');
                left.assign(prefix, codes);
                prefix.pop();

                prefix.push('1');
                right.assign(prefix, codes);
                prefix.pop();
            }
        }
    }
}

/// One combination of the two lowest-count nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStep {
    pub left: usize,
    pub right: usize,
    pub combined: usize,
}

/// A built tree together with how it was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuffmanTree {
    root: HuffmanNode,
    frequencies: Vec<(char, usize)>,
    merges: Vec<MergeStep>,
}

impl HuffmanTree {
    /// Count symbols in `text` and build the tree.
    ///
    /// The priority list starts in ascending count order, ties kept in first
    /// occurrence order. Each round takes the two front nodes and reinserts
    /// their parent ahead of the first strictly larger count.
    pub fn build(text: &str) -> Result<Self> {
        let mut frequencies: Vec<(char, usize)> = Vec::new();
        for symbol in text.chars() {
            match frequencies.iter_mut().find(|(s, _)| *s == symbol) {
                Some((_, count)) => *count += 1,
                None => frequencies.push((symbol, 1)),
            }
        }
        if frequencies.is_empty() {
            return Err(Error::invalid("Huffman text must not be empty"));
        }
        frequencies.sort_by_key(|&(_, count)| count);

        let mut queue: Vec<HuffmanNode> = frequencies
            .iter()
            .map(|&(symbol, frequency)| HuffmanNode::Leaf { symbol, frequency })
            .collect();
        let mut merges = Vec::with_capacity(queue.len().saturating_sub(1));

        while queue.len() > 1 {
            let left = queue.remove(0);
            let right = queue.remove(0);
            let combined = left.frequency() + right.frequency();
            merges.push(MergeStep {
                left: left.frequency(),
                right: right.frequency(),
                combined,
            });

            let parent = HuffmanNode::Internal {
                frequency: combined,
                left: Box::new(left),
                right: Box::new(right),
            };
            let at = queue
                .iter()
                .position(|node| node.frequency() > combined)
                .unwrap_or(queue.len());
            queue.insert(at, parent);
        }

        let root = queue
            .pop()
            .ok_or_else(|| Error::invalid("Huffman text must not be empty"))?;
        Ok(Self {
            root,
            frequencies,
            merges,
        })
    }

    /// The root node.
    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    /// Symbol counts in initial priority order.
    pub fn frequencies(&self) -> &[(char, usize)] {
        &self.frequencies
    }

    /// Merges in the order they happened.
    pub fn merges(&self) -> &[MergeStep] {
        &self.merges
    }

    /// Code per symbol: '0' for left, '1' for right.
    pub fn codes(&self) -> BTreeMap<char, String> {
        let mut codes = BTreeMap::new();
        self.root.assign(&mut String::new(), &mut codes);
        codes
    }

    /// Total encoded length in bits.
    pub fn encoded_bits(&self) -> usize {
        let codes = self.codes();
        self.frequencies
            .iter()
            .map(|(symbol, count)| count * codes.get(symbol).map_or(0, String::len))
            .sum()
    }

    /// Replay the build: frequency table, merges, the finished tree, each
    /// code's path through it, and the code table.
    pub async fn present(&self, ctx: &RunContext) {
        let port = ctx.port();

        port.clear();
        port.emit(Frame::Frequencies {
            table: self.frequencies.clone(),
        });
        ctx.hold(ctx.step() * 2).await;

        for merge in &self.merges {
            port.emit(Frame::Merge {
                left: merge.left,
                right: merge.right,
                combined: merge.combined,
            });
            ctx.hold(ctx.step() * 2).await;
        }

        port.emit(Frame::HuffmanTree {
            root: self.root.clone(),
            path: None,
        });
        ctx.hold(ctx.step()).await;

        let codes: Vec<(char, String)> = self.codes().into_iter().collect();
        for (_, code) in &codes {
            for end in 0..code.len() {
                port.emit(Frame::HuffmanTree {
                    root: self.root.clone(),
                    path: Some(code[..end].to_string()),
                });
                ctx.hold(ctx.step() / 2).await;
            }
        }

        port.emit(Frame::HuffmanCodes { codes });
        ctx.hold(ctx.step() * 2).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RunKind;
    use crate::control::RunController;
    use crate::port::FrameLog;
    use std::sync::Arc;
    use std::time::Duration;

    fn is_prefix_free(codes: &BTreeMap<char, String>) -> bool {
        codes.values().all(|a| {
            codes
                .values()
                .filter(|b| *b != a)
                .all(|b| !b.starts_with(a.as_str()))
        })
    }

    #[test]
    fn most_frequent_symbol_gets_shortest_code() {
        let tree = HuffmanTree::build("aaaabbbcc").unwrap();
        let codes = tree.codes();

        assert_eq!(codes.len(), 3);
        assert_eq!(codes[&'a'].len(), 1);
        assert!(codes[&'b'].len() >= codes[&'a'].len());
        assert!(is_prefix_free(&codes));
        // a=4×1 + b=3×2 + c=2×2
        assert_eq!(tree.encoded_bits(), 14);
    }

    #[test]
    fn frequencies_sorted_with_stable_ties() {
        let tree = HuffmanTree::build("abcab").unwrap();
        assert_eq!(tree.frequencies(), &[('c', 1), ('a', 2), ('b', 2)]);
    }

    #[test]
    fn merges_reinsert_after_equal_counts() {
        // c:1 a:2 b:2 → merge c+a=3, queue [b:2, 3]; merge b+3=5.
        let tree = HuffmanTree::build("abcab").unwrap();
        assert_eq!(
            tree.merges(),
            &[
                MergeStep { left: 1, right: 2, combined: 3 },
                MergeStep { left: 2, right: 3, combined: 5 },
            ]
        );
        assert_eq!(tree.root().frequency(), 5);
        assert_eq!(tree.root().depth(), 2);
    }

    #[test]
    fn single_symbol_gets_code_zero() {
        let tree = HuffmanTree::build("zzzz").unwrap();
        assert!(tree.merges().is_empty());
        assert_eq!(tree.codes().get(&'z').map(String::as_str), Some("0"));
        assert_eq!(tree.encoded_bits(), 4);
    }

    #[test]
    fn empty_text_rejected() {
        assert!(matches!(HuffmanTree::build(""), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn tree_round_trips_through_json() {
        let tree = HuffmanTree::build("hello huffman").unwrap();
        let json = serde_json::to_string(tree.root()).unwrap();
        assert!(json.contains("\"kind\":\"internal\""));
        let parsed: HuffmanNode = serde_json::from_str(&json).unwrap();
        assert_eq!(&parsed, tree.root());
    }

    #[tokio::test(start_paused = true)]
    async fn presentation_runs_to_completion_after_stop() {
        let control = Arc::new(RunController::new());
        control.set_step(Duration::from_millis(100));
        let log = Arc::new(FrameLog::new());
        let ctx = RunContext::start(control.clone(), RunKind::Huffman, log.clone());
        let tree = HuffmanTree::build("aab").unwrap();
        control.stop();

        tree.present(&ctx).await;

        let frames = log.frames();
        assert_eq!(frames.first(), Some(&Frame::Clear));
        assert!(matches!(frames.last(), Some(Frame::HuffmanCodes { codes }) if codes.len() == 2));
        let merges = frames.iter().filter(|f| matches!(f, Frame::Merge { .. })).count();
        assert_eq!(merges, 1);
    }
}
