//! A run and its inputs as one value.
//!
//! Lets a caller start a run with [`crate::Visualizer::begin`] and drive it
//! later with [`crate::Visualizer::execute`], so the run is stoppable from
//! the moment it is accepted.

use crate::catalog::RunKind;
use crate::error::{Error, Result};
use crate::graph::TraversalKind;
use crate::sequence::{SearchKind, SortKind};

/// One run the session can perform.
#[derive(Debug, Clone, PartialEq)]
pub enum RunRequest {
    Sort(SortKind),
    Search { kind: SearchKind, target: i64 },
    Traverse {
        kind: TraversalKind,
        source: usize,
        destination: usize,
    },
    /// Configured text when `None`.
    Huffman { text: Option<String> },
    /// Configured capacity when `None`.
    Knapsack { capacity: Option<f64> },
}

impl RunRequest {
    pub fn kind(&self) -> RunKind {
        match self {
            RunRequest::Sort(kind) => (*kind).into(),
            RunRequest::Search { kind, .. } => (*kind).into(),
            RunRequest::Traverse { kind, .. } => (*kind).into(),
            RunRequest::Huffman { .. } => RunKind::Huffman,
            RunRequest::Knapsack { .. } => RunKind::Knapsack,
        }
    }

    /// Checks that need no session data.
    pub fn check_input(&self) -> Result<()> {
        match self {
            RunRequest::Huffman { text: Some(text) } if text.is_empty() => {
                Err(Error::invalid("Huffman text must not be empty"))
            }
            RunRequest::Knapsack {
                capacity: Some(capacity),
            } if !(capacity.is_finite() && *capacity > 0.0) => {
                Err(Error::invalid("knapsack capacity must be positive"))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_checks() {
        let empty = RunRequest::Huffman {
            text: Some(String::new()),
        };
        assert!(matches!(empty.check_input(), Err(Error::InvalidInput(_))));
        assert!(RunRequest::Huffman { text: None }.check_input().is_ok());

        assert!(RunRequest::Knapsack { capacity: Some(-1.0) }.check_input().is_err());
        assert!(RunRequest::Knapsack { capacity: Some(f64::NAN) }.check_input().is_err());
        assert!(RunRequest::Knapsack { capacity: Some(20.0) }.check_input().is_ok());
    }

    #[test]
    fn kinds_match_catalog() {
        assert_eq!(RunRequest::Sort(SortKind::Quick).kind(), RunKind::Quick);
        let search = RunRequest::Search {
            kind: SearchKind::Jump,
            target: 3,
        };
        assert_eq!(search.kind(), RunKind::Jump);
        assert_eq!(RunRequest::Knapsack { capacity: None }.kind(), RunKind::Knapsack);
    }
}
