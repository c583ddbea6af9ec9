//! Animated searches over the sequence.
//!
//! Values are compared after rounding to the nearest integer, matching the
//! labels drawn above each bar. Binary and jump search assume ascending
//! input; [`crate::Visualizer::run_search`] sorts a copy-restorable sequence
//! first.

use serde::{Deserialize, Serialize};

use crate::context::RunContext;
use crate::error::Result;
use crate::port::Emphasis;

/// The searches on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Linear,
    Binary,
    Jump,
}

impl SearchKind {
    /// All searches, in menu order.
    pub const ALL: [SearchKind; 3] = [SearchKind::Linear, SearchKind::Binary, SearchKind::Jump];

    /// Whether this search needs ascending input.
    pub const fn requires_sorted(self) -> bool {
        !matches!(self, SearchKind::Linear)
    }

    /// Look for `target`; `None` when absent.
    pub async fn run(self, ctx: &RunContext, values: &[f64], target: i64) -> Result<Option<usize>> {
        match self {
            SearchKind::Linear => linear_search(ctx, values, target).await,
            SearchKind::Binary => binary_search(ctx, values, target).await,
            SearchKind::Jump => jump_search(ctx, values, target).await,
        }
    }
}

/// The integer label a value is compared by.
pub fn rounded(value: f64) -> i64 {
    value.round() as i64
}

/// Scan left to right for the first match.
pub async fn linear_search(ctx: &RunContext, values: &[f64], target: i64) -> Result<Option<usize>> {
    for i in 0..values.len() {
        ctx.show_sequence(values, &[i], Emphasis::Probe).await?;
        if rounded(values[i]) == target {
            ctx.port().render_sequence(values, &[i], Emphasis::Found);
            return Ok(Some(i));
        }
    }
    ctx.port().render_sequence(values, &[], Emphasis::Missing);
    Ok(None)
}

/// Midpoint narrowing over ascending input.
pub async fn binary_search(ctx: &RunContext, values: &[f64], target: i64) -> Result<Option<usize>> {
    let (mut low, mut high) = (0usize, values.len());
    while low < high {
        let mid = low + (high - low - 1) / 2;

        let range: Vec<usize> = (low..high).collect();
        ctx.port().render_sequence(values, &range, Emphasis::Compare);
        ctx.show_sequence(values, &[mid], Emphasis::Probe).await?;

        let candidate = rounded(values[mid]);
        if candidate == target {
            ctx.port().render_sequence(values, &[mid], Emphasis::Found);
            return Ok(Some(mid));
        }
        if candidate < target {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    ctx.port().render_sequence(values, &[], Emphasis::Missing);
    Ok(None)
}

/// Jump ahead in blocks of `floor(sqrt(n))`, then scan the block that may
/// hold the target.
pub async fn jump_search(ctx: &RunContext, values: &[f64], target: i64) -> Result<Option<usize>> {
    let n = values.len();
    let step = block_size(n);
    let mut start = 0;

    while start < n && rounded(values[(start + step).min(n) - 1]) < target {
        let block: Vec<usize> = (start..(start + step).min(n)).collect();
        ctx.show_sequence(values, &block, Emphasis::Compare).await?;
        start += step;
    }

    let block_end = (start + step).min(n);
    for i in start..block_end {
        ctx.show_sequence(values, &[i], Emphasis::Probe).await?;
        let candidate = rounded(values[i]);
        if candidate == target {
            ctx.port().render_sequence(values, &[i], Emphasis::Found);
            return Ok(Some(i));
        }
        if candidate > target {
            break;
        }
    }
    ctx.port().render_sequence(values, &[], Emphasis::Missing);
    Ok(None)
}

/// Jump search block size for `n` elements (at least 1).
pub fn block_size(n: usize) -> usize {
    ((n as f64).sqrt().floor() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::RunController;
    use crate::port::{Frame, FrameLog, NullPort};
    use std::sync::Arc;

    fn context(kind: SearchKind) -> RunContext {
        RunContext::start(
            Arc::new(RunController::new()),
            kind.into(),
            Arc::new(NullPort),
        )
    }

    const SORTED: [f64; 9] = [1.2, 3.0, 4.4, 7.0, 9.6, 12.0, 15.1, 18.0, 21.0];

    #[tokio::test]
    async fn each_search_finds_every_present_value() {
        for kind in SearchKind::ALL {
            for (index, &value) in SORTED.iter().enumerate() {
                let found = kind
                    .run(&context(kind), &SORTED, rounded(value))
                    .await
                    .unwrap();
                assert_eq!(found, Some(index), "{:?} looking for {}", kind, value);
            }
        }
    }

    #[tokio::test]
    async fn each_search_reports_absent_values() {
        for kind in SearchKind::ALL {
            for target in [0, 2, 8, 100, -5] {
                let found = kind.run(&context(kind), &SORTED, target).await.unwrap();
                assert_eq!(found, None, "{:?} looking for {}", kind, target);
            }
        }
    }

    #[tokio::test]
    async fn empty_sequence_is_not_found() {
        for kind in SearchKind::ALL {
            assert_eq!(kind.run(&context(kind), &[], 3).await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn linear_search_returns_first_match() {
        let values = [4.0, 9.0, 4.2, 9.4];
        let found = linear_search(&context(SearchKind::Linear), &values, 9).await.unwrap();
        assert_eq!(found, Some(1));
    }

    #[tokio::test]
    async fn missing_target_renders_missing_frame() {
        let log = Arc::new(FrameLog::new());
        let ctx = RunContext::start(
            Arc::new(RunController::new()),
            SearchKind::Linear.into(),
            log.clone(),
        );
        linear_search(&ctx, &[1.0, 2.0], 5).await.unwrap();

        assert!(matches!(
            log.last(),
            Some(Frame::Sequence { emphasis: Emphasis::Missing, .. })
        ));
    }

    #[test]
    fn block_size_is_floor_sqrt() {
        assert_eq!(block_size(0), 1);
        assert_eq!(block_size(1), 1);
        assert_eq!(block_size(9), 3);
        assert_eq!(block_size(25), 5);
        assert_eq!(block_size(26), 5);
    }

    #[test]
    fn requires_sorted_only_for_binary_and_jump() {
        assert!(!SearchKind::Linear.requires_sorted());
        assert!(SearchKind::Binary.requires_sorted());
        assert!(SearchKind::Jump.requires_sorted());
    }
}
