//! In-place animated sorts.
//!
//! Every comparison is highlighted and followed by a step delay, and so is
//! every write. A cancelled sort leaves the slice in whatever order it had
//! reached.

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};

use crate::context::RunContext;
use crate::error::Result;
use crate::port::Emphasis;

/// The comparison sorts on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKind {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
}

impl SortKind {
    /// All sorts, in menu order.
    pub const ALL: [SortKind; 5] = [
        SortKind::Bubble,
        SortKind::Selection,
        SortKind::Insertion,
        SortKind::Merge,
        SortKind::Quick,
    ];

    /// Sort `values` ascending with this algorithm.
    pub async fn run(self, ctx: &RunContext, values: &mut [f64]) -> Result<()> {
        match self {
            SortKind::Bubble => bubble_sort(ctx, values).await,
            SortKind::Selection => selection_sort(ctx, values).await,
            SortKind::Insertion => insertion_sort(ctx, values).await,
            SortKind::Merge => merge_sort(ctx, values).await,
            SortKind::Quick => quick_sort(ctx, values).await,
        }
    }
}

/// Bubble sort; adjacent pairs swap only when strictly out of order.
pub async fn bubble_sort(ctx: &RunContext, values: &mut [f64]) -> Result<()> {
    let n = values.len();
    for i in 0..n.saturating_sub(1) {
        for j in 0..n - i - 1 {
            ctx.show_sequence(values, &[j, j + 1], Emphasis::Compare).await?;
            if values[j] > values[j + 1] {
                values.swap(j, j + 1);
                ctx.show_sequence(values, &[j, j + 1], Emphasis::Write).await?;
            }
        }
    }
    Ok(())
}

/// Selection sort.
pub async fn selection_sort(ctx: &RunContext, values: &mut [f64]) -> Result<()> {
    let n = values.len();
    for i in 0..n.saturating_sub(1) {
        let mut min = i;
        for j in i + 1..n {
            ctx.show_sequence(values, &[min, j], Emphasis::Compare).await?;
            if values[j] < values[min] {
                min = j;
            }
        }
        if min != i {
            values.swap(i, min);
            ctx.show_sequence(values, &[i, min], Emphasis::Write).await?;
        }
    }
    Ok(())
}

/// Insertion sort; shifts larger elements right until the key fits.
pub async fn insertion_sort(ctx: &RunContext, values: &mut [f64]) -> Result<()> {
    for i in 1..values.len() {
        let key = values[i];
        ctx.show_sequence(values, &[i], Emphasis::Compare).await?;

        let mut hole = i;
        while hole > 0 && values[hole - 1] > key {
            values[hole] = values[hole - 1];
            hole -= 1;
            ctx.show_sequence(values, &[hole, hole + 1], Emphasis::Write).await?;
        }
        values[hole] = key;
        ctx.show_sequence(values, &[hole], Emphasis::Write).await?;
    }
    Ok(())
}

/// Top-down merge sort over the whole slice.
pub async fn merge_sort(ctx: &RunContext, values: &mut [f64]) -> Result<()> {
    if values.is_empty() {
        return Ok(());
    }
    let end = values.len() - 1;
    merge_sort_range(ctx, values, 0, end).await
}

fn merge_sort_range<'a>(
    ctx: &'a RunContext,
    values: &'a mut [f64],
    start: usize,
    end: usize,
) -> BoxFuture<'a, Result<()>> {
    async move {
        ctx.check()?;
        if start >= end {
            return Ok(());
        }
        let mid = (start + end) / 2;

        let range: Vec<usize> = (start..=end).collect();
        ctx.show_sequence(values, &range, Emphasis::Compare).await?;

        merge_sort_range(ctx, values, start, mid).await?;
        merge_sort_range(ctx, values, mid + 1, end).await?;
        merge(ctx, values, start, mid, end).await
    }
    .boxed()
}

/// Merge the sorted runs `start..=mid` and `mid+1..=end`. Ties take the
/// left element, which keeps the sort stable.
async fn merge(
    ctx: &RunContext,
    values: &mut [f64],
    start: usize,
    mid: usize,
    end: usize,
) -> Result<()> {
    let left = values[start..=mid].to_vec();
    let right = values[mid + 1..=end].to_vec();
    let (mut i, mut j, mut k) = (0, 0, start);

    while i < left.len() && j < right.len() {
        ctx.show_sequence(values, &[start + i, mid + 1 + j], Emphasis::Compare)
            .await?;
        if left[i] <= right[j] {
            values[k] = left[i];
            i += 1;
        } else {
            values[k] = right[j];
            j += 1;
        }
        k += 1;
        ctx.show_sequence(values, &[k - 1], Emphasis::Write).await?;
    }

    for &value in left[i..].iter().chain(&right[j..]) {
        values[k] = value;
        ctx.show_sequence(values, &[k], Emphasis::Write).await?;
        k += 1;
    }
    Ok(())
}

/// Quick sort with Lomuto partitioning around the last element.
pub async fn quick_sort(ctx: &RunContext, values: &mut [f64]) -> Result<()> {
    if values.is_empty() {
        return Ok(());
    }
    let end = values.len() - 1;
    quick_sort_range(ctx, values, 0, end).await
}

fn quick_sort_range<'a>(
    ctx: &'a RunContext,
    values: &'a mut [f64],
    start: usize,
    end: usize,
) -> BoxFuture<'a, Result<()>> {
    async move {
        ctx.check()?;
        if start >= end {
            return Ok(());
        }

        let pivot = partition(ctx, values, start, end).await?;
        ctx.show_sequence(values, &[pivot], Emphasis::Write).await?;

        if pivot > start {
            quick_sort_range(ctx, values, start, pivot - 1).await?;
        }
        quick_sort_range(ctx, values, pivot + 1, end).await
    }
    .boxed()
}

/// Lomuto partition of `start..=end`; returns the pivot's final index.
pub async fn partition(
    ctx: &RunContext,
    values: &mut [f64],
    start: usize,
    end: usize,
) -> Result<usize> {
    let pivot = values[end];
    ctx.show_sequence(values, &[end], Emphasis::Compare).await?;

    let mut boundary = start;
    for j in start..end {
        ctx.show_sequence(values, &[j, end], Emphasis::Compare).await?;
        if values[j] <= pivot {
            values.swap(boundary, j);
            ctx.show_sequence(values, &[boundary, j], Emphasis::Write).await?;
            boundary += 1;
        }
    }

    values.swap(boundary, end);
    ctx.show_sequence(values, &[boundary], Emphasis::Write).await?;
    Ok(boundary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RunKind;
    use crate::control::RunController;
    use crate::port::{Frame, FrameLog, NullPort};
    use std::sync::Arc;

    fn context(kind: SortKind) -> RunContext {
        RunContext::start(
            Arc::new(RunController::new()),
            kind.into(),
            Arc::new(NullPort),
        )
    }

    #[tokio::test]
    async fn every_sort_orders_the_example() {
        for kind in SortKind::ALL {
            let mut values = vec![5.0, 3.0, 4.0, 1.0, 2.0];
            kind.run(&context(kind), &mut values).await.unwrap();
            assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0], "{:?}", kind);
        }
    }

    #[tokio::test]
    async fn sorts_handle_duplicates_and_tiny_inputs() {
        for kind in SortKind::ALL {
            let mut dupes = vec![2.0, 2.0, 1.0, 2.0, 1.0];
            kind.run(&context(kind), &mut dupes).await.unwrap();
            assert_eq!(dupes, vec![1.0, 1.0, 2.0, 2.0, 2.0]);

            let mut empty: Vec<f64> = Vec::new();
            kind.run(&context(kind), &mut empty).await.unwrap();
            assert!(empty.is_empty());

            let mut single = vec![7.5];
            kind.run(&context(kind), &mut single).await.unwrap();
            assert_eq!(single, vec![7.5]);
        }
    }

    #[tokio::test]
    async fn partition_places_pivot_at_boundary() {
        let ctx = context(SortKind::Quick);
        let mut values = vec![3.0, 8.0, 1.0, 9.0, 5.0];
        let p = partition(&ctx, &mut values, 0, 4).await.unwrap();

        assert_eq!(p, 2);
        assert_eq!(values[p], 5.0);
        assert!(values[..p].iter().all(|&v| v <= 5.0));
        assert!(values[p + 1..].iter().all(|&v| v > 5.0));
    }

    #[tokio::test]
    async fn bubble_highlights_compare_then_swap() {
        let log = Arc::new(FrameLog::new());
        let ctx = RunContext::start(
            Arc::new(RunController::new()),
            RunKind::Bubble,
            log.clone(),
        );
        let mut values = vec![2.0, 1.0];
        bubble_sort(&ctx, &mut values).await.unwrap();

        let frames = log.frames();
        assert_eq!(frames.len(), 2);
        assert!(matches!(
            &frames[0],
            Frame::Sequence { values, emphasis: Emphasis::Compare, .. } if values == &vec![2.0, 1.0]
        ));
        assert!(matches!(
            &frames[1],
            Frame::Sequence { values, emphasis: Emphasis::Write, .. } if values == &vec![1.0, 2.0]
        ));
    }

    #[tokio::test]
    async fn sorted_input_never_swaps() {
        let log = Arc::new(FrameLog::new());
        let ctx = RunContext::start(
            Arc::new(RunController::new()),
            RunKind::Bubble,
            log.clone(),
        );
        let mut values = vec![1.0, 2.0, 3.0];
        bubble_sort(&ctx, &mut values).await.unwrap();

        let writes = log
            .frames()
            .into_iter()
            .filter(|f| matches!(f, Frame::Sequence { emphasis: Emphasis::Write, .. }))
            .count();
        assert_eq!(writes, 0);
    }
}
