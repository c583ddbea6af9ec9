//! Sorting and searching over a sequence of bar heights.

mod search;
mod sort;

pub use search::{
    binary_search, block_size, jump_search, linear_search, rounded, SearchKind,
};
pub use sort::{
    bubble_sort, insertion_sort, merge_sort, partition, quick_sort, selection_sort, SortKind,
};

use rand::Rng;

/// Fill a fresh sequence of `len` values uniformly drawn from `[0, max_value)`.
pub fn random_sequence<R: Rng + ?Sized>(rng: &mut R, len: usize, max_value: f64) -> Vec<f64> {
    (0..len).map(|_| rng.gen::<f64>() * max_value).collect()
}
