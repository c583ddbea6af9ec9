//! Fractional knapsack by value density.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::context::RunContext;
use crate::error::{Error, Result};
use crate::port::Frame;

/// An item that can be taken whole or in part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnapsackItem {
    pub id: usize,
    pub value: f64,
    pub weight: f64,
    /// `value / weight`.
    pub ratio: f64,
}

impl KnapsackItem {
    pub fn new(id: usize, value: f64, weight: f64) -> Self {
        Self {
            id,
            value,
            weight,
            ratio: value / weight,
        }
    }
}

/// An item and the portion of it in the knapsack, in `(0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub item: KnapsackItem,
    pub fraction: f64,
}

impl Selection {
    /// Value contributed by this selection.
    pub fn value(&self) -> f64 {
        self.item.value * self.fraction
    }

    /// Percentage of the item taken.
    pub fn percent(&self) -> f64 {
        self.fraction * 100.0
    }
}

/// `count` items with integral value in 1..=50 and weight in 1..=20.
pub fn random_items<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<KnapsackItem> {
    (0..count)
        .map(|id| {
            let value = rng.gen_range(1..=50) as f64;
            let weight = rng.gen_range(1..=20) as f64;
            KnapsackItem::new(id, value, weight)
        })
        .collect()
}

/// Greedy solution for one capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnapsackSolution {
    /// Every item, densest first.
    pub items_sorted: Vec<KnapsackItem>,
    pub taken: Vec<Selection>,
    pub total_value: f64,
    pub capacity: f64,
    pub capacity_used: f64,
}

impl KnapsackSolution {
    /// Sort by descending ratio, take whole items while they fit, then the
    /// fitting fraction of the first one that doesn't.
    pub fn solve(items: &[KnapsackItem], capacity: f64) -> Result<Self> {
        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(Error::invalid(format!(
                "knapsack capacity must be positive, got {}",
                capacity
            )));
        }
        if let Some(bad) = items.iter().find(|i| !(i.weight > 0.0 && i.value > 0.0)) {
            return Err(Error::invalid(format!(
                "item {} needs positive value and weight",
                bad.id
            )));
        }

        let mut items_sorted = items.to_vec();
        items_sorted.sort_by(|a, b| b.ratio.total_cmp(&a.ratio));

        let mut remaining = capacity;
        let mut taken = Vec::new();
        let mut total_value = 0.0;
        for item in &items_sorted {
            if remaining >= item.weight {
                remaining -= item.weight;
                total_value += item.value;
                taken.push(Selection {
                    item: item.clone(),
                    fraction: 1.0,
                });
            } else {
                if remaining > 0.0 {
                    let fraction = remaining / item.weight;
                    total_value += item.value * fraction;
                    remaining = 0.0;
                    taken.push(Selection {
                        item: item.clone(),
                        fraction,
                    });
                }
                break;
            }
        }

        Ok(Self {
            items_sorted,
            taken,
            total_value,
            capacity,
            capacity_used: capacity - remaining,
        })
    }

    /// Draw the solution, then hold it for two steps.
    pub async fn present(&self, ctx: &RunContext) {
        ctx.port().clear();
        ctx.port().emit(Frame::Knapsack {
            items: self.items_sorted.clone(),
            taken: self.taken.clone(),
            total_value: self.total_value,
            capacity: self.capacity,
            capacity_used: self.capacity_used,
        });
        ctx.port().render_message(&format!(
            "Maximum value in knapsack: {:.2}",
            self.total_value
        ));
        ctx.hold(ctx.step() * 2).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn classic() -> Vec<KnapsackItem> {
        vec![
            KnapsackItem::new(0, 60.0, 10.0),
            KnapsackItem::new(1, 100.0, 20.0),
            KnapsackItem::new(2, 120.0, 30.0),
        ]
    }

    #[test]
    fn classic_instance_totals_240() {
        let solution = KnapsackSolution::solve(&classic(), 50.0).unwrap();

        assert!((solution.total_value - 240.0).abs() < 1e-9);
        assert!((solution.capacity_used - 50.0).abs() < 1e-9);
        assert_eq!(solution.taken.len(), 3);
        assert_eq!(solution.taken[0].fraction, 1.0);
        assert_eq!(solution.taken[1].fraction, 1.0);
        assert!((solution.taken[2].fraction - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn exact_fit_takes_no_fraction() {
        let solution = KnapsackSolution::solve(&classic(), 30.0).unwrap();
        assert_eq!(solution.taken.len(), 2);
        assert!((solution.total_value - 160.0).abs() < 1e-9);
    }

    #[test]
    fn large_capacity_takes_everything() {
        let solution = KnapsackSolution::solve(&classic(), 1000.0).unwrap();
        assert_eq!(solution.taken.len(), 3);
        assert!((solution.capacity_used - 60.0).abs() < 1e-9);
        assert!((solution.total_value - 280.0).abs() < 1e-9);
    }

    #[test]
    fn items_sorted_densest_first() {
        let mut items = classic();
        items.reverse();
        let solution = KnapsackSolution::solve(&items, 5.0).unwrap();
        let ids: Vec<usize> = solution.items_sorted.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(solution.taken.len(), 1);
        assert!((solution.taken[0].percent() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn non_positive_capacity_rejected() {
        for capacity in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                KnapsackSolution::solve(&classic(), capacity),
                Err(Error::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn random_items_in_range() {
        let items = random_items(&mut StdRng::seed_from_u64(3), 50);
        assert_eq!(items.len(), 50);
        for item in &items {
            assert!((1.0..=50.0).contains(&item.value));
            assert!((1.0..=20.0).contains(&item.weight));
            assert!((item.ratio - item.value / item.weight).abs() < 1e-12);
        }
    }
}
