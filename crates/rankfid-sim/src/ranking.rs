//! Descending rankings with averaged ties.
//!
//! Rank 1 is the largest value. Values that compare equal share the mean of
//! the 1-based positions they occupy, so the rank sum is always `n(n+1)/2`.
//! The ordering permutation lists tied entities by ascending index.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use rankfid_core::error::PhaseError;
use rankfid_core::types::Ranking;

/// Rank a scalar series from largest to smallest.
///
/// NaN has no place in a total order and is rejected.
///
/// ```
/// use rankfid_sim::ranking::rank_descending;
/// let r = rank_descending(&[1.0, 3.0, 3.0, 2.0]).unwrap();
/// assert_eq!(r.order(), &[1, 2, 3, 0]);
/// assert_eq!(r.ranks(), &[4.0, 1.5, 1.5, 3.0]);
/// ```
pub fn rank_descending(values: &[f64]) -> Result<Ranking, PhaseError> {
    if let Some(entity) = values.iter().position(|v| v.is_nan()) {
        return Err(PhaseError::InvalidScalar {
            phase: "ranking",
            entity,
            value: values[entity],
        });
    }

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by_key(|&i| (Reverse(OrderedFloat(values[i])), i));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0usize;
    while start < order.len() {
        let value = values[order[start]];
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == value {
            end += 1;
        }
        // Positions start+1 ..= end share their mean.
        let shared = (start + 1 + end) as f64 / 2.0;
        for &entity in &order[start..end] {
            ranks[entity] = shared;
        }
        start = end;
    }

    Ranking::new(order, ranks)
}
