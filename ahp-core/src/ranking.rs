/// Dense ranking from a weight vector (1 = most preferred).
use std::cmp::Ordering;

use crate::types::RankedAlternative;

/// Descending by weight; NaN sorts after every number.
fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Alternative indices from most to least preferred. The sort is stable, so
/// tied weights keep their original index order.
fn preference_order(weights: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| descending(weights[a], weights[b]));
    order
}

/// Rank of each alternative, index-aligned with `weights`.
///
/// Returns a permutation of `1..=n`; an empty input gives an empty ranking.
pub fn rank(weights: &[f64]) -> Vec<usize> {
    let mut ranks = vec![0; weights.len()];
    for (position, idx) in preference_order(weights).into_iter().enumerate() {
        ranks[idx] = position + 1;
    }
    ranks
}

/// Alternatives sorted from best to worst, each with its weight and rank.
pub fn ranked_alternatives(weights: &[f64]) -> Vec<RankedAlternative> {
    preference_order(weights)
        .into_iter()
        .enumerate()
        .map(|(position, index)| RankedAlternative {
            index,
            weight: weights[index],
            rank: position + 1,
        })
        .collect()
}
