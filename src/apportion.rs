//! Largest-remainder (Hamilton) apportionment over integer weights.

use std::cmp::Reverse;

/// Splits `total` across `weights` so the parts sum to `total` exactly.
///
/// Each bucket receives `floor(total * w / W)`; the leftover units go one at a
/// time to the buckets with the largest remainder, lower index first on ties.
/// When every weight is zero the split is uniform.
pub fn largest_remainder(total: u64, weights: &[u64]) -> Vec<u64> {
    if weights.is_empty() {
        return Vec::new();
    }

    let weight_sum: u128 = weights.iter().map(|&w| u128::from(w)).sum();
    if weight_sum == 0 {
        return largest_remainder(total, &vec![1; weights.len()]);
    }

    let mut parts = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    let mut assigned: u128 = 0;
    for (index, &weight) in weights.iter().enumerate() {
        let numerator = u128::from(weight) * u128::from(total);
        let quota = numerator / weight_sum;
        assigned += quota;
        parts.push(quota as u64);
        remainders.push((numerator % weight_sum, index));
    }

    let deficit = (u128::from(total) - assigned) as usize;
    if deficit > 0 {
        // keys are unique because the index is part of them
        remainders.sort_unstable_by_key(|&(remainder, index)| (Reverse(remainder), index));
        for &(_, index) in remainders.iter().take(deficit) {
            parts[index] += 1;
        }
    }
    parts
}
