//! Greedy most-connected-first eviction over a neighbor relation. Removing
//! the highest-degree point first tends to leave a larger retained set than
//! random removal, but is not guaranteed optimal; repeated randomized trials
//! approximate a better optimum.

use crate::common::IndexMask;
use crate::neighbors::NeighborRelation;
use rand::prelude::*;
use rand::rngs::StdRng;

/// Run one eviction trial: repeatedly remove the point with the most
/// remaining neighbors until no kept point has a kept neighbor, and return
/// the mask of survivors. Ties at the maximum degree are broken uniformly at
/// random, or, when priorities are supplied, by evicting the lowest-priority
/// point among the ties (random among equal-lowest).
pub(crate) fn evict_most_connected(
    relation: &NeighborRelation,
    priority: Option<&[f64]>,
    rng: &mut StdRng,
) -> IndexMask {
    let n = relation.len();
    let mut kept = IndexMask::new(n, true);

    // counts[i] tracks the number of still-kept neighbors of point i while it
    // remains kept, and drops to zero when i is evicted.
    let mut counts: Vec<usize> = (0..n).map(|i| relation.degree(i)).collect();
    let mut ties: Vec<usize> = Vec::new();

    loop {
        let max = counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            break;
        }

        ties.clear();
        ties.extend((0..n).filter(|&i| counts[i] == max));
        let evict = choose_eviction(&ties, priority, rng);

        kept.set(evict, false);
        counts[evict] = 0;
        for &j in relation.neighbors(evict) {
            if kept.get(j) {
                counts[j] -= 1;
            }
        }
    }

    kept
}

fn choose_eviction(ties: &[usize], priority: Option<&[f64]>, rng: &mut StdRng) -> usize {
    if let Some(priority) = priority {
        let lowest = ties
            .iter()
            .map(|&i| priority[i])
            .fold(f64::INFINITY, f64::min);
        let least_preferred: Vec<usize> = ties
            .iter()
            .copied()
            .filter(|&i| priority[i] == lowest)
            .collect();
        *least_preferred.choose(rng).expect("ties are never empty")
    } else {
        *ties.choose(rng).expect("ties are never empty")
    }
}
