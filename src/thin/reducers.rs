//! Bucket-occupancy reducers: keep the first point encountered per rounded
//! coordinate pair or per grid cell, under a per-trial evaluation order.
//! These skip neighbor discovery entirely and run in O(n log n).

use crate::Point2;
use crate::common::{IndexMask, index_vec};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::hash::Hash;

/// The order in which one trial walks the points: a fresh random permutation,
/// or the points sorted by descending priority when one is supplied. The
/// priority sort is stable, so equal priorities keep their input order and
/// the result no longer varies between trials.
pub(crate) fn evaluation_order(
    n: usize,
    priority: Option<&[f64]>,
    rng: &mut StdRng,
) -> Vec<usize> {
    let mut order = index_vec(None, n);
    if let Some(priority) = priority {
        order.sort_by(|&a, &b| {
            priority[b]
                .partial_cmp(&priority[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    } else {
        order.shuffle(rng);
    }
    order
}

/// Keep the first point, in `order`, for every distinct coordinate pair after
/// rounding both coordinates to `decimals` decimal places.
pub(crate) fn reduce_precision(points: &[Point2], decimals: u32, order: &[usize]) -> IndexMask {
    let scale = 10f64.powi(decimals as i32);
    keep_first(points.len(), order, |i| {
        (
            (points[i].x * scale).round() as i64,
            (points[i].y * scale).round() as i64,
        )
    })
}

/// Keep the first point, in `order`, for every distinct cell id.
pub(crate) fn reduce_cells(cells: &[i64], order: &[usize]) -> IndexMask {
    keep_first(cells.len(), order, |i| cells[i])
}

fn keep_first<K: Eq + Hash>(n: usize, order: &[usize], key_of: impl Fn(usize) -> K) -> IndexMask {
    let mut seen = HashSet::new();
    let mut kept = IndexMask::new(n, false);
    for &i in order {
        if seen.insert(key_of(i)) {
            kept.set(i, true);
        }
    }
    kept
}
