//! Farthest-point selection for exact retained-count targets: grow the kept
//! set by repeatedly adding the point whose minimum distance to the already
//! kept points is largest (the max-min heuristic).

use crate::common::IndexMask;
use crate::neighbors::exhaustive::DistanceMatrix;
use rand::prelude::*;
use rand::rngs::StdRng;

/// Run one selection trial: starting from a uniformly random point, add the
/// farthest remaining point until `target` points are kept or the best
/// candidate would sit closer than `min_distance` to the kept set, in which
/// case the trial ends short of the target. Ties among farthest candidates
/// are broken uniformly at random. Priority scores play no part in this
/// selection.
pub(crate) fn select_farthest(
    matrix: &DistanceMatrix,
    target: usize,
    min_distance: f64,
    rng: &mut StdRng,
) -> IndexMask {
    let n = matrix.len();
    let mut kept = IndexMask::new(n, false);
    if target == 0 || n == 0 {
        return kept;
    }

    let start = rng.random_range(0..n);
    kept.set(start, true);
    let mut count = 1;

    // min_dist[i] is the distance from i to the nearest kept point
    let mut min_dist: Vec<f64> = (0..n).map(|i| matrix.get(start, i)).collect();
    let mut ties: Vec<usize> = Vec::new();

    while count < target {
        let mut best = f64::NEG_INFINITY;
        for i in 0..n {
            if !kept.get(i) && min_dist[i] > best {
                best = min_dist[i];
            }
        }

        if best < min_distance {
            break;
        }

        ties.clear();
        ties.extend((0..n).filter(|&i| !kept.get(i) && min_dist[i] == best));
        let next = *ties.choose(rng).expect("candidates are never empty");

        kept.set(next, true);
        count += 1;
        for i in 0..n {
            min_dist[i] = min_dist[i].min(matrix.get(next, i));
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point2;
    use crate::metric::DistanceMetric;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn matrix_of(points: &[Point2]) -> DistanceMatrix {
        DistanceMatrix::build(points, DistanceMetric::Planar)
    }

    #[test]
    fn reaches_the_target_when_points_are_separated() {
        let points: Vec<Point2> = (0..10).map(|i| Point2::new(i as f64 * 5.0, 0.0)).collect();
        let matrix = matrix_of(&points);
        let kept = select_farthest(&matrix, 4, 1.0, &mut rng(1));
        assert_eq!(kept.count_true(), 4);
    }

    #[test]
    fn kept_points_respect_the_separation() {
        let mut r = rng(17);
        let points: Vec<Point2> = (0..80)
            .map(|_| Point2::new(r.random_range(0.0..10.0), r.random_range(0.0..10.0)))
            .collect();
        let matrix = matrix_of(&points);
        let kept = select_farthest(&matrix, 20, 1.5, &mut rng(18));

        let survivors = kept.to_indices();
        for (a, &i) in survivors.iter().enumerate() {
            for &j in survivors.iter().skip(a + 1) {
                assert!(matrix.get(i, j) >= 1.5);
            }
        }
    }

    #[test]
    fn stops_short_when_the_constraint_binds() {
        // Only two points can ever be 5 apart in a 1x1 square
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
        ];
        let matrix = matrix_of(&points);
        let kept = select_farthest(&matrix, 4, 5.0, &mut rng(2));
        assert_eq!(kept.count_true(), 1);
    }

    #[test]
    fn first_addition_is_the_farthest_point() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(10.0, 0.0),
        ];
        let matrix = matrix_of(&points);
        // Whatever the starting point, a 2-point selection includes index 2,
        // the only point that is farthest from both other candidates
        for seed in 0..8 {
            let kept = select_farthest(&matrix, 2, 0.5, &mut rng(seed));
            assert_eq!(kept.count_true(), 2);
            assert!(kept.get(2));
        }
    }

    #[test]
    fn zero_target_keeps_nothing() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let matrix = matrix_of(&points);
        let kept = select_farthest(&matrix, 0, 0.5, &mut rng(3));
        assert_eq!(kept.count_true(), 0);
    }
}
