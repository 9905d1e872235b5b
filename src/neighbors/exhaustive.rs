//! Exhaustive pairwise neighbor discovery, and the full pairwise distance
//! matrix used by exact target-count selection. This is the reference
//! strategy the others are checked against.

use super::NeighborRelation;
use crate::Point2;
use crate::metric::DistanceMetric;
use itertools::Itertools;

/// Test every unordered pair of points against the radius. O(n²) in the
/// number of points.
pub fn find(points: &[Point2], radius: f64, metric: DistanceMetric) -> NeighborRelation {
    let mut relation = NeighborRelation::new(points.len());
    for ((i, a), (j, b)) in points.iter().enumerate().tuple_combinations() {
        if metric.distance(a, b) < radius {
            relation.add_pair(i, j);
        }
    }
    relation
}

/// The full n x n matrix of pairwise distances, stored flat. Built once per
/// invocation and shared read-only across trials by the farthest-point
/// selector, which needs distances rather than a thinned neighbor set.
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Compute all pairwise distances under the metric. The diagonal is zero.
    pub fn build(points: &[Point2], metric: DistanceMetric) -> Self {
        let n = points.len();
        let mut values = vec![0.0; n * n];
        for ((i, a), (j, b)) in points.iter().enumerate().tuple_combinations() {
            let d = metric.distance(a, b);
            values[i * n + j] = d;
            values[j * n + i] = d;
        }
        DistanceMatrix { n, values }
    }

    /// The number of points the matrix covers.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Check whether the matrix covers zero points.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// The distance between points `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn matrix_is_symmetric_with_zero_diagonal() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 4.0),
            Point2::new(-1.0, 2.0),
        ];
        let m = DistanceMatrix::build(&points, DistanceMetric::Planar);
        assert_eq!(m.len(), 3);
        for i in 0..3 {
            assert_eq!(m.get(i, i), 0.0);
            for j in 0..3 {
                assert_relative_eq!(m.get(i, j), m.get(j, i));
            }
        }
        assert_relative_eq!(m.get(0, 1), 5.0);
    }

    #[test]
    fn strict_radius_cutoff() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 0.0),
        ];
        let relation = find(&points, 1.0, DistanceMetric::Planar);
        // (0, 1) sit at exactly the radius and are not neighbors
        assert_eq!(relation.degree(0), 1);
        assert_eq!(relation.neighbors(0), &[2]);
        assert_eq!(relation.degree(1), 1);
        assert_eq!(relation.neighbors(1), &[2]);
        assert_eq!(relation.degree(2), 2);
    }
}
