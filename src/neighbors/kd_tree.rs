//! K-d tree neighbor search. Planar input is indexed directly in 2-D;
//! geographic input is projected onto the sphere and indexed in 3-D, where
//! the chord of the search arc bounds the euclidean radius query.

use super::NeighborRelation;
use super::grid::run_local_search;
use crate::Point2;
use crate::metric::{self, DistanceMetric};
use kiddo::{KdTree, SquaredEuclidean};

// The chord radius is padded by a hair to absorb projection roundoff; the
// metric distance makes the final membership call either way.
const CHORD_PAD: f64 = 1.0 + 1e-9;

pub fn find(
    points: &[Point2],
    radius: f64,
    metric: DistanceMetric,
    space_partition: bool,
) -> NeighborRelation {
    match metric {
        DistanceMetric::Planar => find_planar(points, radius, space_partition),
        DistanceMetric::GreatCircle { radius: sphere } => {
            find_spherical(points, radius, sphere, space_partition)
        }
    }
}

fn find_planar(points: &[Point2], radius: f64, space_partition: bool) -> NeighborRelation {
    let metric = DistanceMetric::Planar;
    let r2 = radius * radius;

    let local = |candidates: &[usize], queries: &[usize], relation: &mut NeighborRelation| {
        let mut tree: KdTree<f64, 2> = KdTree::new();
        for &j in candidates {
            tree.add(&[points[j].x, points[j].y], j as u64);
        }

        for &i in queries {
            let query = [points[i].x, points[i].y];
            for hit in tree.within_unsorted::<SquaredEuclidean>(&query, r2) {
                let j = hit.item as usize;
                if j > i && metric.distance(&points[i], &points[j]) < radius {
                    relation.add_pair(i, j);
                }
            }
        }
    };

    run_local_search(points, radius, metric, space_partition, local)
}

fn find_spherical(
    points: &[Point2],
    radius: f64,
    sphere: f64,
    space_partition: bool,
) -> NeighborRelation {
    let metric = DistanceMetric::GreatCircle { radius: sphere };
    let projected: Vec<_> = points.iter().map(|p| metric::to_sphere(p, sphere)).collect();
    let chord = metric::chord_length(sphere, radius) * CHORD_PAD;
    let r2 = chord * chord;

    let local = |candidates: &[usize], queries: &[usize], relation: &mut NeighborRelation| {
        let mut tree: KdTree<f64, 3> = KdTree::new();
        for &j in candidates {
            let q = &projected[j];
            tree.add(&[q.x, q.y, q.z], j as u64);
        }

        for &i in queries {
            let q = &projected[i];
            for hit in tree.within_unsorted::<SquaredEuclidean>(&[q.x, q.y, q.z], r2) {
                let j = hit.item as usize;
                if j > i && metric.distance(&points[i], &points[j]) < radius {
                    relation.add_pair(i, j);
                }
            }
        }
    };

    run_local_search(points, radius, metric, space_partition, local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_radius_query() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.3, 0.0),
            Point2::new(0.0, 0.9),
            Point2::new(2.0, 2.0),
        ];
        let relation = find(&points, 1.0, DistanceMetric::Planar, false);
        let mut n0 = relation.neighbors(0).to_vec();
        n0.sort_unstable();
        assert_eq!(n0, vec![1, 2]);
        assert_eq!(relation.degree(3), 0);
    }

    #[test]
    fn spherical_query_crosses_the_antimeridian() {
        // 0.4 degrees of longitude apart across the 180 meridian, which the
        // 3-D projection handles without any wraparound special case
        let points = vec![Point2::new(179.8, 0.0), Point2::new(-179.8, 0.0)];
        let relation = find(&points, 50.0, DistanceMetric::earth(), false);
        assert_eq!(relation.neighbors(0), &[1]);
    }

    #[test]
    fn partitioned_and_global_agree() {
        let points = vec![
            Point2::new(0.05, 0.05),
            Point2::new(0.10, 0.05),
            Point2::new(0.95, 0.95),
            Point2::new(1.05, 1.05),
            Point2::new(4.0, 4.0),
        ];
        let global = find(&points, 0.25, DistanceMetric::Planar, false);
        let partitioned = find(&points, 0.25, DistanceMetric::Planar, true);
        for i in 0..points.len() {
            let mut a = global.neighbors(i).to_vec();
            let mut b = partitioned.neighbors(i).to_vec();
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b);
        }
    }
}
