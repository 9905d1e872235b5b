//! Bounding-volume tree neighbor search. Each point becomes a degenerate
//! leaf box in a parry Qbvh, and neighbors are gathered by intersecting the
//! hierarchy with a box of half-extent equal to the search radius around each
//! query point, then confirming candidates against the metric. Same contract
//! and optional space partitioning pre-pass as the k-d tree search, with
//! different query-time behavior on degenerate point layouts.

use super::NeighborRelation;
use super::grid::run_local_search;
use crate::metric::{self, DistanceMetric};
use crate::{Aabb2, Aabb3, Point2, Vector2, Vector3};
use parry2d_f64::partitioning::Qbvh as Qbvh2;
use parry3d_f64::partitioning::Qbvh as Qbvh3;

// Same padding rule as the k-d search: the box query is a superset filter
// and the metric distance decides membership.
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
    let half = Vector2::new(radius, radius);

    let local = |candidates: &[usize], queries: &[usize], relation: &mut NeighborRelation| {
        let mut tree: Qbvh2<u32> = Qbvh2::new();
        tree.clear_and_rebuild(
            candidates
                .iter()
                .map(|&j| (j as u32, Aabb2::new(points[j], points[j]))),
            0.0,
        );

        let mut hits: Vec<u32> = Vec::new();
        for &i in queries {
            hits.clear();
            tree.intersect_aabb(&Aabb2::new(points[i] - half, points[i] + half), &mut hits);
            for &hit in &hits {
                let j = hit as usize;
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
    let half = Vector3::repeat(chord);

    let local = |candidates: &[usize], queries: &[usize], relation: &mut NeighborRelation| {
        let mut tree: Qbvh3<u32> = Qbvh3::new();
        tree.clear_and_rebuild(
            candidates
                .iter()
                .map(|&j| (j as u32, Aabb3::new(projected[j], projected[j]))),
            0.0,
        );

        let mut hits: Vec<u32> = Vec::new();
        for &i in queries {
            hits.clear();
            let q = projected[i];
            tree.intersect_aabb(&Aabb3::new(q - half, q + half), &mut hits);
            for &hit in &hits {
                let j = hit as usize;
                if j > i && metric.distance(&points[i], &points[j]) < radius {
                    relation.add_pair(i, j);
                }
            }
        }
    };

    run_local_search(points, radius, metric, space_partition, local)
}
