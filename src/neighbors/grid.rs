//! Uniform grid bucketing of a point set. This backs the hash-grid neighbor
//! search directly, and provides the space partitioning pre-pass the tree
//! searches can use to build many small indices instead of one global one.

use super::NeighborRelation;
use crate::Point2;
use crate::common::index_vec;
use crate::metric::{DistanceMetric, EARTH_RADIUS_KM, KM_PER_DEGREE};
use std::collections::HashMap;

/// The grid cell size matching a separation radius: the radius itself for
/// planar input, or the radius converted to degrees for geographic input
/// using the mean span of one degree of latitude. The degree conversion is an
/// approximation which under-covers longitude away from the equator; clusters
/// far from the equator can make a cell hold a neighbor the 3x3 scan misses.
pub(crate) fn cell_size_for(radius: f64, metric: DistanceMetric) -> f64 {
    match metric {
        DistanceMetric::Planar => radius,
        // One degree of latitude spans about 111.32 km on Earth; rescale for
        // spheres in other units or of other sizes.
        DistanceMetric::GreatCircle { radius: sphere } => {
            radius / (KM_PER_DEGREE * sphere / EARTH_RADIUS_KM)
        }
    }
}

/// A flat spatial bucket index. Every occupied cell gets a compact id, and
/// the point indices of each cell are stored in plain vectors, so the 3x3
/// neighborhood scan walks slices instead of chasing nested maps.
pub(crate) struct GridIndex {
    cell_size: f64,
    lookup: HashMap<(i64, i64), u32>,
    keys: Vec<(i64, i64)>,
    buckets: Vec<Vec<usize>>,
}

impl GridIndex {
    /// Bucket every point by floor division of its coordinates.
    pub fn build(points: &[Point2], cell_size: f64) -> Self {
        let mut index = GridIndex {
            cell_size,
            lookup: HashMap::new(),
            keys: Vec::new(),
            buckets: Vec::new(),
        };

        for (i, p) in points.iter().enumerate() {
            let key = index.key_of(p);
            let id = match index.lookup.get(&key) {
                Some(&id) => id,
                None => {
                    let id = index.buckets.len() as u32;
                    index.lookup.insert(key, id);
                    index.keys.push(key);
                    index.buckets.push(Vec::new());
                    id
                }
            };
            index.buckets[id as usize].push(i);
        }

        index
    }

    /// The cell key a point falls into.
    pub fn key_of(&self, p: &Point2) -> (i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }

    /// The point indices in the cell with the given key, if it is occupied.
    pub fn bucket(&self, key: (i64, i64)) -> Option<&[usize]> {
        self.lookup
            .get(&key)
            .map(|&id| self.buckets[id as usize].as_slice())
    }

    /// Iterate the occupied cells as (key, point indices).
    pub fn occupied(&self) -> impl Iterator<Item = ((i64, i64), &[usize])> {
        self.keys
            .iter()
            .copied()
            .zip(self.buckets.iter().map(|b| b.as_slice()))
    }

    /// Collect the point indices of the 3x3 cell neighborhood centered on
    /// `key`.
    pub fn neighborhood(&self, key: (i64, i64)) -> Vec<usize> {
        let mut cluster = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(bucket) = self.bucket((key.0 + dx, key.1 + dy)) {
                    cluster.extend_from_slice(bucket);
                }
            }
        }
        cluster
    }
}

/// Hash-grid neighbor search: bucket all points, then for each point test the
/// candidates of its own and the 8 adjacent cells against the metric. Work is
/// bounded by the average 3x3 neighborhood occupancy, which degrades to the
/// full pairwise cost when all points share a few cells.
pub fn find(points: &[Point2], radius: f64, metric: DistanceMetric) -> NeighborRelation {
    let grid = GridIndex::build(points, cell_size_for(radius, metric));
    let mut relation = NeighborRelation::new(points.len());

    for (key, cell) in grid.occupied() {
        let cluster = grid.neighborhood(key);
        for &i in cell {
            for &j in &cluster {
                if j > i && metric.distance(&points[i], &points[j]) < radius {
                    relation.add_pair(i, j);
                }
            }
        }
    }

    relation
}

/// Drive a local search either once over the whole point set, or once per
/// occupied grid cell with the cell's 3x3 neighborhood as the candidate pool.
/// `local` receives (candidate indices, query indices) and records the pairs
/// it confirms; each unordered pair must be recorded only from its
/// lower-index side so the overlapping neighborhoods cannot duplicate it.
pub(crate) fn run_local_search<F>(
    points: &[Point2],
    radius: f64,
    metric: DistanceMetric,
    space_partition: bool,
    mut local: F,
) -> NeighborRelation
where
    F: FnMut(&[usize], &[usize], &mut NeighborRelation),
{
    let mut relation = NeighborRelation::new(points.len());

    if space_partition {
        let grid = GridIndex::build(points, cell_size_for(radius, metric));
        for (key, cell) in grid.occupied() {
            let cluster = grid.neighborhood(key);
            local(&cluster, cell, &mut relation);
        }
    } else {
        let all = index_vec(None, points.len());
        local(&all, &all, &mut relation);
    }

    relation
}
