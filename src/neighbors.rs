//! Neighbor discovery: for every point in a set, find the other points lying
//! within a separation radius. Four interchangeable search strategies share
//! one contract and produce identical relations, differing only in how they
//! narrow the candidate pairs before the metric makes the final call.

pub mod exhaustive;
pub mod grid;
pub mod kd_tree;
pub mod range_tree;

use crate::Point2;
use crate::metric::DistanceMetric;
use log::debug;
use serde::{Deserialize, Serialize};

/// The algorithm used to discover neighbor pairs under the separation radius.
///
/// Every strategy applies the exact metric distance as its final membership
/// test, so all of them return the same relation for the same input. They
/// trade construction cost against query cost: `Exhaustive` is the O(n²)
/// reference, `GridHash` bounds work by local point density, and the two tree
/// strategies answer radius queries from a spatial index, optionally built
/// per grid neighborhood instead of globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// Test every unordered pair of points.
    Exhaustive,

    /// Bucket points into a uniform grid and scan each point's 3x3 cell
    /// neighborhood.
    GridHash,

    /// Radius queries against a k-d tree, one global tree or one small tree
    /// per 3x3 grid neighborhood when `space_partition` is set.
    KdTree { space_partition: bool },

    /// Radius queries against a bounding-volume hierarchy, with the same
    /// optional space partitioning pre-pass as the k-d tree.
    RangeTree { space_partition: bool },
}

/// The per-point adjacency produced by neighbor discovery: for each point
/// index, the indices of the other points within the separation radius. A
/// point is never its own neighbor, but coincident duplicate points are
/// legitimate neighbors of each other. The relation is symmetric; pairs are
/// recorded once and stored in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborRelation {
    lists: Vec<Vec<usize>>,
}

impl NeighborRelation {
    /// Create an empty relation over `len` points.
    pub fn new(len: usize) -> Self {
        NeighborRelation {
            lists: vec![Vec::new(); len],
        }
    }

    /// The number of points the relation covers.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Check whether the relation covers zero points.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Record the unordered neighbor pair (i, j) in both directions. Callers
    /// must record each pair exactly once.
    pub fn add_pair(&mut self, i: usize, j: usize) {
        self.lists[i].push(j);
        self.lists[j].push(i);
    }

    /// The neighbors of point `i`.
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.lists[i]
    }

    /// The number of neighbors of point `i`.
    pub fn degree(&self, i: usize) -> usize {
        self.lists[i].len()
    }

    /// The total number of unordered neighbor pairs.
    pub fn edge_count(&self) -> usize {
        self.lists.iter().map(|l| l.len()).sum::<usize>() / 2
    }
}

/// Builds the neighbor relation for a point set: every pair of distinct
/// points with metric distance strictly less than `radius` becomes a neighbor
/// pair. The radius must be positive; callers validate it before reaching
/// this point.
///
/// # Arguments
///
/// * `points`: the point set, geographic or planar per the metric
/// * `radius`: the separation radius defining neighborhood
/// * `metric`: the distance metric
/// * `strategy`: the search strategy to use
///
/// returns: NeighborRelation
pub fn find_neighbors(
    points: &[Point2],
    radius: f64,
    metric: DistanceMetric,
    strategy: SearchStrategy,
) -> NeighborRelation {
    let relation = match strategy {
        SearchStrategy::Exhaustive => exhaustive::find(points, radius, metric),
        SearchStrategy::GridHash => grid::find(points, radius, metric),
        SearchStrategy::KdTree { space_partition } => {
            kd_tree::find(points, radius, metric, space_partition)
        }
        SearchStrategy::RangeTree { space_partition } => {
            range_tree::find(points, radius, metric, space_partition)
        }
    };

    debug!(
        "{:?} found {} neighbor pairs over {} points",
        strategy,
        relation.edge_count(),
        points.len()
    );
    relation
}
