//! Spatial thinning of a point set: retain a subset in which no two points
//! lie closer than a minimum separation, keeping as many points as possible
//! (or exactly a requested number). This module holds the public entry
//! points, the configuration types, and the validation that runs before any
//! algorithmic work.

pub mod eviction;
pub mod farthest;
pub mod reducers;
pub mod trials;

use crate::common::IndexMask;
use crate::errors::ThinError;
use crate::metric::DistanceMetric;
use crate::neighbors::exhaustive::DistanceMatrix;
use crate::neighbors::{SearchStrategy, find_neighbors};
use crate::{Point2, Result};
use log::debug;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// How the kept subset is decided. The first four variants discover the
/// neighbor relation under the separation radius with the corresponding
/// [`SearchStrategy`] and then run randomized greedy eviction; the last two
/// are bucket reducers that keep one point per grid cell or per rounded
/// coordinate pair and never look at pairwise distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Strategy {
    /// Neighbor discovery by testing every pair of points.
    Exhaustive,

    /// Neighbor discovery over a uniform hash grid.
    GridHash,

    /// Neighbor discovery by k-d tree radius queries, optionally building
    /// one small tree per grid neighborhood instead of a global tree.
    KdTree { space_partition: bool },

    /// Neighbor discovery by bounding-volume tree range queries, with the
    /// same optional partitioning pre-pass.
    RangeTree { space_partition: bool },

    /// Keep one point per square grid cell of the given size, measured in
    /// the raw coordinate units.
    GridCell { cell_size: f64 },

    /// Keep one point per distinct coordinate pair after rounding to the
    /// given number of decimal places.
    Precision { decimals: i32 },
}

impl Strategy {
    fn search(&self) -> Option<SearchStrategy> {
        match *self {
            Strategy::Exhaustive => Some(SearchStrategy::Exhaustive),
            Strategy::GridHash => Some(SearchStrategy::GridHash),
            Strategy::KdTree { space_partition } => {
                Some(SearchStrategy::KdTree { space_partition })
            }
            Strategy::RangeTree { space_partition } => {
                Some(SearchStrategy::RangeTree { space_partition })
            }
            Strategy::GridCell { .. } | Strategy::Precision { .. } => None,
        }
    }
}

/// Configuration for a thinning run.
///
/// `min_distance` is the separation below which two points are considered
/// neighbors, in the unit of the metric (kilometers for the Earth metric,
/// coordinate units for the planar metric). It must be positive for the
/// neighbor-discovery strategies and for exact target counts; the bucket
/// reducers have their own size knobs and ignore it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinParams {
    pub min_distance: f64,
    pub metric: DistanceMetric,
    pub strategy: Strategy,

    /// Number of independent randomized trials to run. Must be at least 1.
    pub trials: u32,

    /// Return every trial's result instead of only the best one.
    pub all_trials: bool,

    /// Request exactly this many retained points via farthest-point
    /// selection instead of maximizing retention. Only the
    /// neighbor-discovery strategies accept a target.
    pub target_count: Option<u32>,

    /// Per-point scores replacing random ordering: higher scores are kept
    /// first, and among eviction ties the lowest score goes first. Length
    /// must match the point count. Farthest-point selection ignores this.
    pub priority: Option<Vec<f64>>,

    /// Seed for reproducible trials. A random seed is drawn when absent.
    pub seed: Option<u64>,
}

impl ThinParams {
    /// Parameters for a geographic thinning run with the given separation in
    /// kilometers: Earth great-circle metric, k-d tree discovery, 10 trials,
    /// best-of selection.
    pub fn new(min_distance: f64) -> Self {
        ThinParams {
            min_distance,
            metric: DistanceMetric::earth(),
            strategy: Strategy::KdTree {
                space_partition: false,
            },
            trials: 10,
            all_trials: false,
            target_count: None,
            priority: None,
            seed: None,
        }
    }
}

/// The outcome of a thinning run: either the single best trial, or every
/// trial in order. Each mask is aligned with the input points; `get(i)` is
/// true iff point `i` was retained.
#[derive(Debug, Clone, PartialEq)]
pub enum TrialSet {
    Best(IndexMask),
    All(Vec<IndexMask>),
}

impl TrialSet {
    /// The trial which retained the most points; for all-trials sets, ties
    /// go to the earliest trial.
    ///
    /// Panics when called on an all-trials set holding no trials, which the
    /// entry points never produce.
    pub fn best(&self) -> &IndexMask {
        match self {
            TrialSet::Best(mask) => mask,
            TrialSet::All(masks) => {
                let mut best = masks.first().expect("trial sets hold at least one trial");
                for mask in masks.iter().skip(1) {
                    if mask.count_true() > best.count_true() {
                        best = mask;
                    }
                }
                best
            }
        }
    }

    /// All trial masks in trial order; a best-of set exposes its single mask.
    pub fn all(&self) -> &[IndexMask] {
        match self {
            TrialSet::Best(mask) => std::slice::from_ref(mask),
            TrialSet::All(masks) => masks,
        }
    }
}

/// Maps a point to the id of the grid cell containing it. Implemented
/// outside the core by raster/grid layers; [`SquareGrid`] is the built-in
/// resolver for plain square cells.
pub trait CellResolver {
    fn cell_id(&self, index: usize, point: &Point2) -> i64;
}

/// Square grid cells over the raw coordinates, anchored at an origin.
pub struct SquareGrid {
    pub cell_size: f64,
    pub origin: Point2,
}

impl SquareGrid {
    pub fn new(cell_size: f64) -> Self {
        SquareGrid {
            cell_size,
            origin: Point2::origin(),
        }
    }
}

impl CellResolver for SquareGrid {
    fn cell_id(&self, _index: usize, point: &Point2) -> i64 {
        let ix = ((point.x - self.origin.x) / self.cell_size).floor() as i64;
        let iy = ((point.y - self.origin.y) / self.cell_size).floor() as i64;
        // Pack the two cell coordinates into one id
        (ix << 32) ^ (iy & 0xFFFF_FFFF)
    }
}

/// Thin a point set so that no two retained points lie within
/// `params.min_distance` of each other (neighbor-discovery strategies), or
/// so that at most one point per bucket remains (reducer strategies), over
/// `params.trials` randomized trials.
///
/// Point order is preserved: every returned mask aligns positionally with
/// `points`. An empty input is not an error and returns empty all-kept masks
/// in the requested output shape. A single point is always kept, and fully
/// coincident points collapse to exactly one kept point.
///
/// # Arguments
///
/// * `points`: the points, (longitude, latitude) degrees for great-circle
///   metrics or planar coordinates otherwise
/// * `params`: the thinning configuration
///
/// returns: Result<TrialSet, ThinError>
///
/// # Examples
///
/// ```
/// use geothin::{DistanceMetric, Point2, Strategy, ThinParams, thin};
///
/// let points = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(0.0, 0.0001),
///     Point2::new(10.0, 10.0),
/// ];
/// let mut params = ThinParams::new(0.01);
/// params.metric = DistanceMetric::Planar;
/// params.strategy = Strategy::Exhaustive;
/// params.trials = 1;
/// params.seed = Some(7);
///
/// let result = thin(&points, &params).unwrap();
/// assert_eq!(result.best().count_true(), 2);
/// assert!(result.best().get(2));
/// ```
pub fn thin(points: &[Point2], params: &ThinParams) -> Result<TrialSet> {
    validate(points, params)?;
    let seed = params.seed.unwrap_or_else(rand::random);
    debug!(
        "thinning {} points with {:?} over {} trials",
        points.len(),
        params.strategy,
        params.trials
    );

    if points.is_empty() {
        return Ok(trials::empty_set(params.trials, params.all_trials));
    }

    if let Some(target) = params.target_count {
        let matrix = DistanceMatrix::build(points, params.metric);
        let min_distance = params.min_distance;
        let run = |rng: &mut StdRng| {
            farthest::select_farthest(&matrix, target as usize, min_distance, rng)
        };
        return Ok(trials::run_trials(params.trials, params.all_trials, seed, run));
    }

    match params.strategy {
        Strategy::Precision { decimals } => {
            let priority = params.priority.as_deref();
            let run = |rng: &mut StdRng| {
                let order = reducers::evaluation_order(points.len(), priority, rng);
                reducers::reduce_precision(points, decimals as u32, &order)
            };
            Ok(trials::run_trials(params.trials, params.all_trials, seed, run))
        }
        Strategy::GridCell { cell_size } => {
            let resolver = SquareGrid::new(cell_size);
            Ok(run_cell_reducer(points, &resolver, params, seed))
        }
        _ => {
            let strategy = params
                .strategy
                .search()
                .expect("remaining strategies discover neighbors");
            let relation = find_neighbors(points, params.min_distance, params.metric, strategy);
            let priority = params.priority.as_deref();
            let run = |rng: &mut StdRng| eviction::evict_most_connected(&relation, priority, rng);
            Ok(trials::run_trials(params.trials, params.all_trials, seed, run))
        }
    }
}

/// Thin a point set with the grid-cell reducer over externally resolved cell
/// ids, one kept point per distinct id. This is the entry point for
/// raster-derived grids: the resolver maps each point to the id of the
/// raster cell containing it. Honors `trials`, `all_trials`, `priority` and
/// `seed`; `target_count` is not supported on this path.
pub fn thin_with_resolver(
    points: &[Point2],
    resolver: &dyn CellResolver,
    params: &ThinParams,
) -> Result<TrialSet> {
    validate_common(points, params)?;
    if params.target_count.is_some() {
        return Err(ThinError::InvalidTargetCount(
            "externally resolved grid cells cannot honor an exact target".to_string(),
        ));
    }

    let seed = params.seed.unwrap_or_else(rand::random);
    if points.is_empty() {
        return Ok(trials::empty_set(params.trials, params.all_trials));
    }

    Ok(run_cell_reducer(points, resolver, params, seed))
}

fn run_cell_reducer(
    points: &[Point2],
    resolver: &dyn CellResolver,
    params: &ThinParams,
    seed: u64,
) -> TrialSet {
    let cells: Vec<i64> = points
        .iter()
        .enumerate()
        .map(|(i, p)| resolver.cell_id(i, p))
        .collect();
    let priority = params.priority.as_deref();
    let run = |rng: &mut StdRng| {
        let order = reducers::evaluation_order(points.len(), priority, rng);
        reducers::reduce_cells(&cells, &order)
    };
    trials::run_trials(params.trials, params.all_trials, seed, run)
}

fn validate(points: &[Point2], params: &ThinParams) -> Result<()> {
    validate_common(points, params)?;

    match params.strategy {
        Strategy::Precision { decimals } => {
            if decimals < 0 {
                return Err(ThinError::InvalidPrecision(decimals));
            }
        }
        Strategy::GridCell { cell_size } => {
            if !(cell_size > 0.0) {
                return Err(ThinError::InvalidDistance(cell_size));
            }
        }
        _ => {
            if !(params.min_distance > 0.0) {
                return Err(ThinError::InvalidDistance(params.min_distance));
            }
        }
    }

    if let Some(target) = params.target_count {
        if params.strategy.search().is_none() {
            return Err(ThinError::InvalidTargetCount(format!(
                "{:?} cannot honor an exact target",
                params.strategy
            )));
        }
        if target as usize > points.len() {
            return Err(ThinError::InvalidTargetCount(format!(
                "target of {} exceeds the {} input points",
                target,
                points.len()
            )));
        }
    }

    Ok(())
}

fn validate_common(points: &[Point2], params: &ThinParams) -> Result<()> {
    if params.trials == 0 {
        return Err(ThinError::InvalidTrialCount(params.trials));
    }

    if let Some(priority) = &params.priority {
        if priority.len() != points.len() {
            return Err(ThinError::InvalidPriority(format!(
                "expected {} values, got {}",
                points.len(),
                priority.len()
            )));
        }
        if priority.iter().any(|v| !v.is_finite()) {
            return Err(ThinError::InvalidPriority(
                "values must be finite".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn planar_params(min_distance: f64, strategy: Strategy) -> ThinParams {
        let mut params = ThinParams::new(min_distance);
        params.metric = DistanceMetric::Planar;
        params.strategy = strategy;
        params.seed = Some(1402);
        params
    }

    fn pairwise_separated(points: &[Point2], mask: &IndexMask, min_distance: f64) {
        let kept = mask.to_indices();
        for (a, &i) in kept.iter().enumerate() {
            for &j in kept.iter().skip(a + 1) {
                let d = DistanceMetric::Planar.distance(&points[i], &points[j]);
                assert!(d >= min_distance, "pair ({}, {}) at {}", i, j, d);
            }
        }
    }

    #[test]
    fn coincident_cluster_and_a_far_point() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0001),
            Point2::new(10.0, 10.0),
        ];
        let mut params = planar_params(0.01, Strategy::Exhaustive);
        params.trials = 1;

        let result = thin(&points, &params).unwrap();
        let best = result.best();
        assert_eq!(best.count_true(), 2);
        assert!(best.get(0) ^ best.get(1));
        assert!(best.get(2));
    }

    #[test_case(Strategy::Exhaustive; "exhaustive")]
    #[test_case(Strategy::GridHash; "grid hash")]
    #[test_case(Strategy::KdTree { space_partition: false }; "kd tree")]
    #[test_case(Strategy::RangeTree { space_partition: true }; "range tree partitioned")]
    fn survivors_are_always_separated(strategy: Strategy) {
        use rand::prelude::*;
        let mut rng = StdRng::seed_from_u64(31);
        let points: Vec<Point2> = (0..200)
            .map(|_| Point2::new(rng.random_range(0.0..6.0), rng.random_range(0.0..6.0)))
            .collect();

        let mut params = planar_params(0.5, strategy);
        params.trials = 5;
        let result = thin(&points, &params).unwrap();
        pairwise_separated(&points, result.best(), 0.5);
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let params = planar_params(1.0, Strategy::GridHash);
        let result = thin(&[], &params).unwrap();
        assert!(result.best().is_empty());

        let mut params = planar_params(1.0, Strategy::GridHash);
        params.all_trials = true;
        params.trials = 3;
        let result = thin(&[], &params).unwrap();
        assert_eq!(result.all().len(), 3);
    }

    #[test]
    fn single_point_is_always_kept() {
        let points = vec![Point2::new(4.0, 4.0)];
        let params = planar_params(1e9, Strategy::KdTree { space_partition: false });
        let result = thin(&points, &params).unwrap();
        assert_eq!(result.best().as_slice(), &[true]);
    }

    #[test]
    fn all_points_kept_when_nothing_conflicts() {
        let points: Vec<Point2> = (0..8).map(|i| Point2::new(i as f64 * 3.0, 0.0)).collect();
        let params = planar_params(1.0, Strategy::GridHash);
        let result = thin(&points, &params).unwrap();
        assert_eq!(result.best().count_true(), 8);
    }

    #[test]
    fn same_seed_is_bit_identical_across_modes() {
        use rand::prelude::*;
        let mut rng = StdRng::seed_from_u64(77);
        let points: Vec<Point2> = (0..100)
            .map(|_| Point2::new(rng.random_range(0.0..3.0), rng.random_range(0.0..3.0)))
            .collect();

        let mut params = planar_params(0.4, Strategy::Exhaustive);
        params.trials = 8;
        params.seed = Some(2024);

        let best = thin(&points, &params).unwrap();
        let best_again = thin(&points, &params).unwrap();
        assert_eq!(best, best_again);

        params.all_trials = true;
        let all = thin(&points, &params).unwrap();
        assert_eq!(all.best(), best.best());
    }

    #[test]
    fn all_trials_returns_one_mask_per_trial() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.1, 0.0),
            Point2::new(5.0, 5.0),
        ];
        let mut params = planar_params(0.5, Strategy::Exhaustive);
        params.trials = 7;
        params.all_trials = true;

        let result = thin(&points, &params).unwrap();
        assert_eq!(result.all().len(), 7);
        for mask in result.all() {
            assert_eq!(mask.len(), 3);
            assert_eq!(mask.count_true(), 2);
        }
    }

    #[test]
    fn target_count_keeps_exactly_k() {
        let points: Vec<Point2> = (0..12).map(|i| Point2::new(i as f64 * 10.0, 0.0)).collect();
        let mut params = planar_params(1.0, Strategy::Exhaustive);
        params.target_count = Some(5);
        params.trials = 3;

        let result = thin(&points, &params).unwrap();
        assert_eq!(result.best().count_true(), 5);
        pairwise_separated(&points, result.best(), 1.0);
    }

    #[test]
    fn target_count_falls_short_under_a_tight_constraint() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.1, 0.0),
            Point2::new(0.0, 0.1),
        ];
        let mut params = planar_params(10.0, Strategy::Exhaustive);
        params.target_count = Some(3);
        params.trials = 4;

        let result = thin(&points, &params).unwrap();
        assert_eq!(result.best().count_true(), 1);
    }

    #[test]
    fn priority_is_deterministic_for_reducers() {
        let points = vec![
            Point2::new(0.11, 0.0),
            Point2::new(0.12, 0.0),
            Point2::new(3.0, 3.0),
        ];
        let mut params = planar_params(0.0, Strategy::Precision { decimals: 1 });
        params.priority = Some(vec![0.5, 2.0, 1.0]);
        params.trials = 6;
        params.all_trials = true;

        let result = thin(&points, &params).unwrap();
        for mask in result.all() {
            assert_eq!(mask.to_indices(), vec![1, 2]);
        }
    }

    #[test]
    fn grid_cell_strategy_keeps_one_per_cell() {
        let points = vec![
            Point2::new(0.2, 0.2),
            Point2::new(0.8, 0.8),
            Point2::new(1.5, 0.5),
            Point2::new(-0.5, -0.5),
        ];
        let mut params = planar_params(0.0, Strategy::GridCell { cell_size: 1.0 });
        params.trials = 1;

        let result = thin(&points, &params).unwrap();
        assert_eq!(result.best().count_true(), 3);
        assert!(result.best().get(0) ^ result.best().get(1));
        assert!(result.best().get(2));
        assert!(result.best().get(3));
    }

    #[test]
    fn resolver_cells_come_from_the_caller() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(50.0, 50.0),
            Point2::new(-3.0, 7.0),
        ];
        // A raster stand-in that places every point in the same cell
        struct OneCell;
        impl CellResolver for OneCell {
            fn cell_id(&self, _index: usize, _point: &Point2) -> i64 {
                42
            }
        }

        let resolver = OneCell;
        let mut params = planar_params(1.0, Strategy::GridCell { cell_size: 1.0 });
        params.trials = 2;

        let result = thin_with_resolver(&points, &resolver, &params).unwrap();
        assert_eq!(result.best().count_true(), 1);
    }

    #[test]
    fn validation_failures() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)];

        let params = planar_params(0.0, Strategy::Exhaustive);
        assert!(matches!(
            thin(&points, &params),
            Err(ThinError::InvalidDistance(_))
        ));

        let params = planar_params(-2.0, Strategy::KdTree { space_partition: false });
        assert!(matches!(
            thin(&points, &params),
            Err(ThinError::InvalidDistance(_))
        ));

        let params = planar_params(1.0, Strategy::Precision { decimals: -1 });
        assert!(matches!(
            thin(&points, &params),
            Err(ThinError::InvalidPrecision(-1))
        ));

        let params = planar_params(1.0, Strategy::GridCell { cell_size: 0.0 });
        assert!(matches!(
            thin(&points, &params),
            Err(ThinError::InvalidDistance(_))
        ));

        let mut params = planar_params(1.0, Strategy::Exhaustive);
        params.trials = 0;
        assert!(matches!(
            thin(&points, &params),
            Err(ThinError::InvalidTrialCount(0))
        ));

        let mut params = planar_params(1.0, Strategy::Exhaustive);
        params.priority = Some(vec![1.0]);
        assert!(matches!(
            thin(&points, &params),
            Err(ThinError::InvalidPriority(_))
        ));

        let mut params = planar_params(1.0, Strategy::Exhaustive);
        params.priority = Some(vec![1.0, f64::NAN]);
        assert!(matches!(
            thin(&points, &params),
            Err(ThinError::InvalidPriority(_))
        ));

        let mut params = planar_params(1.0, Strategy::Exhaustive);
        params.target_count = Some(3);
        assert!(matches!(
            thin(&points, &params),
            Err(ThinError::InvalidTargetCount(_))
        ));

        let mut params = planar_params(1.0, Strategy::Precision { decimals: 2 });
        params.target_count = Some(1);
        assert!(matches!(
            thin(&points, &params),
            Err(ThinError::InvalidTargetCount(_))
        ));
    }
}
