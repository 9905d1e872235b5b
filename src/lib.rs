//! `geothin` reduces a set of 2-D points, either geographic (longitude,
//! latitude) or planar, to a subset in which no two retained points lie closer
//! than a minimum separation distance. It is used to de-bias spatially
//! clustered point datasets before downstream statistical modeling.
//!
//! Thinning runs as a number of independent randomized trials, keeping either
//! the trial which retained the most points or the full list of trial
//! outcomes. Neighbor discovery under the separation constraint is available
//! through four interchangeable strategies (exhaustive pairwise, hash grid,
//! k-d tree, bounding-volume tree), and two lighter bucket reducers skip
//! neighbor discovery entirely by keeping one point per rounded coordinate or
//! grid cell.

pub mod common;
pub mod errors;
pub mod metric;
pub mod neighbors;
pub mod thin;

pub type Result<T> = std::result::Result<T, ThinError>;

pub type Point2 = parry2d_f64::na::Point2<f64>;
pub type Vector2 = parry2d_f64::na::Vector2<f64>;
pub type Aabb2 = parry2d_f64::bounding_volume::Aabb;

pub type Point3 = parry3d_f64::na::Point3<f64>;
pub type Vector3 = parry3d_f64::na::Vector3<f64>;
pub type Aabb3 = parry3d_f64::bounding_volume::Aabb;

pub use common::IndexMask;
pub use errors::ThinError;
pub use metric::{DistanceMetric, EARTH_RADIUS_KM, KM_PER_DEGREE};
pub use neighbors::{NeighborRelation, SearchStrategy, find_neighbors};
pub use thin::{
    CellResolver, SquareGrid, Strategy, ThinParams, TrialSet, thin, thin_with_resolver,
};
