//! Distance metrics for point sets in planar or geographic coordinates, and
//! the spherical projection helpers used by the tree-based neighbor searches.

use crate::{Point2, Point3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate span of one degree of latitude on Earth, in kilometers. Used
/// to convert kilometer separation distances into angular grid cell sizes.
pub const KM_PER_DEGREE: f64 = 111.32;

/// The metric under which point-to-point distances are measured. Geographic
/// inputs are (longitude, latitude) pairs in degrees; planar inputs are in
/// whatever linear unit the caller works in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Straight-line euclidean distance in the units of the input coordinates.
    Planar,

    /// Great-circle distance over a sphere of the given radius. Output
    /// distances are in the same unit as the radius.
    GreatCircle { radius: f64 },
}

impl DistanceMetric {
    /// Great-circle metric over the mean Earth radius, in kilometers.
    pub const fn earth() -> Self {
        DistanceMetric::GreatCircle {
            radius: EARTH_RADIUS_KM,
        }
    }

    /// Returns the distance between two points under this metric. The
    /// distance from a point to itself is exactly zero, and coincident
    /// points have distance zero from each other.
    ///
    /// # Arguments
    ///
    /// * `a`: the first point
    /// * `b`: the second point
    ///
    /// returns: f64
    ///
    /// # Examples
    ///
    /// ```
    /// use geothin::{DistanceMetric, Point2};
    /// let a = Point2::new(1.0, 2.0);
    /// let b = Point2::new(4.0, 6.0);
    /// assert_eq!(DistanceMetric::Planar.distance(&a, &b), 5.0);
    /// ```
    pub fn distance(&self, a: &Point2, b: &Point2) -> f64 {
        match self {
            DistanceMetric::Planar => (a - b).norm(),
            DistanceMetric::GreatCircle { radius } => haversine(a, b, *radius),
        }
    }
}

/// Computes the haversine great-circle distance between two (longitude,
/// latitude) points in degrees, over a sphere of the given radius.
///
/// # Arguments
///
/// * `a`: the first point, (longitude, latitude) in degrees
/// * `b`: the second point, (longitude, latitude) in degrees
/// * `radius`: the sphere radius; the result is in the same unit
///
/// returns: f64
pub fn haversine(a: &Point2, b: &Point2, radius: f64) -> f64 {
    let d_lat = (b.y - a.y).to_radians();
    let d_lon = (b.x - a.x).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.y.to_radians().cos() * b.y.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    radius * c
}

/// Projects a (longitude, latitude) point in degrees onto the surface of a
/// sphere of the given radius, returning 3-D cartesian coordinates. The
/// euclidean distance between two projected points is the chord of their
/// great-circle arc, so radius queries in 3-D can stand in for great-circle
/// radius queries once the search radius is converted with [`chord_length`].
pub fn to_sphere(p: &Point2, radius: f64) -> Point3 {
    let lon = p.x.to_radians();
    let lat = p.y.to_radians();
    Point3::new(
        radius * lat.cos() * lon.cos(),
        radius * lat.cos() * lon.sin(),
        radius * lat.sin(),
    )
}

/// Length of the straight chord spanning a great-circle arc on a sphere of
/// the given radius. Monotone in the arc length, clamped at the antipode.
pub fn chord_length(radius: f64, arc: f64) -> f64 {
    let half = (arc / (2.0 * radius)).min(FRAC_PI_2);
    2.0 * radius * half.sin()
}
