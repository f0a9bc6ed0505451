//! Geographic utilities shared by the display models.

use geo::{Distance, Haversine, Point};

use crate::GpsPoint;

/// Haversine distance between two GPS points, in meters.
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    Haversine::distance(
        Point::new(p1.longitude, p1.latitude),
        Point::new(p2.longitude, p2.latitude),
    )
}

/// Total length of an ordered coordinate chain, in meters.
///
/// Fewer than two points is a zero-length chain, not an error.
pub fn path_distance(points: &[GpsPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_distance(&pair[0], &pair[1]))
        .sum()
}
