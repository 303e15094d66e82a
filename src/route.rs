//! Route sampling
//!
//! Produces the ordered waypoint coordinates between departure and arrival by
//! interpolating latitude and longitude independently. This is a straight-line
//! approximation rather than a true great-circle path, which is acceptable at
//! the short-haul scale this service targets.

use crate::models::Coordinate;

/// Default number of waypoints per route, including both endpoints.
pub const DEFAULT_WAYPOINT_COUNT: usize = 6;

/// Sample `count` points from `start` to `end` inclusive.
///
/// The first element is exactly `start` and the last exactly `end`;
/// intermediate points are evenly spaced on the lat/lon interpolation line.
///
/// # Panics
///
/// Panics if `count < 2`; a route needs at least its two endpoints.
#[must_use]
pub fn sample(start: Coordinate, end: Coordinate, count: usize) -> Vec<Coordinate> {
    assert!(count >= 2, "a route needs at least two waypoints");

    let steps = (count - 1) as f64;
    (0..count)
        .map(|i| {
            if i == 0 {
                start
            } else if i == count - 1 {
                // avoid float drift at the arrival endpoint
                end
            } else {
                let t = i as f64 / steps;
                Coordinate::new(
                    start.latitude + (end.latitude - start.latitude) * t,
                    start.longitude + (end.longitude - start.longitude) * t,
                )
            }
        })
        .collect()
}
