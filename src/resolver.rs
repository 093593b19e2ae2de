//! Along-lane distance to the nearest obstacle.

use crate::error::{NavError, Result};
use crate::lane::{LaneMap, LaneQuad};
use crate::math::Point2d;
use crate::obstacle::ObstacleFootprint;

/// Finds the lane cell the vehicle currently occupies.
///
/// # Parameters
/// * `map` - The local lane map
/// * `pos` - The vehicle's position in map coordinates
/// * `max_dist` - How far the vehicle may be from the nearest cell midpoint
pub fn resolve_robot_quad(map: &LaneMap, pos: Point2d, max_dist: f64) -> Result<&LaneQuad> {
    map.closest_poly(pos, max_dist)
        .ok_or(NavError::UnresolvablePosition { x: pos.x, y: pos.y })
}

/// Computes the distance along the lane from the vehicle to the nearest obstacle ahead.
///
/// The lengths of the cells from the vehicle's own cell up to and including the
/// obstacle's cell are summed, so the result has a granularity of one cell.
/// Returns infinity when no obstacle occupies the lane ahead.
pub fn distance_ahead(map: &LaneMap, obstacles: &ObstacleFootprint, robot: &LaneQuad) -> f64 {
    let target = match obstacles.nearest_ahead(robot) {
        Some(quad) => quad.poly_id,
        None => return f64::INFINITY,
    };

    let mut distance = 0.0;
    for quad in map.forward_in_lane(robot) {
        distance += quad.length;
        if quad.poly_id == target {
            return distance;
        }
    }

    // The obstacle's cell is not part of the mapped lane
    f64::INFINITY
}

/// Resolves the vehicle's cell from its pose, then measures the distance to the nearest obstacle.
pub fn nearest_forward_distance(
    map: &LaneMap,
    obstacles: &ObstacleFootprint,
    pos: Point2d,
    max_poly_dist: f64,
) -> Result<f64> {
    let robot = resolve_robot_quad(map, pos, max_poly_dist)?;
    Ok(distance_ahead(map, obstacles, robot))
}
