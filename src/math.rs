//! Mathematical structs and functions.

use cgmath::prelude::*;
use cgmath::{Point2, Vector2};

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;

/// Rotates a vector 90 degrees clockwise.
pub fn rot90(vec: Vector2d) -> Vector2d {
    Vector2d::new(-vec.y, vec.x)
}

/// Gets the centroid of a set of points.
pub fn centroid(points: &[Point2d]) -> Point2d {
    Point2d::centroid(points)
}

/// Determines whether a point lies within a convex polygon.
///
/// The corners may be wound either way. Points on an edge count as inside.
pub fn convex_contains(corners: &[Point2d], point: Point2d) -> bool {
    let n = corners.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0;
    for i in 0..n {
        let a = corners[i];
        let b = corners[(i + 1) % n];
        let side = rot90(b - a).dot(point - a);
        if side == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = side.signum();
        } else if side.signum() != sign {
            return false;
        }
    }
    true
}

/// Divides `num` by `den`, returning `fallback` when `den` is within `eps` of zero.
pub fn guarded_div(num: f64, den: f64, eps: f64, fallback: f64) -> f64 {
    if den.abs() < eps {
        fallback
    } else {
        num / den
    }
}
