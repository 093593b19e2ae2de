use crate::math::{centroid, convex_contains, Point2d};
use cgmath::MetricSpace;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Number of forward lane cells stored inline before spilling to the heap.
const INLINE_CELLS: usize = 32;

/// The forward cells of a lane, nearest first.
pub type ForwardCells<'a> = SmallVec<[&'a LaneQuad; INLINE_CELLS]>;

/// Unique ID of a lane polygon within the road network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PolyId(pub i32);

/// Identifies a single lane of a road segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaneRef {
    /// The road segment number.
    pub seg: u32,
    /// The lane number within the segment.
    pub lane: u32,
}

/// A directed quadrilateral cell of a lane.
///
/// Polygon IDs increase in the direction of travel within a lane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneQuad {
    /// The polygon ID.
    pub poly_id: PolyId,
    /// The lane this cell belongs to.
    pub lane: LaneRef,
    /// The corners of the cell in world space, wound consistently.
    pub corners: [Point2d; 4],
    /// The length of the cell along the lane in m.
    pub length: f64,
}

impl LaneQuad {
    /// The centre of the cell.
    pub fn midpoint(&self) -> Point2d {
        centroid(&self.corners)
    }

    /// Returns true if the point lies within the cell.
    pub fn contains(&self, point: Point2d) -> bool {
        convex_contains(&self.corners, point)
    }

    /// Returns true if this cell is in the same lane as `from` and not behind it.
    pub fn is_forward_of(&self, from: &LaneQuad) -> bool {
        self.lane == from.lane && self.poly_id >= from.poly_id
    }
}

/// The local map of lane cells around the vehicle.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LaneMap {
    polygons: Vec<LaneQuad>,
}

impl LaneMap {
    /// Creates a lane map from a set of cells.
    pub fn new(polygons: Vec<LaneQuad>) -> Self {
        Self { polygons }
    }

    /// The cells in the map.
    pub fn polygons(&self) -> &[LaneQuad] {
        &self.polygons
    }

    /// Returns true if the map has no cells.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Finds the cell the given point lies in, or failing that, the cell whose
    /// midpoint is nearest to it, provided it is no further than `max_dist`.
    pub fn closest_poly(&self, point: Point2d, max_dist: f64) -> Option<&LaneQuad> {
        if let Some(quad) = self.polygons.iter().find(|quad| quad.contains(point)) {
            return Some(quad);
        }
        self.polygons
            .iter()
            .map(|quad| (quad, quad.midpoint().distance(point)))
            .filter(|(_, dist)| *dist <= max_dist)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(quad, _)| quad)
    }

    /// Gets the cells ahead of `from` in its lane, including `from` itself, nearest first.
    pub fn forward_in_lane(&self, from: &LaneQuad) -> ForwardCells<'_> {
        forward_in_lane(&self.polygons, from)
    }
}

/// Filters `cells` down to those ahead of `from` in its lane, ordered nearest first.
pub(crate) fn forward_in_lane<'a>(cells: &'a [LaneQuad], from: &LaneQuad) -> ForwardCells<'a> {
    cells
        .iter()
        .filter(|quad| quad.is_forward_of(from))
        .sorted_by_key(|quad| quad.poly_id)
        .collect()
}
