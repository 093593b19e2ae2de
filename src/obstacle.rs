use crate::lane::{forward_in_lane, LaneQuad};
use serde::{Deserialize, Serialize};

/// The lane cells occupied by perceived obstacles.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ObstacleFootprint {
    /// The occupied cells, each tagged with the ID of the lane cell it matches.
    polygons: Vec<LaneQuad>,
}

impl ObstacleFootprint {
    /// Creates a footprint from a set of occupied cells.
    pub fn new(polygons: Vec<LaneQuad>) -> Self {
        Self { polygons }
    }

    /// The occupied cells.
    pub fn polygons(&self) -> &[LaneQuad] {
        &self.polygons
    }

    /// Returns true if no cells are occupied.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Gets the nearest occupied cell ahead of `from` in its lane.
    pub fn nearest_ahead(&self, from: &LaneQuad) -> Option<&LaneQuad> {
        forward_in_lane(&self.polygons, from).first().copied()
    }
}
