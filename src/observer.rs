use crate::error::Result;
use crate::lane::LaneMap;
use crate::math::Point2d;
use crate::obstacle::ObstacleFootprint;
use serde::Serialize;
use std::time::Instant;

pub use nearest_forward::{time_to_collision, NearestForward};

mod nearest_forward;

/// Time-to-collision above which the lane ahead is considered clear, in s.
pub const CLEAR_HORIZON: f64 = 10.0;

/// Identifies the observer that produced an [Observation].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ObserverId {
    /// Nearest obstacle ahead in the vehicle's own lane.
    NearestForward,
}

impl ObserverId {
    /// A human readable name for the observer.
    pub fn name(&self) -> &'static str {
        match self {
            ObserverId::NearestForward => "Nearest_forward",
        }
    }
}

/// What an observer currently knows about an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Observation {
    /// The observer that produced this observation.
    pub oid: ObserverId,
    /// Filtered distance to the obstacle in m; infinite if there is none.
    pub distance: f64,
    /// Filtered velocity of the obstacle relative to the vehicle in m/s; negative when closing.
    pub velocity: f64,
    /// Time until the obstacle is reached in s; infinite if it is not closing.
    pub time: f64,
    /// Whether the time-to-collision is beyond the [CLEAR_HORIZON].
    pub clear: bool,
    /// Whether the velocity estimate has warmed up and may be trusted.
    pub applicable: bool,
}

impl Observation {
    /// An observation of nothing, as reported before the first update.
    pub fn empty(oid: ObserverId) -> Self {
        Self {
            oid,
            distance: f64::INFINITY,
            velocity: 0.0,
            time: f64::INFINITY,
            clear: true,
            applicable: false,
        }
    }
}

/// The inputs an observer consumes each cycle.
#[derive(Clone, Copy)]
pub struct ObserverInputs<'a> {
    /// The lane cells around the vehicle.
    pub local_map: &'a LaneMap,
    /// The lane cells occupied by obstacles.
    pub obstacles: &'a ObstacleFootprint,
    /// The vehicle's position in map coordinates.
    pub pose: Point2d,
    /// When the inputs were received, from a monotonic clock.
    pub now: Instant,
}

/// Turns lane and obstacle geometry into an [Observation] each cycle.
pub trait Observer {
    /// The observer's ID.
    fn id(&self) -> ObserverId;

    /// The observer's name.
    fn name(&self) -> &'static str {
        self.id().name()
    }

    /// Processes one cycle of inputs and returns the updated observation.
    fn update(&mut self, inputs: &ObserverInputs) -> Result<Observation>;

    /// The most recent observation.
    fn observation(&self) -> &Observation;

    /// Discards all history.
    fn reset(&mut self);
}
