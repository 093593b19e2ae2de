use crate::observer::Observation;
use crate::vehicle::{PilotCommand, VehicleEstimate};
use serde::Serialize;

pub use follow_safely::{distance_to_time, FollowSafely};

mod follow_safely;

/// The outcome of one control cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ControllerResult {
    /// Nothing unusual.
    Normal,
    /// Stopped behind an obstacle in our lane.
    LaneBlocked,
    /// A car is approaching from ahead in our lane.
    CollisionRisk,
}

/// Navigation state shared between controllers and the behaviours above them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NavData {
    /// Whether the vehicle is stopped behind an obstacle blocking its lane.
    pub lane_blocked: bool,
    /// Whether this cycle is the first of a blocking episode.
    pub new_obstacle: bool,
}

/// Everything a controller reads during a cycle.
#[derive(Clone, Copy, Debug)]
pub struct ControlContext {
    /// The nearest obstacle ahead in the lane.
    pub observation: Observation,
    /// The vehicle's current state.
    pub estimate: VehicleEstimate,
    /// Obstacles at or beyond this distance are ignored, in m.
    pub max_range: f64,
    /// The speed limit in m/s.
    pub max_speed: f64,
    /// Whether a car is approaching from ahead in this lane.
    pub car_approaching: bool,
}

/// Adjusts a [PilotCommand] each cycle.
pub trait Controller {
    /// A name for logging.
    fn name(&self) -> &'static str;

    /// Modifies `pcmd` for this cycle and updates `navdata`.
    fn control(
        &mut self,
        pcmd: &mut PilotCommand,
        ctx: &ControlContext,
        navdata: &mut NavData,
    ) -> ControllerResult;
}
