use crate::math::Point2d;
use serde::{Deserialize, Serialize};

/// Speeds below this are treated as zero, in m/s.
pub const EPSILON_SPEED: f64 = 0.01;

/// The estimated state of the vehicle, as supplied by the pose estimator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleEstimate {
    /// The position of the vehicle in map coordinates.
    pub pos: Point2d,
    /// The velocity along the vehicle's forward axis in m/s.
    pub vel: f64,
}

impl VehicleEstimate {
    /// Creates a new estimate.
    pub fn new(pos: Point2d, vel: f64) -> Self {
        Self { pos, vel }
    }

    /// Whether the vehicle is stopped.
    pub fn has_stopped(&self) -> bool {
        self.vel.abs() < EPSILON_SPEED
    }
}

/// The velocity and yaw rate requested of the vehicle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PilotCommand {
    /// The requested forward velocity in m/s.
    pub velocity: f64,
    /// The requested yaw rate in rad/s.
    pub yaw_rate: f64,
}

impl PilotCommand {
    /// Creates a command with the given velocity and no turning.
    pub fn new(velocity: f64) -> Self {
        Self {
            velocity,
            yaw_rate: 0.0,
        }
    }
}
