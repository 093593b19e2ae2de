pub use cgmath;
pub use config::{Config, FollowingThresholds};
pub use controller::{distance_to_time, ControlContext, Controller, ControllerResult, FollowSafely, NavData};
pub use error::{NavError, Result};
pub use filter::{MeanFilter, SmoothingFilter};
pub use lane::{ForwardCells, LaneMap, LaneQuad, LaneRef, PolyId};
pub use navigator::{Cycle, CycleInputs, Navigator};
pub use observer::{
    time_to_collision, NearestForward, Observation, Observer, ObserverId, ObserverInputs, CLEAR_HORIZON,
};
pub use obstacle::ObstacleFootprint;
pub use vehicle::{PilotCommand, VehicleEstimate, EPSILON_SPEED};

pub mod config;
mod controller;
mod debug;
mod error;
pub mod filter;
mod lane;
pub mod math;
mod navigator;
mod observer;
mod obstacle;
pub mod resolver;
mod vehicle;
