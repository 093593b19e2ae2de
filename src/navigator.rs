use crate::config::Config;
use crate::controller::{ControlContext, Controller, ControllerResult, FollowSafely, NavData};
use crate::debug::{debug_command, debug_observation};
#[cfg(feature = "debug")]
use crate::debug::take_debug_frame;
use crate::error::Result;
use crate::lane::LaneMap;
use crate::observer::{NearestForward, Observation, Observer, ObserverInputs};
use crate::obstacle::ObstacleFootprint;
use crate::vehicle::{PilotCommand, VehicleEstimate};
use std::time::Instant;

/// The inputs to one control cycle.
#[derive(Clone, Copy)]
pub struct CycleInputs<'a> {
    /// The lane cells around the vehicle.
    pub local_map: &'a LaneMap,
    /// The lane cells occupied by obstacles.
    pub obstacles: &'a ObstacleFootprint,
    /// The vehicle's pose and forward velocity.
    pub estimate: VehicleEstimate,
    /// Whether the oncoming traffic detector sees a car approaching in our lane.
    pub car_approaching: bool,
    /// The command requested by upstream logic.
    pub pcmd: PilotCommand,
    /// When the inputs were received, from a monotonic clock.
    pub now: Instant,
}

/// The outputs of one control cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cycle {
    /// The nearest obstacle ahead.
    pub observation: Observation,
    /// The command to send, never faster than requested.
    pub command: PilotCommand,
    /// The controller's verdict.
    pub result: ControllerResult,
    /// Whether the vehicle is stopped behind an obstacle blocking its lane.
    pub lane_blocked: bool,
    /// Whether the lane became blocked this cycle.
    pub new_obstacle: bool,
}

/// Runs the obstacle observer and the safe following controller for one vehicle.
///
/// All state lives here and is updated one cycle at a time; callers must
/// deliver inputs in order.
pub struct Navigator {
    config: Config,
    observer: NearestForward,
    controller: FollowSafely,
    navdata: NavData,
    /// The command from the last successful cycle.
    last_command: Option<PilotCommand>,
    /// Debugging information from the previous cycle.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

impl Navigator {
    /// Creates a navigator for a vehicle. Invalid settings are replaced with defaults.
    pub fn new(config: Config) -> Self {
        let config = config.validated();
        config.log_summary();
        Self {
            observer: NearestForward::new(&config.observer),
            controller: FollowSafely::new(config.thresholds()),
            navdata: NavData::default(),
            last_command: None,
            config,
            #[cfg(feature = "debug")]
            debug: serde_json::Value::Null,
        }
    }

    /// Runs one control cycle.
    ///
    /// Fails if the vehicle's own lane cell cannot be found. No state is
    /// changed in that case, and the caller should keep sending
    /// [held_command](Self::held_command) until a cycle succeeds.
    pub fn cycle(&mut self, inputs: &CycleInputs) -> Result<Cycle> {
        let observation = self
            .observer
            .update(&ObserverInputs {
                local_map: inputs.local_map,
                obstacles: inputs.obstacles,
                pose: inputs.estimate.pos,
                now: inputs.now,
            })
            .map_err(|err| {
                log::warn!("{}: {}, holding previous command", self.observer.name(), err);
                err
            })?;
        debug_observation(self.observer.name(), &observation);

        let ctx = ControlContext {
            observation,
            estimate: inputs.estimate,
            max_range: self.config.observer.max_range,
            max_speed: self.config.vehicle.max_speed,
            car_approaching: inputs.car_approaching,
        };
        let mut command = inputs.pcmd;
        let result = self.controller.control(&mut command, &ctx, &mut self.navdata);
        debug_command(self.controller.name(), &command, result);
        self.last_command = Some(command);

        #[cfg(feature = "debug")]
        {
            self.debug = take_debug_frame();
        }

        Ok(Cycle {
            observation,
            command,
            result,
            lane_blocked: self.navdata.lane_blocked,
            new_obstacle: self.navdata.new_obstacle,
        })
    }

    /// The command from the last successful cycle, if there has been one.
    pub fn held_command(&self) -> Option<PilotCommand> {
        self.last_command
    }

    /// Whether the vehicle is stopped behind an obstacle blocking its lane.
    pub fn lane_blocked(&self) -> bool {
        self.navdata.lane_blocked
    }

    /// The most recent observation.
    pub fn observation(&self) -> &Observation {
        self.observer.observation()
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Forgets all history, as when the input stream restarts.
    pub fn reset(&mut self) {
        self.observer.reset();
        self.navdata = NavData::default();
        self.last_command = None;
    }

    /// Gets the debugging information for the previous cycle as a JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&self) -> serde_json::Value {
        self.debug.clone()
    }
}
