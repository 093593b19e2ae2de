use super::{ControlContext, Controller, ControllerResult, NavData};
use crate::config::FollowingThresholds;
use crate::math::guarded_div;
use crate::vehicle::{PilotCommand, EPSILON_SPEED};

/// Following time reported when the vehicle is not moving, in s.
const INFINITE_TIME: f64 = f64::MAX;

/// Calculates the time it takes to travel `distance` at `speed`.
///
/// Returns a very large, finite time if the vehicle is not moving.
pub fn distance_to_time(distance: f64, speed: f64) -> f64 {
    guarded_div(distance, speed, EPSILON_SPEED, INFINITE_TIME)
}

/// Keeps a safe following distance behind obstacles in the lane.
///
/// We may be following a moving car that could stop at any time or already
/// be stopped. If it stops, we stop at a safe distance and set the lane
/// blocked flag. Higher level behaviours decide whether to pass; until then
/// we wait for the obstacle to move.
#[derive(Clone, Debug)]
pub struct FollowSafely {
    thresholds: FollowingThresholds,
}

impl FollowSafely {
    /// Creates a controller with the given thresholds.
    pub fn new(thresholds: FollowingThresholds) -> Self {
        Self { thresholds }
    }

    /// The thresholds in use.
    pub fn thresholds(&self) -> &FollowingThresholds {
        &self.thresholds
    }

    /// Adjusts speed towards the desired following time, obeying the speed limit.
    /// Never raises the velocity already requested.
    fn adjust_speed(&self, pcmd: &mut PilotCommand, obs_dist: f64, max_speed: f64) {
        let adjusted_speed = f64::min(obs_dist / self.thresholds.desired_following_time, max_speed);
        pcmd.velocity = f64::min(pcmd.velocity, adjusted_speed);
    }
}

impl Controller for FollowSafely {
    fn name(&self) -> &'static str {
        "follow_safely"
    }

    fn control(
        &mut self,
        pcmd: &mut PilotCommand,
        ctx: &ControlContext,
        navdata: &mut NavData,
    ) -> ControllerResult {
        let was_blocked = navdata.lane_blocked;
        navdata.lane_blocked = false;
        navdata.new_obstacle = false;

        let location = ctx.observation.distance;
        let mut result = ControllerResult::Normal;

        if location >= ctx.max_range {
            // no obstacle that matters, leave pcmd unmodified
            return result;
        }

        let speed = ctx.estimate.vel;
        let following_time = distance_to_time(location, speed);
        log::debug!("obstacle is {:.3} sec ahead at {:.3} m/s", following_time, speed);

        let t = &self.thresholds;
        if following_time <= t.min_following_time || location <= t.close_stopping_distance {
            // be safe, request immediate stop
            pcmd.velocity = 0.0;
            log::debug!("obstacle avoidance requesting immediate halt");

            // when fully stopped, initiate blocked lane behaviour
            if ctx.estimate.has_stopped() {
                navdata.lane_blocked = true;
                if !was_blocked {
                    log::info!("New obstacle detected!");
                    navdata.new_obstacle = true;
                }
                result = ControllerResult::LaneBlocked;
            }
        } else if following_time < t.desired_following_time {
            // speed up a bit
            self.adjust_speed(pcmd, location, ctx.max_speed);
        } else if speed.abs() < EPSILON_SPEED || following_time > t.desired_following_time {
            // slow down a bit
            self.adjust_speed(pcmd, location, ctx.max_speed);
        }

        // anyone coming towards us ahead in this lane?
        if ctx.car_approaching {
            log::info!("Possible collision ahead!");
            result = ControllerResult::CollisionRisk;
        }

        log::trace!(
            "{} controller: velocity {:.3}, yaw rate {:.3}, result {:?}",
            self.name(),
            pcmd.velocity,
            pcmd.yaw_rate,
            result
        );
        result
    }
}
