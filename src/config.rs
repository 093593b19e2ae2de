//! Configuration for the observer, the controller and the vehicle they run on.
//!
//! Every field is optional in the source document. Missing or invalid values
//! fall back to defaults with a warning; loading a configuration never fails.

use crate::error::Result;
use serde::{Deserialize, Serialize};

mod defaults {
    /// Minimum forward separation while travelling, one vehicle length in m.
    pub fn min_forw_sep() -> f64 {
        8.0
    }

    /// Distance from the rear axle to the front bumper in m.
    pub fn front_bumper_px() -> f64 {
        3.4
    }

    /// Maximum speed the vehicle may be commanded to, in m/s.
    pub fn max_speed() -> f64 {
        13.4
    }

    /// Range beyond which obstacles are ignored, in m.
    pub fn max_range() -> f64 {
        80.0
    }

    /// How far the vehicle may be from the nearest lane cell before its position is unresolvable, in m.
    pub fn max_poly_distance() -> f64 {
        10.0
    }

    /// Extra margin added to the close stopping distance, in m.
    pub const STOPPING_MARGIN: f64 = 7.0;

    pub fn max_following_time() -> f64 {
        7.0
    }

    pub fn min_following_time() -> f64 {
        3.0
    }
}

/// Vehicle geometry and limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleSection {
    /// Minimum forward separation to an obstacle while travelling, in m.
    #[serde(default = "defaults::min_forw_sep")]
    pub min_forw_sep: f64,

    /// Distance from the vehicle origin to the front bumper, in m.
    #[serde(default = "defaults::front_bumper_px")]
    pub front_bumper_px: f64,

    /// Maximum commanded speed, in m/s.
    #[serde(default = "defaults::max_speed")]
    pub max_speed: f64,
}

impl Default for VehicleSection {
    fn default() -> Self {
        Self {
            min_forw_sep: defaults::min_forw_sep(),
            front_bumper_px: defaults::front_bumper_px(),
            max_speed: defaults::max_speed(),
        }
    }
}

/// Settings of the nearest forward observer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObserverSection {
    /// Maximum sensing range, in m.
    #[serde(default = "defaults::max_range")]
    pub max_range: f64,

    /// Maximum distance from the vehicle to its own lane cell, in m.
    #[serde(default = "defaults::max_poly_distance")]
    pub max_poly_distance: f64,
}

impl Default for ObserverSection {
    fn default() -> Self {
        Self {
            max_range: defaults::max_range(),
            max_poly_distance: defaults::max_poly_distance(),
        }
    }
}

/// Following thresholds as written in the configuration document.
///
/// Defaults that depend on other fields are left unset here and resolved
/// by [FollowSection::thresholds].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowSection {
    /// How close is close enough for stopping before an obstacle, in m.
    pub close_stopping_distance: Option<f64>,
    /// Following time at or below which the vehicle stops, in s.
    pub min_following_time: Option<f64>,
    /// Following time the controller aims for, in s.
    pub desired_following_time: Option<f64>,
    /// Following time above which the vehicle slows down, in s.
    pub max_following_time: Option<f64>,
}

/// Validated following thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FollowingThresholds {
    /// Minimum tolerated gap to an obstacle before an immediate stop, in m.
    pub close_stopping_distance: f64,
    /// Minimum following time, in s.
    pub min_following_time: f64,
    /// Desired following time, in s.
    pub desired_following_time: f64,
    /// Maximum following time, in s.
    pub max_following_time: f64,
}

impl Default for FollowingThresholds {
    fn default() -> Self {
        FollowSection::default().thresholds(&VehicleSection::default())
    }
}

/// Returns `value` if it is finite and positive, otherwise `default`.
fn positive_or(name: &str, value: Option<f64>, default: f64) -> f64 {
    match value {
        None => default,
        Some(v) if v.is_finite() && v > 0.0 => v,
        Some(v) => {
            log::warn!("invalid {} {}, using default {:.3}", name, v, default);
            default
        }
    }
}

impl FollowSection {
    /// Resolves defaults and validates the thresholds.
    pub fn thresholds(&self, vehicle: &VehicleSection) -> FollowingThresholds {
        // Should at least include front bumper offset and minimum separation
        let close_stopping_distance = positive_or(
            "close_stopping_distance",
            self.close_stopping_distance,
            vehicle.min_forw_sep + vehicle.front_bumper_px + defaults::STOPPING_MARGIN,
        );

        let mut max_following_time = positive_or(
            "max_following_time",
            self.max_following_time,
            defaults::max_following_time(),
        );
        let mut min_following_time = positive_or(
            "min_following_time",
            self.min_following_time,
            defaults::min_following_time(),
        );
        if min_following_time > max_following_time {
            log::warn!(
                "min_following_time {:.1} exceeds max_following_time {:.1}, using defaults",
                min_following_time,
                max_following_time
            );
            min_following_time = defaults::min_following_time();
            max_following_time = defaults::max_following_time();
        }

        let midpoint = 0.5 * (max_following_time + min_following_time);
        let mut desired_following_time =
            positive_or("desired_following_time", self.desired_following_time, midpoint);
        if desired_following_time < min_following_time || desired_following_time > max_following_time {
            log::warn!(
                "desired_following_time {:.1} outside [{:.1}, {:.1}], clamping",
                desired_following_time,
                min_following_time,
                max_following_time
            );
            desired_following_time = desired_following_time.clamp(min_following_time, max_following_time);
        }

        FollowingThresholds {
            close_stopping_distance,
            min_following_time,
            desired_following_time,
            max_following_time,
        }
    }
}

/// The full configuration document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vehicle: VehicleSection,
    #[serde(default)]
    pub observer: ObserverSection,
    #[serde(default)]
    pub follow: FollowSection,
}

impl Config {
    /// Parses a configuration from JSON and validates it.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        Ok(config.validated())
    }

    /// Parses a configuration from JSON, falling back to defaults if it is malformed.
    pub fn load(text: &str) -> Self {
        match Self::from_json(text) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{}, using default configuration", err);
                Self::default()
            }
        }
    }

    /// The validated following thresholds.
    pub fn thresholds(&self) -> FollowingThresholds {
        self.follow.thresholds(&self.vehicle)
    }

    /// Replaces invalid vehicle and observer values with defaults.
    pub(crate) fn validated(mut self) -> Self {
        let vehicle = &mut self.vehicle;
        vehicle.min_forw_sep = positive_or("min_forw_sep", Some(vehicle.min_forw_sep), defaults::min_forw_sep());
        vehicle.max_speed = positive_or("max_speed", Some(vehicle.max_speed), defaults::max_speed());
        if !vehicle.front_bumper_px.is_finite() || vehicle.front_bumper_px < 0.0 {
            log::warn!("invalid front_bumper_px {}, using default", vehicle.front_bumper_px);
            vehicle.front_bumper_px = defaults::front_bumper_px();
        }

        let observer = &mut self.observer;
        observer.max_range = positive_or("max_range", Some(observer.max_range), defaults::max_range());
        observer.max_poly_distance = positive_or(
            "max_poly_distance",
            Some(observer.max_poly_distance),
            defaults::max_poly_distance(),
        );
        self
    }

    /// Logs a summary of the configuration.
    pub fn log_summary(&self) {
        let t = self.thresholds();
        log::info!("close stopping distance is {:.3} meters", t.close_stopping_distance);
        log::info!(
            "minimum, desired and maximum following times: {:.1}, {:.1}, {:.1} secs",
            t.min_following_time,
            t.desired_following_time,
            t.max_following_time
        );
        log::info!(
            "maximum obstacle range {:.1} m, maximum speed {:.1} m/s",
            self.observer.max_range,
            self.vehicle.max_speed
        );
    }
}
