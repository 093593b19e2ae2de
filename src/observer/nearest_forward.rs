use super::{Observation, Observer, ObserverId, ObserverInputs, CLEAR_HORIZON};
use crate::config::ObserverSection;
use crate::error::Result;
use crate::filter::{MeanFilter, SmoothingFilter};
use crate::resolver::nearest_forward_distance;
use std::time::Instant;

/// The slowest closing speed used for time-to-collision, in m/s.
const MIN_CLOSING_SPEED: f64 = 0.1;

/// Updates closer together than this are dropped, in s.
const MIN_ELAPSED: f64 = 1e-6;

/// Observes the nearest obstacle ahead in the vehicle's own lane.
#[derive(Clone, Debug)]
pub struct NearestForward {
    config: ObserverSection,
    distance_filter: MeanFilter,
    velocity_filter: MeanFilter,
    observation: Observation,
    /// When the last accepted update happened.
    prev_update: Option<Instant>,
    /// Whether the previous update saw an obstacle, so `observation.distance` is a valid baseline.
    tracking: bool,
}

impl NearestForward {
    /// Creates a new observer.
    pub fn new(config: &ObserverSection) -> Self {
        Self {
            config: config.clone(),
            distance_filter: MeanFilter::new(),
            velocity_filter: MeanFilter::new(),
            observation: Observation::empty(ObserverId::NearestForward),
            prev_update: None,
            tracking: false,
        }
    }

    /// Folds a raw along-lane distance taken at `now` into the observation.
    pub fn observe(&mut self, distance: f64, now: Instant) -> Observation {
        if !distance.is_finite() {
            return self.observe_nothing(now);
        }

        let prev_update = match self.prev_update {
            Some(prev) if self.tracking => prev,
            _ => return self.seed(distance, now),
        };

        let elapsed = now.saturating_duration_since(prev_update).as_secs_f64();
        if elapsed < MIN_ELAPSED {
            log::warn!("{} update after {:.2e} s ignored", self.name(), elapsed);
            return self.observation;
        }

        // Filter the distance by averaging over time
        let filt_distance = self.distance_filter.update(distance);

        // Velocity of the obstacle relative to the vehicle
        let velocity = (filt_distance - self.observation.distance) / elapsed;
        let filt_velocity = self.velocity_filter.update(velocity);
        self.prev_update = Some(now);

        let time = time_to_collision(filt_distance, filt_velocity);
        self.observation = Observation {
            oid: self.id(),
            distance: filt_distance,
            velocity: filt_velocity,
            time,
            clear: time > CLEAR_HORIZON,
            applicable: self.velocity_filter.is_full(),
        };
        self.observation
    }

    /// Starts tracking a newly seen obstacle with zero velocity.
    fn seed(&mut self, distance: f64, now: Instant) -> Observation {
        self.distance_filter.reset();
        self.velocity_filter.reset();
        let filt_distance = self.distance_filter.update(distance);
        self.prev_update = Some(now);
        self.tracking = true;

        self.observation = Observation {
            oid: self.id(),
            distance: filt_distance,
            velocity: 0.0,
            time: f64::INFINITY,
            clear: true,
            applicable: self.velocity_filter.is_full(),
        };
        self.observation
    }

    /// Reports a clear lane without feeding the absence into the filters.
    fn observe_nothing(&mut self, now: Instant) -> Observation {
        if self.tracking {
            log::debug!("{}: obstacle no longer ahead", self.name());
        }
        self.tracking = false;
        self.prev_update = Some(now);

        self.observation = Observation {
            applicable: self.observation.applicable,
            ..Observation::empty(self.id())
        };
        self.observation
    }
}

/// Time until the obstacle is reached at the given relative velocity.
/// Infinite if the obstacle is not getting closer.
pub fn time_to_collision(distance: f64, velocity: f64) -> f64 {
    if velocity < 0.0 {
        // avoid dividing by a tiny number
        let speed = f64::max(-velocity, MIN_CLOSING_SPEED);
        distance / speed
    } else {
        f64::INFINITY
    }
}

impl Observer for NearestForward {
    fn id(&self) -> ObserverId {
        ObserverId::NearestForward
    }

    fn update(&mut self, inputs: &ObserverInputs) -> Result<Observation> {
        let distance = nearest_forward_distance(
            inputs.local_map,
            inputs.obstacles,
            inputs.pose,
            self.config.max_poly_distance,
        )?;
        Ok(self.observe(distance, inputs.now))
    }

    fn observation(&self) -> &Observation {
        &self.observation
    }

    fn reset(&mut self) {
        *self = Self::new(&self.config);
    }
}
