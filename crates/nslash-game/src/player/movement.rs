//! Movement configuration and constants

use nslash_physics::{CharacterControllerConfig, Hull};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Distance band the character is in relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementBand {
    /// Further than `approach_radius_far`: full walk speed
    Far,
    /// Between the two radii: reduced approach speed
    Near,
    /// Within `approach_radius_near`: stop and stand
    Arrived,
}

/// Movement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Tallest obstacle walked over
    pub step_height: f32,
    /// Steepest walkable surface in degrees (inclusive)
    pub max_ground_angle: f32,
    /// Upward velocity added by a jump
    pub jump_speed: f32,
    /// Downward acceleration
    pub gravity: f32,
    /// Beyond this distance the character walks at full speed
    pub approach_radius_far: f32,
    /// Within this distance the character counts as arrived
    pub approach_radius_near: f32,
    /// Friction never bleeds less than this speed's worth per second
    pub friction_stop_speed: f32,
    /// Ground speed in the far band
    pub walk_speed: f32,
    /// Ground speed in the near band
    pub approach_speed: f32,
    /// Speed multiplier while run is held
    pub run_multiplier: f32,
    /// Ground acceleration rate
    pub ground_accelerate: f32,
    /// Ground friction coefficient
    pub ground_friction: f32,
    /// Speed cap for air control
    pub air_speed_cap: f32,
    /// Air acceleration rate
    pub air_accelerate: f32,
    /// How far below the feet ground is checked
    pub ground_check_depth: f32,
    /// Upward speed above which ground is not checked
    pub ground_check_max_rise_speed: f32,
    /// Lift applied before ground snapping
    pub snap_lift: f32,
    /// Collision hull
    pub hull: Hull,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            step_height: 24.0,
            max_ground_angle: 45.0,
            jump_speed: 410.0,
            gravity: 800.0,
            approach_radius_far: 100.0,
            approach_radius_near: 10.0,
            friction_stop_speed: 100.0,
            walk_speed: 200.0,
            approach_speed: 100.0,
            run_multiplier: 2.5,
            ground_accelerate: 7.5,
            ground_friction: 4.0,
            air_speed_cap: 15.0,
            air_accelerate: 20.0,
            ground_check_depth: 2.0,
            ground_check_max_rise_speed: 300.0,
            snap_lift: 2.0,
            hull: Hull::default(),
        }
    }
}

impl MovementConfig {
    /// Classify a distance to the target into a movement band.
    ///
    /// `dist > far` is [`MovementBand::Far`], `near < dist <= far` is
    /// [`MovementBand::Near`] and anything closer is [`MovementBand::Arrived`].
    pub fn band(&self, distance: f32) -> MovementBand {
        if distance > self.approach_radius_far {
            MovementBand::Far
        } else if distance > self.approach_radius_near {
            MovementBand::Near
        } else {
            MovementBand::Arrived
        }
    }

    /// Target ground speed for a band, or `None` when arrived
    pub fn band_speed(&self, band: MovementBand, running: bool) -> Option<f32> {
        let base = match band {
            MovementBand::Far => self.walk_speed,
            MovementBand::Near => self.approach_speed,
            MovementBand::Arrived => return None,
        };
        let multiplier = if running { self.run_multiplier } else { 1.0 };
        Some(base * multiplier)
    }

    /// Collision settings for the character controller
    pub fn controller_config(&self) -> CharacterControllerConfig {
        CharacterControllerConfig {
            hull: self.hull,
            step_height: self.step_height,
            max_ground_angle: self.max_ground_angle,
            ground_check_depth: self.ground_check_depth,
            max_rise_speed: self.ground_check_max_rise_speed,
            snap_lift: self.snap_lift,
            ..CharacterControllerConfig::default()
        }
    }

    /// Reject values the simulator cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("step_height", self.step_height),
            ("jump_speed", self.jump_speed),
            ("gravity", self.gravity),
            ("approach_radius_far", self.approach_radius_far),
            ("approach_radius_near", self.approach_radius_near),
            ("friction_stop_speed", self.friction_stop_speed),
            ("walk_speed", self.walk_speed),
            ("approach_speed", self.approach_speed),
            ("run_multiplier", self.run_multiplier),
            ("ground_accelerate", self.ground_accelerate),
            ("ground_friction", self.ground_friction),
            ("air_speed_cap", self.air_speed_cap),
            ("air_accelerate", self.air_accelerate),
            ("ground_check_depth", self.ground_check_depth),
            ("ground_check_max_rise_speed", self.ground_check_max_rise_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        if !(self.snap_lift.is_finite() && self.snap_lift >= 0.0) {
            return Err(ConfigError::NotPositive {
                name: "snap_lift",
                value: self.snap_lift,
            });
        }

        if !(0.0..90.0).contains(&self.max_ground_angle) {
            return Err(ConfigError::GroundAngle(self.max_ground_angle));
        }

        if self.approach_radius_near >= self.approach_radius_far {
            return Err(ConfigError::ApproachRadii {
                near: self.approach_radius_near,
                far: self.approach_radius_far,
            });
        }

        if !self.hull.is_valid() {
            return Err(ConfigError::DegenerateHull);
        }

        Ok(())
    }
}
