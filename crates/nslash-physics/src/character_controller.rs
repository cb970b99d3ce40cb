//! Kinematic character controller built on [`SpatialQuery`] sweeps

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::ground::{self, GroundResult};
use crate::hull::Hull;
use crate::query::SpatialQuery;
use crate::slide_move::step_slide_move;

/// Character controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterControllerConfig {
    /// Collision hull swept for every move
    pub hull: Hull,
    /// Tallest obstacle the character walks over (default: 24)
    pub step_height: f32,
    /// Maximum walkable slope in degrees (default: 45)
    pub max_ground_angle: f32,
    /// How far below the feet the ground check reaches (default: 2)
    pub ground_check_depth: f32,
    /// Upward speed above which the ground check is skipped (default: 300)
    pub max_rise_speed: f32,
    /// How far the ground snap lifts before sweeping down (default: 2)
    pub snap_lift: f32,
    /// Sweep iterations per slide move
    pub max_bumps: usize,
    /// Velocity clip overbounce (1.0 = slide flush along surfaces)
    pub overbounce: f32,
}

impl Default for CharacterControllerConfig {
    fn default() -> Self {
        Self {
            hull: Hull::default(),
            step_height: 24.0,
            max_ground_angle: 45.0,
            ground_check_depth: 2.0,
            max_rise_speed: 300.0,
            snap_lift: 2.0,
            max_bumps: 4,
            overbounce: 1.0,
        }
    }
}

/// Result of resolving one tick of motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    pub position: Vec3,
    pub velocity: Vec3,
    /// False when the sweep made no progress; position and velocity are
    /// then the inputs, untouched
    pub did_move: bool,
}

/// Collision-aware movement for a single character hull
#[derive(Debug, Clone, Default)]
pub struct CharacterController {
    /// Configuration
    pub config: CharacterControllerConfig,
}

impl CharacterController {
    /// Create a new character controller with default config
    pub fn new() -> Self {
        Self::with_config(CharacterControllerConfig::default())
    }

    /// Create a new character controller with custom config
    pub fn with_config(config: CharacterControllerConfig) -> Self {
        Self { config }
    }

    /// Look for walkable ground under `position`
    pub fn detect_ground<Q: SpatialQuery + ?Sized>(
        &self,
        query: &Q,
        position: Vec3,
        velocity: Vec3,
    ) -> GroundResult {
        ground::detect_ground(query, &self.config, position, velocity)
    }

    /// Pull `position` onto walkable ground within the step height
    pub fn snap_to_ground<Q: SpatialQuery + ?Sized>(&self, query: &Q, position: Vec3) -> Vec3 {
        ground::snap_to_ground(query, &self.config, position)
    }

    /// Move along `velocity * delta_time`, sliding along and stepping over
    /// obstacles. With `snap` set the result is glued to the ground below.
    pub fn resolve<Q: SpatialQuery + ?Sized>(
        &self,
        query: &Q,
        position: Vec3,
        velocity: Vec3,
        delta_time: f32,
        snap: bool,
    ) -> MoveResult {
        let mut new_position = position;
        let mut new_velocity = velocity;

        let outcome = step_slide_move(
            query,
            &self.config,
            &mut new_position,
            &mut new_velocity,
            delta_time,
        );

        if outcome.travel <= 0.0 {
            trace!(?position, ?velocity, "move blocked");
            return MoveResult {
                position,
                velocity,
                did_move: false,
            };
        }

        if snap {
            new_position = self.snap_to_ground(query, new_position);
        }

        MoveResult {
            position: new_position,
            velocity: new_velocity,
            did_move: true,
        }
    }
}
