//! Character state owned by the simulator

use glam::Vec3;
use nslash_core::EntityId;
use serde::{Deserialize, Serialize};

/// Everything the simulator carries from one tick to the next
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterState {
    /// Feet-center position in world space
    pub position: Vec3,
    /// Velocity in units per second
    pub velocity: Vec3,
    /// Result of the most recent ground check
    pub grounded: bool,
    /// Set by an airborne jump, cleared on landing
    pub double_jump_used: bool,
    /// Where the character is heading
    pub last_target: Vec3,
    /// What the character stood on at the last ground check
    pub ground_entity: Option<EntityId>,
}

impl CharacterState {
    /// A character standing still at `position` with no destination
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            last_target: position,
            ..Default::default()
        }
    }

    /// Read-only view handed to the presentation layer
    pub fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            position: self.position,
            velocity: self.velocity,
            grounded: self.grounded,
        }
    }
}

/// Position, velocity and ground contact after a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
}
