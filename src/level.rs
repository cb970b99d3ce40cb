//! Test level for the harness
//!
//! A ground plane, a row of free-standing stair boxes along +X and a ramp
//! along -X. The player's own body is mirrored by a sensor marker so
//! pointer picks pass through it.

use glam::Vec3;
use nslash_core::EntityId;
use nslash_physics::{ColliderHandle, Hull, PhysicsWorld};
use tracing::debug;

use crate::settings::LevelSettings;

/// Gap between stair boxes
const STEP_SPACING: f32 = 96.0;

pub struct Level {
    pub world: PhysicsWorld,
    pub spawn: Vec3,
    marker: ColliderHandle,
    hull: Hull,
}

impl Level {
    /// Build the level and place the player marker at the spawn point
    pub fn build(settings: &LevelSettings, hull: Hull, player: EntityId) -> Self {
        let mut world = PhysicsWorld::new();
        let ground = settings.ground_height;
        world.create_ground(ground);

        for (i, &height) in settings.step_heights.iter().enumerate() {
            if height <= 0.0 {
                continue;
            }
            let x = 200.0 + i as f32 * STEP_SPACING;
            world.create_static_box(
                Vec3::new(32.0, 128.0, height * 0.5),
                Vec3::new(x, 0.0, ground + height * 0.5),
            );
        }

        let ramp_half = Vec3::new(200.0, 100.0, 8.0);
        let ramp_rise = ramp_half.x * settings.ramp_pitch_deg.to_radians().sin();
        world.create_ramp(
            ramp_half,
            Vec3::new(-400.0, 0.0, ground + ramp_rise),
            settings.ramp_pitch_deg,
        );

        let spawn = Vec3::new(0.0, 0.0, ground + 1.0);
        let marker = world.create_player_marker(&hull, spawn, player);
        world.update_queries();

        debug!(
            steps = settings.step_heights.len(),
            ramp_pitch = settings.ramp_pitch_deg,
            "level built"
        );

        Self {
            world,
            spawn,
            marker,
            hull,
        }
    }

    /// Move the player marker to follow the character
    pub fn follow_player(&mut self, position: Vec3) {
        self.world
            .set_collider_translation(self.marker, position + self.hull.center_offset());
        self.world.update_queries();
    }
}
