//! Per-tick input and pointer picking
//!
//! The host samples its devices once per tick into a [`TickInput`]. The
//! pointer is turned into a world target by casting a ray against solid
//! geometry.

use glam::Vec3;
use nslash_physics::{RayFilter, SpatialQuery};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How far the pointer ray reaches
pub const PICK_DISTANCE: f32 = 100_000.0;

/// Input consumed by one simulation tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Seconds covered by this tick
    pub delta_time: f32,
    /// World point under the pointer
    pub target_position: Vec3,
    /// Attack button held: the character heads for `target_position`
    pub attack_held: bool,
    /// Jump button went down this tick
    pub jump_pressed: bool,
    /// Run modifier held
    pub run_held: bool,
}

impl TickInput {
    /// Input with no buttons down
    pub fn idle(delta_time: f32) -> Self {
        Self {
            delta_time,
            target_position: Vec3::ZERO,
            attack_held: false,
            jump_pressed: false,
            run_held: false,
        }
    }

    /// Aim at whatever the pointer ray hits.
    ///
    /// When the ray misses, the target is the zero sentinel and the attack
    /// is dropped so the character keeps its previous destination.
    pub fn with_pick<Q: SpatialQuery + ?Sized>(
        self,
        query: &Q,
        origin: Vec3,
        direction: Vec3,
        attack_held: bool,
    ) -> Self {
        match pick(query, origin, direction, PICK_DISTANCE) {
            Some(target_position) => Self {
                target_position,
                attack_held,
                ..self
            },
            None => Self {
                target_position: Vec3::ZERO,
                attack_held: false,
                ..self
            },
        }
    }
}

/// World point under the pointer ray.
///
/// Only solid geometry is hit; the player's own collider is ignored. A miss
/// returns [`Vec3::ZERO`].
pub fn pick_target<Q: SpatialQuery + ?Sized>(
    query: &Q,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Vec3 {
    pick(query, origin, direction, max_distance).unwrap_or(Vec3::ZERO)
}

fn pick<Q: SpatialQuery + ?Sized>(
    query: &Q,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<Vec3> {
    let hit = query.cast_ray(origin, direction, max_distance, RayFilter::WORLD);
    if hit.is_none() {
        debug!(?origin, ?direction, "pointer missed world geometry");
    }
    hit.map(|hit| hit.position)
}
