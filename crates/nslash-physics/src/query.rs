//! Spatial query interface consumed by the movement code
//!
//! Movement never talks to a concrete collision backend. It sweeps hulls and
//! casts rays through [`SpatialQuery`], which the rapier-backed
//! [`PhysicsWorld`](crate::PhysicsWorld) implements for real levels.

use std::ops::BitOr;

use glam::Vec3;
use nslash_core::EntityId;
use serde::{Deserialize, Serialize};

use crate::hull::Hull;

/// Distance a sweep stops short of the surface it hit.
///
/// Keeps the hull from ending a move exactly in contact, where the next
/// sweep would report it as starting inside the surface.
pub const SWEEP_SKIN: f32 = 0.03125;

/// Tags attached to colliders and used to filter queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollisionTags(u32);

impl CollisionTags {
    pub const NONE: CollisionTags = CollisionTags(0);
    /// Level geometry the character can stand on or bump into
    pub const SOLID: CollisionTags = CollisionTags(1 << 0);
    /// The player's own body
    pub const PLAYER: CollisionTags = CollisionTags(1 << 1);
    pub const ALL: CollisionTags = CollisionTags(u32::MAX);

    /// Raw bit representation
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build tags from raw bits
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Whether any tag in `other` is also set here
    pub const fn intersects(self, other: CollisionTags) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for CollisionTags {
    type Output = CollisionTags;

    fn bitor(self, rhs: Self) -> Self::Output {
        CollisionTags(self.0 | rhs.0)
    }
}

/// Tag filter applied to ray casts and sweeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RayFilter {
    /// A collider must carry at least one of these tags
    pub require_any: CollisionTags,
    /// A collider carrying any of these tags is ignored
    pub exclude: CollisionTags,
}

impl RayFilter {
    /// Solid world geometry, never the player's own body
    pub const WORLD: RayFilter = RayFilter {
        require_any: CollisionTags::SOLID,
        exclude: CollisionTags::PLAYER,
    };

    /// Everything
    pub const ANY: RayFilter = RayFilter {
        require_any: CollisionTags::ALL,
        exclude: CollisionTags::NONE,
    };

    /// Whether a collider with `tags` passes this filter
    pub fn accepts(&self, tags: CollisionTags) -> bool {
        tags.intersects(self.require_any) && !tags.intersects(self.exclude)
    }
}

impl Default for RayFilter {
    fn default() -> Self {
        Self::WORLD
    }
}

/// Result of sweeping a hull from one position to another
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepResult {
    /// Whether anything blocked the sweep
    pub hit: bool,
    /// Portion of the path travelled, in `[0, 1]`
    pub fraction: f32,
    /// Surface normal of the blocking contact (zero on a miss)
    pub normal: Vec3,
    /// Where the hull ended up
    pub end_position: Vec3,
    /// Whether the hull started inside solid geometry
    pub started_solid: bool,
    /// Entity owning the blocking collider, if it has one
    pub entity: Option<EntityId>,
}

impl SweepResult {
    /// The full path was clear
    pub fn miss(end_position: Vec3) -> Self {
        Self {
            hit: false,
            fraction: 1.0,
            normal: Vec3::ZERO,
            end_position,
            started_solid: false,
            entity: None,
        }
    }

    /// Build a hit for the path `from -> to`.
    ///
    /// `time_of_impact` is the unclamped contact time along the path; the
    /// recorded fraction is backed off by [`SWEEP_SKIN`].
    pub fn blocked(from: Vec3, to: Vec3, time_of_impact: f32, normal: Vec3) -> Self {
        let delta = to - from;
        let length = delta.length();
        let fraction = if length > f32::EPSILON {
            (time_of_impact - SWEEP_SKIN / length).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            hit: true,
            fraction,
            normal,
            end_position: from + delta * fraction,
            started_solid: false,
            entity: None,
        }
    }
}

/// First hit of a ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space hit point
    pub position: Vec3,
    /// Surface normal at the hit point
    pub normal: Vec3,
    /// Distance along the ray
    pub distance: f32,
    /// Entity owning the hit collider, if it has one
    pub entity: Option<EntityId>,
}

/// Read-only collision queries against the world.
///
/// Implementations must not mutate world state from these calls; a tick may
/// issue any number of them and expects repeatable answers.
pub trait SpatialQuery {
    /// Sweep `hull` from `from` to `to` against solid, non-player geometry
    fn sweep(&self, hull: &Hull, from: Vec3, to: Vec3) -> SweepResult;

    /// Cast a ray and report the first collider accepted by `filter`
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: RayFilter,
    ) -> Option<RayHit>;
}

impl<T: SpatialQuery + ?Sized> SpatialQuery for &T {
    fn sweep(&self, hull: &Hull, from: Vec3, to: Vec3) -> SweepResult {
        (**self).sweep(hull, from, to)
    }

    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: RayFilter,
    ) -> Option<RayHit> {
        (**self).cast_ray(origin, direction, max_distance, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_filter_skips_player() {
        assert!(RayFilter::WORLD.accepts(CollisionTags::SOLID));
        assert!(!RayFilter::WORLD.accepts(CollisionTags::PLAYER));
        assert!(!RayFilter::WORLD.accepts(CollisionTags::SOLID | CollisionTags::PLAYER));
        assert!(!RayFilter::WORLD.accepts(CollisionTags::NONE));
        assert!(RayFilter::ANY.accepts(CollisionTags::PLAYER));
    }

    #[test]
    fn test_blocked_backs_off_by_skin() {
        let from = Vec3::new(0.0, 0.0, 10.0);
        let to = Vec3::new(0.0, 0.0, 0.0);
        let result = SweepResult::blocked(from, to, 0.5, Vec3::Z);

        assert!(result.hit);
        assert!((result.end_position.z - (5.0 + SWEEP_SKIN)).abs() < 1e-4);
        assert!(result.fraction < 0.5);
    }

    #[test]
    fn test_blocked_never_negative() {
        let result = SweepResult::blocked(Vec3::ZERO, Vec3::X, 0.0, -Vec3::X);
        assert_eq!(result.fraction, 0.0);
        assert_eq!(result.end_position, Vec3::ZERO);
    }
}
