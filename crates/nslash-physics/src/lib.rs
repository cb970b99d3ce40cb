//! nslash Physics - Collision queries and kinematic character movement
//!
//! Provides the [`SpatialQuery`] interface the movement code sweeps through,
//! the ground check, slide/step resolution, and a rapier3d-backed world that
//! answers those queries against real level geometry.

mod character_controller;
mod ground;
mod hull;
mod query;
mod slide_move;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use character_controller::{CharacterController, CharacterControllerConfig, MoveResult};
pub use ground::{detect_ground, is_walkable, snap_to_ground, GroundResult};
pub use hull::Hull;
pub use query::{CollisionTags, RayFilter, RayHit, SpatialQuery, SweepResult, SWEEP_SKIN};
pub use slide_move::{clip_velocity, slide_move, step_slide_move, SlideOutcome};

pub use rapier3d::prelude::ColliderHandle;

use glam::Vec3;
use nalgebra::Unit;
use nslash_core::EntityId;
use rapier3d::parry::query::{ShapeCastOptions, ShapeCastStatus};
use rapier3d::parry::shape::Cuboid;
use rapier3d::prelude::*;
use tracing::debug;

/// Static collision world answering [`SpatialQuery`] calls through rapier's
/// query pipeline.
///
/// Colliders are added through the builder methods; call
/// [`PhysicsWorld::update_queries`] after adding or moving colliders so the
/// query pipeline sees the change.
pub struct PhysicsWorld {
    /// Rigid body storage (queries need it even though every collider is static)
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    /// Query pipeline for raycasts and shape casts
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Rebuild the query acceleration structure after colliders changed
    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a collider carrying `tags` and optionally owned by `entity`
    pub fn add_collider(
        &mut self,
        builder: ColliderBuilder,
        tags: CollisionTags,
        entity: Option<EntityId>,
    ) -> ColliderHandle {
        let groups = InteractionGroups::new(Group::from_bits_truncate(tags.bits()), Group::ALL);
        let collider = builder
            .collision_groups(groups)
            .user_data(entity.map_or(0, EntityId::to_bits))
            .build();
        self.collider_set.insert(collider)
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Move a collider (e.g. the player marker) to a new position
    pub fn set_collider_translation(&mut self, handle: ColliderHandle, position: Vec3) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_translation(vector![position.x, position.y, position.z]);
        }
    }

    /// Create an infinite ground plane with its surface at height `z`
    pub fn create_ground(&mut self, z: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 0.0, 1.0]);
        let ground = ColliderBuilder::halfspace(normal).translation(vector![0.0, 0.0, z]);
        self.add_collider(ground, CollisionTags::SOLID, None)
    }

    /// Create a static solid box
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let builder = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z]);
        self.add_collider(builder, CollisionTags::SOLID, None)
    }

    /// Create a static box pitched by `pitch_deg` about the Y axis, its top
    /// face rising toward -X
    pub fn create_ramp(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
        pitch_deg: f32,
    ) -> ColliderHandle {
        let builder = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .rotation(vector![0.0, pitch_deg.to_radians(), 0.0]);
        self.add_collider(builder, CollisionTags::SOLID, None)
    }

    /// Add a sensor box tagged as the player, for ray filtering tests and
    /// for keeping the character's own body out of pointer picks
    pub fn create_player_marker(
        &mut self,
        hull: &Hull,
        position: Vec3,
        entity: EntityId,
    ) -> ColliderHandle {
        let half = hull.half_extents();
        let center = position + hull.center_offset();
        let builder = ColliderBuilder::cuboid(half.x, half.y, half.z)
            .translation(vector![center.x, center.y, center.z])
            .sensor(true);
        let handle = self.add_collider(builder, CollisionTags::PLAYER, Some(entity));
        debug!(?entity, "spawned player marker");
        handle
    }

    fn tags_of(collider: &Collider) -> CollisionTags {
        CollisionTags::from_bits(collider.collision_groups().memberships.bits())
    }

    fn entity_of(&self, handle: ColliderHandle) -> Option<EntityId> {
        self.collider_set
            .get(handle)
            .and_then(|collider| EntityId::from_bits(collider.user_data))
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialQuery for PhysicsWorld {
    fn sweep(&self, hull: &Hull, from: Vec3, to: Vec3) -> SweepResult {
        let delta = to - from;
        let half = hull.half_extents();
        let center = from + hull.center_offset();

        let shape = Cuboid::new(vector![half.x, half.y, half.z]);
        let shape_pos = Isometry::translation(center.x, center.y, center.z);
        let shape_vel = vector![delta.x, delta.y, delta.z];
        let options = ShapeCastOptions {
            max_time_of_impact: 1.0,
            target_distance: 0.0,
            stop_at_penetration: false,
            compute_impact_geometry_on_penetration: true,
        };

        let predicate =
            |_: ColliderHandle, collider: &Collider| RayFilter::WORLD.accepts(Self::tags_of(collider));
        let filter = QueryFilter::default().predicate(&predicate);

        let Some((handle, hit)) = self.query_pipeline.cast_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            &shape_vel,
            &shape,
            options,
            filter,
        ) else {
            return SweepResult::miss(to);
        };

        let normal = Vec3::new(hit.normal1.x, hit.normal1.y, hit.normal1.z);
        let entity = self.entity_of(handle);

        if hit.status == ShapeCastStatus::PenetratingOrWithinTargetDist {
            return SweepResult {
                hit: true,
                fraction: 0.0,
                normal,
                end_position: from,
                started_solid: true,
                entity,
            };
        }

        SweepResult {
            entity,
            ..SweepResult::blocked(from, to, hit.time_of_impact, normal)
        }
    }

    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: RayFilter,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );
        let predicate =
            |_: ColliderHandle, collider: &Collider| filter.accepts(Self::tags_of(collider));
        let query_filter = QueryFilter::default().predicate(&predicate);

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                query_filter,
            )
            .map(|(handle, intersection)| RayHit {
                position: origin + direction * intersection.time_of_impact,
                normal: Vec3::new(
                    intersection.normal.x,
                    intersection.normal.y,
                    intersection.normal.z,
                ),
                distance: intersection.time_of_impact,
                entity: self.entity_of(handle),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_ground() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        world.update_queries();
        world
    }

    #[test]
    fn test_ground_creation() {
        let mut world = PhysicsWorld::new();
        let ground = world.create_ground(0.0);
        let collider = world.get_collider(ground).unwrap();
        assert_eq!(PhysicsWorld::tags_of(collider), CollisionTags::SOLID);
    }

    #[test]
    fn test_sweep_lands_on_ground() {
        let world = world_with_ground();
        let hull = Hull::default();

        let result = world.sweep(&hull, Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -10.0));
        assert!(result.hit);
        assert!(!result.started_solid);
        assert!(result.normal.z > 0.99);
        assert!(result.end_position.z > 0.0 && result.end_position.z < 0.5);
    }

    #[test]
    fn test_sweep_miss_reaches_target() {
        let world = world_with_ground();
        let hull = Hull::default();

        let to = Vec3::new(50.0, 0.0, 20.0);
        let result = world.sweep(&hull, Vec3::new(0.0, 0.0, 20.0), to);
        assert!(!result.hit);
        assert_eq!(result.end_position, to);
    }

    #[test]
    fn test_raycast_skips_player() {
        let mut world = world_with_ground();
        let player = EntityId::new();
        world.create_player_marker(&Hull::default(), Vec3::ZERO, player);
        world.update_queries();

        let origin = Vec3::new(0.0, 0.0, 500.0);
        let hit = world
            .cast_ray(origin, -Vec3::Z, 1000.0, RayFilter::WORLD)
            .unwrap();
        assert!(hit.position.z.abs() < 1e-2);
        assert_eq!(hit.entity, None);

        let hit = world.cast_ray(origin, -Vec3::Z, 1000.0, RayFilter::ANY).unwrap();
        assert!((hit.position.z - 72.0).abs() < 1e-2);
        assert_eq!(hit.entity, Some(player));
    }

    #[test]
    fn test_ramp_rises_toward_negative_x() {
        let mut world = PhysicsWorld::new();
        world.create_ramp(Vec3::new(200.0, 100.0, 8.0), Vec3::ZERO, 30.0);
        world.update_queries();

        let low = world
            .cast_ray(Vec3::new(100.0, 0.0, 500.0), -Vec3::Z, 1000.0, RayFilter::WORLD)
            .unwrap();
        let high = world
            .cast_ray(Vec3::new(-100.0, 0.0, 500.0), -Vec3::Z, 1000.0, RayFilter::WORLD)
            .unwrap();

        // 200 units apart on a 30 degree slope
        assert!((high.position.z - low.position.z - 200.0 * 30f32.to_radians().tan()).abs() < 0.5);
        assert!(high.normal.x > 0.4 && high.normal.z > 0.8);
    }

    #[test]
    fn test_sweep_ignores_player_marker() {
        let mut world = world_with_ground();
        world.create_player_marker(&Hull::default(), Vec3::ZERO, EntityId::new());
        world.update_queries();

        let from = Vec3::new(0.0, 0.0, 20.0);
        let result = world.sweep(&Hull::default(), from, from + Vec3::X * 30.0);
        assert!(!result.hit);
    }
}
