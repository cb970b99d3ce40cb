//! Analytic box world for deterministic movement tests
//!
//! Sweeps are exact swept-AABB tests against static boxes, so tests can
//! assert positions to a tight tolerance without standing up a rapier world.

use glam::Vec3;
use nslash_core::EntityId;

use crate::hull::Hull;
use crate::query::{CollisionTags, RayFilter, RayHit, SpatialQuery, SweepResult};

/// Static axis-aligned box
#[derive(Debug, Clone, Copy)]
pub struct SolidBox {
    pub mins: Vec3,
    pub maxs: Vec3,
    pub tags: CollisionTags,
    pub entity: Option<EntityId>,
}

impl SolidBox {
    /// Untagged-entity solid box
    pub fn solid(mins: Vec3, maxs: Vec3) -> Self {
        Self {
            mins,
            maxs,
            tags: CollisionTags::SOLID,
            entity: None,
        }
    }
}

/// Collection of static boxes implementing [`SpatialQuery`]
#[derive(Debug, Clone, Default)]
pub struct BoxWorld {
    boxes: Vec<SolidBox>,
}

/// Contact of a moving point against one Minkowski-expanded box
struct Contact {
    time_of_impact: f32,
    normal: Vec3,
    started_inside: bool,
}

impl BoxWorld {
    /// An empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// A world with a large floor whose top face sits at `height`
    pub fn with_floor(height: f32) -> Self {
        let mut world = Self::new();
        world.add_box(
            Vec3::new(-10_000.0, -10_000.0, height - 100.0),
            Vec3::new(10_000.0, 10_000.0, height),
        );
        world
    }

    /// Add a solid box
    pub fn add_box(&mut self, mins: Vec3, maxs: Vec3) -> &mut Self {
        self.boxes.push(SolidBox::solid(mins, maxs));
        self
    }

    /// Add a fully specified box
    pub fn add(&mut self, solid: SolidBox) -> &mut Self {
        self.boxes.push(solid);
        self
    }

    fn sweep_point(origin: Vec3, delta: Vec3, half: Vec3, solid: &SolidBox) -> Option<Contact> {
        let lo = solid.mins - half;
        let hi = solid.maxs + half;

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut normal = Vec3::Z;

        for axis in 0..3 {
            let p = origin[axis];
            let d = delta[axis];

            if d == 0.0 {
                if p <= lo[axis] || p >= hi[axis] {
                    return None;
                }
                continue;
            }

            let mut t0 = (lo[axis] - p) / d;
            let mut t1 = (hi[axis] - p) / d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            if t0 > t_enter {
                t_enter = t0;
                normal = Vec3::ZERO;
                normal[axis] = if d > 0.0 { -1.0 } else { 1.0 };
            }
            t_exit = t_exit.min(t1);
        }

        // Stationary on every axis and strictly inside.
        if t_enter == f32::NEG_INFINITY {
            return Some(Contact {
                time_of_impact: 0.0,
                normal,
                started_inside: true,
            });
        }

        if t_enter >= t_exit || t_exit <= 0.0 || t_enter > 1.0 {
            return None;
        }

        Some(Contact {
            time_of_impact: t_enter.max(0.0),
            normal,
            started_inside: t_enter < 0.0,
        })
    }
}

impl SpatialQuery for BoxWorld {
    fn sweep(&self, hull: &Hull, from: Vec3, to: Vec3) -> SweepResult {
        let origin = from + hull.center_offset();
        let delta = to - from;
        let half = hull.half_extents();

        let nearest = self
            .boxes
            .iter()
            .filter(|solid| RayFilter::WORLD.accepts(solid.tags))
            .filter_map(|solid| {
                Self::sweep_point(origin, delta, half, solid).map(|contact| (contact, solid))
            })
            .min_by(|(a, _), (b, _)| a.time_of_impact.total_cmp(&b.time_of_impact));

        match nearest {
            None => SweepResult::miss(to),
            Some((contact, solid)) if contact.started_inside => SweepResult {
                hit: true,
                fraction: 0.0,
                normal: contact.normal,
                end_position: from,
                started_solid: true,
                entity: solid.entity,
            },
            Some((contact, solid)) => SweepResult {
                entity: solid.entity,
                ..SweepResult::blocked(from, to, contact.time_of_impact, contact.normal)
            },
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
        let delta = direction * max_distance;

        self.boxes
            .iter()
            .filter(|solid| filter.accepts(solid.tags))
            .filter_map(|solid| {
                let contact = Self::sweep_point(origin, delta, Vec3::ZERO, solid)?;
                if contact.started_inside {
                    return None;
                }
                let distance = contact.time_of_impact * max_distance;
                Some(RayHit {
                    position: origin + direction * distance,
                    normal: contact.normal,
                    distance,
                    entity: solid.entity,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
