//! Ground detection and ground snapping

use glam::Vec3;
use nslash_core::{angle_from_up_deg, EntityId, WORLD_UP};
use tracing::trace;

use crate::character_controller::CharacterControllerConfig;
use crate::query::SpatialQuery;

/// Slack applied to the walkable-angle comparison so a surface at exactly
/// the limit stays walkable after float rounding.
const GROUND_ANGLE_EPSILON_DEG: f32 = 1e-4;

/// Outcome of a ground check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundResult {
    /// Whether walkable ground is under the character
    pub hit: bool,
    /// Normal of the ground surface (zero when there is none)
    pub normal: Vec3,
    /// Entity the character is standing on, if it has one
    pub entity: Option<EntityId>,
}

impl GroundResult {
    /// No ground
    pub fn none() -> Self {
        Self {
            hit: false,
            normal: Vec3::ZERO,
            entity: None,
        }
    }
}

/// Whether a surface with `normal` is flat enough to stand on.
///
/// The limit is inclusive: a surface tilted by exactly `max_angle_deg` is
/// walkable.
pub fn is_walkable(normal: Vec3, max_angle_deg: f32) -> bool {
    angle_from_up_deg(normal) <= max_angle_deg + GROUND_ANGLE_EPSILON_DEG
}

/// Look for walkable ground directly below `position`.
///
/// Rising faster than `max_rise_speed` (e.g. right after a jump) skips the
/// check entirely.
pub fn detect_ground<Q: SpatialQuery + ?Sized>(
    query: &Q,
    config: &CharacterControllerConfig,
    position: Vec3,
    velocity: Vec3,
) -> GroundResult {
    if velocity.z > config.max_rise_speed {
        return GroundResult::none();
    }

    let check_end = position - WORLD_UP * config.ground_check_depth;
    let trace = query.sweep(&config.hull, position, check_end);

    if !trace.hit {
        return GroundResult::none();
    }

    if !is_walkable(trace.normal, config.max_ground_angle) {
        trace!(normal = ?trace.normal, "ground too steep to stand on");
        return GroundResult::none();
    }

    GroundResult {
        hit: true,
        normal: trace.normal,
        entity: trace.entity,
    }
}

/// Pull `position` down onto walkable ground within `step_height`.
///
/// Lifts by `snap_lift` first so a hull resting in the surface can get
/// clear, then sweeps down. Returns `position` unchanged when there is
/// nothing to snap to.
pub fn snap_to_ground<Q: SpatialQuery + ?Sized>(
    query: &Q,
    config: &CharacterControllerConfig,
    position: Vec3,
) -> Vec3 {
    let lift = query.sweep(
        &config.hull,
        position,
        position + WORLD_UP * config.snap_lift,
    );
    let start = lift.end_position;
    let end = position - WORLD_UP * config.step_height;

    let trace = query.sweep(&config.hull, start, end);

    if trace.fraction <= 0.0 || trace.fraction >= 1.0 {
        return position;
    }
    if trace.started_solid {
        return position;
    }
    if !is_walkable(trace.normal, config.max_ground_angle) {
        return position;
    }

    trace.end_position
}
