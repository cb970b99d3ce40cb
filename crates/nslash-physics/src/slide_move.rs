//! Slide move and step-up resolution.
//!
//! The hull is swept along its velocity; on contact the velocity is clipped
//! against the touched planes and the remaining time is spent sliding. The
//! step variant additionally tries lifting the hull by the step height,
//! moving across and dropping back down, keeping whichever attempt made
//! more horizontal progress.

use glam::Vec3;
use nslash_core::WORLD_UP;

use crate::character_controller::CharacterControllerConfig;
use crate::ground::is_walkable;
use crate::query::SpatialQuery;

/// Maximum number of collision planes tracked during one slide move.
const MAX_CLIP_PLANES: usize = 5;

/// Below this squared speed the hull is considered stopped.
const MIN_MOVE_SPEED_SQ: f32 = 1e-6;

/// Result of a slide move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideOutcome {
    /// Sum of the travelled fractions over every bump; zero means the hull
    /// never moved
    pub travel: f32,
    /// Whether any surface was touched along the way
    pub clipped: bool,
}

/// Clip velocity against a surface normal.
///
/// Removes the component of velocity going into the surface, scaled by
/// `overbounce` so the hull leaves the plane slightly.
pub fn clip_velocity(velocity: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    let backoff = velocity.dot(normal);

    let adjusted_backoff = if backoff < 0.0 {
        backoff * overbounce
    } else {
        backoff / overbounce
    };

    velocity - normal * adjusted_backoff
}

/// Sweep along `velocity * delta_time`, sliding along whatever is hit.
pub fn slide_move<Q: SpatialQuery + ?Sized>(
    query: &Q,
    config: &CharacterControllerConfig,
    position: &mut Vec3,
    velocity: &mut Vec3,
    delta_time: f32,
) -> SlideOutcome {
    let mut time_left = delta_time;
    let mut travel = 0.0;
    let mut clipped = false;
    let original_velocity = *velocity;
    let mut planes = [Vec3::ZERO; MAX_CLIP_PLANES];
    let mut num_planes = 0;

    for _ in 0..config.max_bumps {
        if velocity.length_squared() < MIN_MOVE_SPEED_SQ {
            break;
        }

        let target = *position + *velocity * time_left;
        let trace = query.sweep(&config.hull, *position, target);
        travel += trace.fraction;
        *position = trace.end_position;

        if !trace.hit {
            break;
        }
        clipped = true;

        if trace.started_solid {
            *velocity = Vec3::ZERO;
            break;
        }

        time_left -= time_left * trace.fraction;

        if num_planes == MAX_CLIP_PLANES {
            *velocity = Vec3::ZERO;
            break;
        }
        planes[num_planes] = trace.normal;
        num_planes += 1;

        // Find a clipped velocity that leaves every touched plane.
        let mut resolved = None;
        for i in 0..num_planes {
            let candidate = clip_velocity(*velocity, planes[i], config.overbounce);
            let leaves_all = (0..num_planes)
                .filter(|&j| j != i)
                .all(|j| candidate.dot(planes[j]) >= -0.01);
            if leaves_all {
                resolved = Some(candidate);
                break;
            }
        }

        match resolved {
            Some(candidate) => *velocity = candidate,
            None if num_planes >= 2 => {
                // Wedged between two planes: run along their crease.
                let crease = planes[0].cross(planes[1]).normalize_or_zero();
                *velocity = crease * original_velocity.dot(crease);
            }
            None => {
                *velocity = Vec3::ZERO;
                break;
            }
        }
    }

    SlideOutcome { travel, clipped }
}

/// Slide move that can climb obstacles up to `config.step_height`.
///
/// The stepped attempt is only kept if it lands on walkable ground and
/// ends further from the start horizontally than the plain slide did.
pub fn step_slide_move<Q: SpatialQuery + ?Sized>(
    query: &Q,
    config: &CharacterControllerConfig,
    position: &mut Vec3,
    velocity: &mut Vec3,
    delta_time: f32,
) -> SlideOutcome {
    let start_position = *position;
    let start_velocity = *velocity;

    let plain = slide_move(query, config, position, velocity, delta_time);
    if !plain.clipped {
        return plain;
    }

    let mut step_position = start_position;
    let mut step_velocity = start_velocity;

    let up = query.sweep(
        &config.hull,
        step_position,
        step_position + WORLD_UP * config.step_height,
    );
    step_position = up.end_position;

    let stepped = slide_move(
        query,
        config,
        &mut step_position,
        &mut step_velocity,
        delta_time,
    );

    let down = query.sweep(
        &config.hull,
        step_position,
        step_position - WORLD_UP * config.step_height,
    );

    if !down.hit || down.started_solid {
        return plain;
    }
    if !is_walkable(down.normal, config.max_ground_angle) {
        return plain;
    }
    step_position = down.end_position;

    let plain_progress = horizontal_distance(start_position, *position);
    let step_progress = horizontal_distance(start_position, step_position);
    if plain_progress >= step_progress {
        return plain;
    }

    *position = step_position;
    *velocity = step_velocity;
    SlideOutcome {
        travel: stepped.travel,
        clipped: true,
    }
}

fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    (b - a).truncate().length()
}
