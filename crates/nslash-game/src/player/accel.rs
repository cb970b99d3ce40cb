//! Quake-style acceleration and friction

use glam::Vec3;

/// Below this speed friction leaves the velocity alone.
const REST_SPEED: f32 = 0.1;

/// Accelerate `velocity` toward `wish_speed` along `wish_dir`.
///
/// The wish speed is clamped to `speed_cap` (a non-positive cap means no
/// cap). Only the deficit along `wish_dir` is made up, at most
/// `accel * delta_time * wish_speed` per call, so the result never
/// overshoots the target speed in that direction.
pub fn accelerate(
    velocity: Vec3,
    wish_dir: Vec3,
    wish_speed: f32,
    speed_cap: f32,
    accel: f32,
    delta_time: f32,
) -> Vec3 {
    let mut wish_speed = wish_speed.max(0.0);
    if speed_cap > 0.0 {
        wish_speed = wish_speed.min(speed_cap);
    }

    let current_speed = velocity.dot(wish_dir);
    let add_speed = wish_speed - current_speed;
    if add_speed <= 0.0 {
        return velocity;
    }

    let accel_speed = (accel * delta_time * wish_speed).min(add_speed);
    velocity + wish_dir * accel_speed
}

/// Bleed speed off `velocity` while keeping its direction.
///
/// Speeds under `stop_speed` lose speed as if moving at `stop_speed`, so
/// slow movement comes to a full stop instead of decaying forever.
pub fn apply_friction(velocity: Vec3, friction: f32, stop_speed: f32, delta_time: f32) -> Vec3 {
    let speed = velocity.length();
    if speed < REST_SPEED {
        return velocity;
    }

    let control = speed.max(stop_speed);
    let drop = control * delta_time * friction;
    let new_speed = (speed - drop).max(0.0);
    if new_speed == speed {
        return velocity;
    }

    velocity * (new_speed / speed)
}
