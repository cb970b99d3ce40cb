//! Ground and air movement toward the target

use glam::Vec3;

use super::accel::{accelerate, apply_friction};
use super::movement::{MovementBand, MovementConfig};

/// Horizontal unit direction from `position` to `target`, or zero when the
/// target is straight above or below.
pub fn wish_direction(position: Vec3, target: Vec3) -> Vec3 {
    let to_target = target - position;
    Vec3::new(to_target.x, to_target.y, 0.0).normalize_or_zero()
}

/// Velocity after one grounded tick in `band`.
///
/// Moving bands accelerate toward the band speed and then apply ground
/// friction. The arrived band drops all motion and keeps only this tick's
/// gravity so the character can settle.
pub fn ground_move(
    config: &MovementConfig,
    band: MovementBand,
    velocity: Vec3,
    wish_dir: Vec3,
    running: bool,
    delta_time: f32,
) -> Vec3 {
    let Some(speed) = config.band_speed(band, running) else {
        return Vec3::new(0.0, 0.0, -config.gravity * delta_time);
    };

    let velocity = accelerate(
        velocity,
        wish_dir,
        speed,
        speed,
        config.ground_accelerate,
        delta_time,
    );
    apply_friction(
        velocity,
        config.ground_friction,
        config.friction_stop_speed,
        delta_time,
    )
}

/// Velocity after one airborne tick: weak steering plus gravity
pub fn air_move(config: &MovementConfig, velocity: Vec3, wish_dir: Vec3, delta_time: f32) -> Vec3 {
    let mut velocity = accelerate(
        velocity,
        wish_dir,
        config.air_speed_cap,
        config.air_speed_cap,
        config.air_accelerate,
        delta_time,
    );
    velocity.z -= config.gravity * delta_time;
    velocity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wish_direction_is_horizontal() {
        let dir = wish_direction(Vec3::new(0.0, 0.0, 10.0), Vec3::new(30.0, 40.0, -5.0));
        assert!(dir.abs_diff_eq(Vec3::new(0.6, 0.8, 0.0), 1e-6));

        assert_eq!(wish_direction(Vec3::ZERO, Vec3::new(0.0, 0.0, 50.0)), Vec3::ZERO);
    }

    #[test]
    fn test_far_band_walk() {
        let config = MovementConfig::default();
        let velocity = ground_move(&config, MovementBand::Far, Vec3::ZERO, Vec3::X, false, 0.1);

        // +150 from acceleration, then friction drops 150 * 0.1 * 4 = 60
        assert!((velocity.x - 90.0).abs() < 1e-3);
        assert_eq!(velocity.y, 0.0);
        assert_eq!(velocity.z, 0.0);
    }

    #[test]
    fn test_near_band_is_slower() {
        let config = MovementConfig::default();
        let far = ground_move(&config, MovementBand::Far, Vec3::ZERO, Vec3::X, false, 0.1);
        let near = ground_move(&config, MovementBand::Near, Vec3::ZERO, Vec3::X, false, 0.1);
        assert!(near.x > 0.0);
        assert!(near.x < far.x);
    }

    #[test]
    fn test_running_is_faster() {
        let config = MovementConfig::default();
        let walk = ground_move(&config, MovementBand::Far, Vec3::ZERO, Vec3::X, false, 0.1);
        let run = ground_move(&config, MovementBand::Far, Vec3::ZERO, Vec3::X, true, 0.1);
        assert!(run.x > walk.x);
    }

    #[test]
    fn test_arrived_band_dead_zone() {
        let config = MovementConfig::default();
        let velocity = ground_move(
            &config,
            MovementBand::Arrived,
            Vec3::new(180.0, -40.0, 12.0),
            Vec3::X,
            true,
            0.1,
        );

        assert_eq!(velocity.x, 0.0);
        assert_eq!(velocity.y, 0.0);
        assert!((velocity.z + 80.0).abs() < 1e-4);
    }

    #[test]
    fn test_air_move_applies_gravity_and_weak_control() {
        let config = MovementConfig::default();
        let velocity = air_move(&config, Vec3::new(0.0, 0.0, 100.0), Vec3::Y, 0.1);

        assert!(velocity.y > 0.0 && velocity.y <= config.air_speed_cap + 1e-4);
        assert!((velocity.z - 20.0).abs() < 1e-3);
    }
}
