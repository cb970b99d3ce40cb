use thiserror::Error;

/// Errors reported when validating a [`MovementConfig`](crate::MovementConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("ground angle must be within 0..90 degrees, got {0}")]
    GroundAngle(f32),

    #[error("approach radii are inverted: near {near} is not below far {far}")]
    ApproachRadii { near: f32, far: f32 },

    #[error("collision hull has a non-positive extent")]
    DegenerateHull,
}
