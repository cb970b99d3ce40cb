//! Axis-aligned collision hull swept by the character

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Bounding box relative to the character's feet-center origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hull {
    /// Minimum corner (the feet sit at `mins.z`)
    pub mins: Vec3,
    /// Maximum corner
    pub maxs: Vec3,
}

impl Default for Hull {
    fn default() -> Self {
        Self {
            mins: Vec3::new(-16.0, -16.0, 0.0),
            maxs: Vec3::new(16.0, 16.0, 72.0),
        }
    }
}

impl Hull {
    /// Create a hull from its corners
    pub fn new(mins: Vec3, maxs: Vec3) -> Self {
        Self { mins, maxs }
    }

    /// Half extents of the box
    pub fn half_extents(&self) -> Vec3 {
        (self.maxs - self.mins) * 0.5
    }

    /// Offset from the origin to the box center
    pub fn center_offset(&self) -> Vec3 {
        (self.mins + self.maxs) * 0.5
    }

    /// Whether every extent is positive and finite
    pub fn is_valid(&self) -> bool {
        let size = self.maxs - self.mins;
        size.is_finite() && size.min_element() > 0.0
    }
}
