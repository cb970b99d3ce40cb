//! Core types used throughout nslash

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// World up axis. The simulation is Z-up; gravity acts along `-WORLD_UP`.
pub const WORLD_UP: Vec3 = Vec3::Z;

/// Unique identifier for entities that can be hit by collision queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an entity ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Pack the ID into a `u128`, e.g. for a collider's user data slot
    pub fn to_bits(self) -> u128 {
        self.0.as_u128()
    }

    /// Unpack an ID stored with [`EntityId::to_bits`].
    ///
    /// Zero is reserved for "no entity" and yields `None`.
    pub fn from_bits(bits: u128) -> Option<Self> {
        if bits == 0 {
            None
        } else {
            Some(Self(Uuid::from_u128(bits)))
        }
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Angle in degrees between `normal` and [`WORLD_UP`].
///
/// Computed in double precision so that a surface tilted by exactly the
/// configured limit is not pushed over it by rounding. A zero normal is
/// treated as pointing straight down.
pub fn angle_from_up_deg(normal: Vec3) -> f32 {
    let n = normal.as_dvec3();
    let len = n.length();
    if len <= f64::EPSILON {
        return 180.0;
    }
    let cos = (n.dot(WORLD_UP.as_dvec3()) / len).clamp(-1.0, 1.0);
    cos.acos().to_degrees() as f32
}
