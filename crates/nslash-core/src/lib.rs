//! nslash Core - Core types and utilities for the nslash movement simulator
//!
//! This crate provides the foundational types shared by the physics and game crates:
//! - Mathematical primitives (re-exported from glam)
//! - Entity identifiers used by collision queries
//! - Fixed-step tick clock that drives the simulation

pub mod time;
pub mod types;

pub use glam::{Vec2, Vec3};
pub use time::{TickClock, TickConfig, TickError};
pub use types::{angle_from_up_deg, EntityId, WORLD_UP};
