//! Player movement
//!
//! Click-to-move locomotion: distance-banded ground movement toward the
//! last clicked point, weak air control, jump and double jump, resolved
//! against world collision every tick.

mod accel;
mod controller;
mod events;
mod jump;
mod movement;
mod policy;
mod state;

pub use accel::{accelerate, apply_friction};
pub use controller::MovementSimulator;
pub use events::{TickEvent, TickEvents};
pub use jump::{try_jump, JumpOutcome};
pub use movement::{MovementBand, MovementConfig};
pub use policy::{air_move, ground_move, wish_direction};
pub use state::{CharacterSnapshot, CharacterState};
