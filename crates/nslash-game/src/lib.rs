//! nslash Game - Click-to-move character movement
//!
//! Provides the per-tick movement simulator, its tuning config, tick input
//! and the events it reports to the presentation layer.

pub mod error;
pub mod input;
pub mod player;

pub use error::ConfigError;
pub use input::{pick_target, TickInput, PICK_DISTANCE};
pub use player::{
    CharacterSnapshot, CharacterState, JumpOutcome, MovementBand, MovementConfig,
    MovementSimulator, TickEvent, TickEvents,
};
