//! Jump and double jump

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::events::{TickEvent, TickEvents};
use super::state::CharacterState;

/// What a jump press did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpOutcome {
    /// Nothing: the double jump is already spent
    None,
    /// Jumped off the ground
    PrimaryJump,
    /// Jumped again in mid-air
    DoubleJump,
}

/// Handle a jump press edge.
///
/// On the ground this always jumps and re-arms the double jump. In the
/// air it jumps once, then does nothing until the character lands again.
/// A jump adds `jump_speed` to the vertical velocity and records the
/// matching event.
pub fn try_jump(
    state: &mut CharacterState,
    grounded: bool,
    jump_speed: f32,
    events: &mut TickEvents,
) -> JumpOutcome {
    let outcome = if grounded {
        state.double_jump_used = false;
        events.insert(TickEvent::Jump);
        JumpOutcome::PrimaryJump
    } else if !state.double_jump_used {
        state.double_jump_used = true;
        events.insert(TickEvent::DoubleJump);
        JumpOutcome::DoubleJump
    } else {
        return JumpOutcome::None;
    };

    state.velocity.z += jump_speed;
    debug!(?outcome, vertical_speed = state.velocity.z, "jump");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_jump_latch() {
        let mut state = CharacterState::default();
        let mut events = TickEvents::new();

        assert_eq!(
            try_jump(&mut state, true, 410.0, &mut events),
            JumpOutcome::PrimaryJump
        );
        assert_eq!(state.velocity.z, 410.0);
        assert!(events.contains(TickEvent::Jump));

        assert_eq!(
            try_jump(&mut state, false, 410.0, &mut events),
            JumpOutcome::DoubleJump
        );
        assert_eq!(state.velocity.z, 820.0);
        assert!(events.contains(TickEvent::DoubleJump));
        assert!(state.double_jump_used);

        events.clear();
        assert_eq!(
            try_jump(&mut state, false, 410.0, &mut events),
            JumpOutcome::None
        );
        assert_eq!(state.velocity.z, 820.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_ground_jump_rearms_double_jump() {
        let mut state = CharacterState {
            double_jump_used: true,
            ..Default::default()
        };
        let mut events = TickEvents::new();

        try_jump(&mut state, true, 410.0, &mut events);
        assert!(!state.double_jump_used);
        assert_eq!(
            try_jump(&mut state, false, 410.0, &mut events),
            JumpOutcome::DoubleJump
        );
    }
}
