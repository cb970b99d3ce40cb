//! Per-tick movement events read by the presentation layer

use serde::{Deserialize, Serialize};

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickEvent {
    /// Touched down after being airborne
    Grounded,
    /// Jumped off the ground
    Jump,
    /// Jumped a second time while airborne
    DoubleJump,
}

impl TickEvent {
    /// Every event kind
    pub const ALL: [TickEvent; 3] = [TickEvent::Grounded, TickEvent::Jump, TickEvent::DoubleJump];

    const fn bit(self) -> u8 {
        match self {
            TickEvent::Grounded => 1 << 0,
            TickEvent::Jump => 1 << 1,
            TickEvent::DoubleJump => 1 << 2,
        }
    }
}

/// Set of events raised during one tick. Cleared when the next tick starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEvents {
    bits: u8,
}

impl TickEvents {
    /// An empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event; adding it twice has no further effect
    pub fn insert(&mut self, event: TickEvent) {
        self.bits |= event.bit();
    }

    /// Whether the event was raised
    pub fn contains(&self, event: TickEvent) -> bool {
        self.bits & event.bit() != 0
    }

    /// Whether no event was raised
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of distinct events raised
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Drop every event
    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// Iterate the raised events
    pub fn iter(&self) -> impl Iterator<Item = TickEvent> + '_ {
        TickEvent::ALL
            .into_iter()
            .filter(move |event| self.contains(*event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let mut events = TickEvents::new();
        assert!(events.is_empty());

        events.insert(TickEvent::Jump);
        events.insert(TickEvent::Jump);
        assert_eq!(events.len(), 1);
        assert!(events.contains(TickEvent::Jump));
        assert!(!events.contains(TickEvent::DoubleJump));

        events.insert(TickEvent::Grounded);
        assert_eq!(
            events.iter().collect::<Vec<_>>(),
            vec![TickEvent::Grounded, TickEvent::Jump]
        );

        events.clear();
        assert!(events.is_empty());
    }
}
