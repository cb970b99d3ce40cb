//! Per-tick click-to-move simulation

use nslash_physics::{CharacterController, SpatialQuery};
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::input::TickInput;

use super::events::{TickEvent, TickEvents};
use super::jump::{try_jump, JumpOutcome};
use super::policy::{air_move, ground_move, wish_direction};
use super::state::{CharacterSnapshot, CharacterState};
use super::MovementConfig;

/// Moves one character toward its clicked destination, one tick at a time
pub struct MovementSimulator {
    config: MovementConfig,
    /// Collision resolution
    controller: CharacterController,
    state: CharacterState,
    events: TickEvents,
}

impl MovementSimulator {
    /// Create a simulator with a character at the origin
    pub fn new(config: MovementConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let controller = CharacterController::with_config(config.controller_config());
        Ok(Self {
            config,
            controller,
            state: CharacterState::default(),
            events: TickEvents::new(),
        })
    }

    /// Create a simulator resuming from an existing state
    pub fn with_state(config: MovementConfig, state: CharacterState) -> Result<Self, ConfigError> {
        let mut simulator = Self::new(config)?;
        simulator.state = state;
        Ok(simulator)
    }

    /// Place the character at `position`, at rest, with no destination
    pub fn spawn(&mut self, position: glam::Vec3) {
        self.state = CharacterState::at(position);
        self.events.clear();
        debug!(?position, "character spawned");
    }

    /// Movement configuration
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Events raised by the last tick
    pub fn events(&self) -> &TickEvents {
        &self.events
    }

    /// Snapshot of the character after the last tick
    pub fn state(&self) -> CharacterSnapshot {
        self.state.snapshot()
    }

    /// Full character state
    pub fn character(&self) -> &CharacterState {
        &self.state
    }

    /// Advance the character by one tick
    pub fn tick<Q: SpatialQuery + ?Sized>(&mut self, query: &Q, input: &TickInput) -> &TickEvents {
        let dt = input.delta_time;
        self.events.clear();

        if input.attack_held {
            self.state.last_target = input.target_position;
        }

        let ground = self
            .controller
            .detect_ground(query, self.state.position, self.state.velocity);
        let grounded = ground.hit;

        let position = self.state.position;
        let target = self.state.last_target;
        let wish_dir = wish_direction(position, target);

        if grounded {
            if !self.state.grounded {
                self.state.velocity.z = 0.0;
                self.state.double_jump_used = false;
                self.events.insert(TickEvent::Grounded);
                debug!(?position, entity = ?ground.entity, "landed");
            }

            let band = self.config.band(position.distance(target));
            trace!(?band, "ground move");
            self.state.velocity = ground_move(
                &self.config,
                band,
                self.state.velocity,
                wish_dir,
                input.run_held,
                dt,
            );
        } else {
            if self.state.grounded {
                debug!(?position, "left ground");
            }
            self.state.velocity = air_move(&self.config, self.state.velocity, wish_dir, dt);
        }

        let mut jumped = false;
        if input.jump_pressed {
            let outcome = try_jump(&mut self.state, grounded, self.config.jump_speed, &mut self.events);
            jumped = outcome != JumpOutcome::None;
        }

        // Snapping right after a jump would pull the character back down.
        let snap = grounded && !jumped;
        let result = self
            .controller
            .resolve(query, position, self.state.velocity, dt, snap);
        if result.did_move {
            self.state.position = result.position;
            self.state.velocity = result.velocity;
        }

        self.state.grounded = grounded;
        self.state.ground_entity = ground.entity;

        &self.events
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use nslash_physics::testing::BoxWorld;

    use super::*;

    fn simulator() -> MovementSimulator {
        MovementSimulator::new(MovementConfig::default()).unwrap()
    }

    fn click(target: Vec3) -> TickInput {
        TickInput {
            target_position: target,
            attack_held: true,
            ..TickInput::idle(0.1)
        }
    }

    fn jump() -> TickInput {
        TickInput {
            jump_pressed: true,
            ..TickInput::idle(0.1)
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MovementConfig {
            step_height: -1.0,
            ..Default::default()
        };
        assert!(MovementSimulator::new(config).is_err());
    }

    #[test]
    fn test_walk_toward_far_target() {
        let world = BoxWorld::with_floor(0.0);
        let mut sim = simulator();

        let events = sim.tick(&world, &click(Vec3::new(200.0, 0.0, 0.0)));
        assert!(events.contains(TickEvent::Grounded));

        let state = sim.state();
        assert!(state.grounded);
        assert!(state.velocity.x > 0.0 && state.velocity.x <= 150.0);
        assert_eq!(state.velocity.z, 0.0);
        assert!((state.position.x - 9.0).abs() < 1e-3);
        assert!(state.position.z >= 0.0 && state.position.z < 1.0);
    }

    #[test]
    fn test_walk_reaches_target_and_stops() {
        let world = BoxWorld::with_floor(0.0);
        let mut sim = simulator();
        let target = Vec3::new(300.0, 120.0, 0.0);

        sim.tick(&world, &click(target));
        for _ in 0..200 {
            sim.tick(&world, &TickInput::idle(0.1));
        }

        let state = sim.state();
        assert!(state.grounded);
        assert!(state.position.distance(target) <= 10.0 + 1.0);
        assert_eq!(state.velocity.x, 0.0);
        assert_eq!(state.velocity.y, 0.0);
    }

    #[test]
    fn test_dead_zone_keeps_only_gravity() {
        let world = BoxWorld::with_floor(0.0);
        let mut sim = simulator();

        sim.tick(&world, &click(Vec3::new(5.0, 0.0, 0.0)));

        let state = sim.state();
        assert_eq!(state.velocity.x, 0.0);
        assert_eq!(state.velocity.y, 0.0);
        assert!((state.velocity.z + 80.0).abs() < 1e-3);
        assert_eq!(state.position, Vec3::ZERO);
    }

    #[test]
    fn test_target_only_follows_attack() {
        let world = BoxWorld::with_floor(0.0);
        let mut sim = simulator();

        sim.tick(
            &world,
            &TickInput {
                target_position: Vec3::new(500.0, 0.0, 0.0),
                ..TickInput::idle(0.1)
            },
        );
        assert_eq!(sim.character().last_target, Vec3::ZERO);
        assert_eq!(sim.state().velocity.x, 0.0);

        sim.tick(&world, &click(Vec3::new(500.0, 0.0, 0.0)));
        assert_eq!(sim.character().last_target, Vec3::new(500.0, 0.0, 0.0));
        assert!(sim.state().velocity.x > 0.0);
    }

    #[test]
    fn test_blocked_move_keeps_position() {
        let mut world = BoxWorld::with_floor(0.0);
        world.add_box(Vec3::new(16.0, -500.0, 0.0), Vec3::new(40.0, 500.0, 500.0));
        let mut sim = simulator();

        sim.tick(&world, &click(Vec3::new(400.0, 0.0, 0.0)));

        assert_eq!(sim.state().position, Vec3::ZERO);
        assert!(sim.state().grounded);
    }

    #[test]
    fn test_steps_onto_low_ledge() {
        let mut world = BoxWorld::with_floor(0.0);
        world.add_box(Vec3::new(30.0, -500.0, 0.0), Vec3::new(2000.0, 500.0, 16.0));
        let mut sim = simulator();

        sim.tick(&world, &click(Vec3::new(600.0, 0.0, 16.0)));
        for _ in 0..30 {
            sim.tick(&world, &TickInput::idle(0.1));
        }

        let state = sim.state();
        assert!(state.position.x > 100.0);
        assert!((state.position.z - 16.0).abs() < 1.0);
        assert!(state.grounded);
    }

    #[test]
    fn test_landing_zeroes_vertical_speed() {
        let world = BoxWorld::with_floor(0.0);
        let state = CharacterState {
            position: Vec3::new(0.0, 0.0, 1.9),
            velocity: Vec3::new(0.0, 0.0, -100.0),
            grounded: false,
            double_jump_used: true,
            last_target: Vec3::new(500.0, 0.0, 0.0),
            ground_entity: None,
        };
        let mut sim = MovementSimulator::with_state(MovementConfig::default(), state).unwrap();

        // Short enough that the fall alone would not reach the floor.
        let events = *sim.tick(&world, &TickInput::idle(1.0 / 60.0));

        assert!(events.contains(TickEvent::Grounded));
        assert_eq!(sim.state().velocity.z, 0.0);
        assert!(sim.state().velocity.x > 0.0);
        assert!(!sim.character().double_jump_used);
    }

    #[test]
    fn test_jump_tick_skips_ground_snap() {
        let world = BoxWorld::with_floor(0.0);
        let mut sim = simulator();

        let events = *sim.tick(
            &world,
            &TickInput {
                target_position: Vec3::new(500.0, 0.0, 0.0),
                attack_held: true,
                jump_pressed: true,
                ..TickInput::idle(1.0 / 60.0)
            },
        );

        assert!(events.contains(TickEvent::Jump));
        // 410 / 60 units up; a snap would have pulled it back to the floor
        assert!(sim.state().position.z > 5.0);
        assert!(sim.state().velocity.z > 400.0);
    }

    #[test]
    fn test_double_jump_sequence() {
        let world = BoxWorld::with_floor(0.0);
        let mut sim = simulator();

        let events = *sim.tick(&world, &jump());
        assert!(events.contains(TickEvent::Jump));
        assert!((sim.state().velocity.z - 330.0).abs() < 1e-3);
        assert!(sim.state().position.z > 30.0);

        let events = *sim.tick(&world, &jump());
        assert!(events.contains(TickEvent::DoubleJump));
        assert!(!events.contains(TickEvent::Jump));
        assert!(sim.character().double_jump_used);
        assert!((sim.state().velocity.z - 660.0).abs() < 1e-3);

        let events = *sim.tick(&world, &jump());
        assert!(events.is_empty());
        assert!((sim.state().velocity.z - 580.0).abs() < 1e-3);

        let mut landed = false;
        for _ in 0..200 {
            if sim.tick(&world, &TickInput::idle(0.1)).contains(TickEvent::Grounded) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert!(!sim.character().double_jump_used);
        assert!(sim.state().grounded);

        let events = *sim.tick(&world, &jump());
        assert!(events.contains(TickEvent::Jump));
    }
}
