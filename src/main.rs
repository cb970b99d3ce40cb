//! nslash - Headless click-to-move movement harness
//!
//! Builds a small test level, drives one character with seeded click
//! targets for a fixed number of ticks, and prints the final state and
//! event counts as JSON.

mod level;
mod settings;

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use glam::Vec3;
use nslash_core::{EntityId, TickClock};
use nslash_game::{CharacterSnapshot, MovementSimulator, TickEvent, TickEvents, TickInput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use level::Level;
use settings::HarnessSettings;

/// Height above the ground the pointer ray starts from
const PICK_HEIGHT: f32 = 2000.0;

/// How often each event fired over the run
#[derive(Debug, Default, Serialize)]
struct EventCounts {
    grounded: u64,
    jump: u64,
    double_jump: u64,
}

impl EventCounts {
    fn record(&mut self, events: &TickEvents) {
        for event in events.iter() {
            match event {
                TickEvent::Grounded => self.grounded += 1,
                TickEvent::Jump => self.jump += 1,
                TickEvent::DoubleJump => self.double_jump += 1,
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    ticks: u64,
    simulated_seconds: f64,
    seed: u64,
    final_state: CharacterSnapshot,
    events: EventCounts,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = HarnessSettings::load(path.as_deref());

    if path.is_none() && HarnessSettings::settings_path().is_some_and(|p| !p.exists()) {
        if let Err(e) = settings.save() {
            warn!("Failed to save default settings: {:#}", e);
        }
    }

    let report = run(&settings)?;
    let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
    println!("{json}");
    Ok(())
}

fn run(settings: &HarnessSettings) -> Result<Report> {
    let script = &settings.run;
    ensure!(
        script.frame_time.min(settings.tick.max_delta_time) * settings.tick.time_scale > 0.0,
        "frame time, max delta time and time scale must all be positive"
    );

    let mut clock = TickClock::new(settings.tick.clone()).context("Invalid tick settings")?;
    let mut sim =
        MovementSimulator::new(settings.movement.clone()).context("Invalid movement settings")?;

    let hull = settings.movement.hull;
    let mut level = Level::build(&settings.level, hull, EntityId::new());
    sim.spawn(level.spawn);

    let mut rng = StdRng::seed_from_u64(script.seed);
    let retarget_interval = script.retarget_interval.max(1);
    let jump_chance = script.jump_chance.clamp(0.0, 1.0);
    let run_chance = script.run_chance.clamp(0.0, 1.0);
    let half = settings.level.arena_half_size.abs();
    let mut run_held = false;
    let mut counts = EventCounts::default();

    info!(
        ticks = script.ticks,
        seed = script.seed,
        dt = clock.delta_time(),
        "Starting run"
    );

    while clock.tick_count() < script.ticks {
        let due = clock.advance(script.frame_time);
        for _ in 0..due {
            if clock.tick_count() >= script.ticks {
                break;
            }
            let index = clock.step();

            let mut input = TickInput::idle(clock.delta_time());
            if index % retarget_interval == 0 {
                let origin = Vec3::new(
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                    settings.level.ground_height + PICK_HEIGHT,
                );
                run_held = rng.gen_bool(run_chance);
                input = input.with_pick(&level.world, origin, Vec3::NEG_Z, true);
                info!(
                    tick = index,
                    target = ?input.target_position,
                    run_held,
                    "New click target"
                );
            }
            input.run_held = run_held;
            input.jump_pressed = rng.gen_bool(jump_chance);

            let events = sim.tick(&level.world, &input);
            counts.record(events);
            level.follow_player(sim.state().position);
        }
    }

    let final_state = sim.state();
    info!(position = ?final_state.position, grounded = final_state.grounded, "Run finished");

    Ok(Report {
        ticks: clock.tick_count(),
        simulated_seconds: clock.total_time(),
        seed: script.seed,
        final_state,
        events: counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_counts() {
        let mut events = TickEvents::new();
        events.insert(TickEvent::Grounded);
        events.insert(TickEvent::Jump);

        let mut counts = EventCounts::default();
        counts.record(&events);
        counts.record(&events);

        assert_eq!(counts.grounded, 2);
        assert_eq!(counts.jump, 2);
        assert_eq!(counts.double_jump, 0);
    }

    #[test]
    fn test_short_run_is_deterministic() {
        let mut settings = HarnessSettings::default();
        settings.run.ticks = 120;

        let first = run(&settings).unwrap();
        let second = run(&settings).unwrap();

        assert_eq!(first.ticks, 120);
        assert_eq!(first.final_state, second.final_state);
        assert!(first.events.grounded >= 1);
    }
}
