//! Tick timing for nslash
//!
//! The simulation advances in discrete fixed-length ticks. [`TickClock`]
//! turns raw frame deltas into a whole number of ticks and keeps a
//! monotonic tick counter, so nothing downstream has to read wall-clock time.

use serde::{Deserialize, Serialize};

/// Errors that can occur when configuring the tick clock
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TickError {
    #[error("Fixed timestep must be positive and finite, got {0}")]
    InvalidTimestep(f32),

    #[error("Time scale must be non-negative and finite, got {0}")]
    InvalidTimeScale(f32),
}

/// Configuration for tick timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Length of one simulation tick in seconds
    pub fixed_timestep: f32,
    /// How many simulated seconds pass per real second
    pub time_scale: f32,
    /// Maximum raw delta accepted per frame to prevent a spiral of death
    pub max_delta_time: f32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            time_scale: 1.0,
            max_delta_time: 0.25,
        }
    }
}

/// Fixed-step clock with a monotonic tick counter
#[derive(Debug, Clone)]
pub struct TickClock {
    config: TickConfig,
    /// Ticks completed since creation
    tick: u64,
    /// Simulated seconds since creation
    total_time: f64,
    /// Whether the clock is paused
    paused: bool,
    /// Scaled time not yet consumed by a whole tick
    accumulator: f32,
}

impl TickClock {
    /// Create a clock, rejecting a non-positive timestep
    pub fn new(config: TickConfig) -> Result<Self, TickError> {
        if !(config.fixed_timestep.is_finite() && config.fixed_timestep > 0.0) {
            return Err(TickError::InvalidTimestep(config.fixed_timestep));
        }
        if !(config.time_scale.is_finite() && config.time_scale >= 0.0) {
            return Err(TickError::InvalidTimeScale(config.time_scale));
        }

        Ok(Self {
            config,
            tick: 0,
            total_time: 0.0,
            paused: false,
            accumulator: 0.0,
        })
    }

    /// Seconds per tick, i.e. the `delta_time` every tick is simulated with
    pub fn delta_time(&self) -> f32 {
        self.config.fixed_timestep
    }

    /// Number of ticks completed so far
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds elapsed
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Feed a raw frame delta and return how many ticks are now due
    pub fn advance(&mut self, raw_delta: f32) -> u32 {
        if self.paused {
            return 0;
        }

        let clamped = raw_delta.clamp(0.0, self.config.max_delta_time);
        self.accumulator += clamped * self.config.time_scale;

        let mut due = 0;
        while self.accumulator >= self.config.fixed_timestep {
            self.accumulator -= self.config.fixed_timestep;
            due += 1;
        }
        due
    }

    /// Record one completed tick and return its index (starting at 0)
    pub fn step(&mut self) -> u64 {
        let index = self.tick;
        self.tick += 1;
        self.total_time += self.config.fixed_timestep as f64;
        index
    }

    /// Fraction of a tick left in the accumulator, for interpolation
    pub fn interpolation(&self) -> f32 {
        self.accumulator / self.config.fixed_timestep
    }

    /// Pause the clock
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume the clock
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether the clock is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
