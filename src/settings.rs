//! Harness settings with persistence
//!
//! Settings are read from `~/.config/nslash/settings.toml` unless a path is
//! given on the command line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use nslash_core::TickConfig;
use nslash_game::MovementConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All harness settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessSettings {
    pub movement: MovementConfig,
    pub tick: TickConfig,
    pub run: RunSettings,
    pub level: LevelSettings,
}

impl HarnessSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("nslash"))
    }

    /// Get the default settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from `path`, or from the config directory when no path
    /// is given. Anything missing or unreadable falls back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let explicit = path.is_some();
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::settings_path() {
                Some(path) => path,
                None => {
                    warn!("Could not determine config directory");
                    return Self::default();
                }
            },
        };

        if !path.exists() {
            if explicit {
                warn!("Settings file {:?} does not exist, using defaults", path);
            } else {
                info!("No settings file found, using defaults");
            }
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to the config directory
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };
        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
        info!("Saved settings to {:?}", path);
        Ok(path)
    }
}

/// How the scripted run is driven
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Ticks to simulate
    pub ticks: u64,
    /// Wall-clock frame length fed to the tick clock
    pub frame_time: f32,
    /// Seed for the scripted clicks
    pub seed: u64,
    /// Ticks between new click targets
    pub retarget_interval: u64,
    /// Chance per tick of pressing jump
    pub jump_chance: f64,
    /// Chance that a new click is made with run held
    pub run_chance: f64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            ticks: 600,
            frame_time: 1.0 / 60.0,
            seed: 7,
            retarget_interval: 90,
            jump_chance: 0.01,
            run_chance: 0.3,
        }
    }
}

/// Layout of the generated test level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    /// Height of the ground plane
    pub ground_height: f32,
    /// Half size of the square area click targets are drawn from
    pub arena_half_size: f32,
    /// Heights of the stair boxes laid out along +X
    pub step_heights: Vec<f32>,
    /// Tilt of the ramp along -X in degrees
    pub ramp_pitch_deg: f32,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            ground_height: 0.0,
            arena_half_size: 600.0,
            step_heights: vec![12.0, 24.0, 36.0, 48.0],
            ramp_pitch_deg: 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings: HarnessSettings = toml::from_str(
            r#"
            [run]
            ticks = 120

            [movement]
            gravity = 600.0
            "#,
        )
        .unwrap();

        assert_eq!(settings.run.ticks, 120);
        assert_eq!(settings.run.seed, RunSettings::default().seed);
        assert_eq!(settings.movement.gravity, 600.0);
        assert_eq!(settings.movement.jump_speed, 410.0);
        assert_eq!(settings.level.step_heights.len(), 4);
    }

    #[test]
    fn test_settings_serialize() {
        let settings = HarnessSettings::default();
        let content = toml::to_string_pretty(&settings).unwrap();
        let parsed: HarnessSettings = toml::from_str(&content).unwrap();
        assert_eq!(parsed.run.ticks, settings.run.ticks);
        assert_eq!(parsed.level.step_heights, settings.level.step_heights);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = HarnessSettings::load(Some(Path::new("/nonexistent/nslash/settings.toml")));
        assert_eq!(settings.run.ticks, RunSettings::default().ticks);
    }
}
