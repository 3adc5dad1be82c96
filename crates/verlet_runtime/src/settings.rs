//! Driver settings, loaded from an optional JSON file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use verlet_core::glam::Vec2;
use verlet_core::time::DRIVER_MAX_FRAME_DT;
use verlet_core::SolverConfig;

/// Top-level settings file.
///
/// ```json
/// { "solver": { "sub_steps": 8 }, "spawn": { "max_particles": 2000 }, "driver": { "frames": 600 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub solver: SolverConfig,
    pub spawn: SpawnSettings,
    pub driver: DriverSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Stop spawning once this many particles exist.
    pub max_particles: usize,
    /// Particles added per frame while below the limit.
    pub per_frame: usize,
    pub spawn_point: Vec2,
    /// Horizontal jitter half-width; keeps the stream from stacking exactly.
    pub jitter: f32,
    pub seed: u64,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            max_particles: 5000,
            per_frame: 1,
            spawn_point: Vec2::new(400.0, 100.0),
            jitter: 1.0,
            seed: 0x5EED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    /// Frames to run before exiting.
    pub frames: u64,
    /// Simulated seconds per frame (defaults to a 144 Hz display).
    pub frame_dt: f32,
    /// Clamp applied before the solver applies its own.
    pub max_frame_dt: f32,
    pub physics_enabled: bool,
    /// Log a status line every N frames (0 disables).
    pub report_interval: u64,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            frames: 2000,
            frame_dt: 1.0 / 144.0,
            max_frame_dt: DRIVER_MAX_FRAME_DT,
            physics_enabled: true,
            report_interval: 144,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
