//! Solver configuration

use crate::error::ConfigError;
use crate::time::SOLVER_MAX_FRAME_DT;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Physical and numerical parameters, fixed for the lifetime of a solver.
///
/// World coordinates have y growing downward: the floor sits at
/// `world_size.y` and gravity is positive on y. Every field has a default,
/// so partial JSON settings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Constant acceleration applied to every particle (units/s²).
    pub gravity: Vec2,
    /// Width and height of the world. Walls at `x = 0`, `x = width` and a
    /// floor at `y = height`; there is no ceiling.
    pub world_size: Vec2,
    /// Uniform radius shared by all particles.
    pub particle_radius: f32,
    /// Sub-steps per `update` call.
    pub sub_steps: u32,
    /// Broad-phase cell edge; must be at least `2 * particle_radius`.
    pub cell_size: f32,
    /// Largest frame dt accepted by `update` (seconds).
    pub max_frame_dt: f32,
    /// Fraction of the normal velocity kept after a wall bounce.
    pub wall_damping: f32,
    /// Particle slots reserved up front.
    pub initial_capacity: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 1000.0),
            world_size: Vec2::new(800.0, 600.0),
            particle_radius: 5.0,
            sub_steps: 8,
            cell_size: 10.0,
            max_frame_dt: SOLVER_MAX_FRAME_DT,
            wall_damping: 0.8,
            initial_capacity: 10_000,
        }
    }
}

impl SolverConfig {
    /// Same configuration with gravity switched off.
    pub fn without_gravity(self) -> Self {
        Self {
            gravity: Vec2::ZERO,
            ..self
        }
    }

    /// Distance below which two particle centres overlap.
    #[inline]
    pub fn interaction_distance(&self) -> f32 {
        2.0 * self.particle_radius
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("gravity", self.gravity.is_finite()),
            ("world_size", self.world_size.is_finite()),
            ("particle_radius", self.particle_radius.is_finite()),
            ("cell_size", self.cell_size.is_finite()),
            ("max_frame_dt", self.max_frame_dt.is_finite()),
            ("wall_damping", self.wall_damping.is_finite()),
        ];
        if let Some((field, _)) = finite.into_iter().find(|&(_, ok)| !ok) {
            return Err(ConfigError::NonFinite { field });
        }

        if self.particle_radius <= 0.0 {
            return Err(ConfigError::InvalidRadius {
                radius: self.particle_radius,
            });
        }
        // Both walls must fit a particle between them.
        if self.world_size.x <= self.interaction_distance() || self.world_size.y <= 0.0 {
            return Err(ConfigError::InvalidWorldSize {
                width: self.world_size.x,
                height: self.world_size.y,
            });
        }
        if self.sub_steps == 0 {
            return Err(ConfigError::ZeroSubSteps);
        }
        // Any overlapping pair must land in the same or adjacent cells.
        if self.cell_size < self.interaction_distance() {
            return Err(ConfigError::CellTooSmall {
                cell_size: self.cell_size,
                min: self.interaction_distance(),
            });
        }
        if self.max_frame_dt <= 0.0 {
            return Err(ConfigError::InvalidMaxFrameDt {
                max_frame_dt: self.max_frame_dt,
            });
        }
        if !(0.0..=1.0).contains(&self.wall_damping) {
            return Err(ConfigError::InvalidDamping {
                damping: self.wall_damping,
            });
        }
        Ok(())
    }
}
