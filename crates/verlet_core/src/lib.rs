//! Verlet Core
//!
//! Real-time 2D particle simulation:
//! - Position-based Verlet integration with fixed sub-stepping
//! - Uniform spatial grid broad phase
//! - Symmetric overlap resolution and damped wall bounces
//! - Deterministic time and math helpers

pub mod config;
pub mod error;
pub mod grid;
pub mod math;
pub mod particle;
pub mod solver;
pub mod time;

pub use config::SolverConfig;
pub use error::ConfigError;
pub use grid::{CellCoord, SpatialGrid};
pub use particle::Particle;
pub use solver::Solver;

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
