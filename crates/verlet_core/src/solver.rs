//! Sub-stepped Verlet solver
//!
//! Every `update` splits the clamped frame delta into a fixed number of
//! sub-steps. Each sub-step runs, in this order:
//!
//! 1. integrate positions
//! 2. rebuild the spatial grid from the *new* positions
//! 3. resolve overlaps through the grid
//! 4. clamp to the world boundary
//!
//! Resolving against a grid built before integration would test stale
//! neighbourhoods, so the order is fixed.

mod boundary;
mod collision;
mod integrate;

use crate::config::SolverConfig;
use crate::error::ConfigError;
use crate::grid::SpatialGrid;
use crate::particle::Particle;
use crate::time::{clamp_frame_dt, SimulationTime};
use boundary::apply_boundary;
use collision::{resolve_collisions, CollisionScratch};
use glam::Vec2;
use integrate::integrate;
use verlet_metrics::{time_scope, PhaseProfiler};

/// Owns the particles and the broad-phase grid.
#[derive(Debug)]
pub struct Solver {
    config: SolverConfig,
    particles: Vec<Particle>,
    grid: SpatialGrid,
    scratch: CollisionScratch,
    /// Unique pairs tested during the last `update`.
    collision_checks: u64,
    /// Pair tests summed over every sub-step of the last `update`.
    pair_tests: u64,
    time: SimulationTime,
    profiler: PhaseProfiler,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::debug!(
            sub_steps = config.sub_steps,
            radius = config.particle_radius,
            cell_size = config.cell_size,
            width = config.world_size.x,
            height = config.world_size.y,
            "solver created"
        );
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: SolverConfig) -> Self {
        Self {
            particles: Vec::with_capacity(config.initial_capacity),
            grid: SpatialGrid::new(config.cell_size),
            scratch: CollisionScratch::default(),
            collision_checks: 0,
            pair_tests: 0,
            time: SimulationTime::new(),
            profiler: PhaseProfiler::new(),
            config,
        }
    }

    /// Spawn a particle at rest. Acceleration starts at gravity.
    pub fn add_particle(&mut self, position: Vec2) {
        self.particles
            .push(Particle::new(position, self.config.gravity));
    }

    /// Spawn a particle already moving `velocity` units per sub-step.
    pub fn add_particle_with_velocity(&mut self, position: Vec2, velocity: Vec2) {
        self.particles
            .push(Particle::with_velocity(position, velocity, self.config.gravity));
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// `dt` is clamped to `[0, max_frame_dt]`; NaN counts as zero. A zero
    /// frame still resolves collisions and boundaries, it just does not
    /// integrate.
    pub fn update(&mut self, dt: f32) {
        let frame_dt = clamp_frame_dt(dt, self.config.max_frame_dt);
        if frame_dt != dt {
            tracing::trace!(requested = dt, clamped = frame_dt, "frame dt clamped");
        }

        self.collision_checks = 0;
        self.pair_tests = 0;
        self.scratch.begin_update();

        let sub_dt = frame_dt / self.config.sub_steps as f32;
        let Self {
            config,
            particles,
            grid,
            scratch,
            pair_tests,
            profiler,
            ..
        } = self;

        for _ in 0..config.sub_steps {
            time_scope!(profiler, "integrate", {
                integrate(particles, config.gravity, sub_dt);
            });
            time_scope!(profiler, "rebuild_grid", {
                grid.rebuild(particles);
            });
            time_scope!(profiler, "collide", {
                *pair_tests += resolve_collisions(particles, grid, config.particle_radius, scratch);
            });
            time_scope!(profiler, "constrain", {
                apply_boundary(
                    particles,
                    config.world_size,
                    config.particle_radius,
                    config.wall_damping,
                );
            });
        }

        self.collision_checks = self.scratch.unique_pairs();
        self.time.advance(frame_dt);
    }

    /// Particles in spawn order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// True until the first particle is added.
    pub fn is_idle(&self) -> bool {
        self.particles.is_empty()
    }

    /// Unique candidate pairs tested during the most recent `update`.
    ///
    /// Tallied in O(1) per pair test: a test counts when the pair was not
    /// a candidate in the preceding sub-step. A pair that drops out of reach
    /// and comes back within one update is counted again.
    pub fn collision_checks(&self) -> u64 {
        self.collision_checks
    }

    /// Candidate tests summed over all sub-steps of the most recent `update`.
    /// A pair that stays in reach is counted once per sub-step.
    pub fn total_pair_tests(&self) -> u64 {
        self.pair_tests
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn time(&self) -> &SimulationTime {
        &self.time
    }

    /// Accumulated per-phase timings. Empty without the `metrics` feature.
    pub fn profiler(&self) -> &PhaseProfiler {
        &self.profiler
    }

    pub fn profiler_mut(&mut self) -> &mut PhaseProfiler {
        &mut self.profiler
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::from_valid_config(SolverConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_gravity() -> Solver {
        Solver::new(SolverConfig::default().without_gravity()).unwrap()
    }

    #[test]
    fn starts_idle() {
        let mut solver = Solver::default();
        assert!(solver.is_idle());
        assert_eq!(solver.collision_checks(), 0);

        solver.update(0.016);
        assert!(solver.is_idle());
        assert_eq!(solver.collision_checks(), 0);

        solver.add_particle(Vec2::new(400.0, 100.0));
        assert!(!solver.is_idle());
        assert_eq!(solver.particle_count(), 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SolverConfig {
            cell_size: 4.0,
            ..SolverConfig::default()
        };
        assert!(matches!(
            Solver::new(config),
            Err(ConfigError::CellTooSmall { .. })
        ));
    }

    #[test]
    fn spawned_particle_is_at_rest_with_gravity() {
        let mut solver = Solver::default();
        solver.add_particle(Vec2::new(400.0, 100.0));

        let p = solver.particles()[0];
        assert_eq!(p.position, Vec2::new(400.0, 100.0));
        assert_eq!(p.old_position, p.position);
        assert_eq!(p.acceleration, Vec2::new(0.0, 1000.0));
    }

    #[test]
    fn overlapping_pair_splits_evenly_at_zero_dt() {
        let mut solver = zero_gravity();
        solver.add_particle(Vec2::new(100.0, 100.0));
        solver.add_particle(Vec2::new(104.0, 100.0));

        solver.update(0.0);

        let [a, b] = [solver.particles()[0], solver.particles()[1]];
        assert_eq!(a.position, Vec2::new(97.0, 100.0));
        assert_eq!(b.position, Vec2::new(107.0, 100.0));
        assert_eq!(solver.collision_checks(), 1);
        // Still adjacent after the split, so every sub-step re-tests the pair.
        assert_eq!(solver.total_pair_tests(), 8);
    }

    #[test]
    fn overlapping_pair_separates_about_its_midpoint() {
        let mut solver = zero_gravity();
        solver.add_particle(Vec2::new(100.0, 100.0));
        solver.add_particle(Vec2::new(104.0, 100.0));

        solver.update(0.001);

        // The first split leaves each particle 3 units per sub-step of
        // implicit velocity; they drift apart without touching again.
        let [a, b] = [solver.particles()[0], solver.particles()[1]];
        assert_eq!(a.position, Vec2::new(76.0, 100.0));
        assert_eq!(b.position, Vec2::new(128.0, 100.0));
        assert_eq!(a.velocity(), Vec2::new(-3.0, 0.0));
        assert_eq!(b.velocity(), Vec2::new(3.0, 0.0));
        assert_eq!(solver.collision_checks(), 1);
    }

    #[test]
    fn pair_meeting_in_a_late_sub_step_counts_once() {
        let mut solver = zero_gravity();
        solver.add_particle_with_velocity(Vec2::new(100.0, 100.0), Vec2::new(3.0, 0.0));
        solver.add_particle(Vec2::new(130.0, 100.0));

        solver.update(0.001);

        // Cells only become adjacent in sub-step 7; the pair is re-tested in 8.
        assert_eq!(solver.total_pair_tests(), 2);
        assert_eq!(solver.collision_checks(), 1);
        let [a, b] = [solver.particles()[0], solver.particles()[1]];
        assert_eq!(a.position, Vec2::new(122.0, 100.0));
        assert_eq!(b.position, Vec2::new(132.0, 100.0));
    }

    #[test]
    fn large_dt_is_clamped() {
        let mut clamped = Solver::default();
        let mut reference = Solver::default();
        clamped.add_particle(Vec2::new(400.0, 100.0));
        reference.add_particle(Vec2::new(400.0, 100.0));

        clamped.update(3.0);
        reference.update(0.05);

        assert_eq!(clamped.particles(), reference.particles());
        assert!((clamped.time().elapsed() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn negative_dt_does_not_reverse_time() {
        let mut solver = Solver::default();
        solver.add_particle_with_velocity(Vec2::new(400.0, 100.0), Vec2::new(1.0, 0.0));
        let before = solver.particles()[0];

        solver.update(-0.5);
        solver.update(f32::NAN);

        assert_eq!(solver.particles()[0], before);
        assert_eq!(solver.time().frame_count(), 2);
        assert_eq!(solver.time().elapsed(), 0.0);
    }

    #[test]
    fn particle_falls_under_gravity() {
        let mut solver = Solver::default();
        solver.add_particle(Vec2::new(400.0, 100.0));

        solver.update(0.016);

        let p = solver.particles()[0];
        assert!(p.position.y > 100.0);
        assert_eq!(p.position.x, 400.0);
        assert!(p.velocity().y > 0.0);
    }

    #[test]
    fn particle_far_above_the_world_updates_cleanly() {
        let mut solver = Solver::default();
        solver.add_particle(Vec2::new(400.0, -3.0e10));
        solver.add_particle(Vec2::new(400.0, 100.0));

        solver.update(0.016);

        let far = solver.particles()[0];
        assert!(far.position.is_finite());
        assert!(far.velocity().y >= 0.0);
        assert_eq!(solver.collision_checks(), 0);
    }

    #[test]
    fn grid_reflects_latest_positions() {
        let mut solver = Solver::default();
        for i in 0..20 {
            solver.add_particle(Vec2::new(50.0 + 20.0 * i as f32, 100.0));
        }

        solver.update(0.016);

        let grid = solver.grid();
        assert_eq!(grid.len(), 20);
        for (i, p) in solver.particles().iter().enumerate() {
            // The last rebuild precedes the boundary pass; these particles
            // never touch a wall, so their cells are unchanged since.
            assert!(grid.bucket(grid.cell_of(p.position)).contains(&i));
        }
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn phases_are_profiled_per_sub_step() {
        let mut solver = Solver::default();
        solver.add_particle(Vec2::new(400.0, 100.0));
        solver.update(0.016);

        for phase in ["integrate", "rebuild_grid", "collide", "constrain"] {
            assert_eq!(solver.profiler().timing(phase).calls, 8, "{phase}");
        }

        solver.profiler_mut().reset();
        assert_eq!(solver.profiler().iter().count(), 0);
    }
}
