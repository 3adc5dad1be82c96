//! Particle stream emitter

use crate::settings::SpawnSettings;
use verlet_core::glam::Vec2;
use verlet_core::math::DeterministicRng;
use verlet_core::Solver;

/// Emits particles at a fixed point until the population cap is reached.
pub struct Spawner {
    settings: SpawnSettings,
    rng: DeterministicRng,
}

impl Spawner {
    pub fn new(settings: SpawnSettings) -> Self {
        let rng = DeterministicRng::new(settings.seed);
        Self { settings, rng }
    }

    /// Spawn up to `per_frame` particles. Returns how many were added.
    pub fn spawn(&mut self, solver: &mut Solver) -> usize {
        let room = self
            .settings
            .max_particles
            .saturating_sub(solver.particle_count());
        let count = self.settings.per_frame.min(room);
        for _ in 0..count {
            let jitter = self.rng.next_signed_unit() * self.settings.jitter;
            solver.add_particle(self.settings.spawn_point + Vec2::new(jitter, 0.0));
        }
        count
    }

    pub fn is_exhausted(&self, solver: &Solver) -> bool {
        solver.particle_count() >= self.settings.max_particles
    }
}
