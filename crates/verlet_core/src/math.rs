//! Deterministic math utilities
//!
//! Re-exports glam with a small seeded generator for spawn jitter and
//! reproducible test placements.

pub use glam::*;

/// Deterministic pseudo-random generator (32-bit LCG).
///
/// Same seed, same sequence on every platform; not suitable for anything
/// beyond jitter and test fixtures.
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    seed: u64,
    state: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, state: seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG constants
        const A: u64 = 1664525;
        const C: u64 = 1013904223;
        const M: u64 = 1u64 << 32;

        self.state = (A.wrapping_mul(self.state).wrapping_add(C)) % M;
        self.state as u32
    }

    /// Uniform in `[0, 1]`.
    pub fn next_f32(&mut self) -> f32 {
        self.next_u32() as f32 / u32::MAX as f32
    }

    /// Uniform in `[-1, 1]`.
    pub fn next_signed_unit(&mut self) -> f32 {
        self.next_f32() * 2.0 - 1.0
    }

    /// Uniform in `[min, max]`.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }
}
