//! Particle state for position-based Verlet integration

use glam::Vec2;

/// A uniform-radius, unit-mass particle.
///
/// There is no velocity field: velocity is always `position - old_position`.
/// Collision and wall responses work by rewriting `old_position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Position before the most recent integration step.
    pub old_position: Vec2,
    pub acceleration: Vec2,
}

impl Particle {
    /// A particle at rest.
    pub fn new(position: Vec2, acceleration: Vec2) -> Self {
        Self {
            position,
            old_position: position,
            acceleration,
        }
    }

    /// A particle that moves `velocity` units per sub-step.
    pub fn with_velocity(position: Vec2, velocity: Vec2, acceleration: Vec2) -> Self {
        Self {
            position,
            old_position: position - velocity,
            acceleration,
        }
    }

    /// Displacement over the last sub-step.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.position - self.old_position
    }
}
