//! Störmer–Verlet position integration

use crate::particle::Particle;
use glam::Vec2;

/// Advance every particle by one sub-step of length `dt`.
///
/// A zero `dt` is a no-op: no time elapses, so implicit velocity must not
/// carry particles forward either.
pub(crate) fn integrate(particles: &mut [Particle], gravity: Vec2, dt: f32) {
    if dt <= 0.0 {
        return;
    }
    let dt2 = dt * dt;
    for p in particles {
        p.acceleration = gravity;
        let previous = p.position;
        p.position = 2.0 * p.position - p.old_position + p.acceleration * dt2;
        p.old_position = previous;
    }
}
