//! World boundary: left/right walls and a floor, no ceiling

use crate::particle::Particle;
use glam::Vec2;

/// Clamp particles inside the world and reflect the clamped velocity axis.
///
/// x is kept in `[radius, width - radius]`, y below `height - radius`. On a
/// clamped axis the pre-clamp velocity `v` becomes `-v * damping` by
/// rewriting `old_position`.
pub(crate) fn apply_boundary(particles: &mut [Particle], world_size: Vec2, radius: f32, damping: f32) {
    let max = world_size - Vec2::splat(radius);
    for p in particles {
        if p.position.y > max.y {
            bounce(&mut p.position.y, &mut p.old_position.y, max.y, damping);
        }
        if p.position.x > max.x {
            bounce(&mut p.position.x, &mut p.old_position.x, max.x, damping);
        } else if p.position.x < radius {
            bounce(&mut p.position.x, &mut p.old_position.x, radius, damping);
        }
    }
}

#[inline]
fn bounce(position: &mut f32, old_position: &mut f32, limit: f32, damping: f32) {
    let velocity = *position - *old_position;
    *position = limit;
    *old_position = limit + velocity * damping;
}
