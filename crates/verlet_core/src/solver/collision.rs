//! Narrow phase: pairwise overlap resolution over broad-phase candidates

use crate::grid::{CellCoord, SpatialGrid};
use crate::particle::Particle;
use std::mem;

/// Pairs closer than this are treated as coincident and left alone.
const MIN_SEPARATION: f32 = 1e-4;

/// Buffers reused across sub-steps, plus the unique-pair tally of the
/// current update.
///
/// A pair `(i, j)` is tested in a sub-step exactly when `j` sits in a cell
/// adjacent to the cell `i` queried from. Keeping both cells from the
/// previous sub-step lets a test be classified as new in O(1).
#[derive(Debug, Default)]
pub(crate) struct CollisionScratch {
    neighbors: Vec<usize>,
    insert_cells: Vec<CellCoord>,
    query_cells: Vec<CellCoord>,
    prev_insert_cells: Vec<CellCoord>,
    prev_query_cells: Vec<CellCoord>,
    has_previous: bool,
    unique_pairs: u64,
}

impl CollisionScratch {
    pub fn begin_update(&mut self) {
        self.has_previous = false;
        self.unique_pairs = 0;
    }

    /// Pairs tested since `begin_update`, each counted once per stretch of
    /// consecutive sub-steps in which it stays a candidate.
    pub fn unique_pairs(&self) -> u64 {
        self.unique_pairs
    }

    #[inline]
    fn tested_last_sub_step(&self, i: usize, j: usize) -> bool {
        self.has_previous && self.prev_query_cells[i].is_adjacent(self.prev_insert_cells[j])
    }

    fn finish_sub_step(&mut self) {
        mem::swap(&mut self.insert_cells, &mut self.prev_insert_cells);
        mem::swap(&mut self.query_cells, &mut self.prev_query_cells);
        self.has_previous = true;
    }
}

/// Push overlapping pairs apart symmetrically along their centre line.
///
/// `grid` must have been rebuilt from the current positions. Pair `(i, j)`
/// is handled only from the side with the lower index, so it is tested once
/// per call. Returns the number of pairs tested.
pub(crate) fn resolve_collisions(
    particles: &mut [Particle],
    grid: &SpatialGrid,
    radius: f32,
    scratch: &mut CollisionScratch,
) -> u64 {
    let min_dist = 2.0 * radius;
    let min_dist_sq = min_dist * min_dist;
    let mut tested = 0;
    let mut new_pairs = 0;

    scratch.insert_cells.clear();
    scratch
        .insert_cells
        .extend(particles.iter().map(|p| grid.cell_of(p.position)));
    scratch.query_cells.clear();

    for i in 0..particles.len() {
        // Earlier corrections may already have moved `i` out of its cell.
        let cell = grid.cell_of(particles[i].position);
        scratch.query_cells.push(cell);
        grid.query_cell(cell, &mut scratch.neighbors);

        for &j in &scratch.neighbors {
            if i >= j {
                continue;
            }
            tested += 1;
            if !scratch.tested_last_sub_step(i, j) {
                new_pairs += 1;
            }

            let delta = particles[i].position - particles[j].position;
            let dist_sq = delta.length_squared();
            if dist_sq >= min_dist_sq {
                continue;
            }

            let dist = dist_sq.sqrt();
            if dist <= MIN_SEPARATION {
                tracing::trace!(i, j, "skipping coincident pair");
                continue;
            }

            let correction = delta / dist * (0.5 * (min_dist - dist));
            particles[i].position += correction;
            particles[j].position -= correction;
        }
    }

    scratch.unique_pairs += new_pairs;
    scratch.finish_sub_step();
    tested
}
