//! Uniform spatial grid used as the collision broad phase.
//!
//! Buckets hold particle *indices* into the solver's particle vector, never
//! references, so growing the vector cannot leave dangling entries. The grid
//! is a derived index: the solver clears and refills it every sub-step.

use crate::particle::Particle;
use glam::Vec2;
use std::collections::HashMap;

/// Signed grid cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The 8 surrounding cells and self, row by row.
    pub fn neighbors(&self) -> [CellCoord; 9] {
        [
            CellCoord::new(self.x - 1, self.y - 1),
            CellCoord::new(self.x, self.y - 1),
            CellCoord::new(self.x + 1, self.y - 1),
            CellCoord::new(self.x - 1, self.y),
            CellCoord::new(self.x, self.y),
            CellCoord::new(self.x + 1, self.y),
            CellCoord::new(self.x - 1, self.y + 1),
            CellCoord::new(self.x, self.y + 1),
            CellCoord::new(self.x + 1, self.y + 1),
        ]
    }

    /// True when `other` is this cell or one of its 8 neighbours.
    pub fn is_adjacent(&self, other: CellCoord) -> bool {
        (i64::from(self.x) - i64::from(other.x)).abs() <= 1
            && (i64::from(self.y) - i64::from(other.y)).abs() <= 1
    }
}

/// Spatial hash grid keyed by cell coordinate.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<CellCoord, Vec<usize>>,
    len: usize,
}

impl SpatialGrid {
    /// `cell_size` must be at least the largest interaction distance.
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            len: 0,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing `position`. Works for negative coordinates.
    ///
    /// Coordinates are kept one cell inside the `i32` range so the 3×3
    /// neighbourhood never overflows. Particles far above the world (there
    /// is no ceiling) all share the outermost row.
    #[inline]
    pub fn cell_of(&self, position: Vec2) -> CellCoord {
        CellCoord::new(
            axis_cell(position.x, self.cell_size),
            axis_cell(position.y, self.cell_size),
        )
    }

    /// Drop every entry.
    ///
    /// Buckets that were filled last time keep their allocation; buckets
    /// that were already empty are removed so particles drifting off-world
    /// do not grow the map forever.
    pub fn clear(&mut self) {
        self.cells.retain(|_, bucket| {
            let keep = !bucket.is_empty();
            bucket.clear();
            keep
        });
        self.len = 0;
    }

    pub fn insert(&mut self, index: usize, position: Vec2) {
        let cell = self.cell_of(position);
        self.cells.entry(cell).or_default().push(index);
        self.len += 1;
    }

    /// Clear, then index every particle at its current position.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        self.clear();
        for (index, particle) in particles.iter().enumerate() {
            self.insert(index, particle.position);
        }
    }

    /// Replace the contents of `out` with every index in the 3×3
    /// neighbourhood of `position`'s cell, the querying particle included.
    pub fn query(&self, position: Vec2, out: &mut Vec<usize>) {
        self.query_cell(self.cell_of(position), out);
    }

    /// Same as [`query`](Self::query) for an already computed cell.
    pub fn query_cell(&self, center: CellCoord, out: &mut Vec<usize>) {
        out.clear();
        for cell in &center.neighbors() {
            if let Some(bucket) = self.cells.get(cell) {
                out.extend_from_slice(bucket);
            }
        }
    }

    /// Number of indexed particles.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.values().filter(|bucket| !bucket.is_empty()).count()
    }

    /// Indices stored in a single cell.
    pub fn bucket(&self, cell: CellCoord) -> &[usize] {
        self.cells.get(&cell).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

#[inline]
fn axis_cell(coord: f32, cell_size: f32) -> i32 {
    // `as` saturates (NaN -> 0); the clamp leaves room for the ±1 offsets.
    ((coord / cell_size).floor() as i32).clamp(i32::MIN + 1, i32::MAX - 1)
}
