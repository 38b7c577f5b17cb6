// ============================================================
// Layer 3 — OccupancyGrid Domain Type
// ============================================================
// A fixed N×N matrix of 0/1 cells telling which cells of the
// drawing carry ink. N is 28 for the MNIST-style models this
// binary is built around, so the flattened grid has 784 entries.
//
// Storage is row-major: cell (x, y) lives at index y * N + x.
// flatten() hands the classifier the same order, so the j-th
// weight of every class lines up with the j-th cell.
//
// Reference: Rust Book §5 (Structs), §8 (Vectors)

use std::fmt;

/// Default side length of the occupancy grid.
pub const GRID_SIZE: usize = 28;

/// Largest grid side accepted from the command line.
pub const MAX_GRID_SIZE: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    size:  usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// An all-zero size × size grid.
    pub fn empty(size: usize) -> Self {
        Self { size, cells: vec![false; size * size] }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell value at (x, y); out-of-range reads are false.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.cells[y * self.size + x]
    }

    pub(crate) fn set(&mut self, x: usize, y: usize) {
        self.cells[y * self.size + x] = true;
    }

    /// True when nothing was drawn.
    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Iterate over the (x, y) coordinates of every set cell, row by row.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(move |(i, _)| (i % size, i / size))
    }

    /// Row-major feature vector: 1.0 for ink, 0.0 otherwise.
    pub fn flatten(&self) -> Vec<f32> {
        self.cells.iter().map(|&c| if c { 1.0 } else { 0.0 }).collect()
    }
}

/// Renders the grid as lines of `#` (ink) and `.` (blank).
impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size.max(1)) {
            let line: String = row.iter().map(|&c| if c { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
