// ============================================================
// Layer 4 — Grid Rasterizer
// ============================================================
// Turns the high-resolution PixelBuffer into the N×N binary
// OccupancyGrid the classifier expects.
//
// Step 1: point sampling
//   Each target cell (x, y) looks at exactly ONE source pixel:
//
//     source_x = floor(x * width  / N)
//     source_y = floor(y * height / N)
//
//   The cell is "ink" when that sample's intensity is above 0.
//   No grayscale is kept; the model was trained on 0/1 input.
//
// Step 2: dilation (optional)
//   A stroke is much wider than one sample but we only look at
//   one point per cell, so thin strokes can fall between samples.
//   With dilation on, a cell is also set when any of its 8
//   neighbours sampled ink:
//
//       . . . . .          . . . . .
//       . . . . .          . # # # .
//       . . # . .   ───►   . # # # .
//       . . . . .          . # # # .
//       . . . . .          . . . . .
//
//   Neighbours outside the grid are skipped, never wrapped and
//   never treated as ink, so a point in a corner gives a 2×2 block.
//
// The function is pure: same buffer in, same grid out.
//
// Reference: Rust Book §3 (Control Flow), §8 (Vectors)

use crate::domain::grid::OccupancyGrid;
use crate::domain::pixel_buffer::PixelBuffer;

/// Rasterization settings; cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rasterizer {
    target_size: usize,
    dilate:      bool,
}

impl Rasterizer {
    pub fn new(target_size: usize, dilate: bool) -> Self {
        Self { target_size, dilate }
    }

    pub fn rasterize(&self, buffer: &PixelBuffer) -> OccupancyGrid {
        rasterize(buffer, self.target_size, self.dilate)
    }
}

/// Rasterize `buffer` into a `target_size` × `target_size` grid.
pub fn rasterize(buffer: &PixelBuffer, target_size: usize, dilate: bool) -> OccupancyGrid {
    let n       = target_size;
    let sampled = sample_cells(buffer, n);
    let mut grid = OccupancyGrid::empty(n);

    for y in 0..n {
        for x in 0..n {
            let inked = if dilate {
                neighbourhood(x, y, n).any(|(nx, ny)| sampled[ny * n + nx])
            } else {
                sampled[y * n + x]
            };
            if inked {
                grid.set(x, y);
            }
        }
    }

    tracing::debug!(
        "Rasterized {}x{} buffer into {}x{} grid ({} cells set, dilate={})",
        buffer.width(),
        buffer.height(),
        n,
        n,
        grid.occupied_count(),
        dilate,
    );

    grid
}

/// One threshold test per target cell, row-major.
fn sample_cells(buffer: &PixelBuffer, n: usize) -> Vec<bool> {
    let mut sampled = vec![false; n * n];
    for y in 0..n {
        // floor(y * height / n) < height for every y < n
        let sy = y * buffer.height() / n;
        for x in 0..n {
            let sx = x * buffer.width() / n;
            sampled[y * n + x] = buffer.get(sx, sy).is_some_and(|v| v > 0);
        }
    }
    sampled
}

/// The cell itself plus its in-bounds Chebyshev neighbours.
fn neighbourhood(x: usize, y: usize, n: usize) -> impl Iterator<Item = (usize, usize)> {
    let xs = x.saturating_sub(1)..=(x + 1).min(n - 1);
    let ys = y.saturating_sub(1)..=(y + 1).min(n - 1);
    ys.flat_map(move |ny| xs.clone().map(move |nx| (nx, ny)))
}
