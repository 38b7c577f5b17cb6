// ============================================================
// Layer 3 — PixelBuffer Domain Type
// ============================================================
// The raw bitmap handed over by the drawing surface, at its
// native display resolution (e.g. a 280×280 canvas).
//
// We only keep ONE intensity byte per pixel. A browser canvas
// hands out RGBA quadruplets; strokes are drawn in white on a
// transparent background, so the red channel alone tells us
// whether a pixel carries ink:
//
//   RGBA dump:   [r g b a][r g b a][r g b a] ...
//                 ▲        ▲        ▲
//   samples:     [r]      [r]      [r]      ...
//
// The buffer is read-only for the core. The rasterizer samples
// it; nothing else touches it.
//
// Reference: Rust Book §5 (Structs), §8 (Vectors)

use crate::domain::error::{DigitError, Result};

/// A width × height grid of intensity samples, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width:   usize,
    height:  usize,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap single-channel intensities.
    /// Fails when `samples.len() != width * height`.
    pub fn from_intensities(width: usize, height: usize, samples: Vec<u8>) -> Result<Self> {
        let expected = checked_area(width, height, 1)?;
        if samples.len() != expected {
            return Err(DigitError::InvalidBuffer(format!(
                "{width}x{height} buffer needs {expected} samples, got {}",
                samples.len()
            )));
        }
        Ok(Self { width, height, samples })
    }

    /// Build a buffer from an RGBA dump, keeping the red channel.
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Result<Self> {
        let expected = checked_area(width, height, 4)?;
        if rgba.len() != expected {
            return Err(DigitError::InvalidBuffer(format!(
                "{width}x{height} RGBA buffer needs {expected} bytes, got {}",
                rgba.len()
            )));
        }
        let samples = rgba.chunks_exact(4).map(|px| px[0]).collect();
        Ok(Self { width, height, samples })
    }

    /// An untouched surface: every sample is zero.
    pub fn blank(width: usize, height: usize) -> Self {
        Self { width, height, samples: vec![0; width * height] }
    }

    /// Set one sample. Used by drawing surfaces and tests;
    /// out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, intensity: u8) {
        if x < self.width && y < self.height {
            self.samples[y * self.width + x] = intensity;
        }
    }

    /// Intensity at (x, y), or None outside the buffer.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.samples[y * self.width + x])
        } else {
            None
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

fn checked_area(width: usize, height: usize, channels: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| DigitError::InvalidBuffer(format!("{width}x{height} is too large")))
}
