// ============================================================
// Layer 4 — Pixel Dump Loader
// ============================================================
// Reads a drawing saved to disk and turns it into a PixelBuffer.
//
// File format (JSON):
//
//   {
//     "width":    280,
//     "height":   280,
//     "channels": 4,          ← optional, defaults to 4 (RGBA)
//     "data":     [0, 0, 0, 0, 255, 255, 255, 255, ...]
//   }
//
// channels = 4 is exactly what a browser canvas returns from
// getImageData(), so a dump taken from the page can be fed in
// unchanged. channels = 1 stores one intensity per pixel.
//
// PixelDumpFile implements DrawingSurface, which makes a file on
// disk interchangeable with a live canvas for the session.
//
// Reference: serde documentation (field defaults)
//            Rust Book §12 (Reading a File)

use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::domain::error::{DigitError, Result};
use crate::domain::pixel_buffer::PixelBuffer;
use crate::domain::traits::DrawingSurface;

fn default_channels() -> usize {
    4
}

/// On-disk representation of a pixel buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixelDump {
    pub width:  usize,
    pub height: usize,
    #[serde(default = "default_channels")]
    pub channels: usize,
    pub data:   Vec<u8>,
}

impl PixelDump {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| DigitError::InvalidBuffer(format!("cannot parse pixel dump: {e}")))
    }

    pub fn into_buffer(self) -> Result<PixelBuffer> {
        match self.channels {
            1 => PixelBuffer::from_intensities(self.width, self.height, self.data),
            4 => PixelBuffer::from_rgba(self.width, self.height, &self.data),
            n => Err(DigitError::InvalidBuffer(format!(
                "unsupported channel count {n} (expected 1 or 4)"
            ))),
        }
    }
}

/// A pixel dump file acting as the drawing surface.
pub struct PixelDumpFile {
    path: PathBuf,
}

impl PixelDumpFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DrawingSurface for PixelDumpFile {
    fn snapshot(&self) -> Result<PixelBuffer> {
        let json = fs::read_to_string(&self.path).map_err(|e| {
            DigitError::InvalidBuffer(format!("cannot read '{}': {e}", self.path.display()))
        })?;
        let buffer = PixelDump::from_json(&json)?.into_buffer()?;
        tracing::debug!(
            "Loaded {}x{} pixel dump from '{}'",
            buffer.width(),
            buffer.height(),
            self.path.display()
        );
        Ok(buffer)
    }
}
