// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the drawing surface and the feature vector:
//
//   pixel dump file / canvas
//       │
//       ▼
//   PixelDumpFile     → reads the dump, builds a PixelBuffer
//       │
//       ▼
//   Rasterizer        → samples and dilates into an OccupancyGrid
//       │
//       ▼
//   OccupancyGrid::flatten → row-major features for the classifier
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Converts a PixelBuffer into an N×N occupancy grid
pub mod rasterizer;

/// Reads JSON pixel dumps from disk
pub mod pixel_loader;
