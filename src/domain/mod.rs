// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing the core concepts:
//
//   pixel_buffer — the raw bitmap read from the drawing surface
//   grid         — the N×N binary occupancy grid
//   model        — the validated weight matrix + bias vector
//   prediction   — class probabilities and submit outcomes
//   error        — the error taxonomy of the core
//   traits       — ModelSource and DrawingSurface
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

pub mod error;

pub mod pixel_buffer;

pub mod grid;

pub mod model;

pub mod prediction;

pub mod traits;
