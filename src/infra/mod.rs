// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Talks to the outside world on behalf of the core:
//
//   model_source.rs — Fetches the serialized model document
//                     from a file or over HTTP. Implements the
//                     ModelSource trait from Layer 3 so the
//                     session never knows which one it got.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling)

/// File and HTTP model sources
pub mod model_source;
