// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer wires the other layers into one workflow:
// rasterize the drawing, load the model, classify.
//
// Rules for this layer:
//   - No ML math or tensor code here
//   - No UI or printing here (that's Layer 1)
//   - No direct file or network access (that's Layer 4 and 6)
//   - Only workflow coordination and the Idle/Busy state
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The rasterize → classify workflow with its Idle/Busy guard
pub mod prediction_session;
