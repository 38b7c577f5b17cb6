// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn tensor code lives here.
// Nothing outside ml/ imports burn.
//
// What's in this layer:
//
//   classifier.rs — The linear softmax classifier
//                   Uploads the validated Model as tensors once,
//                   then turns occupancy grids into logits and
//                   class probabilities.
//
// There is no training code: the weights are computed elsewhere
// and only ever read here.
//
// Reference: Burn Book §3 (Building Blocks)

/// Linear classifier: x · Wᵀ + b followed by softmax
pub mod classifier;
