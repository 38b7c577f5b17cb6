// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The two external collaborators the core talks to:
//
//   ModelSource    — hands out the serialized model document
//                    (a local file, an HTTP endpoint, a test stub)
//   DrawingSurface — hands out the current PixelBuffer
//                    (a pixel dump on disk, a live canvas)
//
// The application layer only sees these traits, so the session
// can be driven by the CLI, by tests, or by a UI event loop
// without changing a line of it.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use crate::domain::error::Result;
use crate::domain::model::{Model, ModelShape};
use crate::domain::pixel_buffer::PixelBuffer;

// ─── ModelSource ──────────────────────────────────────────────────────────────
/// Anything that can produce a model document.
///
/// Implementations:
///   - FileModelSource → reads a JSON file
///   - HttpModelSource → GETs a JSON document over HTTP
pub trait ModelSource {
    /// Where the model comes from, for logs and error messages.
    fn location(&self) -> String;

    /// Retrieve the raw JSON document.
    /// Transport failures must be reported as DigitError::Fetch.
    fn fetch(&self) -> Result<String>;

    /// Fetch and validate the model against the expected shape.
    fn load(&self, shape: ModelShape) -> Result<Model> {
        let json = self.fetch()?;
        Model::from_json(&json, shape)
    }
}

// ─── DrawingSurface ───────────────────────────────────────────────────────────
/// Anything that can supply the bitmap the user drew on.
pub trait DrawingSurface {
    fn snapshot(&self) -> Result<PixelBuffer>;
}
