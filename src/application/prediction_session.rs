// ============================================================
// Layer 2 — Prediction Session
// ============================================================
// Orchestrates one prediction as a single unit of work:
//
//   Step 1: Claim the session          (Idle → Busy, or reject)
//   Step 2: Read + rasterize the input (Layer 4 - data)
//   Step 3: Skip if nothing was drawn  (Busy → Idle, Skipped)
//   Step 4: Load the model, once       (Layer 6 - infra)
//   Step 5: Classify the grid          (Layer 5 - ml)
//   Step 6: Release the session        (Busy → Idle)
//
// State machine:
//
//        submit()                 done / error
//   Idle ─────────► Busy ───────────────────────► Idle
//                    │
//                    └─ submit() / input events → rejected (Busy)
//
// The Busy flag is checked and set synchronously, before the
// surface is read or the model is fetched. Those are the only
// points where the outside world can call back into us, so a
// second submit arriving there always sees Busy. BusyGuard puts
// the flag back to Idle on every exit path, errors included,
// which keeps the session reusable after a failed model load.
//
// Everything is single-threaded: Cell / RefCell / Rc, no locks.
//
// Reference: Rust Book §15 (Rc<T>, RefCell<T>, Drop)

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::data::rasterizer::Rasterizer;
use crate::domain::error::{DigitError, Result};
use crate::domain::grid::{OccupancyGrid, GRID_SIZE};
use crate::domain::model::{Model, ModelShape, NUM_CLASSES};
use crate::domain::pixel_buffer::PixelBuffer;
use crate::domain::prediction::Outcome;
use crate::domain::traits::{DrawingSurface, ModelSource};
use crate::infra::model_source::model_source_for;
use crate::ml::classifier::LinearClassifier;

// ─── Session Configuration ───────────────────────────────────────────────────
// Everything a session needs to know up front. Serialisable so
// the effective settings can be printed or saved alongside results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub grid_size:      usize,
    pub classes:        usize,
    pub dilate:         bool,
    pub model_location: String,
}

impl SessionConfig {
    pub fn shape(&self) -> ModelShape {
        ModelShape::for_grid(self.grid_size, self.classes)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_size:      GRID_SIZE,
            classes:        NUM_CLASSES,
            dilate:         true,
            model_location: "model.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Busy,
}

/// Puts the session back to Idle when dropped.
struct BusyGuard<'a> {
    state: &'a Cell<SessionState>,
}

impl<'a> BusyGuard<'a> {
    fn enter(state: &'a Cell<SessionState>) -> Result<Self> {
        if state.get() == SessionState::Busy {
            tracing::warn!("Rejected: a prediction is already in progress");
            return Err(DigitError::Busy);
        }
        state.set(SessionState::Busy);
        Ok(Self { state })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.set(SessionState::Idle);
    }
}

/// The cached model together with its uploaded tensors.
struct LoadedModel {
    model:      Rc<Model>,
    classifier: LinearClassifier,
}

// ─── PredictionSession ────────────────────────────────────────────────────────
pub struct PredictionSession {
    rasterizer: Rasterizer,
    shape:      ModelShape,
    source:     Box<dyn ModelSource>,
    state:      Cell<SessionState>,
    loaded:     RefCell<Option<Rc<LoadedModel>>>,
}

impl PredictionSession {
    pub fn new(config: &SessionConfig, source: Box<dyn ModelSource>) -> Self {
        Self {
            rasterizer: Rasterizer::new(config.grid_size, config.dilate),
            shape:      config.shape(),
            source,
            state:      Cell::new(SessionState::Idle),
            loaded:     RefCell::new(None),
        }
    }

    /// Build a session whose model source is picked from `config.model_location`.
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        let source = model_source_for(&config.model_location)?;
        Ok(Self::new(config, source))
    }

    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    /// False while a prediction is in flight; the drawing surface
    /// should drop pointer and clear events when this is false.
    pub fn accepts_input(&self) -> bool {
        self.state.get() == SessionState::Idle
    }

    /// Err(Busy) while a prediction is in flight.
    pub fn guard_input(&self) -> Result<()> {
        if self.accepts_input() {
            Ok(())
        } else {
            Err(DigitError::Busy)
        }
    }

    /// The cached model, if one has been loaded.
    pub fn model(&self) -> Option<Rc<Model>> {
        self.loaded.borrow().as_ref().map(|l| Rc::clone(&l.model))
    }

    /// Load the model now instead of on the first non-empty submit.
    pub fn preload(&self) -> Result<Rc<Model>> {
        let _busy = BusyGuard::enter(&self.state)?;
        Ok(Rc::clone(&self.loaded_model()?.model))
    }

    /// Rasterize without classifying.
    pub fn rasterize(&self, buffer: &PixelBuffer) -> Result<OccupancyGrid> {
        self.guard_input()?;
        Ok(self.rasterizer.rasterize(buffer))
    }

    /// Rasterize and classify one buffer.
    pub fn submit(&self, buffer: &PixelBuffer) -> Result<Outcome> {
        let busy = BusyGuard::enter(&self.state)?;
        self.run(buffer, busy)
    }

    /// Like submit, but reads the buffer from a drawing surface
    /// after the session has been claimed.
    pub fn submit_from(&self, surface: &dyn DrawingSurface) -> Result<Outcome> {
        let busy   = BusyGuard::enter(&self.state)?;
        let buffer = surface.snapshot()?;
        self.run(&buffer, busy)
    }

    fn run(&self, buffer: &PixelBuffer, _busy: BusyGuard<'_>) -> Result<Outcome> {
        let grid = self.rasterizer.rasterize(buffer);
        if grid.is_empty() {
            tracing::info!("Nothing drawn, skipping prediction");
            return Ok(Outcome::Skipped);
        }

        let loaded = self.loaded_model()?;
        let result = loaded.classifier.predict(&grid)?;

        tracing::info!(
            "Predicted {} with probability {:.4}",
            result.argmax(),
            result.confidence()
        );
        Ok(Outcome::Prediction(result))
    }

    /// Returns the cached model, fetching it on first use.
    /// No RefCell borrow is held while the source is fetching.
    fn loaded_model(&self) -> Result<Rc<LoadedModel>> {
        if let Some(loaded) = self.loaded.borrow().as_ref() {
            return Ok(Rc::clone(loaded));
        }

        tracing::info!("Loading model from '{}'", self.source.location());
        let model = self.source.load(self.shape).map_err(|e| {
            tracing::warn!("Model load failed: {}", e);
            e
        })?;
        tracing::info!(
            "Model loaded: {} classes x {} features, epoch {}",
            model.classes(),
            model.features(),
            model.epoch()
        );

        let loaded = Rc::new(LoadedModel {
            classifier: LinearClassifier::on_cpu(&model),
            model:      Rc::new(model),
        });
        *self.loaded.borrow_mut() = Some(Rc::clone(&loaded));
        Ok(loaded)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use serde_json::json;
    use std::rc::Weak;

    /// Zero weights, bias [5, 0, ..., 0]
    fn bias_model_json() -> String {
        let mut bias = vec![0.0; NUM_CLASSES];
        bias[0] = 5.0;
        json!({
            "weights": vec![vec![0.0; GRID_SIZE * GRID_SIZE]; NUM_CLASSES],
            "bias":    bias,
            "epoch":   12,
        })
        .to_string()
    }

    /// Serves a fixed document and counts fetches. The first
    /// `failures` fetches fail with a Fetch error.
    struct StubSource {
        json:     String,
        fetches:  Rc<Cell<usize>>,
        failures: Cell<usize>,
    }

    impl StubSource {
        fn new(json: String, failures: usize) -> (Self, Rc<Cell<usize>>) {
            let fetches = Rc::new(Cell::new(0));
            let source  = Self { json, fetches: Rc::clone(&fetches), failures: Cell::new(failures) };
            (source, fetches)
        }
    }

    impl ModelSource for StubSource {
        fn location(&self) -> String {
            "stub".to_string()
        }

        fn fetch(&self) -> Result<String> {
            self.fetches.set(self.fetches.get() + 1);
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Err(DigitError::fetch("stub", "503 Service Unavailable"));
            }
            Ok(self.json.clone())
        }
    }

    fn drawing() -> PixelBuffer {
        let mut buf = PixelBuffer::blank(280, 280);
        for y in 100..180 {
            buf.set(140, y, 255);
        }
        buf
    }

    fn session(failures: usize) -> (PredictionSession, Rc<Cell<usize>>) {
        let (source, fetches) = StubSource::new(bias_model_json(), failures);
        (PredictionSession::new(&SessionConfig::default(), Box::new(source)), fetches)
    }

    #[test]
    fn test_blank_drawing_is_skipped_without_loading() {
        let (session, fetches) = session(0);
        let outcome = session.submit(&PixelBuffer::blank(280, 280)).unwrap();
        assert_eq!(outcome, Outcome::Skipped);
        assert_eq!(fetches.get(), 0);
        assert!(session.model().is_none());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_prediction_with_bias_model() {
        let (session, _) = session(0);
        let outcome = session.submit(&drawing()).unwrap();
        let result  = outcome.prediction().unwrap();

        let e5 = 5f64.exp();
        assert_eq!(result.argmax(), 0);
        assert_abs_diff_eq!(f64::from(result.probabilities()[0]), e5 / (e5 + 9.0), epsilon = 1e-5);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_model_is_loaded_once() {
        let (session, fetches) = session(0);
        session.submit(&drawing()).unwrap();
        session.submit(&drawing()).unwrap();
        session.submit(&PixelBuffer::blank(280, 280)).unwrap();
        assert_eq!(fetches.get(), 1);
        assert_eq!(session.model().map(|m| m.epoch()), Some(12));
    }

    #[test]
    fn test_failed_load_leaves_session_reusable() {
        let (session, fetches) = session(1);

        let err = session.submit(&drawing()).unwrap_err();
        assert!(matches!(err, DigitError::Fetch { .. }));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.model().is_none());

        assert!(session.submit(&drawing()).unwrap().prediction().is_some());
        assert_eq!(fetches.get(), 2);
    }

    #[test]
    fn test_malformed_model_is_schema_error() {
        let json = json!({ "weights": vec![vec![0.0; 784]; 9], "bias": vec![0.0; 10], "epoch": 1 });
        let (source, _) = StubSource::new(json.to_string(), 0);
        let session     = PredictionSession::new(&SessionConfig::default(), Box::new(source));

        let err = session.submit(&drawing()).unwrap_err();
        assert!(matches!(err, DigitError::Schema(_)));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_grid_size_disagreeing_with_model_fails_at_load() {
        let (source, _) = StubSource::new(bias_model_json(), 0);
        let config      = SessionConfig { grid_size: 27, ..SessionConfig::default() };
        let session     = PredictionSession::new(&config, Box::new(source));
        assert!(matches!(session.preload(), Err(DigitError::Schema(_))));
    }

    #[test]
    fn test_preload_caches_model() {
        let (session, fetches) = session(0);
        let model = session.preload().unwrap();
        assert_eq!(model.classes(), NUM_CLASSES);
        session.submit(&drawing()).unwrap();
        assert_eq!(fetches.get(), 1);
    }

    struct StubSurface(PixelBuffer);

    impl DrawingSurface for StubSurface {
        fn snapshot(&self) -> Result<PixelBuffer> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_submit_from_surface() {
        let (session, _) = session(0);
        let outcome = session.submit_from(&StubSurface(drawing())).unwrap();
        assert!(outcome.prediction().is_some());

        let outcome = session.submit_from(&StubSurface(PixelBuffer::blank(10, 10))).unwrap();
        assert!(outcome.is_skipped());
    }

    #[test]
    fn test_rasterize_through_session() {
        let (session, fetches) = session(0);
        let grid = session.rasterize(&drawing()).unwrap();
        assert!(!grid.is_empty());
        assert_eq!(fetches.get(), 0);
    }

    /// A source that calls back into its own session while the
    /// model is being fetched, like a UI event arriving mid-load.
    struct ReentrantSource {
        session:  Weak<PredictionSession>,
        observed: Rc<RefCell<Vec<(SessionState, Result<()>, Result<Outcome>)>>>,
    }

    impl ModelSource for ReentrantSource {
        fn location(&self) -> String {
            "reentrant".to_string()
        }

        fn fetch(&self) -> Result<String> {
            if let Some(session) = self.session.upgrade() {
                self.observed.borrow_mut().push((
                    session.state(),
                    session.guard_input(),
                    session.submit(&drawing()),
                ));
            }
            Ok(bias_model_json())
        }
    }

    #[test]
    fn test_reentrant_submit_is_rejected_while_busy() {
        let observed = Rc::new(RefCell::new(Vec::new()));
        let session  = Rc::new_cyclic(|weak: &Weak<PredictionSession>| {
            let source = ReentrantSource { session: weak.clone(), observed: Rc::clone(&observed) };
            PredictionSession::new(&SessionConfig::default(), Box::new(source))
        });

        let outcome = session.submit(&drawing()).unwrap();
        assert!(outcome.prediction().is_some());

        let observed = observed.borrow();
        assert_eq!(observed.len(), 1);
        let (state, input, nested) = &observed[0];
        assert_eq!(*state, SessionState::Busy);
        assert_eq!(*input, Err(DigitError::Busy));
        assert_eq!(*nested, Err(DigitError::Busy));
        assert!(matches!(session.rasterize(&drawing()), Ok(_)));
        assert_eq!(session.state(), SessionState::Idle);
    }
}
