// ============================================================
// Layer 3 — Prediction Domain Types
// ============================================================
// PredictionResult is the output contract of the classifier:
// one probability per class, each in [0, 1], summing to 1.
//
// Outcome is what a PredictionSession hands back for a submit:
// either a result, or Skipped when the drawing was empty.
//
// Reference: Rust Book §6 (Enums and Pattern Matching)

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    probabilities: Vec<f32>,
}

impl PredictionResult {
    pub(crate) fn new(probabilities: Vec<f32>) -> Self {
        Self { probabilities }
    }

    pub fn probabilities(&self) -> &[f32] {
        &self.probabilities
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// The most likely class. Ties go to the lowest index.
    pub fn argmax(&self) -> usize {
        self.probabilities
            .iter()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |best, (i, &p)| if p > best.1 { (i, p) } else { best })
            .0
    }

    /// Probability of the most likely class.
    pub fn confidence(&self) -> f32 {
        self.probabilities.get(self.argmax()).copied().unwrap_or(0.0)
    }
}

/// Result of one PredictionSession::submit call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Prediction(PredictionResult),
    /// Nothing was drawn; no model was loaded and no inference ran.
    Skipped,
}

impl Outcome {
    pub fn prediction(&self) -> Option<&PredictionResult> {
        match self {
            Outcome::Prediction(p) => Some(p),
            Outcome::Skipped       => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_and_confidence() {
        let r = PredictionResult::new(vec![0.1, 0.6, 0.3]);
        assert_eq!(r.argmax(), 1);
        assert_eq!(r.confidence(), 0.6);
    }

    #[test]
    fn test_argmax_tie_takes_lowest_index() {
        let r = PredictionResult::new(vec![0.25; 4]);
        assert_eq!(r.argmax(), 0);
    }

    #[test]
    fn test_outcome_accessors() {
        let o = Outcome::Prediction(PredictionResult::new(vec![1.0]));
        assert!(!o.is_skipped());
        assert_eq!(o.prediction().map(PredictionResult::len), Some(1));
        assert!(Outcome::Skipped.prediction().is_none());
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let json = serde_json::to_value(Outcome::Skipped).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "skipped" }));

        let o    = Outcome::Prediction(PredictionResult::new(vec![0.5, 0.5]));
        let json = serde_json::to_value(o).unwrap();
        assert_eq!(json["outcome"], "prediction");
        assert_eq!(json["probabilities"], serde_json::json!([0.5, 0.5]));
    }
}
