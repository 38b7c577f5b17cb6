// ============================================================
// Layer 3 — Model Domain Type
// ============================================================
// The immutable snapshot of a trained linear classifier:
//
//   weights : K × D matrix   (one row of D weights per class)
//   bias    : K values       (one offset per class)
//   epoch   : training metadata, never used during inference
//
// On the wire the model is a JSON document:
//
//   {
//     "weights": [[w00, w01, ... w0D], ... [wK0, ... wKD]],
//     "bias":    [b0, ... bK],
//     "epoch":   12
//   }
//
// The document is untrusted. ModelDocument mirrors it loosely so
// serde can parse it, then Model::from_document checks every
// shape invariant. A Model value therefore always satisfies
//
//   weights.rows == bias.len() == K   and   weights.cols == D
//
// and inference never has to re-check the matrix layout.
//
// Reference: Rust Book §5 (Structs), §9 (Error Handling)
//            serde documentation (derive)

use serde::{Deserialize, Serialize};

use crate::domain::error::{DigitError, Result};
use crate::domain::grid::GRID_SIZE;

/// Number of digit classes.
pub const NUM_CLASSES: usize = 10;

/// The shape a model document must have to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelShape {
    /// K — number of rows / classes
    pub classes:  usize,
    /// D — number of columns / grid cells
    pub features: usize,
}

impl ModelShape {
    /// K classes over a grid_size × grid_size grid.
    pub fn for_grid(grid_size: usize, classes: usize) -> Self {
        Self { classes, features: grid_size * grid_size }
    }
}

impl Default for ModelShape {
    fn default() -> Self {
        Self::for_grid(GRID_SIZE, NUM_CLASSES)
    }
}

/// The raw document as it arrives from the model source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDocument {
    pub weights: Vec<Vec<f64>>,
    pub bias:    Vec<f64>,
    pub epoch:   u64,
}

/// A validated, read-only linear model.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    shape:   ModelShape,
    /// Row-major K × D
    weights: Vec<f32>,
    bias:    Vec<f32>,
    epoch:   u64,
}

impl Model {
    /// Parse and validate a JSON model document.
    pub fn from_json(json: &str, shape: ModelShape) -> Result<Self> {
        let doc: ModelDocument = serde_json::from_str(json)?;
        Self::from_document(doc, shape)
    }

    /// Validate a parsed document against the expected shape.
    pub fn from_document(doc: ModelDocument, shape: ModelShape) -> Result<Self> {
        if shape.classes == 0 || shape.features == 0 {
            return Err(DigitError::Schema(
                "a model needs at least one class and one feature".to_string(),
            ));
        }
        if doc.weights.len() != shape.classes {
            return Err(DigitError::Schema(format!(
                "expected {} weight rows, got {}",
                shape.classes,
                doc.weights.len()
            )));
        }
        if doc.bias.len() != shape.classes {
            return Err(DigitError::Schema(format!(
                "expected {} bias values, got {}",
                shape.classes,
                doc.bias.len()
            )));
        }

        let mut weights = Vec::with_capacity(shape.classes * shape.features);
        for (i, row) in doc.weights.iter().enumerate() {
            if row.len() != shape.features {
                return Err(DigitError::Schema(format!(
                    "weight row {i} has {} columns, expected {}",
                    row.len(),
                    shape.features
                )));
            }
            for &w in row {
                weights.push(to_finite_f32(w, "weights")?);
            }
        }

        let bias = doc
            .bias
            .iter()
            .map(|&b| to_finite_f32(b, "bias"))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { shape, weights, bias, epoch: doc.epoch })
    }

    /// Build a model from in-memory rows; the shape is taken from the data.
    pub fn from_rows(rows: Vec<Vec<f32>>, bias: Vec<f32>, epoch: u64) -> Result<Self> {
        let shape = ModelShape {
            classes:  rows.len(),
            features: rows.first().map_or(0, Vec::len),
        };
        let doc = ModelDocument {
            weights: rows
                .into_iter()
                .map(|r| r.into_iter().map(f64::from).collect())
                .collect(),
            bias: bias.into_iter().map(f64::from).collect(),
            epoch,
        };
        Self::from_document(doc, shape)
    }

    pub fn shape(&self) -> ModelShape {
        self.shape
    }

    pub fn classes(&self) -> usize {
        self.shape.classes
    }

    pub fn features(&self) -> usize {
        self.shape.features
    }

    /// Row-major K × D weights.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// The D weights of class `i`.
    pub fn weight_row(&self, i: usize) -> &[f32] {
        let d = self.shape.features;
        &self.weights[i * d..(i + 1) * d]
    }

    pub fn bias(&self) -> &[f32] {
        &self.bias
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

fn to_finite_f32(v: f64, field: &str) -> Result<f32> {
    let x = v as f32;
    if x.is_finite() {
        Ok(x)
    } else {
        Err(DigitError::Schema(format!("non-finite value {v} in '{field}'")))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(rows: usize, cols: usize, bias: usize) -> String {
        json!({
            "weights": vec![vec![0.5; cols]; rows],
            "bias":    vec![0.0; bias],
            "epoch":   3,
        })
        .to_string()
    }

    #[test]
    fn test_accepts_well_formed_document() {
        let model = Model::from_json(&document(10, 784, 10), ModelShape::default()).unwrap();
        assert_eq!(model.classes(), 10);
        assert_eq!(model.features(), 784);
        assert_eq!(model.weights().len(), 7840);
        assert_eq!(model.weight_row(9).len(), 784);
        assert_eq!(model.epoch(), 3);
    }

    #[test]
    fn test_rejects_nine_rows() {
        let err = Model::from_json(&document(9, 784, 10), ModelShape::default()).unwrap_err();
        assert!(matches!(err, DigitError::Schema(_)));
    }

    #[test]
    fn test_rejects_short_bias() {
        let err = Model::from_json(&document(10, 784, 9), ModelShape::default()).unwrap_err();
        assert!(matches!(err, DigitError::Schema(_)));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let mut rows = vec![vec![0.0; 784]; 10];
        rows[4].pop();
        let json = json!({ "weights": rows, "bias": vec![0.0; 10], "epoch": 1 }).to_string();
        let err  = Model::from_json(&json, ModelShape::default()).unwrap_err();
        assert!(matches!(err, DigitError::Schema(msg) if msg.contains("row 4")));
    }

    #[test]
    fn test_rejects_missing_and_non_numeric_fields() {
        let shape = ModelShape::for_grid(1, 2);

        let missing = r#"{ "weights": [[1.0], [2.0]], "bias": [0.0, 0.0] }"#;
        assert!(matches!(Model::from_json(missing, shape), Err(DigitError::Schema(_))));

        let text = r#"{ "weights": [[1.0], ["x"]], "bias": [0.0, 0.0], "epoch": 1 }"#;
        assert!(matches!(Model::from_json(text, shape), Err(DigitError::Schema(_))));

        assert!(matches!(Model::from_json("not json", shape), Err(DigitError::Schema(_))));
    }

    #[test]
    fn test_rejects_values_overflowing_f32() {
        let json = r#"{ "weights": [[1e300], [0.0]], "bias": [0.0, 0.0], "epoch": 1 }"#;
        let err  = Model::from_json(json, ModelShape::for_grid(1, 2)).unwrap_err();
        assert!(matches!(err, DigitError::Schema(msg) if msg.contains("non-finite")));
    }

    #[test]
    fn test_from_rows_infers_shape() {
        let model = Model::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]], vec![0.5, -0.5], 7).unwrap();
        assert_eq!(model.shape(), ModelShape { classes: 2, features: 2 });
        assert_eq!(model.weight_row(1), &[3.0, 4.0]);
        assert_eq!(model.bias(), &[0.5, -0.5]);
    }

    #[test]
    fn test_rejects_empty_model() {
        let err = Model::from_rows(Vec::new(), Vec::new(), 0).unwrap_err();
        assert!(matches!(err, DigitError::Schema(_)));
    }
}
