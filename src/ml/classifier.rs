// ============================================================
// Layer 5 — Linear Classifier (Burn)
// ============================================================
// Evaluates the linear model over a flattened occupancy grid:
//
//   x      : [1, D]   the grid, row-major, 0.0 / 1.0
//   W      : [K, D]   one row of weights per class
//   b      : [1, K]   one bias per class
//
//   logits = x · Wᵀ + b                        → [1, K]
//   probs  = softmax(logits)                   → [1, K]
//
// Softmax is taken through burn's activation::softmax, which
// subtracts the row maximum before exponentiating:
//
//   p_i = exp(z_i - max z) / Σ_k exp(z_k - max z)
//
// so a logit of 1000 does not overflow to infinity.
//
// The tensors are built once per model (from_model) and reused
// for every prediction. The default backend is NdArray (CPU):
// a 10 × 784 matrix does not need a GPU.
//
// Reference: Burn Book §3 (Tensors)

use burn::tensor::{activation::softmax, backend::Backend, Tensor, TensorData};

use crate::domain::error::{DigitError, Result};
use crate::domain::grid::OccupancyGrid;
use crate::domain::model::{Model, ModelShape};
use crate::domain::prediction::PredictionResult;

pub type InferBackend = burn::backend::NdArray;

pub struct LinearClassifier<B: Backend = InferBackend> {
    weights: Tensor<B, 2>,
    bias:    Tensor<B, 2>,
    shape:   ModelShape,
    device:  B::Device,
}

impl LinearClassifier<InferBackend> {
    /// Upload a model to the default CPU backend.
    pub fn on_cpu(model: &Model) -> Self {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        Self::from_model(model, &device)
    }
}

impl<B: Backend> LinearClassifier<B> {
    pub fn from_model(model: &Model, device: &B::Device) -> Self {
        let shape = model.shape();
        let weights = Tensor::<B, 2>::from_data(
            TensorData::new(model.weights().to_vec(), [shape.classes, shape.features]),
            device,
        );
        let bias = Tensor::<B, 2>::from_data(
            TensorData::new(model.bias().to_vec(), [1, shape.classes]),
            device,
        );
        Self { weights, bias, shape, device: device.clone() }
    }

    /// Raw per-class scores, before softmax.
    pub fn logits(&self, grid: &OccupancyGrid) -> Result<Vec<f32>> {
        let logits = self.forward(grid)?;
        read_back(logits)
    }

    /// Class probabilities for the grid.
    pub fn predict(&self, grid: &OccupancyGrid) -> Result<PredictionResult> {
        let probs  = softmax(self.forward(grid)?, 1);
        let result = PredictionResult::new(read_back(probs)?);

        tracing::debug!(
            "Predicted digit {} (p={:.4})",
            result.argmax(),
            result.confidence()
        );
        Ok(result)
    }

    /// x · Wᵀ + b, shape [1, K].
    fn forward(&self, grid: &OccupancyGrid) -> Result<Tensor<B, 2>> {
        let x = grid.flatten();
        if x.len() != self.shape.features {
            return Err(DigitError::DimensionMismatch {
                expected: self.shape.features,
                got:      x.len(),
            });
        }
        let x = Tensor::<B, 2>::from_data(TensorData::new(x, [1, self.shape.features]), &self.device);
        Ok(x.matmul(self.weights.clone().transpose()) + self.bias.clone())
    }
}

fn read_back<B: Backend>(t: Tensor<B, 2>) -> Result<Vec<f32>> {
    t.into_data()
        .to_vec::<f32>()
        .map_err(|e| DigitError::Inference(format!("{e:?}")))
}

/// One-shot prediction on the CPU backend.
pub fn predict(model: &Model, grid: &OccupancyGrid) -> Result<PredictionResult> {
    LinearClassifier::on_cpu(model).predict(grid)
}
