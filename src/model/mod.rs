//! Inference backends.
//!
//! Every model artifact is wrapped behind [`InferenceModel`], so the
//! pipelines never see the runtime they execute on. Production builds load
//! ONNX graphs through [`OnnxModel`]; tests and offline wiring use
//! [`StubModel`], which returns a fixed output.

#[cfg(feature = "onnx")]
mod onnx;
mod stub;

#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;
pub use stub::StubModel;

use ndarray::{ArrayView2, ArrayView4};
use thiserror::Error;

/// Batch-of-one input handed to a model.
#[derive(Debug, Clone, Copy)]
pub enum ModelInput<'a> {
    /// NHWC image tensor with values in `[0, 1]`.
    Image(ArrayView4<'a, f32>),
    /// Padded token id sequence, shape `1 x len`.
    Sequence(ArrayView2<'a, i64>),
}

impl ModelInput<'_> {
    pub fn shape(&self) -> Vec<usize> {
        match self {
            ModelInput::Image(view) => view.shape().to_vec(),
            ModelInput::Sequence(view) => view.shape().to_vec(),
        }
    }
}

/// Failures raised by an inference backend.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model `{model}` could not be loaded: {message}")]
    Load { model: String, message: String },
    #[error("model `{model}` inference failed: {message}")]
    Inference { model: String, message: String },
    #[error("model `{model}` produced unusable output: {message}")]
    Output { model: String, message: String },
}

/// A loaded, read-only model that can be shared across request handlers.
pub trait InferenceModel: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Runs one forward pass and returns the flattened first output tensor.
    fn predict(&self, input: ModelInput<'_>) -> Result<Vec<f32>, ModelError>;
}
