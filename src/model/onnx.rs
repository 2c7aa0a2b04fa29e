//! ONNX Runtime backend.

use std::path::Path;
use std::sync::Mutex;

use ort::session::{Session, SessionInputValue};
use ort::tensor::TensorElementType;
use ort::value::TensorRef;

use super::{InferenceModel, ModelError, ModelInput};

/// Element type the graph declares for a token sequence input.
///
/// Keras graphs exported with `tf2onnx` keep whatever dtype the input layer
/// had, which is `float32` unless the author asked otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequenceElement {
    F32,
    I32,
    I64,
}

/// A single ONNX graph with its session.
///
/// `Session::run` needs exclusive access, so the session sits behind a mutex;
/// concurrent requests for the same model queue on it.
pub struct OnnxModel {
    name: String,
    input_name: String,
    output_name: String,
    sequence_element: SequenceElement,
    session: Mutex<Session>,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("name", &self.name)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

impl OnnxModel {
    pub fn load(name: impl Into<String>, path: &Path) -> Result<Self, ModelError> {
        let name = name.into();
        let load_err = |message: String| ModelError::Load {
            model: name.clone(),
            message,
        };

        let session = Session::builder()
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| load_err(format!("{}: {e}", path.display())))?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| load_err("graph declares no inputs".into()))?;
        let input_name = input.name.clone();
        let sequence_element = match input.input_type.tensor_type() {
            Some(TensorElementType::Int64) => SequenceElement::I64,
            Some(TensorElementType::Int32) => SequenceElement::I32,
            _ => SequenceElement::F32,
        };
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| load_err("graph declares no outputs".into()))?;

        tracing::debug!(
            model = %name,
            input = %input_name,
            output = %output_name,
            "onnx session ready"
        );

        Ok(Self {
            name,
            input_name,
            output_name,
            sequence_element,
            session: Mutex::new(session),
        })
    }

    fn inference_err(&self, message: String) -> ModelError {
        ModelError::Inference {
            model: self.name.clone(),
            message,
        }
    }

    fn run(&self, value: SessionInputValue<'_>) -> Result<Vec<f32>, ModelError> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| self.inference_err("session lock poisoned".into()))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => value])
            .map_err(|e| self.inference_err(e.to_string()))?;

        let (_, data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| ModelError::Output {
                model: self.name.clone(),
                message: format!("output `{}` is not f32: {e}", self.output_name),
            })?;
        Ok(data.to_vec())
    }
}

impl InferenceModel for OnnxModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: ModelInput<'_>) -> Result<Vec<f32>, ModelError> {
        let tensor_err = |e: ort::Error| self.inference_err(format!("tensor conversion: {e}"));

        match input {
            ModelInput::Image(view) => {
                let tensor = TensorRef::from_array_view(view).map_err(tensor_err)?;
                self.run(tensor.into())
            }
            ModelInput::Sequence(view) => match self.sequence_element {
                SequenceElement::I64 => {
                    let tensor = TensorRef::from_array_view(view).map_err(tensor_err)?;
                    self.run(tensor.into())
                }
                SequenceElement::I32 => {
                    let cast = view.mapv(|id| id as i32);
                    let tensor = TensorRef::from_array_view(cast.view()).map_err(tensor_err)?;
                    self.run(tensor.into())
                }
                SequenceElement::F32 => {
                    let cast = view.mapv(|id| id as f32);
                    let tensor = TensorRef::from_array_view(cast.view()).map_err(tensor_err)?;
                    self.run(tensor.into())
                }
            },
        }
    }
}
