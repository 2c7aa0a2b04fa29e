use std::sync::Mutex;

use super::{InferenceModel, ModelError, ModelInput};

/// Deterministic model returning the same output for every input.
///
/// Remembers the shape of the most recent input so callers can check what a
/// pipeline fed it.
#[derive(Debug)]
pub struct StubModel {
    name: String,
    output: Vec<f32>,
    last_shape: Mutex<Option<Vec<usize>>>,
    last_sequence: Mutex<Option<Vec<i64>>>,
}

impl StubModel {
    pub fn new(name: impl Into<String>, output: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            output,
            last_shape: Mutex::new(None),
            last_sequence: Mutex::new(None),
        }
    }

    pub fn last_input_shape(&self) -> Option<Vec<usize>> {
        self.last_shape
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Token ids of the last [`ModelInput::Sequence`] this model received.
    pub fn last_sequence(&self) -> Option<Vec<i64>> {
        self.last_sequence
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl InferenceModel for StubModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: ModelInput<'_>) -> Result<Vec<f32>, ModelError> {
        *self
            .last_shape
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(input.shape());
        if let ModelInput::Sequence(view) = input {
            *self
                .last_sequence
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()) =
                Some(view.iter().copied().collect());
        }
        Ok(self.output.clone())
    }
}
