use ndarray::Array4;
use serde::{Deserialize, Serialize};

use super::{argmax, empty_output, round_to};
use crate::error::PredictError;
use crate::labels::{FOOD_CLASS_NAMES, display_name_or_raw};
use crate::model::{InferenceModel, ModelError, ModelInput};
use crate::registry::ModelRegistry;
use crate::vision::preprocess_image;

/// Response body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodPrediction {
    pub food: String,
    /// Percentage, two decimals.
    pub confidence: f64,
}

/// Runs the image model on a preprocessed batch and maps the winning index
/// through the class table.
pub fn predict_food(
    model: &dyn InferenceModel,
    batch: &Array4<f32>,
) -> Result<FoodPrediction, PredictError> {
    let probs = model.predict(ModelInput::Image(batch.view()))?;
    if probs.len() != FOOD_CLASS_NAMES.len() {
        return Err(ModelError::Output {
            model: model.name().to_string(),
            message: format!(
                "expected {} class probabilities, got {}",
                FOOD_CLASS_NAMES.len(),
                probs.len()
            ),
        }
        .into());
    }

    let (index, prob) = argmax(&probs).ok_or_else(|| empty_output(model.name()))?;
    let class_name = FOOD_CLASS_NAMES[index];

    Ok(FoodPrediction {
        food: display_name_or_raw(class_name).to_string(),
        confidence: round_to(f64::from(prob) * 100.0, 2),
    })
}

/// Upload bytes in, prediction out.
pub fn classify_food_image(
    registry: &ModelRegistry,
    bytes: &[u8],
) -> Result<FoodPrediction, PredictError> {
    let batch = preprocess_image(bytes)?;
    predict_food(registry.food_image(), &batch)
}
