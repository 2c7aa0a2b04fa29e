//! Request-to-prediction glue for each model.
//!
//! Each submodule owns one endpoint's path: preprocess the raw input, run the
//! registry's model, and shape the output into a serializable result.

mod food_image;
mod sentiment;
mod text_food;

pub use food_image::{FoodPrediction, classify_food_image, predict_food};
pub use sentiment::{
    SENTIMENT_MAX_LEN, Sentiment, SentimentPrediction, predict_sentiment, prepare_review,
    sentiment_from_score,
};
pub use text_food::{FoodRecommendation, TEXT_FOOD_MAX_LEN, prepare_query, recommend_food};

use crate::model::ModelError;

/// Rounds to `decimals` places, exact ties going to the even neighbour.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}

/// Index and value of the largest element. Ties resolve to the lowest index
/// and NaN never wins.
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, top)| v > top) {
            best = Some((i, v));
        }
    }
    best
}

fn empty_output(model: &str) -> ModelError {
    ModelError::Output {
        model: model.to_string(),
        message: "empty probability vector".into(),
    }
}
