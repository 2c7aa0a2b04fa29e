use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::round_to;
use crate::error::PredictError;
use crate::model::{InferenceModel, ModelError, ModelInput};
use crate::registry::ModelRegistry;
use crate::text::{Side, Vocabulary, clean_review_text, pad_sequence};

/// Sequence length the sentiment model was trained with.
pub const SENTIMENT_MAX_LEN: usize = 100;

/// Scores strictly above this are positive; 0.5 itself is negative.
const POSITIVE_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
}

/// Response body of `POST /predict_sentiment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPrediction {
    pub sentiment: Sentiment,
    /// Raw model score as a percentage, two decimals.
    pub confidence: f64,
    /// The request text, exactly as received.
    pub text: String,
}

pub fn sentiment_from_score(score: f32) -> Sentiment {
    if score > POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else {
        Sentiment::Negative
    }
}

/// Cleans, tokenizes and pads `text` into a `1 x SENTIMENT_MAX_LEN` batch.
pub fn prepare_review(vocab: &Vocabulary, text: &str) -> Result<Array2<i64>, PredictError> {
    let cleaned = clean_review_text(text);
    if cleaned.is_empty() {
        return Err(PredictError::EmptyText);
    }

    let seq = vocab.texts_to_sequence(&cleaned);
    let padded = pad_sequence(&seq, SENTIMENT_MAX_LEN, Side::Post, Side::Post);
    Ok(Array1::from(padded).insert_axis(Axis(0)))
}

fn score(model: &dyn InferenceModel, batch: &Array2<i64>) -> Result<f32, PredictError> {
    let output = model.predict(ModelInput::Sequence(batch.view()))?;
    match output.as_slice() {
        [score] => Ok(*score),
        other => Err(ModelError::Output {
            model: model.name().to_string(),
            message: format!("expected a single score, got {} values", other.len()),
        }
        .into()),
    }
}

/// Classifies a review as positive or negative.
pub fn predict_sentiment(
    registry: &ModelRegistry,
    text: &str,
) -> Result<SentimentPrediction, PredictError> {
    let batch = prepare_review(registry.sentiment_vocab(), text)?;
    let score = score(registry.sentiment(), &batch)?;

    Ok(SentimentPrediction {
        sentiment: sentiment_from_score(score),
        confidence: round_to(f64::from(score) * 100.0, 2),
        text: text.to_string(),
    })
}
