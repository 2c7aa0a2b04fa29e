use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::{argmax, empty_output, round_to};
use crate::error::PredictError;
use crate::labels::display_name_or_raw;
use crate::model::ModelInput;
use crate::registry::ModelRegistry;
use crate::text::{Side, Vocabulary, clean_query_text, is_text_space, pad_sequence};

/// Sequence length the text-to-food model was trained with.
pub const TEXT_FOOD_MAX_LEN: usize = 50;

/// Response body of `POST /recommend_food`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecommendation {
    pub food_class: String,
    pub food_name: String,
    /// Probability in `[0, 1]`, four decimals. Unlike the other two
    /// endpoints this is not a percentage.
    pub confidence: f64,
}

/// Validates, cleans, tokenizes and pads a free-text query.
///
/// Over-length input keeps its last `TEXT_FOOD_MAX_LEN` tokens.
pub fn prepare_query(vocab: &Vocabulary, text: &str) -> Result<Array2<i64>, PredictError> {
    if text.chars().all(is_text_space) {
        return Err(PredictError::BlankInput);
    }

    let cleaned = clean_query_text(text);
    if cleaned.is_empty() {
        return Err(PredictError::NoValidWords);
    }

    let seq = vocab.texts_to_sequence(&cleaned);
    if seq.is_empty() {
        return Err(PredictError::NoKnownWords);
    }

    let padded = pad_sequence(&seq, TEXT_FOOD_MAX_LEN, Side::Post, Side::Pre);
    Ok(Array1::from(padded).insert_axis(Axis(0)))
}

/// Suggests a dish for a free-text description.
pub fn recommend_food(
    registry: &ModelRegistry,
    text: &str,
) -> Result<FoodRecommendation, PredictError> {
    let batch = prepare_query(registry.text_food_vocab(), text)?;

    let model = registry.text_food();
    let probs = model.predict(ModelInput::Sequence(batch.view()))?;
    let (index, prob) = argmax(&probs).ok_or_else(|| empty_output(model.name()))?;

    let class_name = registry.text_food_labels().inverse_transform(index)?;

    Ok(FoodRecommendation {
        food_class: class_name.to_string(),
        food_name: display_name_or_raw(class_name).to_string(),
        confidence: round_to(f64::from(prob), 4),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vocab() -> Vocabulary {
        Vocabulary::from_word_index(HashMap::from([
            ("cheesy".to_string(), 1),
            ("crust".to_string(), 2),
            ("raw".to_string(), 3),
            ("fish".to_string(), 4),
        ]))
    }

    #[test]
    fn blank_and_symbol_only_inputs_are_rejected() {
        assert!(matches!(prepare_query(&vocab(), "   "), Err(PredictError::BlankInput)));
        assert!(matches!(prepare_query(&vocab(), ""), Err(PredictError::BlankInput)));
        assert!(matches!(
            prepare_query(&vocab(), "\u{1c}\t\u{1f}"),
            Err(PredictError::BlankInput)
        ));
        assert!(matches!(
            prepare_query(&vocab(), "#$% 99"),
            Err(PredictError::NoValidWords)
        ));
    }

    #[test]
    fn all_unknown_words_is_an_error() {
        assert!(matches!(
            prepare_query(&vocab(), "spicy noodle soup"),
            Err(PredictError::NoKnownWords)
        ));
    }

    #[test]
    fn known_words_are_padded_at_the_end() {
        let batch = prepare_query(&vocab(), "Something CHEESY with a thin crust!").unwrap();
        assert_eq!(batch.shape(), &[1, TEXT_FOOD_MAX_LEN]);
        assert_eq!(batch[[0, 0]], 1);
        assert_eq!(batch[[0, 1]], 2);
        assert!(batch.iter().skip(2).all(|&id| id == 0));
    }

    #[test]
    fn long_query_keeps_the_tail() {
        let text = "cheesy ".repeat(TEXT_FOOD_MAX_LEN) + "raw fish";
        let batch = prepare_query(&vocab(), &text).unwrap();
        assert_eq!(batch.shape(), &[1, TEXT_FOOD_MAX_LEN]);
        assert_eq!(batch[[0, TEXT_FOOD_MAX_LEN - 2]], 3);
        assert_eq!(batch[[0, TEXT_FOOD_MAX_LEN - 1]], 4);
        assert_eq!(batch[[0, 0]], 1);
    }
}
