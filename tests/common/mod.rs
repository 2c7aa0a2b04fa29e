#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use foodai::{
    InferenceModel, LabelEncoder, ModelError, ModelInput, ModelRegistry, RegistryParts, StubModel,
    Vocabulary,
};
use image::{ImageFormat, Rgb, RgbImage};

/// Model outputs for a stub-backed registry.
pub struct StubOutputs {
    pub food_image: Vec<f32>,
    pub sentiment: Vec<f32>,
    pub text_food: Vec<f32>,
}

impl Default for StubOutputs {
    fn default() -> Self {
        Self {
            food_image: vec![0.01, 0.02, 0.03, 0.9, 0.04],
            sentiment: vec![0.87],
            text_food: vec![0.1, 0.812_345_6, 0.087_654_4],
        }
    }
}

pub struct StubRegistry {
    pub registry: Arc<ModelRegistry>,
    pub food_image: Arc<StubModel>,
    pub sentiment: Arc<StubModel>,
    pub text_food: Arc<StubModel>,
}

pub fn review_vocab() -> Vocabulary {
    let words = [
        "the",
        "food",
        "was",
        "absolutely",
        "amazing",
        "and",
        "delicious",
        "terrible",
    ];
    Vocabulary::from_word_index(
        words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.to_string(), i as i64 + 1))
            .collect::<HashMap<_, _>>(),
    )
}

pub fn query_vocab() -> Vocabulary {
    Vocabulary::from_word_index(HashMap::from([
        ("raw".to_string(), 1),
        ("fish".to_string(), 2),
        ("rice".to_string(), 3),
        ("noodles".to_string(), 4),
    ]))
}

/// Stub that sleeps before answering, like a model on a loaded CPU.
pub struct SlowModel {
    inner: StubModel,
    delay: Duration,
}

impl SlowModel {
    pub fn new(name: &str, output: Vec<f32>, delay: Duration) -> Self {
        Self {
            inner: StubModel::new(name, output),
            delay,
        }
    }
}

impl InferenceModel for SlowModel {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn predict(&self, input: ModelInput<'_>) -> Result<Vec<f32>, ModelError> {
        std::thread::sleep(self.delay);
        self.inner.predict(input)
    }
}

/// Registry whose sentiment model is `sentiment`; the rest are default stubs.
pub fn registry_with_sentiment(sentiment: Arc<dyn InferenceModel>) -> Arc<ModelRegistry> {
    let outputs = StubOutputs::default();
    Arc::new(ModelRegistry::from_parts(RegistryParts {
        food_image: Arc::new(StubModel::new("food_image", outputs.food_image)),
        sentiment,
        sentiment_vocab: review_vocab(),
        text_food: Arc::new(StubModel::new("text_food", outputs.text_food)),
        text_food_vocab: query_vocab(),
        text_food_labels: LabelEncoder::new(vec![
            "pizza".into(),
            "sushi".into(),
            "pad_thai".into(),
        ]),
    }))
}

pub fn stub_registry(outputs: StubOutputs) -> StubRegistry {
    let food_image = Arc::new(StubModel::new("food_image", outputs.food_image));
    let sentiment = Arc::new(StubModel::new("sentiment", outputs.sentiment));
    let text_food = Arc::new(StubModel::new("text_food", outputs.text_food));

    let registry = ModelRegistry::from_parts(RegistryParts {
        food_image: food_image.clone(),
        sentiment: sentiment.clone(),
        sentiment_vocab: review_vocab(),
        text_food: text_food.clone(),
        text_food_vocab: query_vocab(),
        text_food_labels: LabelEncoder::new(vec![
            "pizza".into(),
            "sushi".into(),
            "pad_thai".into(),
        ]),
    });

    StubRegistry {
        registry: Arc::new(registry),
        food_image,
        sentiment,
        text_food,
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 3 % 256) as u8, 200])
    });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}
