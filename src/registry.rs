//! Startup loading of every model artifact the pipelines need.
//!
//! The registry is built once, before the server binds, and is immutable
//! afterwards. Handlers share it through an `Arc`; nothing in it is ever
//! mutated, so no locking is needed at this level.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::RegistryError;
use crate::labels::LabelEncoder;
use crate::model::{InferenceModel, ModelError};
use crate::text::Vocabulary;

pub const FOOD_IMAGE_MODEL_FILE: &str = "food_classifier_5class.onnx";
pub const SENTIMENT_MODEL_FILE: &str = "food_review_sentiment_model.onnx";
pub const SENTIMENT_VOCAB_FILE: &str = "tokenizer_sentiment.json";
pub const TEXT_FOOD_MODEL_FILE: &str = "food_text_model.onnx";
pub const TEXT_FOOD_VOCAB_FILE: &str = "tokenizer_food_text.json";
pub const TEXT_FOOD_LABELS_FILE: &str = "label_encoder_food_text.json";

/// `model/` next to the running executable, or `./model` if the executable
/// path cannot be resolved.
pub fn default_model_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("model")))
        .unwrap_or_else(|| PathBuf::from("model"))
}

/// Resolved locations of every artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub food_image_model: PathBuf,
    pub sentiment_model: PathBuf,
    pub sentiment_vocab: PathBuf,
    pub text_food_model: PathBuf,
    pub text_food_vocab: PathBuf,
    pub text_food_labels: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            food_image_model: dir.join(FOOD_IMAGE_MODEL_FILE),
            sentiment_model: dir.join(SENTIMENT_MODEL_FILE),
            sentiment_vocab: dir.join(SENTIMENT_VOCAB_FILE),
            text_food_model: dir.join(TEXT_FOOD_MODEL_FILE),
            text_food_vocab: dir.join(TEXT_FOOD_VOCAB_FILE),
            text_food_labels: dir.join(TEXT_FOOD_LABELS_FILE),
        }
    }

    pub fn all(&self) -> [&Path; 6] {
        [
            &self.food_image_model,
            &self.sentiment_model,
            &self.sentiment_vocab,
            &self.text_food_model,
            &self.text_food_vocab,
            &self.text_food_labels,
        ]
    }

    /// Fails on the first artifact that does not exist.
    pub fn ensure_present(&self) -> Result<(), RegistryError> {
        match self.all().into_iter().find(|path| !path.is_file()) {
            Some(missing) => Err(RegistryError::MissingArtifact {
                path: missing.to_path_buf(),
            }),
            None => Ok(()),
        }
    }
}

/// Already-constructed components for [`ModelRegistry::from_parts`].
pub struct RegistryParts {
    pub food_image: Arc<dyn InferenceModel>,
    pub sentiment: Arc<dyn InferenceModel>,
    pub sentiment_vocab: Vocabulary,
    pub text_food: Arc<dyn InferenceModel>,
    pub text_food_vocab: Vocabulary,
    pub text_food_labels: LabelEncoder,
}

/// Every loaded model plus its auxiliary vocabulary and encoder artifacts.
pub struct ModelRegistry {
    food_image: Arc<dyn InferenceModel>,
    sentiment: Arc<dyn InferenceModel>,
    sentiment_vocab: Vocabulary,
    text_food: Arc<dyn InferenceModel>,
    text_food_vocab: Vocabulary,
    text_food_labels: LabelEncoder,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.model_names())
            .field("sentiment_vocab", &self.sentiment_vocab.len())
            .field("text_food_vocab", &self.text_food_vocab.len())
            .field("text_food_labels", &self.text_food_labels.len())
            .finish()
    }
}

impl ModelRegistry {
    /// Loads every artifact from `dir` with the ONNX Runtime backend.
    #[cfg(feature = "onnx")]
    pub fn load(dir: &Path) -> Result<Self, RegistryError> {
        Self::load_with(dir, |name, path| {
            crate::model::OnnxModel::load(name, path)
                .map(|model| Arc::new(model) as Arc<dyn InferenceModel>)
        })
    }

    /// Loads every artifact from `dir`, building models with `load_model`.
    ///
    /// All paths are checked before anything is loaded, so a missing file is
    /// reported without paying for the other models first.
    pub fn load_with<F>(dir: &Path, load_model: F) -> Result<Self, RegistryError>
    where
        F: Fn(&str, &Path) -> Result<Arc<dyn InferenceModel>, ModelError>,
    {
        let paths = ArtifactPaths::in_dir(dir);
        paths.ensure_present()?;

        let model = |name: &str, path: &Path| {
            let loaded = load_model(name, path).map_err(|source| RegistryError::Model {
                name: name.to_string(),
                source,
            })?;
            tracing::info!(model = name, path = %path.display(), "model loaded");
            Ok::<_, RegistryError>(loaded)
        };
        let vocab = |path: &Path| {
            let vocab = Vocabulary::from_file(path).map_err(|source| RegistryError::Vocabulary {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::info!(path = %path.display(), words = vocab.len(), "vocabulary loaded");
            Ok::<_, RegistryError>(vocab)
        };

        let food_image = model("food_image", &paths.food_image_model)?;
        let sentiment = model("sentiment", &paths.sentiment_model)?;
        let sentiment_vocab = vocab(&paths.sentiment_vocab)?;
        let text_food = model("text_food", &paths.text_food_model)?;
        let text_food_vocab = vocab(&paths.text_food_vocab)?;
        let text_food_labels = LabelEncoder::from_file(&paths.text_food_labels)?;
        tracing::info!(
            path = %paths.text_food_labels.display(),
            classes = text_food_labels.len(),
            "label encoder loaded"
        );

        Ok(Self::from_parts(RegistryParts {
            food_image,
            sentiment,
            sentiment_vocab,
            text_food,
            text_food_vocab,
            text_food_labels,
        }))
    }

    pub fn from_parts(parts: RegistryParts) -> Self {
        Self {
            food_image: parts.food_image,
            sentiment: parts.sentiment,
            sentiment_vocab: parts.sentiment_vocab,
            text_food: parts.text_food,
            text_food_vocab: parts.text_food_vocab,
            text_food_labels: parts.text_food_labels,
        }
    }

    pub fn food_image(&self) -> &dyn InferenceModel {
        self.food_image.as_ref()
    }

    pub fn sentiment(&self) -> &dyn InferenceModel {
        self.sentiment.as_ref()
    }

    pub fn sentiment_vocab(&self) -> &Vocabulary {
        &self.sentiment_vocab
    }

    pub fn text_food(&self) -> &dyn InferenceModel {
        self.text_food.as_ref()
    }

    pub fn text_food_vocab(&self) -> &Vocabulary {
        &self.text_food_vocab
    }

    pub fn text_food_labels(&self) -> &LabelEncoder {
        &self.text_food_labels
    }

    pub fn model_names(&self) -> [&str; 3] {
        [
            self.food_image.name(),
            self.sentiment.name(),
            self.text_food.name(),
        ]
    }
}
