use std::path::PathBuf;

use thiserror::Error;

use crate::model::ModelError;
use crate::text::VocabularyError;

/// Startup-fatal failures raised while building the [`ModelRegistry`](crate::ModelRegistry).
///
/// None of these are retried; the process is expected to exit.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A required artifact is absent from the model directory.
    #[error("model artifact not found: {}", path.display())]
    MissingArtifact { path: PathBuf },
    /// The artifact exists but the inference backend refused it.
    #[error("failed to load model `{name}`: {source}")]
    Model {
        name: String,
        #[source]
        source: ModelError,
    },
    /// A tokenizer vocabulary could not be parsed.
    #[error("failed to load vocabulary {}: {source}", path.display())]
    Vocabulary {
        path: PathBuf,
        #[source]
        source: VocabularyError,
    },
    /// A label encoder class list could not be parsed.
    #[error("failed to load label encoder {}: {message}", path.display())]
    LabelEncoder { path: PathBuf, message: String },
}

/// Per-request failures surfaced by the prediction pipelines.
///
/// Every variant is recoverable: the HTTP layer turns it into a client error
/// response carrying the `Display` text. `EmptyText`, `BlankInput` and
/// `NoValidWords` are the empty-text family; [`PredictError::is_empty_text`]
/// groups them.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("cannot identify image file: {0}")]
    InvalidImage(String),
    #[error("Text is empty after cleaning")]
    EmptyText,
    #[error("Input text is empty")]
    BlankInput,
    #[error("Text contains no valid words")]
    NoValidWords,
    #[error("No known words found in input")]
    NoKnownWords,
    #[error("predicted class index {index} is outside the {classes} known classes")]
    UnknownClassIndex { index: usize, classes: usize },
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl PredictError {
    pub fn is_empty_text(&self) -> bool {
        matches!(
            self,
            PredictError::EmptyText | PredictError::BlankInput | PredictError::NoValidWords
        )
    }

    /// Stable machine-readable code for error bodies and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            PredictError::InvalidImage(_) => "INVALID_IMAGE",
            PredictError::EmptyText | PredictError::BlankInput | PredictError::NoValidWords => {
                "EMPTY_TEXT"
            }
            PredictError::NoKnownWords => "NO_KNOWN_WORDS",
            PredictError::UnknownClassIndex { .. } => "UNKNOWN_CLASS",
            PredictError::Model(_) => "INFERENCE_ERROR",
        }
    }
}
