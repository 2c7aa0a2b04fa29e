//! Food AI inference service.
//!
//! Three pre-trained models sit behind HTTP endpoints:
//!
//! - **Image classifier** - five dishes from an uploaded photo (`POST /predict`)
//! - **Review sentiment** - positive/negative for a short review (`POST /predict_sentiment`)
//! - **Text-to-food** - a dish suggestion from a free-text craving (`POST /recommend_food`)
//!
//! The crate is the glue around those models: it turns uploads and text into
//! the tensors each model expects, runs them, and shapes the outputs into the
//! JSON the frontend reads. Models are opaque artifacts loaded once at
//! startup into a [`ModelRegistry`]; if any artifact is missing the registry
//! refuses to build and the server never binds.
//!
//! ## Library use
//!
//! ```no_run
//! use foodai::{ModelRegistry, pipeline};
//! use std::path::Path;
//!
//! let registry = ModelRegistry::load(Path::new("model"))?;
//! let review = pipeline::predict_sentiment(&registry, "The ramen was incredible")?;
//! println!("{:?} ({}%)", review.sentiment, review.confidence);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Without the `onnx` feature, build the registry with
//! [`ModelRegistry::from_parts`] and your own [`InferenceModel`]s.

pub mod error;
pub mod labels;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod text;
pub mod vision;

#[cfg(feature = "server")]
pub mod server;

pub use crate::error::{PredictError, RegistryError};
pub use crate::labels::{FOOD_CLASS_NAMES, LabelEncoder};
pub use crate::model::{InferenceModel, ModelError, ModelInput, StubModel};
pub use crate::pipeline::{FoodPrediction, FoodRecommendation, Sentiment, SentimentPrediction};
pub use crate::registry::{ArtifactPaths, ModelRegistry, RegistryParts, default_model_dir};
pub use crate::text::Vocabulary;

#[cfg(feature = "onnx")]
pub use crate::model::OnnxModel;
