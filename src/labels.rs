//! Class label tables and the text model's label encoder.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PredictError, RegistryError};

/// Output order of the image classifier.
pub const FOOD_CLASS_NAMES: [&str; 5] = ["apple_pie", "hamburger", "ice_cream", "pizza", "sushi"];

/// Display names shared by the image classifier and the text recommender.
const FOOD_DISPLAY_NAMES: &[(&str, &str)] = &[
    ("apple_pie", "Apple Pie"),
    ("hamburger", "Hamburger"),
    ("ice_cream", "Ice Cream"),
    ("pizza", "Pizza"),
    ("sushi", "Sushi"),
];

/// Looks up the display name for a raw class identifier.
pub fn display_name(class_name: &str) -> Option<&'static str> {
    FOOD_DISPLAY_NAMES
        .iter()
        .find(|(raw, _)| *raw == class_name)
        .map(|(_, display)| *display)
}

/// Display name for `class_name`, or the raw name when the table has no entry.
pub fn display_name_or_raw(class_name: &str) -> &str {
    display_name(class_name).unwrap_or(class_name)
}

/// Ordered class list mapping the text model's output index back to a class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LabelEncoderFile {
    Bare(Vec<String>),
    Wrapped { classes: Vec<String> },
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Reads an exported class list (bare array or `{"classes": [...]}`).
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let to_err = |message: String| RegistryError::LabelEncoder {
            path: path.to_path_buf(),
            message,
        };
        let raw = fs::read_to_string(path).map_err(|e| to_err(e.to_string()))?;
        let classes = match serde_json::from_str(&raw).map_err(|e| to_err(e.to_string()))? {
            LabelEncoderFile::Bare(classes) | LabelEncoderFile::Wrapped { classes } => classes,
        };
        if classes.is_empty() {
            return Err(to_err("class list is empty".into()));
        }
        Ok(Self { classes })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn inverse_transform(&self, index: usize) -> Result<&str, PredictError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(PredictError::UnknownClassIndex {
                index,
                classes: self.classes.len(),
            })
    }
}
