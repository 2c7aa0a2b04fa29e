//! Upload decoding and image tensor preparation.

use image::imageops::{self, FilterType};
use ndarray::Array4;

use crate::error::PredictError;

/// Side length the image classifier was trained on.
pub const IMG_SIZE: u32 = 224;

/// Decodes `bytes`, converts to RGB, resizes to `IMG_SIZE` square and scales
/// every channel into `[0, 1]`.
///
/// The result is a batch of one in NHWC layout, `1 x 224 x 224 x 3`.
pub fn preprocess_image(bytes: &[u8]) -> Result<Array4<f32>, PredictError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| PredictError::InvalidImage(e.to_string()))?;

    let rgb = imageops::resize(
        &decoded.to_rgb8(),
        IMG_SIZE,
        IMG_SIZE,
        FilterType::CatmullRom,
    );

    let side = IMG_SIZE as usize;
    let data: Vec<f32> = rgb
        .into_raw()
        .into_iter()
        .map(|v| f32::from(v) / 255.0)
        .collect();

    Array4::from_shape_vec((1, side, side, 3), data)
        .map_err(|e| PredictError::InvalidImage(e.to_string()))
}
