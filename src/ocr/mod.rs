pub mod adapter;
pub mod bridge;
pub mod precomputed;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::core::error::SegmentationError;

pub use bridge::CommandTextDetector;
pub use precomputed::{NoTextDetector, StaticTextDetector};

/// One recognized line as reported by an OCR engine: a quadrilateral in
/// original-image pixels and its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrLine {
    pub points: [[f32; 2]; 4],
    pub text: String,
}

impl OcrLine {
    /// Axis-aligned quad covering `[col_min, col_max] x [row_min, row_max]`.
    pub fn from_rect(col_min: f32, row_min: f32, col_max: f32, row_max: f32, text: &str) -> Self {
        Self {
            points: [
                [col_min, row_min],
                [col_max, row_min],
                [col_max, row_max],
                [col_min, row_max],
            ],
            text: text.to_string(),
        }
    }
}

/// Source of text lines for a screenshot.
pub trait TextDetector: Send + Sync {
    fn detect_text(&self, image: &RgbImage) -> Result<Vec<OcrLine>, SegmentationError>;
}
