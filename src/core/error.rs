//! Error types shared by the segmentation pipeline and its collaborators.

use thiserror::Error;

/// Errors raised at the boundary of the segmentation pipeline.
///
/// The geometric stages themselves are total; only input validation,
/// configuration loading and the external collaborators can fail.
#[derive(Debug, Error)]
pub enum SegmentationError {
    /// The input image has no pixels.
    #[error("image has zero area ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// The OCR collaborator failed or returned something unreadable.
    #[error("text detector failed: {0}")]
    TextDetector(String),

    /// The widget classifier collaborator failed.
    #[error("patch classifier failed: {0}")]
    Classifier(String),

    /// A parameter override file could not be applied.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
