pub mod core;
pub mod detect;
pub mod export;
pub mod merge;
pub mod ocr;
pub mod pipeline;

pub use crate::core::config::{Platform, SegmentationParams};
pub use crate::core::error::SegmentationError;
pub use crate::core::model::{Category, Element, Segment, Segmentation, SegmentedScreenshot};
pub use crate::pipeline::Segmenter;
