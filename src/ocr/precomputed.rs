use std::fs;
use std::path::Path;

use image::RgbImage;

use crate::core::error::SegmentationError;
use crate::ocr::{OcrLine, TextDetector};

/// Returns the same lines for every image, e.g. OCR results computed
/// ahead of time and stored as JSON.
#[derive(Debug, Clone, Default)]
pub struct StaticTextDetector {
    lines: Vec<OcrLine>,
}

impl StaticTextDetector {
    pub fn new(lines: Vec<OcrLine>) -> Self {
        Self { lines }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SegmentationError> {
        let data = fs::read_to_string(path)?;
        let lines = serde_json::from_str(&data).map_err(|err| {
            SegmentationError::TextDetector(format!("invalid OCR file {}: {err}", path.display()))
        })?;
        Ok(Self::new(lines))
    }
}

impl TextDetector for StaticTextDetector {
    fn detect_text(&self, _image: &RgbImage) -> Result<Vec<OcrLine>, SegmentationError> {
        Ok(self.lines.clone())
    }
}

/// Component-only segmentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTextDetector;

impl TextDetector for NoTextDetector {
    fn detect_text(&self, _image: &RgbImage) -> Result<Vec<OcrLine>, SegmentationError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn loads_lines_from_json() {
        let path = std::env::temp_dir().join(format!("uiseg_ocr_{}.json", std::process::id()));
        fs::write(
            &path,
            r#"[{"points": [[10, 5], [80, 5], [80, 25], [10, 25]], "text": "Settings"}]"#,
        )
        .unwrap();
        let detector = StaticTextDetector::from_json_file(&path).unwrap();
        let lines = detector.detect_text(&RgbImage::new(1, 1)).unwrap();
        assert_eq!(lines, vec![OcrLine::from_rect(10.0, 5.0, 80.0, 25.0, "Settings")]);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn malformed_json_is_a_text_detector_error() {
        let path = std::env::temp_dir().join(format!("uiseg_bad_ocr_{}.json", std::process::id()));
        fs::write(&path, r#"{"text": 1}"#).unwrap();
        let result = StaticTextDetector::from_json_file(&path);
        assert!(matches!(result, Err(SegmentationError::TextDetector(_))));
        fs::remove_file(path).unwrap();
    }
}
