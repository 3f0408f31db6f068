use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbImage;
use tracing::debug;

use crate::core::error::SegmentationError;
use crate::ocr::{OcrLine, TextDetector};

static NEXT_REQUEST: AtomicU64 = AtomicU64::new(0);

/// Runs an external OCR program on a temporary PNG.
///
/// The program is invoked as `<program> <args..> --image <png>` and must
/// print a JSON array of `{"points": [[x, y]; 4], "text": "..."}` objects
/// on stdout.
#[derive(Debug, Clone)]
pub struct CommandTextDetector {
    work_dir: PathBuf,
    program: PathBuf,
    args: Vec<String>,
}

impl CommandTextDetector {
    pub fn new(work_dir: PathBuf, program: PathBuf) -> Self {
        Self {
            work_dir,
            program,
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    fn run(&self, image_path: &std::path::Path) -> Result<Vec<OcrLine>, SegmentationError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("--image")
            .arg(image_path)
            .output()
            .map_err(|err| {
                SegmentationError::TextDetector(format!(
                    "failed to invoke {}: {err}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SegmentationError::TextDetector(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout).map_err(|err| {
            SegmentationError::TextDetector(format!("failed to parse OCR JSON response: {err}"))
        })
    }
}

impl TextDetector for CommandTextDetector {
    fn detect_text(&self, image: &RgbImage) -> Result<Vec<OcrLine>, SegmentationError> {
        fs::create_dir_all(&self.work_dir)?;
        let request = NEXT_REQUEST.fetch_add(1, Ordering::Relaxed);
        let image_path = self
            .work_dir
            .join(format!("ocr_{}_{request}.png", std::process::id()));
        image.save(&image_path)?;

        let result = self.run(&image_path);
        if let Err(err) = fs::remove_file(&image_path) {
            debug!(path = %image_path.display(), %err, "could not remove OCR input");
        }
        let lines = result?;
        debug!(lines = lines.len(), program = %self.program.display(), "OCR finished");
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work_dir(prefix: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{prefix}_{}", std::process::id()))
    }

    #[test]
    fn missing_program_is_a_text_detector_error() {
        let detector = CommandTextDetector::new(
            work_dir("uiseg_bridge_missing"),
            PathBuf::from("/nonexistent/ocr-engine"),
        );
        let result = detector.detect_text(&RgbImage::new(4, 4));
        assert!(matches!(result, Err(SegmentationError::TextDetector(_))));
    }

    #[cfg(unix)]
    #[test]
    fn parses_program_output() {
        let detector = CommandTextDetector::new(work_dir("uiseg_bridge_echo"), PathBuf::from("sh"))
            .with_args(vec![
                "-c".to_string(),
                r#"echo '[{"points": [[1, 2], [30, 2], [30, 12], [1, 12]], "text": "Login"}]'"#
                    .to_string(),
            ]);
        let lines = detector.detect_text(&RgbImage::new(4, 4)).unwrap();
        assert_eq!(lines, vec![OcrLine::from_rect(1.0, 2.0, 30.0, 12.0, "Login")]);
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_reports_stderr() {
        let detector = CommandTextDetector::new(work_dir("uiseg_bridge_fail"), PathBuf::from("sh"))
            .with_args(vec!["-c".to_string(), "echo boom >&2; exit 3".to_string()]);
        let err = detector.detect_text(&RgbImage::new(4, 4)).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
