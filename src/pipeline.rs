use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{ImageReader, RgbImage};
use tracing::{debug, info};

use crate::core::config::{Platform, SegmentationParams};
use crate::core::error::SegmentationError;
use crate::core::model::{Component, Segmentation, SegmentedScreenshot};
use crate::detect::{classify_components, resize_by_longest_edge, ComponentDetector, PatchClassifier};
use crate::export::html_debug_export::HtmlDebugExporter;
use crate::export::json_export::JsonExporter;
use crate::export::preview_export::PreviewExporter;
use crate::export::Exporter;
use crate::merge::{MergeEngine, SimpleMergeEngine};
use crate::ocr::adapter::{refine_texts, texts_from_lines};
use crate::ocr::{NoTextDetector, TextDetector};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub platform: Platform,
    /// JSON file with parameter overrides applied on top of the platform profile.
    pub params_file: Option<PathBuf>,
    pub debug: bool,
}

impl PipelineConfig {
    pub fn new(input: PathBuf, output: PathBuf, platform: Platform) -> Self {
        Self {
            input,
            output,
            platform,
            params_file: None,
            debug: false,
        }
    }

    pub fn with_params_file(mut self, params_file: Option<PathBuf>) -> Self {
        self.params_file = params_file;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn params(&self) -> Result<SegmentationParams, SegmentationError> {
        let params = self.platform.params();
        match &self.params_file {
            Some(path) => params.with_overrides(path),
            None => Ok(params),
        }
    }
}

/// Segments screenshots into components, blocks and text.
///
/// Text comes from the configured [`TextDetector`]; without one the result
/// holds components only. An optional [`PatchClassifier`] labels every
/// component with a widget subclass.
pub struct Segmenter {
    params: SegmentationParams,
    text_detector: Box<dyn TextDetector>,
    classifier: Option<Box<dyn PatchClassifier>>,
}

impl Segmenter {
    pub fn new(params: SegmentationParams) -> Self {
        Self {
            params,
            text_detector: Box::new(NoTextDetector),
            classifier: None,
        }
    }

    pub fn with_text_detector(mut self, text_detector: Box<dyn TextDetector>) -> Self {
        self.text_detector = text_detector;
        self
    }

    pub fn with_classifier(mut self, classifier: Box<dyn PatchClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn params(&self) -> &SegmentationParams {
        &self.params
    }

    pub fn segment(&self, image: &RgbImage) -> Result<Segmentation, SegmentationError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(SegmentationError::EmptyImage { width, height });
        }
        let params = &self.params;

        let lines = self.text_detector.detect_text(image)?;
        let texts = refine_texts(
            texts_from_lines(&lines, width, height),
            height,
            params.max_text_height_ratio,
        );
        debug!(lines = lines.len(), kept = texts.len(), "text detection finished");

        let resized = resize_by_longest_edge(image, params.resize);
        let mut components = ComponentDetector::new(params).detect(&resized);
        if let Some(classifier) = &self.classifier {
            classify_components(&resized, &mut components, classifier.as_ref())?;
        }

        let scale = height as f64 / resized.height() as f64;
        let components: Vec<Component> = components
            .into_iter()
            .map(|component| component.rescaled(scale))
            .collect();

        let elements = SimpleMergeEngine::new(params).merge(components, texts, height);
        let segmentation = Segmentation::from_elements(&elements, width, height);
        info!(
            width,
            height,
            segments = segmentation.segments.len(),
            "segmentation finished"
        );
        Ok(segmentation)
    }
}

pub fn load_image(path: &Path) -> Result<RgbImage> {
    let image = ImageReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("failed to decode {}", path.display()))?;
    Ok(image.to_rgb8())
}

fn screenshot_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "screenshot".to_string())
}

pub fn segment_file(config: &PipelineConfig, segmenter: &Segmenter) -> Result<SegmentedScreenshot> {
    let image = load_image(&config.input)?;
    let segmentation = segmenter
        .segment(&image)
        .with_context(|| format!("failed to segment {}", config.input.display()))?;
    Ok(SegmentedScreenshot {
        name: screenshot_name(&config.input),
        image,
        segmentation,
    })
}

pub fn export_screenshot(screenshot: &SegmentedScreenshot, output: &Path, debug: bool) -> Result<()> {
    JsonExporter::new(output.to_path_buf()).export(screenshot)?;
    if debug {
        PreviewExporter::new(output.to_path_buf()).export(screenshot)?;
        HtmlDebugExporter::new(output.join("debug")).export(screenshot)?;
    }
    Ok(())
}
