use std::fmt;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::SegmentationError;

/// Kind of GUI the screenshot was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Desktop,
    Mobile,
}

impl Platform {
    pub fn params(self) -> SegmentationParams {
        match self {
            Platform::Desktop => SegmentationParams::desktop(),
            Platform::Mobile => SegmentationParams::mobile(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Desktop => write!(f, "desktop"),
            Platform::Mobile => write!(f, "mobile"),
        }
    }
}

/// Tunable parameter profile of the segmentation pipeline.
///
/// Field names serialize to the kebab-case keys used by profile files, e.g.
/// `{"min-ele-area": 100, "max-line-gap": 12}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SegmentationParams {
    /// Gradient threshold of the binarizer.
    pub min_grad: u8,
    /// Neighbor tolerance of the greyscale flood fill in nesting inspection.
    pub ffl_block: u8,
    /// Minimum bounding-box area of a component, in working-resolution pixels.
    pub min_ele_area: i64,
    /// Drop components contained in a non-block component.
    pub merge_contained_ele: bool,
    pub merge_line_to_paragraph: bool,
    pub remove_bar: bool,
    #[serde(rename = "threshold-rec-min-evenness")]
    pub rec_min_evenness: f64,
    #[serde(rename = "threshold-rec-max-dent-ratio")]
    pub rec_max_dent_ratio: f64,
    #[serde(rename = "threshold-line-thickness")]
    pub line_thickness: usize,
    #[serde(rename = "threshold-line-min-length")]
    pub line_min_length: f64,
    /// Largest vertical gap between two text lines of one paragraph.
    pub max_line_gap: i32,
    pub intersection_bias: i32,
    pub max_text_height_ratio: f64,
    /// Longest edge of the working resolution.
    pub resize: u32,
    /// Levels of nesting inspection below the outer detection pass.
    pub nesting_depth: usize,
}

impl SegmentationParams {
    pub fn desktop() -> Self {
        Self {
            min_grad: 10,
            ffl_block: 5,
            min_ele_area: 300,
            merge_contained_ele: true,
            merge_line_to_paragraph: true,
            remove_bar: false,
            rec_min_evenness: 0.7,
            rec_max_dent_ratio: 0.25,
            line_thickness: 8,
            line_min_length: 0.95,
            max_line_gap: 20,
            intersection_bias: 2,
            max_text_height_ratio: 0.3,
            resize: 800,
            nesting_depth: 1,
        }
    }

    pub fn mobile() -> Self {
        Self {
            min_grad: 5,
            min_ele_area: 20,
            max_line_gap: 10,
            ..Self::desktop()
        }
    }

    pub fn bias(&self) -> (i32, i32) {
        (self.intersection_bias, self.intersection_bias)
    }

    /// Applies a JSON object of overrides on top of this profile.
    pub fn apply_overrides(self, json: &str) -> Result<Self, SegmentationError> {
        let overrides: Value = serde_json::from_str(json)?;
        let Value::Object(overrides) = overrides else {
            return Err(SegmentationError::InvalidConfig(
                "parameter overrides must be a JSON object".to_string(),
            ));
        };
        let mut base = serde_json::to_value(&self)?;
        if let Value::Object(fields) = &mut base {
            fields.extend(overrides);
        }
        serde_json::from_value(base)
            .map_err(|err| SegmentationError::InvalidConfig(err.to_string()))
    }

    pub fn with_overrides(self, path: &Path) -> Result<Self, SegmentationError> {
        let json = fs::read_to_string(path)?;
        self.apply_overrides(&json)
    }
}

impl Default for SegmentationParams {
    fn default() -> Self {
        Self::desktop()
    }
}
