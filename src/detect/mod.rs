//! Non-text component detection on the working-resolution image.

pub mod binarize;
pub mod block;
pub mod classifier;
pub mod components;
pub mod line;
pub mod nesting;
pub mod rectangle;
pub mod region;

use image::{imageops, RgbImage};
use tracing::debug;

use crate::core::config::SegmentationParams;
use crate::core::model::Component;

pub use binarize::resize_by_longest_edge;
pub use classifier::{classify_components, PatchClassifier};

/// Runs binarization, line removal, region detection and component
/// refinement on an already resized screenshot.
#[derive(Debug, Clone)]
pub struct ComponentDetector<'a> {
    params: &'a SegmentationParams,
}

impl<'a> ComponentDetector<'a> {
    pub fn new(params: &'a SegmentationParams) -> Self {
        Self { params }
    }

    pub fn detect(&self, image: &RgbImage) -> Vec<Component> {
        let params = self.params;
        let grey = imageops::grayscale(image);
        let mut binary = binarize::binarize(&grey, params.min_grad);
        let lines = line::remove_lines(&mut binary, params.line_thickness, params.line_min_length);
        let foreground = binary.pixels().filter(|p| p[0] > 0).count();

        let raw = components::detect_components(
            &binary,
            params.min_ele_area,
            params.rec_min_evenness,
            params.rec_max_dent_ratio,
        );
        let raw_count = raw.len();
        let filtered = components::filter_components(raw, params.min_ele_area, binary.height());
        let filtered_count = filtered.len();
        let mut merged = components::merge_intersected(filtered);
        let blocks = block::recognize_blocks(&binary, &mut merged);
        if params.merge_contained_ele {
            merged = components::remove_contained_not_in_block(merged);
        }
        let nested = nesting::inspect_nesting(
            &grey,
            &mut merged,
            &nesting::NestingParams::from(params),
        );
        components::tag_containment(&mut merged);

        debug!(
            foreground,
            removed_line_rows = lines,
            raw = raw_count,
            filtered = filtered_count,
            blocks,
            nested,
            kept = merged.len(),
            "component detection finished"
        );
        merged
    }
}
