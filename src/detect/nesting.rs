use std::collections::VecDeque;

use image::{imageops, GrayImage};
use tracing::debug;

use crate::core::config::SegmentationParams;
use crate::core::geometry::ratio;
use crate::core::model::Component;
use crate::detect::rectangle::{is_line, is_rectangle};
use crate::detect::region::{flood_fill, VisitMask};

/// Only components taller than this are inspected for nested content.
pub const NESTING_MIN_HEIGHT: i32 = 50;
const SEED_STEP: usize = 10;
const NESTED_MIN_PIXELS: usize = 500;
const NESTED_MIN_HEIGHT: usize = 30;
/// A nested region covering this much of its parent is the parent itself.
const REDUNDANT_COVERAGE: f64 = 0.9;

#[derive(Debug, Clone, Copy)]
pub struct NestingParams {
    pub tolerance: u8,
    pub line_thickness: usize,
    pub min_evenness: f64,
    pub max_dent_ratio: f64,
    pub depth: usize,
}

impl From<&SegmentationParams> for NestingParams {
    fn from(params: &SegmentationParams) -> Self {
        Self {
            tolerance: params.ffl_block,
            line_thickness: params.line_thickness,
            min_evenness: params.rec_min_evenness,
            max_dent_ratio: params.rec_max_dent_ratio,
            depth: params.nesting_depth,
        }
    }
}

struct Nested {
    component: Component,
    redundant: bool,
}

// Rectangular regions of near-uniform grey inside one component patch,
// in patch coordinates.
fn detect_nested(patch: &GrayImage, params: &NestingParams) -> Vec<Nested> {
    let (width, height) = patch.dimensions();
    let patch_area = width as f64 * height as f64;
    let mut mask = VisitMask::new(width, height);
    let mut nested = Vec::new();

    for row in (0..height).step_by(SEED_STEP) {
        for col in (0..width).step_by(SEED_STEP) {
            if mask.is_visited(col, row) {
                continue;
            }
            let region = flood_fill(patch, col, row, params.tolerance, &mut mask);
            if region.len() < NESTED_MIN_PIXELS {
                continue;
            }
            let boundary = region.boundary();
            if boundary.height() < NESTED_MIN_HEIGHT {
                continue;
            }
            let redundant = ratio(boundary.extent_area() as f64, patch_area) >= REDUNDANT_COVERAGE;
            if is_line(&boundary, params.line_thickness) {
                continue;
            }
            if !is_rectangle(&boundary, height, params.min_evenness, params.max_dent_ratio) {
                continue;
            }
            nested.push(Nested {
                component: Component::rectangle(boundary.bbox()),
                redundant,
            });
        }
    }
    nested
}

/// Looks for rectangular sub-regions inside tall components.
///
/// A sub-region covering nearly the whole parent replaces the parent box
/// and keeps its category. Otherwise every sub-region is appended as a new
/// component and, while `depth` allows, inspected in turn. Returns the
/// number of appended components.
pub fn inspect_nesting(
    grey: &GrayImage,
    components: &mut Vec<Component>,
    params: &NestingParams,
) -> usize {
    if params.depth == 0 {
        return 0;
    }
    let (width, height) = grey.dimensions();
    let mut queue: VecDeque<(usize, usize)> = (0..components.len()).map(|i| (i, 1)).collect();
    let mut appended = 0;

    while let Some((index, level)) = queue.pop_front() {
        let bbox = components[index].bbox;
        if bbox.height() <= NESTING_MIN_HEIGHT {
            continue;
        }
        let clip = bbox.clip(width, height);
        if clip.width() <= 0 || clip.height() <= 0 {
            continue;
        }
        let patch = imageops::crop_imm(
            grey,
            clip.col_min as u32,
            clip.row_min as u32,
            clip.width() as u32,
            clip.height() as u32,
        )
        .to_image();

        let mut nested = detect_nested(&patch, params);
        for found in nested.iter_mut() {
            found.component.bbox = found.component.bbox.translate(clip.col_min, clip.row_min);
        }

        if let Some(found) = nested.iter().find(|found| found.redundant) {
            let parent = &mut components[index];
            debug!(from = ?parent.bbox, to = ?found.component.bbox, "nested region replaces parent");
            parent.bbox = found.component.bbox;
            parent.is_rectangle = true;
            continue;
        }
        for found in nested {
            components.push(found.component);
            appended += 1;
            if level < params.depth {
                queue.push_back((components.len() - 1, level + 1));
            }
        }
    }
    appended
}
