use image::GrayImage;
use tracing::trace;

use crate::core::geometry::{ratio, Relation};
use crate::core::model::Component;
use crate::detect::rectangle::is_rectangle;
use crate::detect::region::{flood_fill, VisitMask};

pub const SCAN_STEP_ROW: usize = 5;
pub const SCAN_STEP_COL: usize = 2;
/// Components must be wider and taller than this many pixels.
const MIN_SIDE: i32 = 3;
const MAX_HEIGHT_RATIO: f64 = 0.8;
const MAX_WIDE_RATIO: f64 = 50.0;
const MAX_TALL_RATIO: f64 = 40.0;
const THIN_SIDE: f64 = 8.0;
const THIN_MAX_ASPECT: f64 = 10.0;

/// Scans the binary map on a sparse grid and flood-fills every unvisited
/// foreground seed into a candidate component.
pub fn detect_components(
    binary: &GrayImage,
    min_area: i64,
    min_evenness: f64,
    max_dent_ratio: f64,
) -> Vec<Component> {
    let (width, height) = binary.dimensions();
    let mut mask = VisitMask::new(width, height);
    let mut components = Vec::new();

    for row in (0..height).step_by(SCAN_STEP_ROW) {
        for col in ((row % 2)..width).step_by(SCAN_STEP_COL) {
            if binary.get_pixel(col, row)[0] == 0 || mask.is_visited(col, row) {
                continue;
            }
            let region = flood_fill(binary, col, row, 0, &mut mask);
            let boundary = region.boundary();
            let bbox = boundary.bbox();
            if bbox.area() < min_area || bbox.width() <= MIN_SIDE || bbox.height() <= MIN_SIDE {
                trace!(?bbox, pixels = region.len(), "skip small region");
                continue;
            }
            let mut component = Component::new(bbox);
            component.is_rectangle = is_rectangle(&boundary, height, min_evenness, max_dent_ratio);
            components.push(component);
        }
    }
    components
}

/// Drops components that are too small, too tall or too elongated.
pub fn filter_components(
    components: Vec<Component>,
    min_area: i64,
    image_height: u32,
) -> Vec<Component> {
    let max_height = image_height as f64 * MAX_HEIGHT_RATIO;
    components
        .into_iter()
        .filter(|component| {
            let width = component.bbox.width() as f64;
            let height = component.bbox.height() as f64;
            if component.bbox.area() < min_area || height > max_height {
                return false;
            }
            let wide = ratio(width, height);
            let tall = ratio(height, width);
            let elongated = wide > MAX_WIDE_RATIO
                || tall > MAX_TALL_RATIO
                || (width.min(height) < THIN_SIDE && wide.max(tall) > THIN_MAX_ASPECT);
            !elongated
        })
        .collect()
}

/// Unions intersecting components until no pair intersects.
pub fn merge_intersected(mut components: Vec<Component>) -> Vec<Component> {
    loop {
        let mut changed = false;
        let mut merged: Vec<Component> = Vec::with_capacity(components.len());
        for component in components {
            let target = merged
                .iter_mut()
                .find(|kept| component.bbox.relation(&kept.bbox, (0, 0)) == Relation::Intersecting);
            match target {
                Some(kept) => {
                    kept.absorb(&component);
                    changed = true;
                }
                None => merged.push(component),
            }
        }
        components = merged;
        if !changed {
            return components;
        }
    }
}

/// Removes components nested in a component that is not a Block.
pub fn remove_contained_not_in_block(components: Vec<Component>) -> Vec<Component> {
    let mut dropped = vec![false; components.len()];
    for i in 0..components.len() {
        for j in i + 1..components.len() {
            let (a, b) = (&components[i], &components[j]);
            match a.bbox.relation(&b.bbox, (0, 0)) {
                Relation::Inside if !b.is_block() => dropped[i] = true,
                Relation::Contains if !a.is_block() => dropped[j] = true,
                _ => {}
            }
        }
    }
    components
        .into_iter()
        .zip(dropped)
        .filter_map(|(component, dropped)| (!dropped).then_some(component))
        .collect()
}

/// Records for every component the indices of the components inside it.
///
/// Indices refer to `components` as passed in, so this runs last in the
/// detector and the tags are not carried past it.
pub fn tag_containment(components: &mut [Component]) {
    for component in components.iter_mut() {
        component.contains.clear();
    }
    for i in 0..components.len() {
        for j in i + 1..components.len() {
            match components[i].bbox.relation(&components[j].bbox, (0, 0)) {
                Relation::Inside => components[j].contains.push(i),
                Relation::Contains => components[i].contains.push(j),
                _ => {}
            }
        }
    }
    for component in components.iter_mut() {
        component.contains.sort_unstable();
    }
}
