//! Shape tests on region boundaries.

use crate::core::geometry::ratio;
use crate::detect::region::Boundary;

/// Sign of an inward step for the top, bottom, left and right traces.
const DENT_DIRECTION: [f64; 4] = [1.0, -1.0, 1.0, -1.0];
/// Regions taller than this share of the image use a fixed evenness bar.
const TALL_SHAPE_RATIO: f64 = 0.3;
const TALL_SHAPE_EVENNESS: f64 = 0.85;
const LINE_SLIM_RATIO: f64 = 0.93;

/// Decides whether a boundary outlines a rectangle.
///
/// Each trace is walked while accumulating the depth of the current
/// deviation. Deviations deeper than 30% of the adjacent side mark an
/// abnormal run, inward deviations deeper than 15% count as a dent and
/// steps within about one pixel count as flat. Too many dents on one side
/// or too few flat steps overall reject the shape.
pub fn is_rectangle(
    boundary: &Boundary,
    image_height: u32,
    min_evenness: f64,
    max_dent_ratio: f64,
) -> bool {
    let traces: [&[u32]; 4] = [
        &boundary.top,
        &boundary.bottom,
        &boundary.left,
        &boundary.right,
    ];
    let vertical_side = boundary.left.len().max(boundary.right.len()) as f64;
    let horizontal_side = boundary.top.len().max(boundary.bottom.len()) as f64;

    let mut flat = 0usize;
    let mut perimeter = 0usize;
    for (n, trace) in traces.iter().enumerate() {
        let len = trace.len();
        perimeter += len;
        let adjacent = if n <= 1 { vertical_side } else { horizontal_side };
        let dent = DENT_DIRECTION[n];

        let mut depth = 0.0f64;
        let mut pits = 0usize;
        let mut abnormal = 0usize;
        let start = (3.0 + len as f64 * 0.02) as usize;
        for i in start..len.saturating_sub(1) {
            let step = trace[i] as f64 - trace[i + 1] as f64;
            depth += step;
            // steep outward start of the trace is a rounded corner
            if ratio(i as f64, len as f64) < 0.08 && ratio(dent * step, adjacent) > 0.5 {
                depth = 0.0;
            }
            if ratio(depth.abs(), adjacent) > 0.3 {
                abnormal += 1;
                if ratio(abnormal as f64, len as f64) > 0.1 {
                    return false;
                }
                continue;
            }
            abnormal = 0;
            if dent * depth < 0.0 && ratio(depth.abs(), adjacent) > 0.15 {
                pits += 1;
                continue;
            }
            if depth.abs() < 1.0 + adjacent * 0.015 {
                flat += 1;
            }
        }
        if ratio(pits as f64, len as f64) > max_dent_ratio {
            return false;
        }
    }

    let evenness = if ratio(boundary.height() as f64, image_height as f64) > TALL_SHAPE_RATIO {
        TALL_SHAPE_EVENNESS
    } else {
        min_evenness
    };
    ratio(flat as f64, perimeter as f64) >= evenness
}

/// True when nearly all columns (or rows) of the region are at most
/// `thickness` pixels thick.
pub fn is_line(boundary: &Boundary, thickness: usize) -> bool {
    let slim = |near: &[u32], far: &[u32]| {
        let count = near
            .iter()
            .zip(far)
            .filter(|(a, b)| (**b - **a) as usize <= thickness)
            .count();
        ratio(count as f64, near.len() as f64) > LINE_SLIM_RATIO
    };
    slim(&boundary.top, &boundary.bottom) || slim(&boundary.left, &boundary.right)
}
