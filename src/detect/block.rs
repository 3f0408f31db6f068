use image::GrayImage;

use crate::core::geometry::{ratio, Bbox};
use crate::core::model::{Category, Component};

/// Blocks span more than this share of the image on both axes.
pub const BLOCK_SIDE_RATIO: f64 = 0.15;
/// Share of foreground above which a scan line counts as busy.
const BUSY_LINE_DENSITY: f64 = 0.15;
/// Scan lines start this far inside the border.
const BORDER_SKIP: i32 = 5;
const SCAN_LINES: i32 = 4;
const MAX_BUSY_LINES: usize = 2;

/// Marks large rectangular components with an empty interior margin as
/// Blocks. Returns the number of Blocks found.
pub fn recognize_blocks(binary: &GrayImage, components: &mut [Component]) -> usize {
    let (width, height) = binary.dimensions();
    let mut blocks = 0;
    for component in components.iter_mut() {
        if !component.is_rectangle {
            continue;
        }
        let bbox = component.bbox;
        if ratio(bbox.height() as f64, height as f64) <= BLOCK_SIDE_RATIO
            || ratio(bbox.width() as f64, width as f64) <= BLOCK_SIDE_RATIO
        {
            continue;
        }
        if has_clear_margin(binary, &bbox) {
            component.category = Category::Block;
            blocks += 1;
        }
    }
    blocks
}

// Looks at four scan lines just inside each border. A side fails when more
// than two of its lines are busy.
fn has_clear_margin(binary: &GrayImage, bbox: &Bbox) -> bool {
    let clip = bbox.clip(binary.width(), binary.height());
    let (clip_w, clip_h) = (clip.width(), clip.height());
    if clip_w < BORDER_SKIP + SCAN_LINES || clip_h < BORDER_SKIP + SCAN_LINES {
        return false;
    }

    let row_busy = |row: i32| {
        let count = (clip.col_min..clip.col_max)
            .filter(|&col| binary.get_pixel(col as u32, row as u32)[0] > 0)
            .count();
        count as f64 > BUSY_LINE_DENSITY * clip_w as f64
    };
    let col_busy = |col: i32| {
        let count = (clip.row_min..clip.row_max)
            .filter(|&row| binary.get_pixel(col as u32, row as u32)[0] > 0)
            .count();
        count as f64 > BUSY_LINE_DENSITY * clip_h as f64
    };
    let near = |start: i32| (0..SCAN_LINES).map(move |i| start + BORDER_SKIP + i);
    let far = |end: i32| (0..SCAN_LINES).map(move |i| end - BORDER_SKIP - i);

    let sides = [
        near(clip.row_min).filter(|&r| row_busy(r)).count(),
        far(clip.row_max).filter(|&r| row_busy(r)).count(),
        near(clip.col_min).filter(|&c| col_busy(c)).count(),
        far(clip.col_max).filter(|&c| col_busy(c)).count(),
    ];
    sides.iter().all(|&busy| busy <= MAX_BUSY_LINES)
}
