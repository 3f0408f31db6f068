use image::GrayImage;

use crate::core::geometry::ratio;

/// Longest run of background pixels tolerated inside a line.
const MAX_LINE_GAP: usize = 5;

fn is_line_row(row: &[u8], min_length_ratio: f64) -> bool {
    let mut length = 0usize;
    let mut gap = 0usize;
    for &pixel in row {
        if pixel > 0 {
            if gap > MAX_LINE_GAP {
                return false;
            }
            length += 1;
            gap = 0;
        } else if length > 0 {
            gap += 1;
        }
    }
    ratio(length as f64, row.len() as f64) > min_length_ratio
}

/// Erases thin horizontal separators from a binary map.
///
/// A row qualifies when its foreground spans more than `min_length_ratio`
/// of the width with no gap wider than a few pixels; a band of consecutive
/// qualifying rows is cleared when it is thinner than `max_thickness`.
/// Returns the number of cleared rows.
pub fn remove_lines(binary: &mut GrayImage, max_thickness: usize, min_length_ratio: f64) -> usize {
    let width = binary.width() as usize;
    if width == 0 {
        return 0;
    }
    let flags: Vec<bool> = binary
        .as_raw()
        .chunks(width)
        .map(|row| is_line_row(row, min_length_ratio))
        .collect();

    let mut bands = Vec::new();
    let mut start = None;
    for (row, &is_line) in flags.iter().enumerate() {
        match (is_line, start) {
            (true, None) => start = Some(row),
            (false, Some(first)) => {
                bands.push(first..row);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(first) = start {
        bands.push(first..flags.len());
    }

    let mut cleared = 0;
    for band in bands.into_iter().filter(|band| band.len() < max_thickness) {
        for row in band {
            for col in 0..width {
                binary.put_pixel(col as u32, row as u32, image::Luma([0]));
            }
            cleared += 1;
        }
    }
    cleared
}
