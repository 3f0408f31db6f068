use image::GrayImage;

use crate::core::geometry::Bbox;

/// Tracks pixels already claimed by a flood fill.
#[derive(Debug, Clone)]
pub struct VisitMask {
    width: u32,
    visited: Vec<bool>,
}

impl VisitMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            visited: vec![false; width as usize * height as usize],
        }
    }

    fn index(&self, col: u32, row: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    pub fn is_visited(&self, col: u32, row: u32) -> bool {
        self.visited[self.index(col, row)]
    }

    fn mark(&mut self, col: u32, row: u32) {
        let index = self.index(col, row);
        self.visited[index] = true;
    }
}

/// Connected set of pixels, stored as `(row, col)`. Never empty.
#[derive(Debug, Clone)]
pub struct Region {
    pixels: Vec<(u32, u32)>,
}

impl Region {
    #[cfg(test)]
    pub(crate) fn from_pixels(pixels: Vec<(u32, u32)>) -> Self {
        assert!(!pixels.is_empty());
        Self { pixels }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn boundary(&self) -> Boundary {
        let (mut col_min, mut col_max) = (u32::MAX, 0);
        let (mut row_min, mut row_max) = (u32::MAX, 0);
        for &(row, col) in &self.pixels {
            col_min = col_min.min(col);
            col_max = col_max.max(col);
            row_min = row_min.min(row);
            row_max = row_max.max(row);
        }
        let width = (col_max - col_min + 1) as usize;
        let height = (row_max - row_min + 1) as usize;

        let mut top = vec![u32::MAX; width];
        let mut bottom = vec![0; width];
        let mut left = vec![u32::MAX; height];
        let mut right = vec![0; height];
        for &(row, col) in &self.pixels {
            let (c, r) = ((col - col_min) as usize, (row - row_min) as usize);
            top[c] = top[c].min(row);
            bottom[c] = bottom[c].max(row);
            left[r] = left[r].min(col);
            right[r] = right[r].max(col);
        }
        Boundary {
            col_min,
            row_min,
            top,
            bottom,
            left,
            right,
        }
    }
}

/// Outline of a region as four traces.
///
/// `top`/`bottom` hold the extreme row of every spanned column, `left`/
/// `right` the extreme column of every spanned row.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub col_min: u32,
    pub row_min: u32,
    pub top: Vec<u32>,
    pub bottom: Vec<u32>,
    pub left: Vec<u32>,
    pub right: Vec<u32>,
}

impl Boundary {
    /// Number of spanned columns.
    pub fn width(&self) -> usize {
        self.top.len()
    }

    /// Number of spanned rows.
    pub fn height(&self) -> usize {
        self.left.len()
    }

    pub fn extent_area(&self) -> usize {
        self.width() * self.height()
    }

    /// Box from the first to the last spanned pixel.
    pub fn bbox(&self) -> Bbox {
        let col_min = self.col_min as i32;
        let row_min = self.row_min as i32;
        Bbox::new(
            col_min,
            row_min,
            col_min + self.width() as i32 - 1,
            row_min + self.height() as i32 - 1,
        )
    }
}

/// Four-connected flood fill with a floating range: a neighbor joins when
/// it differs from the pixel it was reached from by at most `tolerance`.
/// Pixels already in `mask` are never entered.
pub fn flood_fill(
    image: &GrayImage,
    col: u32,
    row: u32,
    tolerance: u8,
    mask: &mut VisitMask,
) -> Region {
    let (width, height) = image.dimensions();
    let mut pixels = Vec::new();
    let mut stack = vec![(col, row)];
    mask.mark(col, row);

    while let Some((c, r)) = stack.pop() {
        pixels.push((r, c));
        let value = image.get_pixel(c, r)[0];
        let neighbors = [
            (c > 0).then(|| (c - 1, r)),
            (c + 1 < width).then(|| (c + 1, r)),
            (r > 0).then(|| (c, r - 1)),
            (r + 1 < height).then(|| (c, r + 1)),
        ];
        for (nc, nr) in neighbors.into_iter().flatten() {
            if mask.is_visited(nc, nr) {
                continue;
            }
            if value.abs_diff(image.get_pixel(nc, nr)[0]) <= tolerance {
                mask.mark(nc, nr);
                stack.push((nc, nr));
            }
        }
    }
    Region { pixels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use pretty_assertions::assert_eq;

    #[test]
    fn fills_only_the_connected_blob() {
        let image = GrayImage::from_fn(20, 10, |x, _| {
            Luma([if x < 5 || x >= 15 { 255 } else { 0 }])
        });
        let mut mask = VisitMask::new(20, 10);
        let left = flood_fill(&image, 0, 0, 0, &mut mask);
        assert_eq!(left.len(), 50);
        assert!(mask.is_visited(4, 9));
        assert!(!mask.is_visited(15, 0));
        assert_eq!(left.boundary().bbox(), Bbox::new(0, 0, 4, 9));
    }

    #[test]
    fn floating_range_follows_smooth_gradients() {
        let ramp = GrayImage::from_fn(50, 4, |x, _| Luma([(x * 3) as u8]));
        let mut mask = VisitMask::new(50, 4);
        assert_eq!(flood_fill(&ramp, 0, 0, 3, &mut mask).len(), 200);

        let mut mask = VisitMask::new(50, 4);
        assert_eq!(flood_fill(&ramp, 0, 0, 2, &mut mask).len(), 4);
    }

    #[test]
    fn boundary_traces_extremes() {
        // an L shape: column 0 rows 0..=3 plus row 3 columns 0..=2
        let region = Region::from_pixels(vec![(0, 0), (1, 0), (2, 0), (3, 0), (3, 1), (3, 2)]);
        let boundary = region.boundary();
        assert_eq!(boundary.top, vec![0, 3, 3]);
        assert_eq!(boundary.bottom, vec![3, 3, 3]);
        assert_eq!(boundary.left, vec![0, 0, 0, 0]);
        assert_eq!(boundary.right, vec![0, 0, 0, 2]);
        assert_eq!(boundary.bbox(), Bbox::new(0, 0, 2, 3));
        assert_eq!(boundary.extent_area(), 12);
    }
}
