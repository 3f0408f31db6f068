use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology;

/// Resizes so the longest edge equals `longest`, keeping the aspect ratio.
/// Returns a copy when the image already has that size.
pub fn resize_by_longest_edge(image: &RgbImage, longest: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let (target_w, target_h) = if height > width {
        ((longest as f64 * width as f64 / height as f64) as u32, longest)
    } else {
        (longest, (longest as f64 * height as f64 / width as f64) as u32)
    };
    let (target_w, target_h) = (target_w.max(1), target_h.max(1));
    if (target_w, target_h) == (width, height) {
        return image.clone();
    }
    imageops::resize(image, target_w, target_h, FilterType::Triangle)
}

// Border handling mirrors around the edge pixel (`dcb|abcd|cba`).
fn next_index(i: u32, len: u32) -> u32 {
    if i + 1 < len {
        i + 1
    } else if len >= 2 {
        len - 2
    } else {
        i
    }
}

/// Sum of the absolute forward differences along columns and rows,
/// saturated to 255.
pub fn gradient(grey: &GrayImage) -> GrayImage {
    let (width, height) = grey.dimensions();
    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let here = grey.get_pixel(x, y)[0] as i32;
            let right = grey.get_pixel(next_index(x, width), y)[0] as i32;
            let below = grey.get_pixel(x, next_index(y, height))[0] as i32;
            let magnitude = (right - here).abs() + (below - here).abs();
            out.put_pixel(x, y, Luma([magnitude.min(255) as u8]));
        }
    }
    out
}

/// Edge map of a greyscale image: gradient above `min_grad` becomes
/// foreground (255), followed by a 3x3 morphological closing.
pub fn binarize(grey: &GrayImage, min_grad: u8) -> GrayImage {
    let mut binary = gradient(grey);
    for pixel in binary.pixels_mut() {
        pixel[0] = if pixel[0] > min_grad { 255 } else { 0 };
    }
    morphology::close(&binary, Norm::LInf, 1)
}
