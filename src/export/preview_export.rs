use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::core::model::{Category, Segmentation, SegmentedScreenshot};
use crate::export::Exporter;

const TEXT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const COMPONENT_COLOR: Rgb<u8> = Rgb([0, 200, 0]);

/// Draws every segment outline on a copy of `image`: text in red, other
/// elements in green.
pub fn render_preview(image: &RgbImage, segmentation: &Segmentation) -> RgbImage {
    let mut canvas = image.clone();
    for segment in &segmentation.segments {
        if segment.width <= 0 || segment.height <= 0 {
            continue;
        }
        let color = match segment.class {
            Category::Text => TEXT_COLOR,
            Category::Component | Category::Block => COMPONENT_COLOR,
        };
        let rect = Rect::at(segment.position.column_min, segment.position.row_min)
            .of_size(segment.width as u32, segment.height as u32);
        draw_hollow_rect_mut(&mut canvas, rect, color);
    }
    canvas
}

/// Writes `<name>_preview.png`.
#[derive(Debug, Clone)]
pub struct PreviewExporter {
    out_dir: PathBuf,
}

impl PreviewExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.out_dir.join(format!("{name}_preview.png"))
    }
}

impl Exporter for PreviewExporter {
    fn export(&self, screenshot: &SegmentedScreenshot) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.path_for(&screenshot.name);
        render_preview(&screenshot.image, &screenshot.segmentation)
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}
