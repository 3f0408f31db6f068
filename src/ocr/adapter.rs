use crate::core::geometry::{ratio, Bbox};
use crate::core::model::Text;
use crate::ocr::OcrLine;

/// Converts OCR quads into axis-aligned text boxes clipped to the image.
pub fn texts_from_lines(lines: &[OcrLine], width: u32, height: u32) -> Vec<Text> {
    lines
        .iter()
        .map(|line| {
            let (mut col_min, mut row_min) = (f32::INFINITY, f32::INFINITY);
            let (mut col_max, mut row_max) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
            for [col, row] in line.points {
                col_min = col_min.min(col);
                row_min = row_min.min(row);
                col_max = col_max.max(col);
                row_max = row_max.max(row);
            }
            let bbox = Bbox::new(col_min as i32, row_min as i32, col_max as i32, row_max as i32);
            Text::new(bbox.clip(width, height), line.text.clone())
        })
        .collect()
}

/// Drops single-character lines and lines too tall to be text.
pub fn refine_texts(texts: Vec<Text>, image_height: u32, max_height_ratio: f64) -> Vec<Text> {
    texts
        .into_iter()
        .filter(|text| {
            text.content.chars().count() > 1
                && ratio(text.bbox.height() as f64, image_height as f64) < max_height_ratio
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hulls_rotated_quads() {
        let line = OcrLine {
            points: [[12.7, 5.0], [90.2, 9.9], [88.0, 30.5], [10.4, 26.0]],
            text: "Search".to_string(),
        };
        let texts = texts_from_lines(&[line], 200, 100);
        assert_eq!(texts, vec![Text::new(Bbox::new(10, 5, 90, 30), "Search")]);
    }

    #[test]
    fn clips_quads_to_the_image() {
        let line = OcrLine::from_rect(-4.0, -2.0, 250.0, 20.0, "Header");
        let texts = texts_from_lines(&[line], 200, 100);
        assert_eq!(texts[0].bbox, Bbox::new(0, 0, 200, 20));
    }

    #[test]
    fn refine_drops_noise_and_tall_boxes() {
        let texts = vec![
            Text::new(Bbox::new(0, 0, 40, 20), "OK"),
            Text::new(Bbox::new(0, 30, 10, 45), "x"),
            Text::new(Bbox::new(0, 50, 40, 90), "Banner"),
        ];
        let refined = refine_texts(texts, 100, 0.3);
        assert_eq!(refined, vec![Text::new(Bbox::new(0, 0, 40, 20), "OK")]);
    }
}
